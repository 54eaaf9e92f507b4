//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_recommendation_adapter::JsonRecommendationAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::agent::external::ExternalAgent;
use crate::domain::agent::{
    MomentumParams, QuantitativeParams, SwingParams, ValueReversionParams, DETERMINISTIC_AGENTS,
};
use crate::domain::boss::{BossConfig, TradingBoss, DEFAULT_WEIGHT};
use crate::domain::config_validation::{
    parse_optional_date, validate_boss_config, validate_data_config,
    validate_verification_config,
};
use crate::domain::error::TradeBossError;
use crate::domain::series::Series;
use crate::domain::verification::{self, Verification, VerificationSettings};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradeboss", about = "Multi-agent trading decision engine")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decide BUY, SELL or HOLD for the latest bar of an instrument
    Decide {
        /// CSV file, or a directory of `<instrument>.csv` files
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Instrument to load when --data is a directory
        #[arg(short, long)]
        instrument: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// JSON recommendation file registered as an extra agent
        #[arg(short, long)]
        external: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Decide as of a past date, check it against later bars and reweight
    Verify {
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        instrument: Option<String>,
        /// Last date the decision may see (YYYY-MM-DD)
        #[arg(long)]
        as_of: NaiveDate,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the instruments available in a data directory
    Instruments {
        /// Directory of `<instrument>.csv` files
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the agents a configuration registers
    Agents {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output.trim_end());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Runs the command and returns what it prints on stdout.
pub fn execute(cli: Cli) -> Result<String, TradeBossError> {
    match cli.command {
        Command::Decide {
            data,
            instrument,
            config,
            external,
            format,
        } => run_decide(
            data.as_deref(),
            instrument.as_deref(),
            config.as_deref(),
            external.as_deref(),
            format,
        ),
        Command::Verify {
            data,
            instrument,
            as_of,
            config,
            format,
        } => run_verify(
            data.as_deref(),
            instrument.as_deref(),
            as_of,
            config.as_deref(),
            format,
        ),
        Command::Instruments { data, config } => {
            run_instruments(data.as_deref(), config.as_deref())
        }
        Command::Agents { config } => run_agents(config.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Loads the INI at `path`, or an empty configuration (all defaults) when no
/// path is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, TradeBossError> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path)
        }
        None => FileConfigAdapter::from_string(""),
    }
}

fn window(config: &dyn ConfigPort, section: &str, key: &str, default: usize) -> usize {
    usize::try_from(config.get_int(section, key, default as i64)).unwrap_or(default)
}

/// Agent parameters and starting weights. Validates the configuration first.
pub fn build_boss_config(config: &dyn ConfigPort) -> Result<BossConfig, TradeBossError> {
    validate_boss_config(config)?;

    let swing_defaults = SwingParams::default();
    let momentum_defaults = MomentumParams::default();
    let value_defaults = ValueReversionParams::default();
    let quant_defaults = QuantitativeParams::default();

    Ok(BossConfig {
        swing: SwingParams {
            lookback_period: window(
                config,
                "swing",
                "lookback_period",
                swing_defaults.lookback_period,
            ),
            support_resistance_window: window(
                config,
                "swing",
                "support_resistance_window",
                swing_defaults.support_resistance_window,
            ),
        },
        momentum: MomentumParams {
            short_window: window(
                config,
                "momentum",
                "short_window",
                momentum_defaults.short_window,
            ),
            long_window: window(
                config,
                "momentum",
                "long_window",
                momentum_defaults.long_window,
            ),
        },
        value: ValueReversionParams {
            valuation_window: window(
                config,
                "value",
                "valuation_window",
                value_defaults.valuation_window,
            ),
            buy_discount: config.get_double("value", "buy_discount", value_defaults.buy_discount),
            sell_premium: config.get_double("value", "sell_premium", value_defaults.sell_premium),
        },
        quant: QuantitativeParams {
            feature_window: window(
                config,
                "quant",
                "feature_window",
                quant_defaults.feature_window,
            ),
            volatility_ceiling: config.get_double(
                "quant",
                "volatility_ceiling",
                quant_defaults.volatility_ceiling,
            ),
        },
        weights: DETERMINISTIC_AGENTS
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    config.get_double("weights", name, DEFAULT_WEIGHT),
                )
            })
            .collect(),
    })
}

pub fn build_verification_settings(
    config: &dyn ConfigPort,
) -> Result<VerificationSettings, TradeBossError> {
    validate_verification_config(config)?;
    let defaults = VerificationSettings::default();
    Ok(VerificationSettings {
        horizon_days: window(config, "verification", "horizon_days", defaults.horizon_days),
        neutral_band_pct: config.get_double(
            "verification",
            "neutral_band_pct",
            defaults.neutral_band_pct,
        ),
    })
}

/// Builds the boss from configuration and registers the external agent when
/// a recommendation file is given on the command line or under `[external]`.
pub fn build_boss(
    config: &dyn ConfigPort,
    external_override: Option<&Path>,
) -> Result<TradingBoss, TradeBossError> {
    let mut boss = TradingBoss::from_config(&build_boss_config(config)?);

    let external_path = external_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("external", "path").map(PathBuf::from));

    if let Some(path) = external_path {
        let name = config
            .get_string("external", "name")
            .unwrap_or_else(|| "external".to_string());
        let weight = config.get_double("external", "weight", DEFAULT_WEIGHT);
        let required_bars = window(config, "external", "required_bars", 1);
        let port = JsonRecommendationAdapter::new(name.clone(), path);
        let agent = ExternalAgent::new(name, Box::new(port)).with_required_bars(required_bars);
        boss.register_agent(Box::new(agent), weight)?;
    }

    Ok(boss)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub base_path: PathBuf,
    pub instrument: String,
}

/// Resolves where to read bars from. A file path names its own instrument;
/// a directory needs `--instrument` or `[data] instrument`.
pub fn resolve_data_source(
    data: Option<&Path>,
    instrument: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<DataSource, TradeBossError> {
    let path = data
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("data", "path").map(PathBuf::from))
        .ok_or_else(|| TradeBossError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;

    if path.is_file() {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| TradeBossError::Data {
                reason: format!("cannot derive instrument from {}", path.display()),
            })?;
        let base_path = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        return Ok(DataSource {
            base_path,
            instrument: stem,
        });
    }

    let instrument = instrument
        .map(str::to_string)
        .or_else(|| config.get_string("data", "instrument"))
        .ok_or_else(|| TradeBossError::ConfigMissing {
            section: "data".into(),
            key: "instrument".into(),
        })?;

    Ok(DataSource {
        base_path: path,
        instrument,
    })
}

/// Fetches `instrument` over the `[data]` date range and validates the bars
/// as a series.
pub fn load_series(
    data_port: &dyn DataPort,
    instrument: &str,
    config: &dyn ConfigPort,
) -> Result<Series, TradeBossError> {
    validate_data_config(config)?;
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;
    let bars = data_port.fetch_ohlcv(instrument, start, end)?;
    Series::new(instrument, bars)
}

fn report_port(format: OutputFormat) -> Box<dyn ReportPort> {
    match format {
        OutputFormat::Text => Box::new(TextReportAdapter),
        OutputFormat::Json => Box::new(JsonReportAdapter),
    }
}

fn run_decide(
    data: Option<&Path>,
    instrument: Option<&str>,
    config_path: Option<&Path>,
    external: Option<&Path>,
    format: OutputFormat,
) -> Result<String, TradeBossError> {
    let config = load_config(config_path)?;
    let boss = build_boss(&config, external)?;
    let source = resolve_data_source(data, instrument, &config)?;
    let series = load_series(
        &CsvAdapter::new(source.base_path),
        &source.instrument,
        &config,
    )?;

    let decision = boss.decide(&series)?;
    report_port(format).render(&decision)
}

fn run_verify(
    data: Option<&Path>,
    instrument: Option<&str>,
    as_of: NaiveDate,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<String, TradeBossError> {
    let config = load_config(config_path)?;
    let boss = build_boss(&config, None)?;
    let settings = build_verification_settings(&config)?;
    let source = resolve_data_source(data, instrument, &config)?;
    let series = load_series(
        &CsvAdapter::new(source.base_path),
        &source.instrument,
        &config,
    )?;

    let (verification, weights) = verify_decision(&boss, &series, as_of, &settings)?;

    match format {
        OutputFormat::Text => Ok(format_verification(&verification, &weights)),
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "verification": verification,
            "weights": weights,
        }))
        .map_err(|e| TradeBossError::Data {
            reason: format!("failed to serialize verification: {}", e),
        }),
    }
}

/// Decides on the bars up to `as_of`, verifies the decision against the bars
/// after it and applies the outcome to the boss's weights. Returns the
/// verification and the weight table afterwards.
pub fn verify_decision(
    boss: &TradingBoss,
    series: &Series,
    as_of: NaiveDate,
    settings: &VerificationSettings,
) -> Result<(Verification, BTreeMap<String, f64>), TradeBossError> {
    let history = series.up_to(as_of)?;
    let decision = boss.decide(&history)?;
    let verification =
        verification::evaluate(&decision, series.after(decision.as_of), settings)?;

    if !boss.update_weights(&verification.performance()) {
        tracing::info!("no agent was confirmed; weights unchanged");
    }

    Ok((verification, boss.weights().into_iter().collect()))
}

fn format_verification(verification: &Verification, weights: &BTreeMap<String, f64>) -> String {
    let mut lines = vec![
        format!(
            "Verification for {} decided {}, checked {}",
            verification.instrument, verification.as_of, verification.verified_on
        ),
        format!(
            "Actual change: {:+.2}% ({})",
            verification.actual_change_pct, verification.movement
        ),
        format!(
            "Decision: {}",
            if verification.decision_correct {
                "correct"
            } else {
                "incorrect"
            }
        ),
        String::new(),
    ];
    for outcome in &verification.outcomes {
        lines.push(format!(
            "  {:<12} {:<5} {}",
            outcome.agent_name,
            outcome.action.to_string(),
            if outcome.correct { "correct" } else { "wrong" }
        ));
    }
    lines.push(String::new());
    lines.push("Weights:".to_string());
    for (name, weight) in weights {
        lines.push(format!("  {:<12} {:.4}", name, weight));
    }
    lines.join("\n")
}

fn run_instruments(
    data: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<String, TradeBossError> {
    let config = load_config(config_path)?;
    let base_path = data
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("data", "path").map(PathBuf::from))
        .ok_or_else(|| TradeBossError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;

    let instruments = CsvAdapter::new(base_path).list_instruments()?;
    tracing::info!(count = instruments.len(), "listed instruments");
    Ok(instruments.join("\n"))
}

fn run_agents(config_path: Option<&Path>) -> Result<String, TradeBossError> {
    let config = load_config(config_path)?;
    let boss = build_boss(&config, None)?;

    let mut lines = vec![format!("{:<12} {:>13} {:>8}", "Agent", "Required bars", "Weight")];
    for agent in boss.agents() {
        lines.push(format!(
            "{:<12} {:>13} {:>8.4}",
            agent.name(),
            agent.required_bars(),
            boss.weight(agent.name()).unwrap_or(0.0)
        ));
    }
    Ok(lines.join("\n"))
}

fn run_validate(config_path: &Path) -> Result<String, TradeBossError> {
    let config = load_config(Some(config_path))?;
    validate_boss_config(&config)?;
    validate_data_config(&config)?;
    validate_verification_config(&config)?;
    eprintln!("Config validated successfully");
    Ok(String::new())
}
