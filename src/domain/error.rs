//! Domain error types.

/// Top-level error type for tradeboss.
#[derive(Debug, thiserror::Error)]
pub enum TradeBossError {
    #[error("insufficient data for {series} ({agent}): have {bars} bars, need {minimum}")]
    InsufficientData {
        series: String,
        agent: String,
        bars: usize,
        minimum: usize,
    },

    #[error("invalid series {series}: {reason}")]
    InvalidSeries { series: String, reason: String },

    #[error("external agent {agent} unavailable: {reason}")]
    ExternalAgentUnavailable { agent: String, reason: String },

    #[error("no agents registered")]
    NoAgents,

    #[error("agent {0} is already registered")]
    DuplicateAgent(String),

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradeBossError> for std::process::ExitCode {
    fn from(err: &TradeBossError) -> Self {
        let code: u8 = match err {
            TradeBossError::Io(_) => 1,
            TradeBossError::ConfigParse { .. }
            | TradeBossError::ConfigMissing { .. }
            | TradeBossError::ConfigInvalid { .. }
            | TradeBossError::DuplicateAgent(_) => 2,
            TradeBossError::Data { .. } | TradeBossError::InvalidSeries { .. } => 3,
            TradeBossError::InsufficientData { .. } => 5,
            TradeBossError::ExternalAgentUnavailable { .. } | TradeBossError::NoAgents => 6,
        };
        std::process::ExitCode::from(code)
    }
}
