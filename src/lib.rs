//! tradeboss: a multi-agent trading decision engine.
//!
//! Several independent agents analyse the same price series and each proposes
//! BUY, SELL or HOLD; the [`domain::boss::TradingBoss`] scores and weights
//! those proposals and picks one, and realized outcomes feed back into the
//! weights.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command-line wiring in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
