//! Port traits: the seams between the decision engine and the outside world.

pub mod config_port;
pub mod data_port;
pub mod recommendation_port;
pub mod report_port;
