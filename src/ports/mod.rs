//! Port traits at the boundary of the domain.

pub mod candle_port;
pub mod config_port;
