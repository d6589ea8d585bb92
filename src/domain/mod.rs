//! Core domain types and logic.

pub mod breakout;
pub mod candle;
pub mod config_validation;
pub mod crossover;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod filter;
pub mod indicator;
pub mod instrument;
pub mod normalizer;
pub mod risk;
pub mod signal;
pub mod strategy;
