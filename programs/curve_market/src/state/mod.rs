//! State structures for the curve market protocol

pub mod config;
pub mod market;

pub use config::*;
pub use market::*;
