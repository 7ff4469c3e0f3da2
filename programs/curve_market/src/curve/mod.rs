//! # Curve Engine Module
//!
//! This module implements the **quadratic step curve** that prices units of
//! the market's asset against its circulating supply.
//!
//! Unlike constant-product AMMs (x * y = k), this market has no paired
//! reserve: units are minted against incoming collateral and burned for
//! outgoing collateral, with the price read directly off the supply level:
//!
//! ```text
//!            price(s) = steepness * floor(s / SUPPLY_SCALE)^2 * PRICE_SCALE
//!
//!   ┌────────────────────────────────────────┐
//!   │  price ▲                    ┌────      │
//!   │        │             ┌─────┘          │
//!   │        │       ┌─────┘                │
//!   │        │ ┌─────┘                      │
//!   │        └─┴─────┴─────┴─────▶ supply   │
//!   │          0    1.0   2.0   (whole      │
//!   │                             units)    │
//!   │                                        │
//!   │  Flat within each whole-unit band:    │
//!   │  a step function, not a parabola.     │
//!   └────────────────────────────────────────┘
//! ```
//!
//! Quoting integrates this step function by walking the supply one whole
//! unit at a time, so every quote is exact in integer arithmetic.

pub mod step_curve;

pub use step_curve::*;
