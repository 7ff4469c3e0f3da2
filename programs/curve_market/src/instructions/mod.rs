//! Instruction handlers for the curve market protocol
//!
//! Each instruction represents an action users can take:
//! - `initialize` - Set up the protocol (admin only, once)
//! - `create_market` - Open a new curve market (permissionless)
//! - `purchase` - Buy units along the curve
//! - `redeem` - Burn units back into the curve
//! - `withdraw_reserve` - Drain a closed market's vault (admin only)
//! - `quote` - Read-only previews of purchase/redemption pricing

pub mod create_market;
pub mod initialize;
pub mod purchase;
pub mod quote;
pub mod redeem;
pub mod withdraw;

pub use create_market::*;
pub use initialize::*;
pub use purchase::*;
pub use quote::*;
pub use redeem::*;
pub use withdraw::*;
