//! Global Protocol Configuration
//!
//! Protocol-wide settings shared by every market.

use anchor_lang::prelude::*;

/// Global configuration account (singleton PDA)
///
/// Seeds: ["config"]
#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Administrator holding the reserve-withdrawal capability
    pub admin: Pubkey,

    /// Collateral token mint accepted by every market (e.g., USDC)
    pub collateral_mint: Pubkey,

    /// Total markets created (used as incrementing index)
    pub market_count: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl Config {
    pub const SEED: &'static [u8] = b"config";
}
