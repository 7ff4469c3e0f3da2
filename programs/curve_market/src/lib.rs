//! # Curve Market: Single-Asset Bonding Curve
//!
//! A self-contained automated market for one fungible asset on Solana.
//!
//! ## Overview
//!
//! The program mints units against a collateral reserve along a quadratic
//! step curve, so the price rises with circulating supply and falls as
//! supply is redeemed. Each market carries a hard reserve cap: the purchase
//! that reaches it closes the market for good, after which only the admin
//! withdrawal of the reserve remains.
//!
//! ## How it works
//! - The curve engine integrates the step function exactly, one whole unit
//!   at a time, in checked integer arithmetic.
//! - The SPL unit mint is the ledger of record: circulating supply is read
//!   from `mint.supply`, never duplicated in program state.

use anchor_lang::prelude::*;

pub mod curve;
pub mod instructions;
pub mod state;

pub use curve::*;
pub use instructions::*;

// Replace with your deployed program ID
declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

/// Main curve market program
#[program]
pub mod curve_market {
    use super::*;

    /// Initialize the protocol with global configuration
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        ctx.accounts.initialize(ctx.bumps)
    }

    /// Open a new market with its reserve cap and curve steepness
    pub fn create_market(
        ctx: Context<CreateMarket>,
        reserve_cap: u64,
        steepness: u64,
    ) -> Result<()> {
        ctx.accounts.create_market(reserve_cap, steepness, ctx.bumps)
    }

    /// Buy units with collateral; returns the units minted
    pub fn purchase(ctx: Context<Purchase>, payment: u64) -> Result<u64> {
        ctx.accounts.purchase(payment)
    }

    /// Burn units for collateral; returns the value paid out
    pub fn redeem(ctx: Context<Redeem>, units: u64) -> Result<u64> {
        ctx.accounts.redeem(units)
    }

    /// Drain a closed market's vault (admin only); returns the amount moved
    pub fn withdraw_reserve(ctx: Context<WithdrawReserve>) -> Result<u64> {
        ctx.accounts.withdraw_reserve()
    }

    /// Preview how many units a payment would mint right now
    pub fn quote_purchase(ctx: Context<Quote>, payment: u64) -> Result<u64> {
        ctx.accounts.quote_purchase(payment)
    }

    /// Preview how much collateral a redemption would return right now
    pub fn quote_redemption(ctx: Context<Quote>, units: u64) -> Result<u64> {
        ctx.accounts.quote_redemption(units)
    }

    /// Curve price at an arbitrary supply level
    pub fn spot_price(ctx: Context<Quote>, supply: u64) -> Result<u64> {
        ctx.accounts.spot_price(supply)
    }
}
