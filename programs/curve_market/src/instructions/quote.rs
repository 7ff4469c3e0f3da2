//! Read-Only Quotes
//!
//! Quotes purchases and redemptions against the live mint supply without
//! touching any state, and exposes the raw curve price. Clients use these
//! for previews; `is_closed`, `reserve_total` and `reserve_cap` are plain
//! `Market` fields readable off-chain.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

use crate::curve::StepCurve;
use crate::state::Market;

/// Accounts for read-only quoting
#[derive(Accounts)]
pub struct Quote<'info> {
    /// Market being quoted
    pub market: Account<'info, Market>,

    /// Unit token mint (source of the circulating supply)
    #[account(
        constraint = unit_mint.key() == market.unit_mint,
    )]
    pub unit_mint: InterfaceAccount<'info, Mint>,
}

impl<'info> Quote<'info> {
    /// Units a payment would mint at the current supply
    pub fn quote_purchase(&self, payment: u64) -> Result<u64> {
        let (units, _) =
            StepCurve::quote_purchase(self.market.steepness, payment, self.unit_mint.supply)?;
        Ok(units)
    }

    /// Collateral a redemption would return at the current supply
    pub fn quote_redemption(&self, units: u64) -> Result<u64> {
        let (value, _) =
            StepCurve::quote_redemption(self.market.steepness, units, self.unit_mint.supply)?;
        Ok(value)
    }

    /// Curve price at an arbitrary supply level
    pub fn spot_price(&self, supply: u64) -> Result<u64> {
        StepCurve::spot_price(self.market.steepness, supply)
    }
}
