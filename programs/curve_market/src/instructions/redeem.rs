//! Unit Redemption
//!
//! Burns units back into the curve and pays out collateral from the vault,
//! priced by walking the curve downward from the current supply.
//!
//! Redemption deliberately leaves `reserve_total` and the closure flag
//! untouched: reserve accounting is decoupled from redemption payouts, and
//! burning units never reopens a closed market.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        burn, transfer_checked, Burn, Mint, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::curve::StepCurve;
use crate::state::{Market, MarketError};

/// Event emitted when units are redeemed
#[event]
pub struct UnitsRedeemed {
    pub market_index: u64,
    pub holder: Pubkey,
    pub units_in: u64,
    pub collateral_out: u64,
}

/// Accounts for redeeming units
#[derive(Accounts)]
pub struct Redeem<'info> {
    /// Holder redeeming units
    #[account(mut)]
    pub holder: Signer<'info>,

    /// Market being redeemed against
    pub market: Account<'info, Market>,

    /// Unit token mint
    #[account(
        mut,
        constraint = unit_mint.key() == market.unit_mint,
    )]
    pub unit_mint: InterfaceAccount<'info, Mint>,

    /// Collateral mint
    #[account(
        constraint = collateral_mint.key() == market.collateral_mint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Holder's unit token account
    #[account(
        mut,
        associated_token::mint = unit_mint,
        associated_token::authority = holder,
    )]
    pub holder_units: InterfaceAccount<'info, TokenAccount>,

    /// Holder's collateral account
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = holder,
    )]
    pub holder_collateral: InterfaceAccount<'info, TokenAccount>,

    /// Market's reserve vault
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = market,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Redeem<'info> {
    /// Redeem units for collateral
    pub fn redeem(&mut self, units: u64) -> Result<u64> {
        require!(units > 0, MarketError::InvalidAmount);
        require!(
            self.holder_units.amount >= units,
            MarketError::InsufficientBalance
        );
        require!(!self.market.is_closed, MarketError::MarketClosed);

        let supply = self.unit_mint.supply;
        let (value, burned) =
            StepCurve::quote_redemption(self.market.steepness, units, supply)?;

        // Burn exactly the requested units
        burn(
            CpiContext::new(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.unit_mint.to_account_info(),
                    from: self.holder_units.to_account_info(),
                    authority: self.holder.to_account_info(),
                },
            ),
            burned,
        )?;

        // A payout the vault cannot honor fails the whole redemption; the
        // aborted transaction also rolls the burn back
        require!(self.vault.amount >= value, MarketError::TransferFailed);

        let market_seeds = &[
            Market::SEED,
            &self.market.index.to_le_bytes(),
            &[self.market.bump],
        ];
        let market_signer = &[&market_seeds[..]];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.vault.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.holder_collateral.to_account_info(),
                    authority: self.market.to_account_info(),
                },
                market_signer,
            ),
            value,
            self.collateral_mint.decimals,
        )?;

        emit!(UnitsRedeemed {
            market_index: self.market.index,
            holder: self.holder.key(),
            units_in: burned,
            collateral_out: value,
        });

        Ok(value)
    }
}
