//! Unit Purchase
//!
//! Converts an incoming collateral payment into freshly minted units along
//! the step curve, and drives the market's cap-crossing logic.
//!
//! ## Ordering
//!
//! The market account is fully updated (reserve booked, closure flag set)
//! before any token CPI runs, and the refund of a cap overshoot is issued
//! before the mint is finalized. Any CPI failure aborts the transaction,
//! so either the whole purchase commits or none of it does.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::curve::StepCurve;
use crate::state::{Config, Market, MarketError};

/// Event emitted when units are purchased
#[event]
pub struct UnitsPurchased {
    pub market_index: u64,
    pub buyer: Pubkey,
    pub collateral_in: u64,
    pub refund: u64,
    pub units_out: u64,
    pub market_closed: bool,
}

/// Accounts for purchasing units
#[derive(Accounts)]
pub struct Purchase<'info> {
    /// Buyer
    #[account(mut)]
    pub buyer: Signer<'info>,

    /// Protocol configuration (mint authority for unit mints)
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Market being purchased from
    #[account(mut)]
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

    /// Buyer's collateral account
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = buyer,
    )]
    pub buyer_collateral: InterfaceAccount<'info, TokenAccount>,

    /// Buyer's unit token account
    #[account(
        init_if_needed,
        payer = buyer,
        associated_token::mint = unit_mint,
        associated_token::authority = buyer,
    )]
    pub buyer_units: InterfaceAccount<'info, TokenAccount>,

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

impl<'info> Purchase<'info> {
    /// Buy units with collateral
    pub fn purchase(&mut self, payment: u64) -> Result<u64> {
        // Circulating supply is whatever the ledger says it is
        let supply = self.unit_mint.supply;

        // State machine first: validates the payment, books the reserve,
        // clamps at the cap and flips the closure flag. Only the accepted
        // portion is quoted: an overshoot buys nothing past the cap.
        let (accepted, refund) = self.market.apply_payment(payment)?;

        let (units, cost) =
            StepCurve::quote_purchase(self.market.steepness, accepted, supply)?;
        require!(units > 0, MarketError::NothingToMint);

        // Pull the full payment into the vault
        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.buyer_collateral.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.vault.to_account_info(),
                    authority: self.buyer.to_account_info(),
                },
            ),
            payment,
            self.collateral_mint.decimals,
        )?;

        // Refund the cap overshoot before the mint is finalized
        if refund > 0 {
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
                        to: self.buyer_collateral.to_account_info(),
                        authority: self.market.to_account_info(),
                    },
                    market_signer,
                ),
                refund,
                self.collateral_mint.decimals,
            )?;
        }

        // Mint units to the buyer
        let config_seeds = &[Config::SEED, &[self.config.bump]];
        let signer_seeds = &[&config_seeds[..]];

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.unit_mint.to_account_info(),
                    to: self.buyer_units.to_account_info(),
                    authority: self.config.to_account_info(),
                },
                signer_seeds,
            ),
            units,
        )?;

        emit!(UnitsPurchased {
            market_index: self.market.index,
            buyer: self.buyer.key(),
            collateral_in: cost,
            refund,
            units_out: units,
            market_closed: self.market.is_closed,
        });

        Ok(units)
    }
}
