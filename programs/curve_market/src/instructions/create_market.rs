//! Market Creation
//!
//! Anyone can open a market by fixing its two curve-economic parameters:
//! 1. A reserve cap: the market closes for good once it has absorbed this
//!    much collateral.
//! 2. A steepness multiplier for the quadratic step curve.
//!
//! Creation mints nothing: the unit supply starts at zero and the first
//! whole step of the curve is free by construction.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::curve::UNIT_DECIMALS;
use crate::state::{Config, Market};

/// Event emitted when a new market is created
#[event]
pub struct MarketCreated {
    pub market_index: u64,
    pub creator: Pubkey,
    pub unit_mint: Pubkey,
    pub reserve_cap: u64,
    pub steepness: u64,
}

/// Accounts for creating a new market
#[derive(Accounts)]
pub struct CreateMarket<'info> {
    /// Market creator (pays for accounts)
    #[account(mut)]
    pub creator: Signer<'info>,

    /// Global protocol configuration
    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// The new market account
    #[account(
        init,
        payer = creator,
        space = 8 + Market::INIT_SPACE,
        seeds = [Market::SEED, config.market_count.to_le_bytes().as_ref()],
        bump,
    )]
    pub market: Account<'info, Market>,

    /// Unit token mint (created for this market; the mint's supply is the
    /// market's circulating supply)
    #[account(
        init,
        payer = creator,
        mint::decimals = UNIT_DECIMALS,
        mint::authority = config,
        seeds = [b"unit_mint", config.market_count.to_le_bytes().as_ref()],
        bump,
    )]
    pub unit_mint: InterfaceAccount<'info, Mint>,

    /// Collateral token mint
    #[account(
        constraint = collateral_mint.key() == config.collateral_mint
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Market's reserve vault
    #[account(
        init,
        payer = creator,
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

impl<'info> CreateMarket<'info> {
    pub fn create_market(
        &mut self,
        reserve_cap: u64,
        steepness: u64,
        bumps: CreateMarketBumps,
    ) -> Result<()> {
        let clock = Clock::get()?;

        require!(reserve_cap > 0, CreateMarketError::InvalidReserveCap);
        require!(steepness > 0, CreateMarketError::InvalidSteepness);

        let market_index = self.config.market_count;

        self.market.set_inner(Market {
            index: market_index,
            creator: self.creator.key(),
            unit_mint: self.unit_mint.key(),
            collateral_mint: self.collateral_mint.key(),
            steepness,
            reserve_cap,
            reserve_total: 0,
            is_closed: false,
            created_at: clock.unix_timestamp as u64,
            bump: bumps.market,
        });

        self.config.market_count += 1;

        emit!(MarketCreated {
            market_index,
            creator: self.creator.key(),
            unit_mint: self.unit_mint.key(),
            reserve_cap,
            steepness,
        });

        Ok(())
    }
}

#[error_code]
pub enum CreateMarketError {
    #[msg("Reserve cap must be greater than zero")]
    InvalidReserveCap,
    #[msg("Steepness must be greater than zero")]
    InvalidSteepness,
}
