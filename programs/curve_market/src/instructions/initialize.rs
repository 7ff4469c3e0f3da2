//! Protocol Initialization
//!
//! Sets up the global configuration for the curve market protocol.
//! This is typically called once during deployment.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

use crate::state::Config;

/// Accounts required for protocol initialization
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Protocol administrator (becomes the admin)
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::SEED],
        bump,
    )]
    pub config: Account<'info, Config>,

    /// Collateral token mint (e.g., USDC)
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Initialize the protocol configuration
    pub fn initialize(&mut self, bumps: InitializeBumps) -> Result<()> {
        self.config.set_inner(Config {
            admin: self.admin.key(),
            collateral_mint: self.collateral_mint.key(),
            market_count: 0,
            bump: bumps.config,
        });

        msg!("Protocol initialized!");
        msg!("Admin: {}", self.admin.key());
        msg!("Collateral mint: {}", self.collateral_mint.key());

        Ok(())
    }
}
