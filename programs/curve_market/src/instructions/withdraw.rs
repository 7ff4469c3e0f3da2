//! Reserve Withdrawal
//!
//! After a market has closed, the protocol admin can drain its vault. The
//! transfer moves the vault's actual balance rather than the tracked
//! `reserve_total`, so any divergence left behind by redemptions is swept
//! along with the reserve.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::state::{Config, Market, MarketError};

/// Event emitted when the reserve is withdrawn
#[event]
pub struct ReserveWithdrawn {
    pub market_index: u64,
    pub admin: Pubkey,
    pub collateral_out: u64,
}

/// Accounts for withdrawing a closed market's reserve
#[derive(Accounts)]
pub struct WithdrawReserve<'info> {
    /// Protocol administrator
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Protocol configuration; pins the admin key
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = config.admin == admin.key() @ MarketError::Unauthorized,
    )]
    pub config: Account<'info, Config>,

    /// Market whose reserve is withdrawn
    #[account(mut)]
    pub market: Account<'info, Market>,

    /// Collateral mint
    #[account(
        constraint = collateral_mint.key() == market.collateral_mint,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Admin's collateral account
    #[account(
        init_if_needed,
        payer = admin,
        associated_token::mint = collateral_mint,
        associated_token::authority = admin,
    )]
    pub admin_collateral: InterfaceAccount<'info, TokenAccount>,

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

impl<'info> WithdrawReserve<'info> {
    /// Withdraw the closed market's entire vault balance
    pub fn withdraw_reserve(&mut self) -> Result<u64> {
        // Gate on closure and zero the tracked total before the transfer;
        // a failed CPI aborts the transaction and restores it
        self.market.settle_withdrawal()?;

        let amount = self.vault.amount;

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
                    to: self.admin_collateral.to_account_info(),
                    authority: self.market.to_account_info(),
                },
                market_signer,
            ),
            amount,
            self.collateral_mint.decimals,
        )?;

        emit!(ReserveWithdrawn {
            market_index: self.market.index,
            admin: self.admin.key(),
            collateral_out: amount,
        });

        Ok(amount)
    }
}
