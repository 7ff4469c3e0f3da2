//! Market State
//!
//! Each market sells a single unit mint against a collateral reserve along
//! the quadratic step curve, and closes itself once the reserve cap is
//! reached.
//!
//! The state machine has two states:
//!
//! ```text
//! Open ──(reserve reaches cap during a purchase)──▶ Closed
//! ```
//!
//! `Closed` is terminal. Purchases and redemptions are rejected once
//! closed; reserve withdrawal is rejected until closed.

use anchor_lang::prelude::*;

/// Errors raised by market state transitions and their handlers
#[error_code]
pub enum MarketError {
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Market is closed")]
    MarketClosed,
    #[msg("Market is not closed yet")]
    MarketNotClosed,
    #[msg("Payment too small to mint any units")]
    NothingToMint,
    #[msg("Holder balance is insufficient")]
    InsufficientBalance,
    #[msg("Caller is not the market administrator")]
    Unauthorized,
    #[msg("Collateral transfer cannot be honored")]
    TransferFailed,
    #[msg("Arithmetic overflow")]
    Overflow,
}

/// Individual market account
///
/// Seeds: ["market", index.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct Market {
    /// Sequential index within the protocol (PDA seed)
    pub index: u64,

    /// Market creator's address
    pub creator: Pubkey,

    /// Mint of the units sold along the curve (circulating supply lives in
    /// the mint, never duplicated here)
    pub unit_mint: Pubkey,

    /// Collateral token mint address
    pub collateral_mint: Pubkey,

    /// Curve steepness multiplier (>= 1)
    pub steepness: u64,

    /// Maximum cumulative payment value the market will ever hold
    pub reserve_cap: u64,

    /// Cumulative net payment value held; 0 <= reserve_total <= reserve_cap
    pub reserve_total: u64,

    /// Once true, never reverts to false
    pub is_closed: bool,

    /// Unix timestamp when the market was created
    pub created_at: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl Market {
    pub const SEED: &'static [u8] = b"market";

    /// Absorbs an incoming payment against the cap.
    ///
    /// Clamps the projected reserve at `reserve_cap` and closes the market
    /// when the cap is reached or crossed. Crossing happens at most once:
    /// afterwards the market is closed and rejects further payments.
    ///
    /// # Returns
    /// * `(accepted, refund)`: the portion booked into the reserve and the
    ///   overshoot owed back to the buyer. `accepted + refund == payment`.
    pub fn apply_payment(&mut self, payment: u64) -> Result<(u64, u64)> {
        require!(payment > 0, MarketError::InvalidAmount);
        require!(!self.is_closed, MarketError::MarketClosed);

        let projected = self
            .reserve_total
            .checked_add(payment)
            .ok_or(MarketError::Overflow)?;

        if projected >= self.reserve_cap {
            let refund = projected - self.reserve_cap;
            self.reserve_total = self.reserve_cap;
            self.is_closed = true;
            Ok((payment - refund, refund))
        } else {
            self.reserve_total = projected;
            Ok((payment, 0))
        }
    }

    /// Releases the reserve for withdrawal.
    ///
    /// Only legal after closure. Resets the tracked total to zero; the
    /// handler moves whatever the vault actually holds, so a repeated
    /// withdrawal simply moves zero (or redemption dust).
    pub fn settle_withdrawal(&mut self) -> Result<()> {
        require!(self.is_closed, MarketError::MarketNotClosed);
        self.reserve_total = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_market(reserve_cap: u64) -> Market {
        Market {
            index: 0,
            creator: Pubkey::default(),
            unit_mint: Pubkey::default(),
            collateral_mint: Pubkey::default(),
            steepness: 1,
            reserve_cap,
            reserve_total: 0,
            is_closed: false,
            created_at: 0,
            bump: 255,
        }
    }

    #[test]
    fn test_payments_accumulate_while_open() {
        let mut market = open_market(1_000);

        assert_eq!(market.apply_payment(300).unwrap(), (300, 0));
        assert_eq!(market.apply_payment(400).unwrap(), (400, 0));
        assert_eq!(market.reserve_total, 700);
        assert!(!market.is_closed);
    }

    #[test]
    fn test_exact_cap_closes() {
        let mut market = open_market(1_000);

        assert_eq!(market.apply_payment(1_000).unwrap(), (1_000, 0));
        assert_eq!(market.reserve_total, 1_000);
        assert!(market.is_closed);
    }

    #[test]
    fn test_overshoot_clamps_refunds_and_closes_once() {
        let mut market = open_market(1_000);
        market.apply_payment(900).unwrap();

        let (accepted, refund) = market.apply_payment(250).unwrap();
        assert_eq!(accepted, 100);
        assert_eq!(refund, 150);
        assert_eq!(market.reserve_total, 1_000);
        assert!(market.is_closed);

        // Closed is terminal: no further payments, so no second closure
        assert!(market.apply_payment(1).is_err());
    }

    #[test]
    fn test_zero_payment_rejected() {
        let mut market = open_market(1_000);
        assert!(market.apply_payment(0).is_err());
        assert_eq!(market.reserve_total, 0);
    }

    #[test]
    fn test_withdrawal_requires_closure() {
        let mut market = open_market(1_000);
        assert!(market.settle_withdrawal().is_err());

        market.apply_payment(1_000).unwrap();
        market.settle_withdrawal().unwrap();
        assert_eq!(market.reserve_total, 0);
        assert!(market.is_closed);

        // A second settlement is a no-op that still succeeds
        market.settle_withdrawal().unwrap();
        assert_eq!(market.reserve_total, 0);
    }
}
