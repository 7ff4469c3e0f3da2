//! # Quadratic Step Curve
//!
//! Pure pricing engine for the market. All functions are stateless: callers
//! pass in the circulating supply (read from the unit mint) and get back
//! exact integer quotes.
//!
//! ## Pricing
//!
//! ```text
//! price(s) = steepness * floor(s / SUPPLY_SCALE)^2 * PRICE_SCALE
//! ```
//!
//! The floor division is deliberate: the price is constant within each
//! whole-unit band of supply and jumps at band boundaries. Quotes therefore
//! walk the curve in `STEP_SIZE` increments instead of evaluating a closed
//! form. The discretization is the product, not an approximation.
//!
//! ## Purchase walk
//!
//! ```text
//! 1. step_price = price(supply)
//! 2. if it fits in the remaining payment: take the whole step
//! 3. otherwise: mint a pro-rated fraction of the band and stop
//! ```
//!
//! The returned cost always equals the tendered payment exactly; overshoot
//! of the reserve cap is handled by the market state machine, never here.
//!
//! ## Redemption walk
//!
//! Walks downward, pricing each stride at the band it vacates, which mirrors
//! the purchase walk: redeeming a quantity immediately after buying it at
//! the same supply level returns at most what was paid.

use anchor_lang::prelude::*;

/// Errors specific to the step-curve engine
#[error_code]
pub enum CurveError {
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Curve produced consecutive zero-price steps")]
    CurveStalled,
    #[msg("Cannot redeem more units than the circulating supply")]
    InsufficientSupply,
}

/// Decimals of the unit mint; all scales derive from it.
pub const UNIT_DECIMALS: u8 = 9;

/// Smallest units per whole unit of the asset ("1.0" in fixed point).
pub const SUPPLY_SCALE: u64 = 1_000_000_000;

/// Fixed-point base of quoted prices; same base as the supply by design.
pub const PRICE_SCALE: u64 = SUPPLY_SCALE;

/// Granularity of the integration walk: one whole unit per step.
pub const STEP_SIZE: u64 = SUPPLY_SCALE;

/// Quadratic step curve
///
/// Implements `price = steepness * band^2` where `band` is the whole-unit
/// portion of the supply.
pub struct StepCurve;

impl StepCurve {
    /// Instantaneous price at a given supply level.
    ///
    /// Pure and deterministic. The genesis band (`supply < SUPPLY_SCALE`)
    /// prices at zero; every later band is strictly more expensive than the
    /// one below it.
    pub fn spot_price(steepness: u64, supply: u64) -> Result<u64> {
        let band = (supply / SUPPLY_SCALE) as u128;
        let band_squared = band.checked_mul(band).ok_or(CurveError::Overflow)?;

        let price = (steepness as u128)
            .checked_mul(band_squared)
            .ok_or(CurveError::Overflow)?
            .checked_mul(PRICE_SCALE as u128)
            .ok_or(CurveError::Overflow)?;

        Ok(u64::try_from(price).map_err(|_| CurveError::Overflow)?)
    }

    /// Quote a purchase: how many units does `payment` buy starting at
    /// `supply`?
    ///
    /// Walks the supply upward one step at a time, accumulating the band
    /// price per step, and pro-rates the final band when the remaining
    /// payment no longer covers a whole step.
    ///
    /// # Returns
    /// * `(units_to_mint, total_cost)`; `total_cost == payment` always,
    ///   the engine never returns change.
    pub fn quote_purchase(steepness: u64, payment: u64, supply: u64) -> Result<(u64, u64)> {
        let mut cost: u64 = 0;
        let mut minted: u64 = 0;
        let mut level = supply;
        let mut consecutive_free = 0u8;

        while cost < payment {
            let step_price = Self::spot_price(steepness, level)?;

            if step_price == 0 {
                // The genesis band is free: advance the supply without
                // consuming payment. A second zero-price band in a row
                // means the curve can never absorb the payment, so stop
                // instead of looping forever. Unreachable for
                // steepness >= 1, but the engine must not assume that.
                consecutive_free += 1;
                require!(consecutive_free < 2, CurveError::CurveStalled);

                minted = minted.checked_add(STEP_SIZE).ok_or(CurveError::Overflow)?;
                level = level.checked_add(STEP_SIZE).ok_or(CurveError::Overflow)?;
                continue;
            }
            consecutive_free = 0;

            let remaining = payment - cost;
            if step_price > remaining {
                // Partial step: the remainder buys a fraction of the band.
                let fraction = (remaining as u128)
                    .checked_mul(SUPPLY_SCALE as u128)
                    .ok_or(CurveError::Overflow)?
                    / step_price as u128;

                // fraction < SUPPLY_SCALE since remaining < step_price
                minted = minted
                    .checked_add(fraction as u64)
                    .ok_or(CurveError::Overflow)?;
                cost = payment;
            } else {
                cost += step_price;
                minted = minted.checked_add(STEP_SIZE).ok_or(CurveError::Overflow)?;
                level = level.checked_add(STEP_SIZE).ok_or(CurveError::Overflow)?;
            }
        }

        Ok((minted, cost))
    }

    /// Quote a redemption: how much value do `units` return starting at
    /// `supply`?
    ///
    /// Walks the supply downward, pricing each stride (a whole step, or the
    /// final partial one) at the band it vacates. Always burns exactly
    /// `units`.
    ///
    /// # Returns
    /// * `(value_to_return, units_burned)`; `units_burned == units` always.
    pub fn quote_redemption(steepness: u64, units: u64, supply: u64) -> Result<(u64, u64)> {
        require!(units <= supply, CurveError::InsufficientSupply);

        let mut value: u64 = 0;
        let mut level = supply;
        let mut remaining = units;

        while remaining > 0 {
            let stride = remaining.min(STEP_SIZE);
            // Safe: units <= supply bounds the total strides
            level -= stride;

            let band_price = Self::spot_price(steepness, level)?;
            let slice = (band_price as u128)
                .checked_mul(stride as u128)
                .ok_or(CurveError::Overflow)?
                / SUPPLY_SCALE as u128;

            value = value
                .checked_add(u64::try_from(slice).map_err(|_| CurveError::Overflow)?)
                .ok_or(CurveError::Overflow)?;
            remaining -= stride;
        }

        Ok((value, units))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const S: u64 = SUPPLY_SCALE;

    #[test]
    fn test_spot_price_bands() {
        // Genesis band is free
        assert_eq!(StepCurve::spot_price(1, 0).unwrap(), 0);
        assert_eq!(StepCurve::spot_price(1, S - 1).unwrap(), 0);

        // Quadratic growth at band boundaries
        assert_eq!(StepCurve::spot_price(1, S).unwrap(), S);
        assert_eq!(StepCurve::spot_price(1, 2 * S).unwrap(), 4 * S);
        assert_eq!(StepCurve::spot_price(1, 3 * S).unwrap(), 9 * S);

        // Flat within a band
        assert_eq!(StepCurve::spot_price(1, 2 * S + 123).unwrap(), 4 * S);

        // Steepness scales linearly
        assert_eq!(StepCurve::spot_price(2, 3 * S).unwrap(), 18 * S);
    }

    #[test]
    fn test_spot_price_monotonic() {
        let mut previous = 0u64;
        for band in 0..50u64 {
            let price = StepCurve::spot_price(1, band * S).unwrap();
            if band > 1 {
                assert!(price > previous, "band {} not strictly above previous", band);
            }
            assert!(price >= previous);
            previous = price;
        }
    }

    #[test]
    fn test_spot_price_overflow_is_an_error() {
        assert!(StepCurve::spot_price(1, u64::MAX).is_err());
    }

    #[test]
    fn test_purchase_cost_equals_payment() {
        // The engine never returns change, whatever the payment is
        for payment in [1u64, 999, 1_000, S, 3 * S + 7, 14 * S] {
            let (_, cost) = StepCurve::quote_purchase(1, payment, 5 * S).unwrap();
            assert_eq!(cost, payment);
        }
    }

    #[test]
    fn test_purchase_from_genesis() {
        // First whole step is free; the 1000 remainder buys a fraction of
        // the band priced at 1.0
        let (minted, cost) = StepCurve::quote_purchase(1, 1_000, 0).unwrap();
        assert_eq!(minted, S + 1_000);
        assert_eq!(cost, 1_000);
    }

    #[test]
    fn test_purchase_whole_steps() {
        // From supply 1.0: step at 1.0 costs 1.0, step at 2.0 costs 4.0
        let (minted, cost) = StepCurve::quote_purchase(1, 5 * S, S).unwrap();
        assert_eq!(minted, 2 * S);
        assert_eq!(cost, 5 * S);
    }

    #[test]
    fn test_purchase_partial_step() {
        // 1.5 payment from supply 1.0: one whole step (cost 1.0), then
        // 0.5 buys 0.5 / 4.0 = 0.125 of the next band
        let (minted, cost) = StepCurve::quote_purchase(1, S + S / 2, S).unwrap();
        assert_eq!(minted, S + S / 8);
        assert_eq!(cost, S + S / 2);
    }

    #[test]
    fn test_purchase_dust_mints_nothing() {
        // At supply 40.0 the band costs 1600.0; one smallest unit of
        // payment rounds down to zero units
        let (minted, cost) = StepCurve::quote_purchase(1, 1, 40 * S).unwrap();
        assert_eq!(minted, 0);
        assert_eq!(cost, 1);
    }

    #[test]
    fn test_purchase_stall_guard() {
        // A flat-zero curve (steepness 0) must fail instead of spinning
        assert!(StepCurve::quote_purchase(0, 10, 0).is_err());
    }

    #[test]
    fn test_redemption_mirrors_purchase() {
        // Buy 2 whole steps from supply 1.0, then redeem them at 3.0:
        // exact round trip
        let (minted, cost) = StepCurve::quote_purchase(1, 5 * S, S).unwrap();
        assert_eq!(minted, 2 * S);

        let (value, burned) = StepCurve::quote_redemption(1, minted, 3 * S).unwrap();
        assert_eq!(burned, minted);
        assert_eq!(value, cost);
    }

    #[test]
    fn test_redemption_partial_round_trip() {
        // Buy a fraction of the band at 2.0, redeem it immediately
        let payment = S / 2;
        let (minted, _) = StepCurve::quote_purchase(1, payment, 2 * S).unwrap();
        assert_eq!(minted, S / 8);

        let (value, burned) = StepCurve::quote_redemption(1, minted, 2 * S + minted).unwrap();
        assert_eq!(burned, minted);
        assert_eq!(value, payment);
    }

    #[test]
    fn test_round_trip_never_profits() {
        // Immediate buy-then-sell of the same quantity can lose to band
        // crossings but can never gain
        for (payment, supply) in [
            (1_000u64, 0u64),
            (S / 3, 2 * S + S / 2),
            (7 * S, S),
            (2 * S + 5, 3 * S + S / 4),
        ] {
            let (minted, cost) = StepCurve::quote_purchase(1, payment, supply).unwrap();
            let (value, _) = StepCurve::quote_redemption(1, minted, supply + minted).unwrap();
            assert!(
                value <= cost,
                "round trip profited: paid {} got back {}",
                cost,
                value
            );
        }
    }

    #[test]
    fn test_selling_subset_high_can_profit() {
        // Buy a batch cheap from genesis, sell one whole unit at the top of
        // the batch: the top step is worth more than its pro-rata cost
        let payment = 14 * S; // free + 1 + 4 + 9 -> four whole units
        let (minted, _) = StepCurve::quote_purchase(1, payment, 0).unwrap();
        assert_eq!(minted, 4 * S);

        let (value, _) = StepCurve::quote_redemption(1, S, minted).unwrap();
        assert_eq!(value, 9 * S);
        assert!(value > payment / 4);
    }

    #[test]
    fn test_redemption_rejects_oversized_burn() {
        assert!(StepCurve::quote_redemption(1, 2 * S, S).is_err());
    }
}
