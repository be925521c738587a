//! Basis-point arithmetic.
//!
//! Fees and slippage tolerances are integers where 10000 = 100%. All math is
//! integer math; results truncate toward zero exactly like the on-chain
//! `amount * bps / 10000` expression, but without the intermediate overflow.
//!
//! ```
//! use order_swap::types::bps::{portion, BPS_DENOMINATOR};
//!
//! assert_eq!(BPS_DENOMINATOR, 10_000);
//! // 10% of 100
//! assert_eq!(portion(100, 1_000), 10);
//! // 0.25% of 999 truncates
//! assert_eq!(portion(999, 25), 2);
//! ```

use rust_decimal::Decimal;

/// 100% expressed in basis points.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Check that a basis-point value lies in `0..=10000`.
#[inline]
pub fn is_valid(bps: u64) -> bool {
    bps <= BPS_DENOMINATOR
}

/// Compute `floor(amount * bps / 10000)` for `bps <= 10000`.
///
/// Splitting `amount` into quotient and remainder by the denominator keeps
/// every intermediate value at or below `amount`, so the result is exact for
/// the full `u128` range.
///
/// # Panics
///
/// Debug builds assert `bps <= 10000`; callers validate before calling.
pub fn portion(amount: u128, bps: u64) -> u128 {
    debug_assert!(is_valid(bps), "basis points out of range: {bps}");
    let denom = BPS_DENOMINATOR as u128;
    let bps = bps as u128;
    (amount / denom) * bps + (amount % denom) * bps / denom
}

/// Split `amount` into `(payout, fee)` for a fee of `fee_bps`.
///
/// `payout + fee == amount` always holds.
pub fn split_fee(amount: u128, fee_bps: u64) -> (u128, u128) {
    let fee = portion(amount, fee_bps);
    (amount - fee, fee)
}

/// Render basis points as a percentage, e.g. 1000 -> 10, 25 -> 0.25.
pub fn to_percent(bps: u64) -> Decimal {
    (Decimal::from(bps) / Decimal::from(100u64)).normalize()
}

// ============================================================================
// Unit Tests
// ============================================================================
