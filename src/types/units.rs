//! Decimal unit conversion for token amounts.
//!
//! ## Overview
//!
//! The ledger only ever sees integer base units (`u128`). Tokens declare a
//! number of decimals; 18 is the common choice, so "1.5" tokens are
//! `1_500_000_000_000_000_000` base units. These helpers convert between the
//! two representations without floating point.
//!
//! ## Examples
//!
//! ```
//! use order_swap::types::units::{to_base_units, from_base_units};
//!
//! let amount = to_base_units("10.5", 18).unwrap();
//! assert_eq!(amount, 10_500_000_000_000_000_000);
//!
//! assert_eq!(from_base_units(amount, 18).unwrap(), "10.500000000000000000");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Decimals used by the demo tokens and by most ERC-20 style assets.
pub const DEFAULT_DECIMALS: u32 = 18;

/// Largest decimals value a [`Decimal`] can carry.
pub const MAX_DECIMALS: u32 = 28;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to base units.
///
/// # Returns
///
/// * `Some(u128)` - The base-unit amount
/// * `None` - If parsing fails, the value is negative, or it carries more
///   fractional digits than the token supports
///
/// # Example
///
/// ```
/// use order_swap::types::units::to_base_units;
///
/// assert_eq!(to_base_units("1", 6), Some(1_000_000));
/// assert_eq!(to_base_units("0.000001", 6), Some(1));
/// assert_eq!(to_base_units("0.0000001", 6), None);
/// ```
pub fn to_base_units(s: &str, decimals: u32) -> Option<u128> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_base_units(decimal, decimals)
}

/// Convert a [`Decimal`] to base units. See [`to_base_units`].
pub fn decimal_to_base_units(d: Decimal, decimals: u32) -> Option<u128> {
    if d.is_sign_negative() || decimals > MAX_DECIMALS {
        return None;
    }

    let factor = Decimal::try_from_i128_with_scale(10i128.checked_pow(decimals)?, 0).ok()?;
    let scaled = d.checked_mul(factor)?;
    if !scaled.fract().is_zero() {
        return None;
    }
    scaled.to_u128()
}

/// Convert base units to a [`Decimal`].
///
/// Returns `None` when the amount exceeds the 96-bit mantissa of `Decimal`.
pub fn base_units_to_decimal(value: u128, decimals: u32) -> Option<Decimal> {
    let value = i128::try_from(value).ok()?;
    Decimal::try_from_i128_with_scale(value, decimals).ok()
}

/// Render base units with exactly `decimals` fractional digits.
pub fn from_base_units(value: u128, decimals: u32) -> Option<String> {
    let decimal = base_units_to_decimal(value, decimals)?;
    Some(format!("{:.*}", decimals as usize, decimal))
}

/// Render base units with trailing zeros removed.
///
/// ```
/// use order_swap::types::units::from_base_units_trimmed;
///
/// assert_eq!(from_base_units_trimmed(1_500_000, 6).unwrap(), "1.5");
/// assert_eq!(from_base_units_trimmed(90_000_000_000_000_000_000, 18).unwrap(), "90");
/// ```
pub fn from_base_units_trimmed(value: u128, decimals: u32) -> Option<String> {
    let decimal = base_units_to_decimal(value, decimals)?;
    Some(decimal.normalize().to_string())
}

// ============================================================================
// Unit Tests
// ============================================================================
