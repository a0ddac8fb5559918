//! Shared fiscal arithmetic.
//!
//! Every helper here is total: a non-positive divisor or an overflowing
//! intermediate resolves to zero instead of panicking, so a recomputation
//! pass can never fault on nonsensical input.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

const HUNDRED: Decimal = dec!(100);

/// Convert a 0–100 percentage into a fraction.
pub fn fraction(pct: Percent) -> Rate {
    pct / HUNDRED
}

/// `numerator / divisor`, or zero when the divisor is not strictly positive.
pub fn guarded_div(numerator: Decimal, divisor: Decimal) -> Decimal {
    if divisor <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator.checked_div(divisor).unwrap_or(Decimal::ZERO)
}

/// `pct / 100 × base`
pub fn pct_of(pct: Percent, base: Money) -> Money {
    fraction(pct).saturating_mul(base)
}

/// `part / base × 100`, or zero when the base is not strictly positive.
pub fn share_pct(part: Money, base: Money) -> Percent {
    guarded_div(part, base).saturating_mul(HUNDRED)
}

/// Divisor of the gross-up: `1 − icms − composite × (1 − icms)`.
///
/// PIS/COFINS is levied on a base already net of ICMS, hence the
/// `(1 − icms)` factor on the composite rate.
pub fn gross_up_divisor(icms_pct: Percent, composite_pct: Percent) -> Decimal {
    let icms = fraction(icms_pct);
    let composite = fraction(composite_pct);
    Decimal::ONE
        .saturating_sub(icms)
        .saturating_sub(composite.saturating_mul(Decimal::ONE.saturating_sub(icms)))
}

/// Gross revenue implied by a net revenue and the two headline tax rates.
///
/// `gross = net / (1 − icms − composite × (1 − icms))`, zero when the
/// divisor is not strictly positive.
pub fn gross_revenue(net_revenue: Money, icms_pct: Percent, composite_pct: Percent) -> Money {
    guarded_div(net_revenue, gross_up_divisor(icms_pct, composite_pct))
}
