//! # Billing Arithmetic
//!
//! Line-item and bill total computation.
//!
//! ## Computation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Line Item Computation                            │
//! │                                                                     │
//! │  base           = mrp × quantity                                    │
//! │  after_discount = base × (1 − discount% / 100)                      │
//! │  total_price    = after_discount × (1 + gst% / 100)                 │
//! │                   └── rounded half-up to 2 decimals                 │
//! │                                                                     │
//! │  Example: mrp 100.00, qty 3, 10% off, 18% GST                       │
//! │    base 300.00 → after_discount 270.00 → total 318.60               │
//! │                                                                     │
//! │  Discount applies BEFORE GST. Order matters: GST is charged on      │
//! │  the price the customer actually pays.                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! Round-half-up to 2 decimal places, applied exactly once per line item
//! at creation and once over the derived bill total. The stored
//! `total_price` is the rounded value; totals never re-derive from raw
//! intermediates.

/// Rounds a non-negative currency amount half-up to 2 decimal places.
///
/// ## Example
/// ```rust
/// use kirana_core::billing::round_currency;
///
/// assert_eq!(round_currency(318.599999999), 318.6);
/// assert_eq!(round_currency(10.125), 10.13); // half rounds up
/// ```
#[inline]
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Computes the final price of one bill line.
///
/// ## Arguments
/// * `mrp` - Product unit price
/// * `quantity` - Units sold
/// * `discount_percent` - Percentage discount, applied first
/// * `gst_percent` - GST rate, applied to the discounted amount
///
/// ## Example
/// ```rust
/// use kirana_core::billing::line_total;
///
/// assert_eq!(line_total(100.0, 3, 10.0, 18.0), 318.60);
/// ```
pub fn line_total(mrp: f64, quantity: i64, discount_percent: f64, gst_percent: f64) -> f64 {
    let base = mrp * quantity as f64;
    let after_discount = base * (1.0 - discount_percent / 100.0);
    let with_gst = after_discount * (1.0 + gst_percent / 100.0);
    round_currency(with_gst)
}

/// Sums already-rounded line totals into a display total.
///
/// Re-rounds once to flush the float error a plain sum accumulates.
pub fn bill_total(line_totals: impl IntoIterator<Item = f64>) -> f64 {
    round_currency(line_totals.into_iter().sum())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_bill_line() {
        // mrp 100.00, qty 3, 10% discount, 18% GST:
        // 300.00 -> 270.00 -> 318.60
        assert_eq!(line_total(100.0, 3, 10.0, 18.0), 318.60);
    }

    #[test]
    fn test_no_discount_no_gst() {
        assert_eq!(line_total(12.50, 4, 0.0, 0.0), 50.0);
    }

    #[test]
    fn test_gst_only() {
        // 80.00 * 1.05 = 84.00
        assert_eq!(line_total(40.0, 2, 0.0, 5.0), 84.0);
    }

    #[test]
    fn test_full_discount_is_free() {
        assert_eq!(line_total(99.99, 3, 100.0, 18.0), 0.0);
    }

    #[test]
    fn test_rounding_half_up() {
        // 10.125 is exact in binary, so this genuinely exercises the tie
        assert_eq!(round_currency(10.125), 10.13);
        assert_eq!(round_currency(10.375), 10.38);
        // plain cases
        assert_eq!(round_currency(10.124), 10.12);
        assert_eq!(round_currency(10.0), 10.0);
    }

    #[test]
    fn test_line_total_rounds_to_two_decimals() {
        // 33.33 * 1 * 1.18 = 39.3294 -> 39.33
        assert_eq!(line_total(33.33, 1, 0.0, 18.0), 39.33);
    }

    #[test]
    fn test_bill_total_sums_and_rounds() {
        assert_eq!(bill_total([318.60, 39.33, 50.0]), 407.93);
        assert_eq!(bill_total(std::iter::empty()), 0.0);
        // accumulated float error flushed by the final rounding
        assert_eq!(bill_total([0.1, 0.2]), 0.3);
    }
}
