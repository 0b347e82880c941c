//! Statutory rates, thresholds and the shared rounding primitive.
//!
//! Every percentage in this module is expressed in whole percent (e.g.
//! `18.0` for 18%) and applied as `amount * (rate / 100.0)`.  All
//! calculators round each intermediate money value with
//! [`round_to_two`] before it feeds the next step, so display code and
//! stored values never drift apart.

/// Platform fee charged to the client, as a percentage of contract value.
pub const CLIENT_PLATFORM_FEE_PERCENT: f64 = 3.0;

/// Platform fee charged to the freelancer, as a percentage of contract value.
pub const FREELANCER_PLATFORM_FEE_PERCENT: f64 = 5.0;

/// GST, applied to the service (when the freelancer is registered) and to
/// every platform fee.
pub const GST_PERCENT: f64 = 18.0;

/// TDS under section 194J (professional services).
pub const TDS_PERCENT: f64 = 10.0;

/// TCS, collected on every contract regardless of GST or TDS status.
pub const TCS_PERCENT: f64 = 1.0;

/// A single payment strictly above this amount attracts TDS.
pub const TDS_SINGLE_PAYMENT_THRESHOLD: f64 = 30_000.0;

/// Cumulative payments between the same client and freelancer within one
/// financial year strictly above this amount attract TDS.
pub const TDS_CUMULATIVE_THRESHOLD: f64 = 30_000.0;

/// Calendar days after quarter end before withheld TDS may be released.
pub const FD_QUARTER_END_DAYS: i64 = 30;

/// Business days added on top of [`FD_QUARTER_END_DAYS`].
pub const FD_BUFFER_WORKING_DAYS: u32 = 5;

/// Default minimum bid as a percentage of the posted project budget.
pub const MIN_BID_PERCENT_OF_BUDGET: f64 = 80.0;

/// Rounds to two decimal places, half-up.
///
/// The value is nudged by `f64::EPSILON` before scaling so that binary
/// artifacts such as `1.005 * 100 == 100.49999999999999` still round up.
pub fn round_to_two(value: f64) -> f64 {
    let scaled = (value + f64::EPSILON) * 100.0;
    let floor = scaled.floor();
    let rounded = if scaled - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded / 100.0
}

/// `percent`% of `amount`, rounded to two decimals.
pub fn percentage_of(amount: f64, percent: f64) -> f64 {
    round_to_two(amount * (percent / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_to_two(1.005), 1.01);
        assert_eq!(round_to_two(0.125), 0.13);
        assert_eq!(round_to_two(0.124), 0.12);
    }

    #[test]
    fn absorbs_binary_drift() {
        assert_eq!(round_to_two(0.1 + 0.2), 0.3);
        assert_eq!(round_to_two(50_000.0 * (GST_PERCENT / 100.0)), 9_000.0);
    }

    #[test]
    fn small_negative_rounds_to_zero() {
        assert_eq!(round_to_two(-0.004), 0.0);
    }

    #[test]
    fn percentage_helper() {
        assert_eq!(percentage_of(50_000.0, FREELANCER_PLATFORM_FEE_PERCENT), 2_500.0);
        assert_eq!(percentage_of(2_500.0, GST_PERCENT), 450.0);
        assert_eq!(percentage_of(333.33, CLIENT_PLATFORM_FEE_PERCENT), 10.0);
    }
}
