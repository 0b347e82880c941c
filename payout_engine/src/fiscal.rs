//! Indian financial-year and TDS deposit scheduling helpers.
//!
//! The Indian financial year runs from 1 April to 31 March.  Withheld TDS
//! is parked in a fixed deposit until 30 days after the end of the quarter
//! in which the payment happened, plus a buffer of working days.  Every
//! function takes the reference date explicitly; only
//! [`current_financial_year`] reads the clock.

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

use crate::rates::{FD_BUFFER_WORKING_DAYS, FD_QUARTER_END_DAYS};

/// Returns the `"YYYY-YYYY"` label of the financial year containing `date`.
///
/// January to March belong to the year that started the previous April.
pub fn financial_year_for(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() < 4 {
        format!("{}-{}", year - 1, year)
    } else {
        format!("{}-{}", year, year + 1)
    }
}

/// Financial year label for today's local date.
pub fn current_financial_year() -> String {
    financial_year_for(Local::now().date_naive())
}

/// Last day of the fiscal quarter enclosing `date`.
///
/// Q1 Apr–Jun ends 30 June, Q2 Jul–Sep ends 30 September, Q3 Oct–Dec ends
/// 31 December and Q4 Jan–Mar ends 31 March of the same calendar year.
pub fn quarter_end_date(date: NaiveDate) -> NaiveDate {
    let (month, day) = match date.month() {
        4..=6 => (6, 30),
        7..=9 => (9, 30),
        10..=12 => (12, 31),
        _ => (3, 31),
    };
    NaiveDate::from_ymd_opt(date.year(), month, day)
        .expect("quarter end is a valid calendar date")
}

/// Returns true when `label` is a `"YYYY-YYYY"` financial year label whose
/// second year directly follows the first, as produced by
/// [`financial_year_for`].
pub fn is_financial_year_label(label: &str) -> bool {
    let Some((start, end)) = label.split_once('-') else {
        return false;
    };
    let four_digits = |part: &str| part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit());
    if !four_digits(start) || !four_digits(end) {
        return false;
    }
    match (start.parse::<u16>(), end.parse::<u16>()) {
        (Ok(start), Ok(end)) => start.checked_add(1) == Some(end),
        _ => false,
    }
}

/// Date on which TDS withheld for a payment made on `payment_date` may be
/// released from its fixed deposit.
///
/// Returns `None` when the maturity would fall past the last date chrono
/// can represent.
pub fn fd_maturity_date(payment_date: NaiveDate) -> Option<NaiveDate> {
    let mut maturity =
        quarter_end_date(payment_date).checked_add_signed(Duration::days(FD_QUARTER_END_DAYS))?;
    let mut working_days = 0;
    while working_days < FD_BUFFER_WORKING_DAYS {
        maturity = maturity.succ_opt()?;
        if !matches!(maturity.weekday(), Weekday::Sat | Weekday::Sun) {
            working_days += 1;
        }
    }
    Some(maturity)
}
