//! Release date handling.
//!
//! The vendor sends release dates as `YYYYMMDD`, or as `YYYYMM` when the day
//! is unknown. Tags want `YYYY-MM-DD`.

use time::{macros::format_description, Date};

use crate::error::{Error, Result};

/// Converts a vendor release date into `YYYY-MM-DD`.
///
/// A missing day is taken to be the first of the month.
///
/// # Errors
///
/// Returns a data loss error if `ymd` is neither a valid `YYYYMMDD` nor a
/// valid `YYYYMM` date.
pub fn normalize(ymd: &str) -> Result<String> {
    let ymd = match ymd.len() {
        6 => format!("{ymd}01"),
        8 => ymd.to_owned(),
        _ => return Err(Error::data_loss(format!("invalid release date \"{ymd}\""))),
    };

    let date = Date::parse(&ymd, format_description!("[year][month][day]"))?;
    Ok(date.format(format_description!("[year]-[month]-[day]"))?)
}

/// The year of a vendor release date: its first four characters, or fewer
/// when the date is shorter. `None` for an empty date.
#[must_use]
pub fn year(ymd: &str) -> Option<String> {
    let year: String = ymd.chars().take(4).collect();
    (!year.is_empty()).then_some(year)
}
