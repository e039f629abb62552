//! Rebuilds a showtime from the listing's truncated fragments.
//!
//! Day fragments look like `"ven 11/03"`; only the trailing `DD/MM` is read.
//! Time fragments look like `"16:10"`. The year is not on the page, so the
//! caller supplies it. There is no year-rollover detection: a January date
//! parsed with a December year lands in the past.

use crate::error::{Error, Result};
use crate::model::Showtime;
use chrono::{Datelike, Local, NaiveDate};

const DAY_FRAGMENT_LEN: usize = 5;
const TIME_FRAGMENT_LEN: usize = 5;

pub fn parse_show_time(day_fragment: &str, time_fragment: &str, year: i32) -> Result<Showtime> {
    let day_chars: Vec<char> = day_fragment.chars().collect();
    if day_chars.len() < DAY_FRAGMENT_LEN {
        return Err(Error::InvalidFormat(format!(
            "day fragment too short: {day_fragment:?}"
        )));
    }
    let time_chars: Vec<char> = time_fragment.chars().collect();
    if time_chars.len() < TIME_FRAGMENT_LEN {
        return Err(Error::InvalidFormat(format!(
            "time fragment too short: {time_fragment:?}"
        )));
    }

    let n = day_chars.len();
    let day = number(&day_chars[n - 5..n - 3], day_fragment)?;
    let month = number(&day_chars[n - 2..], day_fragment)?;
    let m = time_chars.len();
    let hour = number(&time_chars[..2], time_fragment)?;
    let minute = number(&time_chars[m - 2..], time_fragment)?;

    let at = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| {
            Error::InvalidFormat(format!(
                "no such date/time: {year}-{month:02}-{day:02} {hour:02}:{minute:02}"
            ))
        })?;
    Ok(Showtime::new(at))
}

/// Same as [`parse_show_time`] with the current local year, read at each call.
pub fn parse_show_time_current_year(day_fragment: &str, time_fragment: &str) -> Result<Showtime> {
    parse_show_time(day_fragment, time_fragment, Local::now().year())
}

fn number(chars: &[char], fragment: &str) -> Result<u32> {
    let s: String = chars.iter().collect();
    s.trim()
        .parse::<u32>()
        .map_err(|_| Error::InvalidFormat(format!("not a number {s:?} in {fragment:?}")))
}
