use chrono::{Days, NaiveDate};

#[inline]
pub const fn is_leap(year: i32) -> bool {
    ((year % 4 == 0) && (year % 100 != 0)) || (year % 400 == 0)
}

pub const fn days_of_month(year: i32, month: u32) -> u32 {
    const NO_LEAP_EOM: [u32; 13] = [
        0, 31, 28, 31, 30,
        31, 30, 31, 31, 30,
        31, 30, 31
    ];

    const LEAP_EOM: [u32; 13] = [
        0, 31, 29, 31, 30,
        31, 30, 31, 31, 30,
        31, 30, 31
    ];

    if is_leap(year) {
        LEAP_EOM[month as usize]
    } else {
        NO_LEAP_EOM[month as usize]
    }
}

/// Parses `YYYY-MM-DD`, letting a day past the end of the month roll over
/// into the next one (`2018-04-31` is `2018-05-01`).
///
/// The month must be valid and the day between 1 and 31.
pub fn parse_iso_date_overflowing(s: &str) -> Option<NaiveDate> {
    let mut parts = s.trim().splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let eom = days_of_month(year, month);
    if day <= eom {
        NaiveDate::from_ymd_opt(year, month, day)
    } else {
        NaiveDate::from_ymd_opt(year, month, eom)?.checked_add_days(Days::new((day - eom) as u64))
    }
}
