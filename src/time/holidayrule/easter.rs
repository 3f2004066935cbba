use chrono::NaiveDate;

/// Gregorian Easter Sunday for `year` (anonymous Gregorian computus).
///
/// Returns `None` only when the resulting date is outside the range chrono
/// can represent.
pub fn easter_date(year: i32) -> Option<NaiveDate> {
    let g = year.rem_euclid(19);
    let c = year.div_euclid(100);
    let c_div_4 = c.div_euclid(4);
    let h = (c - c_div_4 - (8 * c + 13).div_euclid(25) + 19 * g + 15).rem_euclid(30);
    let h_div_28 = h / 28;
    let i = h - h_div_28 * (1 - h_div_28 * (29 / (h + 1)) * ((21 - g) / 11));
    let j = (year + year.div_euclid(4) + i + 2 - c + c_div_4).rem_euclid(7);
    let l = i - j;
    let month = 3 + (l + 40) / 44;
    let day = l + 28 - 31 * (month / 4);

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
