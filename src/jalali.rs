use chrono::{Datelike, Local, NaiveDate, Weekday};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// Year remainders (mod 33) that are leap years.
const LEAP_REMAINDERS: [i64; 8] = [1, 5, 9, 13, 17, 22, 26, 30];
const CYCLE_YEARS: i64 = 33;
const CYCLE_DAYS: i64 = CYCLE_YEARS * 365 + LEAP_REMAINDERS.len() as i64;

const FIRST_HALF_DAYS: i64 = 6 * 31;

// 1404/1/1 is Friday 2025-03-21
const ANCHOR: JalaliDate = JalaliDate {
    year: 1404,
    month: 1,
    day: 1,
};
const ANCHOR_DAYS_FROM_CE: i64 = 739_331;
const ANCHOR_WEEKDAY: Weekday = Weekday::Fri;

const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

pub fn is_leap(year: i32) -> bool {
    LEAP_REMAINDERS.contains(&(year as i64).rem_euclid(CYCLE_YEARS))
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap(year) {
        366
    } else {
        365
    }
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    match month {
        1..=6 => Ok(31),
        7..=11 => Ok(30),
        12 if is_leap(year) => Ok(30),
        12 => Ok(29),
        _ => Err(Error::new(
            ErrorKind::InvalidDate,
            &format!("month {} is not in 1..=12", month),
        )),
    }
}

pub fn month_name(month: u32) -> Result<&'static str> {
    MONTH_NAMES
        .get((month as usize).wrapping_sub(1))
        .copied()
        .ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidDate,
                &format!("month {} is not in 1..=12", month),
            )
        })
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sat => "ش",
        Weekday::Sun => "ی",
        Weekday::Mon => "د",
        Weekday::Tue => "س",
        Weekday::Wed => "چ",
        Weekday::Thu => "پ",
        Weekday::Fri => "ج",
    }
}

/// Number of leap years in `1..=n`, extended to `n <= 0` so that
/// consecutive differences always match `is_leap`.
fn leap_years_through(n: i64) -> i64 {
    let cycles = n.div_euclid(CYCLE_YEARS);
    let rem = n.rem_euclid(CYCLE_YEARS);

    cycles * LEAP_REMAINDERS.len() as i64
        + LEAP_REMAINDERS.iter().filter(|&&r| r <= rem).count() as i64
}

fn days_before_year(year: i64) -> i64 {
    365 * (year - 1) + leap_years_through(year - 1)
}

fn days_before_month(month: u32) -> i64 {
    let month = month as i64;
    if month <= 7 {
        31 * (month - 1)
    } else {
        FIRST_HALF_DAYS + 30 * (month - 7)
    }
}

/// Inverse of `JalaliDate::to_day_index` without year range checks.
fn ymd_from_day_index(index: i64) -> (i64, u32, u32) {
    let cycles = index.div_euclid(CYCLE_DAYS);
    let mut rest = index.rem_euclid(CYCLE_DAYS);
    let mut year = cycles * CYCLE_YEARS + 1;

    loop {
        let len = if LEAP_REMAINDERS.contains(&year.rem_euclid(CYCLE_YEARS)) {
            366
        } else {
            365
        };
        if rest < len {
            break;
        }
        rest -= len;
        year += 1;
    }

    let (month, day) = if rest < FIRST_HALF_DAYS {
        (rest / 31 + 1, rest % 31 + 1)
    } else {
        let rest = rest - FIRST_HALF_DAYS;
        (rest / 30 + 7, rest % 30 + 1)
    };

    (year, month as u32, day as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JalaliDate {
    year: i32,
    month: u32,
    day: u32,
}

impl JalaliDate {
    pub const MIN_YEAR: i32 = -999_999;
    pub const MAX_YEAR: i32 = 999_999;

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(Error::new(
                ErrorKind::InvalidDate,
                &format!("year {} is out of range", year),
            ));
        }

        let len = days_in_month(year, month)?;
        if day < 1 || day > len {
            return Err(Error::new(
                ErrorKind::InvalidDate,
                &format!("day {} is not in 1..={} for {}/{}", day, len, year, month),
            ));
        }

        Ok(JalaliDate { year, month, day })
    }

    pub fn from_day_index(index: i64) -> Result<Self> {
        let (year, month, day) = ymd_from_day_index(index);

        if year < Self::MIN_YEAR as i64 || year > Self::MAX_YEAR as i64 {
            return Err(Error::new(
                ErrorKind::InvalidDate,
                &format!("day index {} is out of range", index),
            ));
        }

        Ok(JalaliDate {
            year: year as i32,
            month,
            day,
        })
    }

    pub fn from_gregorian(date: NaiveDate) -> Self {
        let index = ANCHOR.to_day_index() + (date.num_days_from_ce() as i64 - ANCHOR_DAYS_FROM_CE);
        let (year, month, day) = ymd_from_day_index(index);

        // chrono's range is far inside ours
        JalaliDate {
            year: year as i32,
            month,
            day,
        }
    }

    pub fn today() -> Self {
        Self::from_gregorian(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Days since 1/1/1, which is index 0.
    pub fn to_day_index(&self) -> i64 {
        days_before_year(self.year as i64) + days_before_month(self.month) + self.day as i64 - 1
    }

    pub fn to_gregorian(&self) -> Result<NaiveDate> {
        let days = ANCHOR_DAYS_FROM_CE + (self.to_day_index() - ANCHOR.to_day_index());

        i32::try_from(days)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidDate,
                    &format!("{} has no Gregorian representation", self),
                )
            })
    }

    pub fn weekday(&self) -> Weekday {
        let shift = (self.to_day_index() - ANCHOR.to_day_index()).rem_euclid(7);
        (0..shift).fold(ANCHOR_WEEKDAY, |weekday, _| weekday.succ())
    }

    /// Column of this date in a week starting at `first_weekday`.
    pub fn column(&self, first_weekday: Weekday) -> usize {
        let from = first_weekday.num_days_from_monday();
        let to = self.weekday().num_days_from_monday();
        ((to + 7 - from) % 7) as usize
    }

    pub fn is_friday(&self) -> bool {
        self.weekday() == Weekday::Fri
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize - 1]
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for JalaliDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::new(
                ErrorKind::InvalidDate,
                &format!("'{}' is not of the form Y/M/D", s),
            )
        };

        let mut fields = s.trim().split('/');
        let mut next_field = || fields.next().ok_or_else(invalid);

        let year = next_field()?.parse::<i32>().map_err(|_| invalid())?;
        let month = next_field()?.parse::<u32>().map_err(|_| invalid())?;
        let day = next_field()?.parse::<u32>().map_err(|_| invalid())?;

        if fields.next().is_some() {
            return Err(invalid());
        }

        JalaliDate::from_ymd(year, month, day)
    }
}
