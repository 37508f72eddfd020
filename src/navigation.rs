use std::cmp::Ordering;
use std::convert::From;

use crate::jalali::JalaliDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// A (year, month) pair. The month is kept in `1..=12` by `next`/`prev`;
/// the year has no bounds other than those of `i32`, where stepping
/// further gives `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthIndex {
    pub year: i32,
    pub month: u32,
}

impl MonthIndex {
    pub fn new(year: i32, month: u32) -> Self {
        MonthIndex { year, month }
    }

    pub fn next(&self) -> Option<Self> {
        if self.month >= 12 {
            self.year.checked_add(1).map(|year| MonthIndex { year, month: 1 })
        } else {
            Some(MonthIndex {
                year: self.year,
                month: self.month + 1,
            })
        }
    }

    pub fn prev(&self) -> Option<Self> {
        if self.month <= 1 {
            self.year.checked_sub(1).map(|year| MonthIndex { year, month: 12 })
        } else {
            Some(MonthIndex {
                year: self.year,
                month: self.month - 1,
            })
        }
    }

    pub fn apply(&self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Prev => self.prev(),
            Direction::Next => self.next(),
        }
    }
}

impl From<JalaliDate> for MonthIndex {
    fn from(date: JalaliDate) -> Self {
        MonthIndex::new(date.year(), date.month())
    }
}

impl PartialOrd for MonthIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then(self.month.cmp(&other.month))
    }
}

pub fn apply(direction: Direction, year: i32, month: u32) -> Option<(i32, u32)> {
    MonthIndex::new(year, month)
        .apply(direction)
        .map(|MonthIndex { year, month }| (year, month))
}
