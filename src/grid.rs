use chrono::Weekday;
use itertools::Itertools;

use crate::error::Result;
use crate::holidays::HolidayRegistry;
use crate::jalali::{self, JalaliDate};

pub const COLUMNS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayCell {
    date: Option<JalaliDate>,
    is_today: bool,
    is_holiday: bool,
    holiday_label: Option<String>,
    label: String,
}

impl DayCell {
    pub fn blank() -> Self {
        DayCell::default()
    }

    pub fn new(date: JalaliDate) -> Self {
        DayCell {
            date: Some(date),
            label: date.day().to_string(),
            ..DayCell::default()
        }
    }

    pub fn today(mut self, is_today: bool) -> Self {
        self.is_today = is_today;
        self
    }

    pub fn holiday(mut self, label: Option<&str>) -> Self {
        self.is_holiday = label.is_some();
        self.holiday_label = label.map(str::to_owned);
        self
    }

    pub fn date(&self) -> Option<JalaliDate> {
        self.date
    }

    pub fn is_blank(&self) -> bool {
        self.date.is_none()
    }

    pub fn is_today(&self) -> bool {
        self.is_today
    }

    pub fn is_holiday(&self) -> bool {
        self.is_holiday
    }

    pub fn holiday_label(&self) -> Option<&str> {
        self.holiday_label.as_deref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    year: i32,
    month: u32,
    first_weekday: Weekday,
    header: String,
    rows: Vec<Vec<DayCell>>,
}

impl CalendarGrid {
    /// Lays out `year/month` in weeks starting at `first_weekday`.
    /// The month has to be valid already; rollover is `navigation`'s job.
    pub fn build(
        year: i32,
        month: u32,
        today: JalaliDate,
        holidays: &HolidayRegistry,
        first_weekday: Weekday,
    ) -> Result<Self> {
        let first = JalaliDate::from_ymd(year, month, 1)?;
        let len = jalali::days_in_month(year, month)?;
        let offset = first.column(first_weekday);

        let days = (1..=len)
            .map(|day| JalaliDate::from_ymd(year, month, day))
            .collect::<Result<Vec<_>>>()?;

        let cells = std::iter::repeat_with(DayCell::blank)
            .take(offset)
            .chain(days.into_iter().map(|date| {
                DayCell::new(date)
                    .today(date == today)
                    .holiday(holidays.label(&date))
            }))
            .collect_vec();

        let rows = cells
            .chunks(COLUMNS)
            .map(|row| {
                let mut row = row.to_vec();
                row.resize_with(COLUMNS, DayCell::blank);
                row
            })
            .collect_vec();

        Ok(CalendarGrid {
            year,
            month,
            first_weekday,
            header: format!("{} {}", first.month_name(), year),
            rows,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<DayCell>] {
        &self.rows
    }

    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.rows.iter().flatten()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells().filter(|cell| !cell.is_blank())
    }

    /// Weekday labels in column order.
    pub fn weekday_labels(&self) -> Vec<&'static str> {
        std::iter::successors(Some(self.first_weekday), |wd| Some(wd.succ()))
            .take(COLUMNS)
            .map(jalali::weekday_label)
            .collect()
    }
}
