use itertools::Itertools;
use std::fmt;

use crate::action::{Action, ActionCodec};
use crate::error::Result;
use crate::grid::{CalendarGrid, DayCell};
use crate::navigation::MonthIndex;

pub const PREV_TEXT: &str = "←";
pub const NEXT_TEXT: &str = "→";
pub const BLANK_TEXT: &str = " ";

/// A tappable button: what the user sees and what comes back on tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub token: String,
}

impl Button {
    pub fn new(text: &str, token: String) -> Self {
        Button {
            text: text.to_owned(),
            token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    holiday_symbol: Option<String>,
    today_symbol: Option<String>,
}

impl Default for Markers {
    fn default() -> Self {
        Markers {
            holiday_symbol: Some("🔴".to_owned()),
            today_symbol: Some("*".to_owned()),
        }
    }
}

impl Markers {
    pub fn holiday_symbol(mut self, symbol: &str) -> Self {
        self.holiday_symbol = Some(symbol.to_owned()).filter(|s| !s.is_empty());
        self
    }

    pub fn today_symbol(mut self, symbol: &str) -> Self {
        self.today_symbol = Some(symbol.to_owned()).filter(|s| !s.is_empty());
        self
    }

    pub fn no_today_symbol(mut self) -> Self {
        self.today_symbol = None;
        self
    }

    fn day_text(&self, cell: &DayCell) -> String {
        let mut text = String::new();
        if let Some(symbol) = self.today_symbol.as_deref().filter(|_| cell.is_today()) {
            text.push_str(symbol);
        }
        if let Some(symbol) = self.holiday_symbol.as_deref().filter(|_| cell.is_holiday()) {
            text.push_str(symbol);
        }
        text.push_str(cell.label());
        text
    }
}

/// Button rows for a month: navigation header, weekday labels, days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn from_grid(grid: &CalendarGrid, codec: &ActionCodec, markers: &Markers) -> Result<Self> {
        let month = MonthIndex::new(grid.year(), grid.month());
        let ignore = codec.ignore_token();

        let mut rows = Vec::with_capacity(grid.rows().len() + 2);

        rows.push(vec![
            Button::new(PREV_TEXT, codec.encode(&Action::Prev(month))?),
            Button::new(grid.header(), ignore.clone()),
            Button::new(NEXT_TEXT, codec.encode(&Action::Next(month))?),
        ]);

        rows.push(
            grid.weekday_labels()
                .into_iter()
                .map(|label| Button::new(label, ignore.clone()))
                .collect(),
        );

        for week in grid.rows() {
            let row = week
                .iter()
                .map(|cell| match cell.date() {
                    Some(date) => codec.encode(&Action::Select(date)).map(|token| Button {
                        text: markers.day_text(cell),
                        token,
                    }),
                    None => Ok(Button::new(BLANK_TEXT, ignore.clone())),
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }

        Ok(Keyboard { rows })
    }

    pub fn rows(&self) -> &[Vec<Button>] {
        &self.rows
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    pub fn render(&self, with_tokens: bool) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| {
                        if with_tokens {
                            format!("[{} {}]", button.text, button.token)
                        } else {
                            format!("[{}]", button.text)
                        }
                    })
                    .join(" ")
            })
            .join("\n")
    }
}

impl fmt::Display for Keyboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(false))
    }
}
