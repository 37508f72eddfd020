pub mod action;
pub mod config;
pub mod error;
pub mod grid;
pub mod holidays;
pub mod jalali;
pub mod keyboard;
pub mod navigation;
pub mod picker;

pub use action::{Action, ActionCodec};
pub use error::{Error, ErrorKind, Result};
pub use grid::{CalendarGrid, DayCell};
pub use holidays::HolidayRegistry;
pub use jalali::JalaliDate;
pub use keyboard::{Button, Keyboard};
pub use navigation::{Direction, MonthIndex};
pub use picker::{DatePicker, Rendered, Tap};
