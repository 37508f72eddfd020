use chrono::Weekday;
use std::sync::Arc;

use crate::action::{Action, ActionCodec};
use crate::config::Config;
use crate::error::Result;
use crate::grid::CalendarGrid;
use crate::holidays::HolidayRegistry;
use crate::jalali::JalaliDate;
use crate::keyboard::{Keyboard, Markers};
use crate::navigation::{Direction, MonthIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub grid: CalendarGrid,
    pub keyboard: Keyboard,
}

/// Outcome of a tap. `Resolved` displays as `YYYY/MM/DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tap {
    Resolved(JalaliDate),
    NewGrid(Rendered),
    Ignored,
}

/// One calendar instance. Holds no per-user state: everything a tap needs
/// travels in its token, so a picker can serve any number of threads.
#[derive(Debug, Clone)]
pub struct DatePicker {
    codec: ActionCodec,
    holidays: Arc<HolidayRegistry>,
    first_weekday: Weekday,
    markers: Markers,
}

impl DatePicker {
    pub fn new(config: &Config, holidays: Arc<HolidayRegistry>) -> Result<Self> {
        Ok(DatePicker {
            codec: ActionCodec::new(&config.prefix)?,
            holidays,
            first_weekday: config.first_weekday,
            markers: config.markers(),
        })
    }

    /// Loads the configured holiday file; a broken file only loses the
    /// fixed holidays, Fridays are still marked.
    pub fn from_config(config: &Config) -> Result<Self> {
        let holidays = match &config.holidays {
            Some(path) => HolidayRegistry::load_or_empty(path),
            None => HolidayRegistry::default(),
        }
        .with_friday_label(&config.friday_label);

        Self::new(config, Arc::new(holidays))
    }

    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    pub fn holidays(&self) -> &HolidayRegistry {
        &self.holidays
    }

    /// Without both `year` and `month` the current month is shown.
    pub fn render_month(&self, year: Option<i32>, month: Option<u32>) -> Result<Rendered> {
        self.render_month_at(year, month, JalaliDate::today())
    }

    pub fn render_month_at(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        today: JalaliDate,
    ) -> Result<Rendered> {
        let (year, month) = match (year, month) {
            (Some(year), Some(month)) => (year, month),
            _ => (today.year(), today.month()),
        };

        let grid = CalendarGrid::build(year, month, today, &self.holidays, self.first_weekday)?;
        let keyboard = Keyboard::from_grid(&grid, &self.codec, &self.markers)?;

        Ok(Rendered { grid, keyboard })
    }

    pub fn handle_tap(&self, token: &str) -> Tap {
        self.handle_tap_at(token, JalaliDate::today())
    }

    pub fn handle_tap_at(&self, token: &str, today: JalaliDate) -> Tap {
        match self.codec.decode(token) {
            Ok(Action::Select(date)) => Tap::Resolved(date),
            Ok(Action::Prev(month)) => self.navigate(month, Direction::Prev, today),
            Ok(Action::Next(month)) => self.navigate(month, Direction::Next, today),
            Ok(Action::Ignore) => Tap::Ignored,
            Err(err) => {
                log::debug!("Ignoring tap '{}': {}", token, err);
                Tap::Ignored
            }
        }
    }

    fn navigate(&self, from: MonthIndex, direction: Direction, today: JalaliDate) -> Tap {
        let target = match from.apply(direction) {
            Some(target) => target,
            None => {
                log::warn!(
                    "Cannot move {:?} from {}/{}",
                    direction,
                    from.year,
                    from.month
                );
                return Tap::Ignored;
            }
        };

        match self.render_month_at(Some(target.year), Some(target.month), today) {
            Ok(rendered) => Tap::NewGrid(rendered),
            Err(err) => {
                log::warn!(
                    "Cannot show {}/{}: {}",
                    target.year,
                    target.month,
                    err
                );
                Tap::Ignored
            }
        }
    }

    pub fn prompt(&self, today: JalaliDate) -> String {
        format!(
            "لطفاً تاریخ مورد نظر را انتخاب کنید:\nامروز: {} {} {}",
            today.day(),
            today.month_name(),
            today.year()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn date(year: i32, month: u32, day: u32) -> JalaliDate {
        JalaliDate::from_ymd(year, month, day).unwrap()
    }

    fn picker() -> DatePicker {
        let holidays = HolidayRegistry::from_json_str(r#"{"1404/1/1": "نوروز"}"#).unwrap();
        DatePicker::new(&Config::default(), Arc::new(holidays)).unwrap()
    }

    #[test]
    fn select_resolves_date() {
        let picker = picker();
        match picker.handle_tap_at("calendar:s:1404:1:1", date(1404, 5, 5)) {
            Tap::Resolved(d) => assert_eq!(d.to_string(), "1404/01/01"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn next_rolls_over_year() {
        let picker = picker();
        match picker.handle_tap_at("calendar:n:1404:12", date(1404, 5, 5)) {
            Tap::NewGrid(rendered) => {
                assert_eq!(rendered.grid.year(), 1405);
                assert_eq!(rendered.grid.month(), 1);
                assert_eq!(rendered.keyboard.rows()[0][0].token, "calendar:p:1405:1");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn prev_rolls_back_year() {
        let picker = picker();
        match picker.handle_tap_at("calendar:p:1405:1", date(1404, 5, 5)) {
            Tap::NewGrid(rendered) => {
                assert_eq!((rendered.grid.year(), rendered.grid.month()), (1404, 12));
                assert_eq!(rendered.grid.days().count(), 29);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn foreign_and_broken_tokens_are_ignored() {
        let picker = picker();
        let today = date(1404, 5, 5);

        assert_eq!(picker.handle_tap_at("other:s:1404:1:1", today), Tap::Ignored);
        assert_eq!(picker.handle_tap_at("calendar:s:1404:13:1", today), Tap::Ignored);
        assert_eq!(picker.handle_tap_at("calendar:i", today), Tap::Ignored);
        assert_eq!(picker.handle_tap_at("ignore", today), Tap::Ignored);
    }

    #[test]
    fn navigation_past_supported_years_is_ignored() {
        let picker = picker();
        let token = format!("calendar:n:{}:12", JalaliDate::MAX_YEAR);
        assert_eq!(picker.handle_tap_at(&token, date(1404, 5, 5)), Tap::Ignored);
    }

    #[test]
    fn navigation_before_supported_years_is_ignored() {
        let picker = picker();
        let token = format!("calendar:p:{}:1", JalaliDate::MIN_YEAR);
        assert_eq!(picker.handle_tap_at(&token, date(1404, 5, 5)), Tap::Ignored);
    }

    #[test]
    fn render_defaults_to_current_month() {
        let picker = picker();
        let today = date(1404, 5, 5);

        let rendered = picker.render_month_at(None, None, today).unwrap();
        assert_eq!((rendered.grid.year(), rendered.grid.month()), (1404, 5));

        let rendered = picker.render_month_at(Some(1390), None, today).unwrap();
        assert_eq!((rendered.grid.year(), rendered.grid.month()), (1404, 5));

        let rendered = picker.render_month_at(Some(1390), Some(2), today).unwrap();
        assert_eq!((rendered.grid.year(), rendered.grid.month()), (1390, 2));
        assert!(rendered.grid.days().all(|c| !c.is_today()));
    }

    #[test]
    fn render_rejects_invalid_month() {
        assert!(picker()
            .render_month_at(Some(1404), Some(13), date(1404, 1, 1))
            .is_err());
    }

    #[test]
    fn holiday_label_reaches_grid() {
        let rendered = picker()
            .render_month_at(Some(1404), Some(1), date(1404, 5, 5))
            .unwrap();
        let first = rendered
            .grid
            .days()
            .find(|c| c.date() == Some(date(1404, 1, 1)))
            .unwrap();
        assert_eq!(first.holiday_label(), Some("نوروز"));
    }

    #[test]
    fn two_instances_do_not_collide() {
        let first = picker();
        let second = DatePicker::new(
            &Config {
                prefix: "return_date".to_owned(),
                ..Config::default()
            },
            Arc::new(HolidayRegistry::default()),
        )
        .unwrap();
        let today = date(1404, 5, 5);

        let token = second.codec().encode(&Action::Select(date(1404, 2, 3))).unwrap();
        assert_eq!(first.handle_tap_at(&token, today), Tap::Ignored);
        assert_eq!(
            second.handle_tap_at(&token, today),
            Tap::Resolved(date(1404, 2, 3))
        );
    }

    #[test]
    fn invalid_prefix_is_rejected() {
        let config = Config {
            prefix: "bad prefix".to_owned(),
            ..Config::default()
        };
        assert!(DatePicker::new(&config, Arc::new(HolidayRegistry::default())).is_err());
    }

    #[test]
    fn from_config_with_missing_holiday_file() {
        let config = Config {
            holidays: Some("/nonexistent/holidays.json".into()),
            friday_label: "Friday".to_owned(),
            ..Config::default()
        };
        let picker = DatePicker::from_config(&config).unwrap();

        assert!(picker.holidays().is_empty());
        assert_eq!(picker.holidays().load_errors().len(), 1);
        assert_eq!(picker.holidays().label(&date(1404, 1, 8)), Some("Friday"));
    }

    #[test]
    fn prompt_mentions_today() {
        assert_eq!(
            picker().prompt(date(1404, 1, 13)),
            "لطفاً تاریخ مورد نظر را انتخاب کنید:\nامروز: 13 فروردین 1404"
        );
    }

    #[test]
    fn concurrent_taps_share_one_picker() {
        let picker = Arc::new(picker());
        let today = date(1404, 5, 5);

        let handles = (1..=12)
            .map(|month| {
                let picker = Arc::clone(&picker);
                thread::spawn(move || {
                    let token = format!("calendar:n:1404:{}", month);
                    match picker.handle_tap_at(&token, today) {
                        Tap::NewGrid(rendered) => {
                            MonthIndex::new(rendered.grid.year(), rendered.grid.month())
                        }
                        other => panic!("unexpected {:?}", other),
                    }
                })
            })
            .collect::<Vec<_>>();

        let months = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(months[0], MonthIndex::new(1404, 2));
        assert_eq!(months[11], MonthIndex::new(1405, 1));
    }
}
