use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, ErrorKind, Result};
use crate::jalali::JalaliDate;

pub const DEFAULT_FRIDAY_LABEL: &str = "جمعه";

/// Holiday file layout: `{"YYYY/M/D": "label", ...}`.
type HolidayFile = BTreeMap<String, Value>;

/// Fixed holidays plus the rule that every Friday is a holiday.
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug)]
pub struct HolidayRegistry {
    holidays: BTreeMap<JalaliDate, String>,
    friday_label: String,
    load_errors: Vec<Error>,
}

impl Default for HolidayRegistry {
    fn default() -> Self {
        HolidayRegistry {
            holidays: BTreeMap::new(),
            friday_label: DEFAULT_FRIDAY_LABEL.to_owned(),
            load_errors: Vec::new(),
        }
    }
}

impl HolidayRegistry {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (JalaliDate, S)>,
        S: Into<String>,
    {
        HolidayRegistry {
            holidays: entries
                .into_iter()
                .map(|(date, label)| (date, label.into()))
                .collect(),
            ..HolidayRegistry::default()
        }
    }

    /// Entries with a bad date key, a non-string label or a date that an
    /// earlier key already named are skipped and kept in `load_errors`.
    /// Only a document that is not a JSON object fails as a whole.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: HolidayFile = serde_json::from_str(json)?;
        let mut registry = HolidayRegistry::default();

        for (key, value) in file {
            let holidays = &registry.holidays;
            let entry = key
                .parse::<JalaliDate>()
                .and_then(|date| match value {
                    Value::String(label) => Ok((date, label)),
                    other => Err(Error::new(
                        ErrorKind::HolidayLoad,
                        &format!("label of '{}' is not a string: {}", key, other),
                    )),
                })
                .and_then(|(date, label)| match holidays.get(&date) {
                    // Keys are visited in string order, so "1404/01/01" beats "1404/1/1".
                    Some(existing) => Err(Error::new(
                        ErrorKind::HolidayLoad,
                        &format!("{} is already labelled '{}'", date, existing),
                    )),
                    None => Ok((date, label)),
                });

            match entry {
                Ok((date, label)) => {
                    registry.holidays.insert(date, label);
                }
                Err(err) => {
                    let err = Error::new(
                        ErrorKind::HolidayLoad,
                        &format!("skipping '{}': {}", key, err),
                    );
                    log::warn!("{}", err);
                    registry.load_errors.push(err);
                }
            }
        }

        Ok(registry)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            Error::new(
                ErrorKind::HolidayLoad,
                &format!("could not read '{}': {}", path.display(), err),
            )
        })?;

        Self::from_json_str(&content).map_err(|err| {
            Error::new(
                ErrorKind::HolidayLoad,
                &format!("'{}': {}", path.display(), err),
            )
        })
    }

    /// Never fails: on a broken file the registry only knows about Fridays.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(registry) => {
                log::info!(
                    "Loaded {} holidays from '{}'",
                    registry.len(),
                    path.display()
                );
                registry
            }
            Err(err) => {
                log::warn!("{}", err);
                HolidayRegistry {
                    load_errors: vec![err],
                    ..HolidayRegistry::default()
                }
            }
        }
    }

    pub fn with_friday_label(mut self, label: &str) -> Self {
        self.friday_label = label.to_owned();
        self
    }

    pub fn is_holiday(&self, date: &JalaliDate) -> bool {
        date.is_friday() || self.holidays.contains_key(date)
    }

    /// The explicit label wins over the Friday label.
    pub fn label(&self, date: &JalaliDate) -> Option<&str> {
        self.holidays.get(date).map(String::as_str).or_else(|| {
            if date.is_friday() {
                Some(self.friday_label.as_str())
            } else {
                None
            }
        })
    }

    pub fn explicit_label(&self, date: &JalaliDate) -> Option<&str> {
        self.holidays.get(date).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JalaliDate, &str)> {
        self.holidays
            .iter()
            .map(|(date, label)| (date, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    pub fn load_errors(&self) -> &[Error] {
        &self.load_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(year: i32, month: u32, day: u32) -> JalaliDate {
        JalaliDate::from_ymd(year, month, day).unwrap()
    }

    #[test]
    fn nowruz_from_json() {
        let registry = HolidayRegistry::from_json_str(r#"{"1404/1/1": "نوروز"}"#).unwrap();

        assert!(registry.is_holiday(&date(1404, 1, 1)));
        assert_eq!(registry.label(&date(1404, 1, 1)), Some("نوروز"));
        assert!(registry.load_errors().is_empty());
    }

    #[test]
    fn explicit_label_wins_over_friday() {
        // 1404/1/1 is a Friday
        let registry = HolidayRegistry::from_entries(vec![(date(1404, 1, 1), "نوروز")]);
        assert_eq!(registry.label(&date(1404, 1, 1)), Some("نوروز"));
        assert_eq!(registry.label(&date(1404, 1, 8)), Some(DEFAULT_FRIDAY_LABEL));
    }

    #[test]
    fn fridays_without_entries() {
        let registry = HolidayRegistry::default().with_friday_label("Friday");

        assert!(registry.is_holiday(&date(1404, 1, 8)));
        assert_eq!(registry.label(&date(1404, 1, 8)), Some("Friday"));
        assert!(!registry.is_holiday(&date(1404, 1, 9)));
        assert_eq!(registry.label(&date(1404, 1, 9)), None);
        assert_eq!(registry.explicit_label(&date(1404, 1, 8)), None);
    }

    #[test]
    fn malformed_entries_are_skipped_individually() {
        let json = r#"{
            "1404/1/1": "نوروز",
            "1404/1/2": "عید نوروز",
            "1404/13/1": "bad month",
            "1404/12/30": "not a leap year",
            "yesterday": "bad key",
            "1404/1/12": 12
        }"#;
        let registry = HolidayRegistry::from_json_str(json).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.load_errors().len(), 4);
        assert!(registry
            .load_errors()
            .iter()
            .all(|err| matches!(err.kind, ErrorKind::HolidayLoad)));
        assert_eq!(registry.label(&date(1404, 1, 2)), Some("عید نوروز"));
    }

    #[test]
    fn same_date_spelled_twice_is_recorded() {
        let registry =
            HolidayRegistry::from_json_str(r#"{"1404/1/1": "A", "1404/01/01": "B"}"#).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.label(&date(1404, 1, 1)), Some("B"));
        assert_eq!(registry.load_errors().len(), 1);
        assert!(registry.load_errors()[0].to_string().contains("1404/1/1"));
    }

    #[test]
    fn non_object_document_fails() {
        assert!(HolidayRegistry::from_json_str("[1, 2, 3]").is_err());
        assert!(HolidayRegistry::from_json_str("not json").is_err());
    }

    #[test]
    fn missing_file_gives_empty_registry() {
        let registry = HolidayRegistry::load_or_empty(Path::new("/nonexistent/holidays.json"));

        assert!(registry.is_empty());
        assert_eq!(registry.load_errors().len(), 1);
        assert!(registry.is_holiday(&date(1404, 1, 8)));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("taqvim-holidays-{}.json", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            write!(file, r#"{{"1404/1/13": "روز طبیعت", "1404/3/14": "رحلت امام"}}"#).unwrap();
        }

        let registry = HolidayRegistry::load_or_empty(&path);
        fs::remove_file(&path).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.label(&date(1404, 1, 13)), Some("روز طبیعت"));
        assert_eq!(
            registry.iter().map(|(d, _)| *d).collect::<Vec<_>>(),
            vec![date(1404, 1, 13), date(1404, 3, 14)]
        );
    }
}
