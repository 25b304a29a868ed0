//! Manual coverage requests for individual dates.
//!
//! On the wire an override is a short string (`"A"`, `"B"`, `"both"`,
//! `"C:<caregiverId>"`, `"clear"`). It is parsed into [`Override`] once, when
//! the [`Overrides`] map is built, and the engine only ever sees the enum.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::{parse_date_only, to_iso_date};
use crate::error::{LeaveError, Result};

/// A requested coverage outcome for one date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Override {
    ParentA,
    ParentB,
    Both,
    /// An external caregiver, identified by the caller's id.
    Caregiver(String),
    /// No request. Only meaningful when editing an override map.
    Clear,
}

impl FromStr for Override {
    type Err = LeaveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "A" => Ok(Override::ParentA),
            "B" => Ok(Override::ParentB),
            "both" => Ok(Override::Both),
            "clear" => Ok(Override::Clear),
            other => match other.strip_prefix("C:").map(str::trim) {
                Some(id) if !id.is_empty() => Ok(Override::Caregiver(id.to_string())),
                Some(_) => Err(LeaveError::InvalidOverride(format!(
                    "caregiver directive without an id: '{s}'"
                ))),
                None => Err(LeaveError::InvalidOverride(format!(
                    "unknown directive '{s}'"
                ))),
            },
        }
    }
}

impl fmt::Display for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Override::ParentA => f.write_str("A"),
            Override::ParentB => f.write_str("B"),
            Override::Both => f.write_str("both"),
            Override::Caregiver(id) => write!(f, "C:{id}"),
            Override::Clear => f.write_str("clear"),
        }
    }
}

/// Date-keyed override directives, ordered by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides(BTreeMap<NaiveDate, Override>);

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the wire map, dropping entries whose date or directive
    /// cannot be parsed.
    ///
    /// Two keys that normalize to the same day (`"2025-02-17"` and
    /// `"2025-02-17T09:00:00Z"`) collapse; the later key in string order wins.
    pub fn from_wire(raw: &BTreeMap<String, String>) -> Self {
        let mut overrides = Self::new();
        for (key, value) in raw {
            let date = match parse_date_only(key) {
                Ok(date) => date,
                Err(e) => {
                    debug!(key = %key, error = %e, "dropping override with unparsable date");
                    continue;
                }
            };
            match value.parse::<Override>() {
                Ok(directive) => overrides.insert(date, directive),
                Err(e) => debug!(date = %date, error = %e, "dropping unknown override"),
            }
        }
        overrides
    }

    /// Set the directive for `date`. [`Override::Clear`] removes any entry.
    pub fn insert(&mut self, date: NaiveDate, directive: Override) {
        match directive {
            Override::Clear => {
                self.0.remove(&date);
            }
            directive => {
                self.0.insert(date, directive);
            }
        }
    }

    /// Apply `directive` to every date from `start` to `end` inclusive and
    /// return how many dates were written.
    ///
    /// # Errors
    ///
    /// Returns [`LeaveError::InvalidDate`] if either bound cannot be parsed,
    /// or [`LeaveError::InvalidOverride`] if `end` is before `start`.
    pub fn insert_range(&mut self, start: &str, end: &str, directive: Override) -> Result<usize> {
        let start = parse_date_only(start)?;
        let end = parse_date_only(end)?;
        if end < start {
            return Err(LeaveError::InvalidOverride(format!(
                "range ends before it starts: {} to {}",
                to_iso_date(start),
                to_iso_date(end)
            )));
        }

        let mut written = 0;
        for date in start.iter_days().take_while(|d| *d <= end) {
            self.insert(date, directive.clone());
            written += 1;
        }
        Ok(written)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Override> {
        self.0.get(&date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Override)> {
        self.0.iter()
    }
}

impl FromIterator<(NaiveDate, Override)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Override)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (date, directive) in iter {
            overrides.insert(date, directive);
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn wire(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ── Override parsing ────────────────────────────────────────────────

    #[test]
    fn test_parse_parent_directives() {
        assert_eq!("A".parse::<Override>().unwrap(), Override::ParentA);
        assert_eq!("B".parse::<Override>().unwrap(), Override::ParentB);
        assert_eq!("both".parse::<Override>().unwrap(), Override::Both);
        assert_eq!("clear".parse::<Override>().unwrap(), Override::Clear);
    }

    #[test]
    fn test_parse_caregiver_directive() {
        assert_eq!(
            "C:granny".parse::<Override>().unwrap(),
            Override::Caregiver("granny".to_string())
        );
        assert_eq!(
            "C: nanny-7 ".parse::<Override>().unwrap(),
            Override::Caregiver("nanny-7".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        for bad in ["a", "Both", "C:", "C:  ", "X", ""] {
            let err = bad.parse::<Override>().unwrap_err();
            assert!(
                err.to_string().contains("Invalid override"),
                "{bad:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_display_writes_wire_form() {
        for token in ["A", "B", "both", "C:granny", "clear"] {
            assert_eq!(token.parse::<Override>().unwrap().to_string(), token);
        }
    }

    // ── Overrides map ───────────────────────────────────────────────────

    #[test]
    fn test_from_wire_drops_bad_entries() {
        let raw = wire(&[
            ("2025-02-17", "A"),
            ("2025-02-18", "nonsense"),
            ("not-a-date", "B"),
            ("2025-02-19", "C:granny"),
            ("2025-02-20", "clear"),
        ]);
        let overrides = Overrides::from_wire(&raw);
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get(date(2025, 2, 17)), Some(&Override::ParentA));
        assert_eq!(overrides.get(date(2025, 2, 18)), None);
        assert_eq!(
            overrides.get(date(2025, 2, 19)),
            Some(&Override::Caregiver("granny".to_string()))
        );
        assert_eq!(overrides.get(date(2025, 2, 20)), None);
    }

    #[test]
    fn test_from_wire_empty() {
        assert!(Overrides::from_wire(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_insert_clear_removes_entry() {
        let mut overrides = Overrides::new();
        overrides.insert(date(2025, 2, 17), Override::Both);
        overrides.insert(date(2025, 2, 17), Override::Clear);
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_insert_range_inclusive() {
        let mut overrides = Overrides::new();
        let written = overrides
            .insert_range("2025-12-29", "2026-01-02", Override::ParentB)
            .unwrap();
        assert_eq!(written, 5);
        assert_eq!(overrides.get(date(2025, 12, 29)), Some(&Override::ParentB));
        assert_eq!(overrides.get(date(2026, 1, 2)), Some(&Override::ParentB));
        assert_eq!(overrides.get(date(2026, 1, 3)), None);
    }

    #[test]
    fn test_insert_range_clear_removes_span() {
        let mut overrides = Overrides::new();
        overrides
            .insert_range("2025-02-17", "2025-02-21", Override::ParentA)
            .unwrap();
        overrides
            .insert_range("2025-02-18", "2025-02-20", Override::Clear)
            .unwrap();
        let dates: Vec<_> = overrides.iter().map(|(d, _)| *d).collect();
        assert_eq!(dates, vec![date(2025, 2, 17), date(2025, 2, 21)]);
    }

    #[test]
    fn test_insert_range_rejects_bad_bounds() {
        let mut overrides = Overrides::new();
        let err = overrides
            .insert_range("garbage", "2025-02-21", Override::ParentA)
            .unwrap_err();
        assert!(matches!(err, LeaveError::InvalidDate(_)));

        let err = overrides
            .insert_range("2025-02-21", "2025-02-17", Override::ParentA)
            .unwrap_err();
        assert!(matches!(err, LeaveError::InvalidOverride(_)));
        assert!(overrides.is_empty());
    }
}
