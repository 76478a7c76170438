//! Month calendar: canonical month names, ordinals and `(month, year)`
//! arithmetic.
//!
//! Ledgers are keyed by a [`Period`]. Periods order chronologically (year
//! first, then month ordinal) and wrap across year boundaries.

use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

pub(crate) const MIN_YEAR: i32 = 1900;
pub(crate) const MAX_YEAR: i32 = 9999;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Janeiro,
    Fevereiro,
    Marco,
    Abril,
    Maio,
    Junho,
    Julho,
    Agosto,
    Setembro,
    Outubro,
    Novembro,
    Dezembro,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Janeiro,
        Month::Fevereiro,
        Month::Marco,
        Month::Abril,
        Month::Maio,
        Month::Junho,
        Month::Julho,
        Month::Agosto,
        Month::Setembro,
        Month::Outubro,
        Month::Novembro,
        Month::Dezembro,
    ];

    /// Canonical name, as stored and displayed.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Month::Janeiro => "Janeiro",
            Month::Fevereiro => "Fevereiro",
            Month::Marco => "Março",
            Month::Abril => "Abril",
            Month::Maio => "Maio",
            Month::Junho => "Junho",
            Month::Julho => "Julho",
            Month::Agosto => "Agosto",
            Month::Setembro => "Setembro",
            Month::Outubro => "Outubro",
            Month::Novembro => "Novembro",
            Month::Dezembro => "Dezembro",
        }
    }

    /// 0-based ordinal (Janeiro = 0 … Dezembro = 11).
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> ResultEngine<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| EngineError::InvalidMonth(format!("month index {index} out of range")))
    }

    /// Month of a calendar date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        // `month0` is always in 0..12
        Self::ALL[date.month0() as usize]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase and strip diacritics so `"MARÇO"`, `"marco"` and `"Março"`
/// compare equal.
fn fold(value: &str) -> String {
    value
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Month {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold(s);
        Self::ALL
            .into_iter()
            .find(|month| fold(month.name()) == folded)
            .ok_or_else(|| EngineError::InvalidMonth(format!("unknown month name: {}", s.trim())))
    }
}

impl TryFrom<&str> for Month {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A `(month, year)` pair identifying one ledger.
///
/// Built only through [`Period::new`] or [`Period::from_date`], which check
/// the year, so stepping with `previous`/`next` cannot overflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    // Field order matters: the derived `Ord` compares `year` first.
    year: i32,
    month: Month,
}

#[derive(Deserialize)]
struct RawPeriod {
    year: i32,
    month: Month,
}

impl TryFrom<RawPeriod> for Period {
    type Error = EngineError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.month, raw.year)
    }
}

impl Period {
    pub fn new(month: Month, year: i32) -> ResultEngine<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(EngineError::InvalidPeriod(format!(
                "year {year} outside {MIN_YEAR}..={MAX_YEAR}"
            )));
        }
        Ok(Self { year, month })
    }

    /// Parse a month name and a year as typed by a user.
    pub fn parse(month: &str, year: i32) -> ResultEngine<Self> {
        Self::new(month.parse()?, year)
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn month(self) -> Month {
        self.month
    }

    /// Period containing `date`.
    pub fn from_date(date: NaiveDate) -> ResultEngine<Self> {
        Self::new(Month::of(date), date.year())
    }

    /// The immediately preceding period, wrapping Janeiro to Dezembro of the
    /// previous year.
    #[must_use]
    pub fn previous(self) -> Self {
        match self.month {
            Month::Janeiro => Self {
                year: self.year - 1,
                month: Month::Dezembro,
            },
            month => Self {
                year: self.year,
                month: Month::ALL[month.index() as usize - 1],
            },
        }
    }

    /// The immediately following period, wrapping Dezembro to Janeiro of the
    /// next year.
    #[must_use]
    pub fn next(self) -> Self {
        match self.month {
            Month::Dezembro => Self {
                year: self.year + 1,
                month: Month::Janeiro,
            },
            month => Self {
                year: self.year,
                month: Month::ALL[month.index() as usize + 1],
            },
        }
    }

    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        // Day 1 exists in every month of every year in range.
        NaiveDate::from_ymd_opt(self.year, self.month.index() + 1, 1).unwrap_or(NaiveDate::MIN)
    }

    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && Month::of(date) == self.month
    }

    /// Move `date` into this period keeping the day of month, clamped to the
    /// last day when the month is shorter.
    #[must_use]
    pub fn rebase(self, date: NaiveDate) -> NaiveDate {
        let last = self.last_day();
        last.with_day(date.day().min(last.day())).unwrap_or(last)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

/// Advance `date` by whole calendar months, clamping the day when needed
/// (31 Jan + 1 month = 28/29 Feb).
pub(crate) fn add_months(date: NaiveDate, months: u32) -> ResultEngine<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .filter(|d| d.year() <= MAX_YEAR)
        .ok_or_else(|| EngineError::InvalidPeriod(format!("{date} + {months} months overflows")))
}

/// Stored timestamp for a calendar date: fixed at 12:00 UTC so that any
/// timezone conversion stays on the same day.
#[must_use]
pub(crate) fn midday(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ordinals_round_trip() {
        for (i, month) in Month::ALL.into_iter().enumerate() {
            assert_eq!(month.index(), i as u32);
            assert_eq!(Month::from_index(i as u32).unwrap(), month);
            assert_eq!(month.name().parse::<Month>().unwrap(), month);
        }
        assert!(Month::from_index(12).is_err());
    }

    #[test]
    fn parsing_ignores_case_and_accents() {
        assert_eq!("marco".parse::<Month>().unwrap(), Month::Marco);
        assert_eq!(" MARÇO ".parse::<Month>().unwrap(), Month::Marco);
        assert_eq!("fevereiro".parse::<Month>().unwrap(), Month::Fevereiro);
    }

    #[test]
    fn unknown_month_is_a_validation_error() {
        assert_eq!(
            "Smarch".parse::<Month>(),
            Err(EngineError::InvalidMonth(
                "unknown month name: Smarch".to_string()
            ))
        );
        assert!("".parse::<Month>().is_err());
        assert!("January".parse::<Month>().is_err());
    }

    #[test]
    fn previous_wraps_at_january() {
        let jan = Period::new(Month::Janeiro, 2025).unwrap();
        assert_eq!(jan.previous(), Period::new(Month::Dezembro, 2024).unwrap());
        let may = Period::new(Month::Maio, 2025).unwrap();
        assert_eq!(may.previous(), Period::new(Month::Abril, 2025).unwrap());
        assert_eq!(jan.previous().next(), jan);
    }

    #[test]
    fn periods_order_by_year_then_month() {
        let dec_2024 = Period::new(Month::Dezembro, 2024).unwrap();
        let jan_2025 = Period::new(Month::Janeiro, 2025).unwrap();
        let mar_2025 = Period::new(Month::Marco, 2025).unwrap();
        assert!(dec_2024 < jan_2025);
        assert!(jan_2025 < mar_2025);
    }

    #[test]
    fn rebase_keeps_or_clamps_day() {
        let feb = Period::new(Month::Fevereiro, 2025).unwrap();
        assert_eq!(feb.rebase(date(2025, 1, 15)), date(2025, 2, 15));
        assert_eq!(feb.rebase(date(2025, 1, 31)), date(2025, 2, 28));
        let feb_leap = Period::new(Month::Fevereiro, 2024).unwrap();
        assert_eq!(feb_leap.rebase(date(2024, 1, 30)), date(2024, 2, 29));
    }

    #[test]
    fn add_months_crosses_years() {
        assert_eq!(add_months(date(2025, 11, 10), 3).unwrap(), date(2026, 2, 10));
        assert_eq!(add_months(date(2025, 1, 31), 1).unwrap(), date(2025, 2, 28));
        assert_eq!(add_months(date(2025, 3, 5), 0).unwrap(), date(2025, 3, 5));
    }

    #[test]
    fn year_out_of_range_is_rejected() {
        assert!(Period::new(Month::Janeiro, 1800).is_err());
        assert!(Period::parse("Abril", 2025).is_ok());
        assert!(Period::from_date(date(1899, 12, 31)).is_err());
        assert!(Period::from_date(date(10_000, 1, 1)).is_err());
        assert_eq!(
            Period::from_date(date(2025, 3, 9)).unwrap(),
            Period::new(Month::Marco, 2025).unwrap()
        );
    }

    #[test]
    fn deserializing_checks_the_year() {
        let ok: Period = serde_json::from_str(r#"{"year":2025,"month":"Maio"}"#).unwrap();
        assert_eq!((ok.month(), ok.year()), (Month::Maio, 2025));
        assert!(serde_json::from_str::<Period>(r#"{"year":2147483647,"month":"Dezembro"}"#).is_err());
    }

    #[test]
    fn stepping_from_the_edges_stays_representable() {
        let last = Period::new(Month::Dezembro, 9999).unwrap();
        assert_eq!(last.next().year(), 10_000);
        assert_eq!(last.last_day(), date(9999, 12, 31));
        let first = Period::new(Month::Janeiro, 1900).unwrap();
        assert_eq!(first.previous().year(), 1899);
        assert!(first.contains(date(1900, 1, 15)));
    }

    #[test]
    fn midday_is_noon_utc() {
        let ts = midday(date(2025, 3, 1));
        assert_eq!(ts.date_naive(), date(2025, 3, 1));
        assert_eq!(ts.time(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }
}
