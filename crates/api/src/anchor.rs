use std::{fmt, str::FromStr};

use time::{macros::date, Date, Duration};

use crate::db::{self, format_date, parse_date, ClimateData};

/// Last observation date of the Hawaii dataset the service was built around.
pub const DEFAULT_ANCHOR_DATE: Date = date!(2017 - 08 - 23);

/// Reference date the trailing one-year window is measured back from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorDate {
    /// Pinned calendar date, independent of the stored data
    Fixed(Date),
    /// Most recent observation date, looked up on every request
    Latest,
}

impl Default for AnchorDate {
    fn default() -> Self {
        AnchorDate::Fixed(DEFAULT_ANCHOR_DATE)
    }
}

impl FromStr for AnchorDate {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("latest") {
            return Ok(AnchorDate::Latest);
        }
        parse_date(s.trim()).map(AnchorDate::Fixed)
    }
}

impl fmt::Display for AnchorDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorDate::Fixed(date) => match format_date(*date) {
                Ok(formatted) => write!(f, "{}", formatted),
                Err(_) => write!(f, "{}", date),
            },
            AnchorDate::Latest => write!(f, "latest"),
        }
    }
}

impl AnchorDate {
    /// `None` only in [`AnchorDate::Latest`] mode against an empty dataset.
    pub async fn resolve(&self, climate_db: &dyn ClimateData) -> Result<Option<Date>, db::Error> {
        match self {
            AnchorDate::Fixed(date) => Ok(Some(*date)),
            AnchorDate::Latest => climate_db.latest_date().await,
        }
    }
}

/// Start of the trailing window: 365 days before `anchor`, inclusive.
pub fn one_year_before(anchor: Date) -> Date {
    anchor.saturating_sub(Duration::days(365))
}
