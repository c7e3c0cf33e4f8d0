use async_trait::async_trait;
use log::trace;
use regex::Regex;
use scooby::postgres::{select, Aliasable, Orderable, Parameters, Select};
use serde::{Deserialize, Serialize};
use sqlx::{
    sqlite::{Sqlite, SqlitePool, SqliteRow},
    FromRow,
};
use time::{macros::format_description, Date};
use utoipa::ToSchema;

use super::{Database, MEASUREMENT};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to prepare query placeholders: {0}")]
    Placeholder(#[from] regex::Error),
    #[error("Failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("Failed to parse stored date: {0}")]
    DateParse(#[from] time::error::Parse),
}

#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Precipitation readings on or after `since`, oldest first.
    async fn precipitation_since(&self, since: Date) -> Result<Vec<DailyPrecipitation>, Error>;
    /// Every station id with at least one observation, without duplicates.
    async fn station_ids(&self) -> Result<Vec<String>, Error>;
    /// The station with the most observation rows, `None` when there are no observations.
    async fn most_active_station(&self) -> Result<Option<StationActivity>, Error>;
    /// Temperature readings of one station on or after `since`, most recent first.
    async fn temperature_observations(&self, station: &str, since: Date)
        -> Result<Vec<f64>, Error>;
    /// Min/max/avg temperature for `start <= date` (and `date <= end` when given).
    async fn temperature_summary(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TemperatureSummary, Error>;
    /// Most recent observation date in the dataset.
    async fn latest_date(&self) -> Result<Option<Date>, Error>;
}

pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

pub fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(format_description!("[year]-[month]-[day]"))
}

/// Scooby numbers its placeholders `$1, $2, ...`; sqlite wants `?1, ?2, ...`.
fn sqlite_placeholders(sql: &str) -> Result<String, regex::Error> {
    let re = Regex::new(r"\$(\d+)")?;
    Ok(re.replace_all(sql, "?${1}").into_owned())
}

pub struct ClimateAccess {
    pool: SqlitePool,
}

impl ClimateAccess {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    pub async fn query<T>(&self, select: Select, params: Vec<String>) -> Result<Vec<T>, Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let sql = sqlite_placeholders(&select.to_string())?;
        trace!("running query: {} {:?}", sql, params);

        let mut query = sqlx::query_as::<Sqlite, T>(&sql);
        for param in params {
            query = query.bind(param);
        }

        // Returned to the pool when dropped, on success and error alike
        let mut conn = self.pool.acquire().await?;
        Ok(query.fetch_all(&mut *conn).await?)
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn precipitation_since(&self, since: Date) -> Result<Vec<DailyPrecipitation>, Error> {
        let mut placeholders = Parameters::new();
        let query = select(("date", "prcp"))
            .from(MEASUREMENT.name)
            .where_(format!("date >= {}", placeholders.next()))
            .order_by("date".asc());

        self.query(query, vec![format_date(since)?]).await
    }

    async fn station_ids(&self) -> Result<Vec<String>, Error> {
        let query = select("station")
            .from(MEASUREMENT.name)
            .group_by("station")
            .order_by("station".asc());

        let rows: Vec<(String,)> = self.query(query, vec![]).await?;
        Ok(rows.into_iter().map(|(station,)| station).collect())
    }

    async fn most_active_station(&self) -> Result<Option<StationActivity>, Error> {
        // Ties go to the lowest station id so repeated calls agree
        let query = select(("station", "COUNT(station)".as_("observation_count")))
            .from(MEASUREMENT.name)
            .group_by("station")
            .order_by(("observation_count".desc(), "station".asc()))
            .limit(1);

        let rows: Vec<StationActivity> = self.query(query, vec![]).await?;
        Ok(rows.into_iter().next())
    }

    async fn temperature_observations(
        &self,
        station: &str,
        since: Date,
    ) -> Result<Vec<f64>, Error> {
        let mut placeholders = Parameters::new();
        let query = select("tobs")
            .from(MEASUREMENT.name)
            .where_(format!("station = {}", placeholders.next()))
            .where_(format!("date >= {}", placeholders.next()))
            .order_by("date".desc());

        let rows: Vec<(f64,)> = self
            .query(query, vec![station.to_owned(), format_date(since)?])
            .await?;
        Ok(rows.into_iter().map(|(tobs,)| tobs).collect())
    }

    async fn temperature_summary(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TemperatureSummary, Error> {
        let mut placeholders = Parameters::new();
        let mut values = vec![format_date(start)?];

        let mut query = select((
            "MIN(tobs)".as_("tmin"),
            "MAX(tobs)".as_("tmax"),
            "AVG(tobs)".as_("tavg"),
        ))
        .from(MEASUREMENT.name)
        .where_(format!("date >= {}", placeholders.next()));

        if let Some(end) = end {
            query = query.where_(format!("date <= {}", placeholders.next()));
            values.push(format_date(end)?);
        }

        // Aggregates without GROUP BY always yield exactly one row
        let rows: Vec<TemperatureSummary> = self.query(query, values).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn latest_date(&self) -> Result<Option<Date>, Error> {
        let query = select("MAX(date)".as_("latest")).from(MEASUREMENT.name);

        let rows: Vec<(Option<String>,)> = self.query(query, vec![]).await?;
        match rows.into_iter().next().and_then(|(latest,)| latest) {
            Some(latest) => Ok(Some(parse_date(&latest)?)),
            None => Ok(None),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow, ToSchema)]
pub struct DailyPrecipitation {
    /// Observation date, `YYYY-MM-DD`
    pub date: String,
    /// Precipitation in inches, null when not recorded
    pub prcp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct StationActivity {
    pub station: String,
    pub observation_count: i64,
}

/// Temperature aggregate over a date range. All fields are `None` when no
/// observation matched.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromRow)]
pub struct TemperatureSummary {
    pub tmin: Option<f64>,
    pub tmax: Option<f64>,
    pub tavg: Option<f64>,
}

impl TemperatureSummary {
    /// `[min, max, avg]`, the order the API serves them in.
    pub fn as_row(&self) -> [Option<f64>; 3] {
        [self.tmin, self.tmax, self.tavg]
    }
}
