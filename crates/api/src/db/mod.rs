pub mod climate_data;
mod schema;
pub mod sqlite;

pub use climate_data::{
    format_date, parse_date, ClimateAccess, ClimateData, DailyPrecipitation, Error,
    StationActivity, TemperatureSummary,
};
pub use schema::{TableSchema, MEASUREMENT, STATION, TABLES};
pub use sqlite::{Database, DatabaseOptions, StorageError};
