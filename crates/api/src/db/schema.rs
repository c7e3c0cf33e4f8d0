/// A table the service reads from, with the columns it relies on.
///
/// The storage file may carry extra columns (the `id` primary keys, for one);
/// only the listed ones are required to be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Daily observations: one row per station per day.
pub const MEASUREMENT: TableSchema = TableSchema {
    name: "measurement",
    columns: &["station", "date", "prcp", "tobs"],
};

/// Station metadata: one row per physical monitoring site.
pub const STATION: TableSchema = TableSchema {
    name: "station",
    columns: &["station", "name", "latitude", "longitude", "elevation"],
};

pub const TABLES: [TableSchema; 2] = [MEASUREMENT, STATION];
