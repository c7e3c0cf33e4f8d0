use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use climate_api::{
    app, build_app_state, AnchorDate, AppState, ClimateData, DailyPrecipitation, Database,
    DatabaseOptions, Error, StationActivity, TemperatureSummary,
};
use hyper::{header, Method};
use mockall::mock;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    Connection, SqliteConnection,
};
use std::{str::FromStr, sync::Arc};
use tempfile::TempDir;
use time::Date;
use tower::ServiceExt;

mock! {
    pub ClimateAccess {}
    #[async_trait]
    impl ClimateData for ClimateAccess {
        async fn precipitation_since(&self, since: Date) -> Result<Vec<DailyPrecipitation>, Error>;
        async fn station_ids(&self) -> Result<Vec<String>, Error>;
        async fn most_active_station(&self) -> Result<Option<StationActivity>, Error>;
        async fn temperature_observations(&self, station: &str, since: Date) -> Result<Vec<f64>, Error>;
        async fn temperature_summary(&self, start: Date, end: Option<Date>) -> Result<TemperatureSummary, Error>;
        async fn latest_date(&self) -> Result<Option<Date>, Error>;
    }
}

pub const MEASUREMENT_DDL: &str = "CREATE TABLE measurement (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    station TEXT,
    date TEXT,
    prcp FLOAT,
    tobs FLOAT
)";

pub const STATION_DDL: &str = "CREATE TABLE station (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    station TEXT,
    name TEXT,
    latitude FLOAT,
    longitude FLOAT,
    elevation FLOAT
)";

/// (station, date, prcp, tobs)
pub type ObservationRow<'a> = (&'a str, &'a str, Option<f64>, f64);

pub struct TestApp {
    pub app: Router,
}

pub struct SeededApp {
    pub app: Router,
    pub database: Database,
    _dir: TempDir,
}

pub async fn spawn_app(climate_db: Arc<dyn ClimateData>, anchor: AnchorDate) -> TestApp {
    let state = AppState {
        remote_url: String::from("http://127.0.0.1:9800"),
        anchor,
        climate_db,
    };

    TestApp { app: app(state) }
}

/// Serves a real SQLite file holding `observations`.
pub async fn spawn_seeded_app(observations: &[ObservationRow<'_>], anchor: AnchorDate) -> SeededApp {
    let (dir, path) = create_database(&[MEASUREMENT_DDL, STATION_DDL]).await;
    insert_observations(&path, observations).await;

    let database = Database::new(&path, DatabaseOptions::default())
        .await
        .expect("Failed to open seeded database");
    let state = build_app_state(String::from("http://127.0.0.1:9800"), &database, anchor);

    SeededApp {
        app: app(state),
        database,
        _dir: dir,
    }
}

/// Creates a fresh SQLite file in a temp dir and runs `statements` against it.
pub async fn create_database(statements: &[&str]) -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir
        .path()
        .join("hawaii.sqlite")
        .to_str()
        .expect("temp path is not utf-8")
        .to_owned();

    let mut conn = writable_connection(&path, true).await;
    for statement in statements {
        sqlx::query(statement)
            .execute(&mut conn)
            .await
            .expect("Failed to run setup statement");
    }
    conn.close().await.expect("Failed to close setup connection");

    (dir, path)
}

pub async fn insert_observations(path: &str, observations: &[ObservationRow<'_>]) {
    let mut conn = writable_connection(path, false).await;

    for (station, date, prcp, tobs) in observations {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
            .bind(*station)
            .bind(*date)
            .bind(*prcp)
            .bind(*tobs)
            .execute(&mut conn)
            .await
            .expect("Failed to insert observation");
    }

    sqlx::query(
        "INSERT INTO station (station, name, latitude, longitude, elevation)
         SELECT DISTINCT station, station || ' GAUGE', 21.3, -157.8, 3.0 FROM measurement",
    )
    .execute(&mut conn)
    .await
    .expect("Failed to insert stations");

    conn.close().await.expect("Failed to close setup connection");
}

async fn writable_connection(path: &str, create: bool) -> SqliteConnection {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))
        .expect("Invalid sqlite path")
        .create_if_missing(create)
        .journal_mode(SqliteJournalMode::Delete);

    SqliteConnection::connect_with(&options)
        .await
        .expect("Failed to open setup connection")
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(app, uri).await;
    let json = serde_json::from_slice(&body).expect("Response body is not JSON");
    (status, json)
}
