use async_trait::async_trait;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ToSqlOutput;
use rusqlite::{Connection, OptionalExtension, ToSql};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::{QueryFailure, Result};
use crate::executor::QueryExecutor;
use crate::model::{ConcertRecord, DocumentKind};
use crate::query::{ConcertQuery, Param};

use super::migrations::MIGRATIONS;

/// A document store on a single SQLite connection.
///
/// Statements run one at a time; the connection lock is held for the
/// duration of one statement only.
#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        register_math_functions(&conn)?;
        apply_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::result::Result<MutexGuard<'_, Connection>, QueryFailure> {
        self.conn
            .lock()
            .map_err(|_| QueryFailure::Unavailable("connection lock poisoned".into()))
    }
}

fn apply_migrations(conn: &Connection) -> Result<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version")?;
    let applied: Vec<u32> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for migration in MIGRATIONS {
        if !applied.contains(&migration.version) {
            log::info!(
                "Applying migration {} ({})",
                migration.version,
                migration.name
            );
            conn.execute_batch(migration.sql)?;
            conn.execute(
                "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                rusqlite::params![migration.version, migration.name],
            )?;
        }
    }

    Ok(())
}

/// The trigonometry the spatial predicate needs, NULL in NULL out.
/// Registered per connection so it does not depend on how SQLite was built.
fn register_math_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;
    let functions: [(&str, fn(f64) -> f64); 4] = [
        ("radians", f64::to_radians),
        ("sin", f64::sin),
        ("cos", f64::cos),
        ("acos", f64::acos),
    ];

    for (name, function) in functions {
        conn.create_scalar_function(name, 1, flags, move |ctx| {
            Ok(ctx.get::<Option<f64>>(0)?.map(function))
        })?;
    }
    Ok(())
}

// Documents
impl Database {
    /// Insert a document, replacing any document under the same key.
    pub fn upsert_document(&self, key: &str, body: &serde_json::Value) -> Result<()> {
        self.lock()?.execute(
            "INSERT INTO documents (key, body) VALUES (?1, ?2)
             ON CONFLICT (key) DO UPDATE SET body = excluded.body",
            rusqlite::params![key, serde_json::to_string(body)?],
        )?;
        Ok(())
    }

    /// Fetch one document by key.
    pub fn get_document(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let body: Option<String> = self
            .lock()?
            .query_row("SELECT body FROM documents WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
    }

    /// Number of documents of one kind.
    pub fn count(&self, kind: DocumentKind) -> Result<u64> {
        let count: i64 = self.lock()?.query_row(
            "SELECT COUNT(*) FROM documents WHERE json_extract(body, '$.kind') = ?1",
            [kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count.unsigned_abs())
    }

    /// Document counts for every kind, in [`DocumentKind::ALL`] order.
    pub fn count_by_kind(&self) -> Result<Vec<(DocumentKind, u64)>> {
        DocumentKind::ALL
            .into_iter()
            .map(|kind| Ok((kind, self.count(kind)?)))
            .collect()
    }
}

impl ToSql for Param {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Real(value) => value.to_sql(),
            Self::Text(value) => value.to_sql(),
        }
    }
}

#[async_trait]
impl QueryExecutor for Database {
    async fn execute(&self, query: &ConcertQuery) -> std::result::Result<Vec<ConcertRecord>, QueryFailure> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query.statement())?;

        let records = stmt
            .query_map(rusqlite::params_from_iter(query.params()), row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| match e {
                rusqlite::Error::InvalidColumnType(index, name, kind) => QueryFailure::RowShape(
                    format!("column {name} ({index}) holds {kind}"),
                ),
                other => QueryFailure::Store(other),
            })?;

        log::debug!("query returned {} rows", records.len());
        Ok(records)
    }
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ConcertRecord> {
    Ok(ConcertRecord {
        band: row.get("band")?,
        date: row.get("date")?,
        latitude: row.get("latitude")?,
        location: row.get("location")?,
        longitude: row.get("longitude")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{BoundingBox, SpatialPredicate};
    use crate::model::{Band, BandId, BandIdSet, Concert, Point, Venue, VenueId};
    use crate::query::{BandFilter, KeySet};

    const CENTER: Point = Point::new(52.518_311_3, 13.471_767_6);

    fn seed(db: &Database) {
        let venues = [
            (1, "K17, Berlin, Germany", CENTER),
            (2, "Zukunft am Ostkreuz", Point::new(52.527_311_3, 13.471_767_6)),
            (3, "Hamburg", Point::new(53.55, 9.99)),
        ];
        for (id, name, location) in venues {
            let venue = Venue::new(VenueId::new(id).unwrap(), name, location);
            db.upsert_document(&venue.id.document_key(), &venue.to_document())
                .unwrap();
        }
        for id in 1..=3 {
            let band = Band::new(BandId::new(id).unwrap(), format!("Band {id}"));
            db.upsert_document(&band.id.document_key(), &band.to_document())
                .unwrap();
        }
        let concerts = [(1, 1, 300), (2, 1, 100), (2, 2, 200), (3, 3, 400)];
        for (band, venue, date) in concerts {
            let concert = Concert::new(BandId::new(band).unwrap(), VenueId::new(venue).unwrap(), date);
            db.upsert_document(&concert.document_key(), &concert.to_document())
                .unwrap();
        }
    }

    fn location_query(radius_km: f64, bands: &[u32]) -> ConcertQuery {
        let predicate =
            SpatialPredicate::build(&BoundingBox::around(CENTER, 1000.0), CENTER, radius_km);
        let bands: BandIdSet = bands.iter().filter_map(|&id| BandId::new(id)).collect();
        ConcertQuery::by_location(&predicate, BandFilter::for_filter(&bands).as_ref()).unwrap()
    }

    #[test]
    fn test_database_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("encore.db");

        drop(Database::open(&path).unwrap());
        let db = Database::open(&path).unwrap();
        assert_eq!(db.count(DocumentKind::Venue).unwrap(), 0);
    }

    #[test]
    fn test_math_functions_are_registered() {
        let db = Database::open_in_memory().unwrap();
        let (radians, acos, null): (f64, f64, Option<f64>) = db
            .lock()
            .unwrap()
            .query_row("SELECT radians(180), acos(-1), sin(NULL)", [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .unwrap();
        assert!((radians - std::f64::consts::PI).abs() < 1e-12);
        assert!((acos - std::f64::consts::PI).abs() < 1e-12);
        assert!(null.is_none());
    }

    #[test]
    fn test_document_round_trip() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        let doc = db.get_document("concert::2::1").unwrap().unwrap();
        assert_eq!(doc["bandId"], "band::2");
        assert_eq!(doc["date"], 100);
        assert!(db.get_document("venue::99").unwrap().is_none());

        assert_eq!(db.count(DocumentKind::Band).unwrap(), 3);
        assert_eq!(db.count(DocumentKind::Venue).unwrap(), 3);
        assert_eq!(db.count(DocumentKind::Concert).unwrap(), 4);
        assert_eq!(
            db.count_by_kind().unwrap(),
            vec![
                (DocumentKind::Band, 3),
                (DocumentKind::Venue, 3),
                (DocumentKind::Concert, 4),
            ]
        );
    }

    #[test]
    fn test_upsert_replaces() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_document("band::1", &serde_json::json!({"name": "Old"}))
            .unwrap();
        db.upsert_document("band::1", &serde_json::json!({"name": "New"}))
            .unwrap();

        assert_eq!(db.get_document("band::1").unwrap().unwrap()["name"], "New");
    }

    #[tokio::test]
    async fn test_location_query_zero_radius() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        let records = db.execute(&location_query(0.0, &[])).await.unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.location == "K17, Berlin, Germany"));
        assert_eq!(records[0].date, 300);
        assert_eq!(records[1].date, 100);
    }

    #[tokio::test]
    async fn test_location_query_with_radius_and_filter() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        let all = db.execute(&location_query(2.0, &[])).await.unwrap();
        let dates: Vec<i64> = all.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![300, 200, 100]);

        let filtered = db.execute(&location_query(2.0, &[2])).await.unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.band == "Band 2"));
    }

    #[tokio::test]
    async fn test_band_ids_query() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        let bands: BandIdSet = [BandId::new(1).unwrap(), BandId::new(3).unwrap()]
            .into_iter()
            .collect();
        let records = db
            .execute(&ConcertQuery::by_band_ids(&KeySet::for_lookup(&bands)))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].location, "Hamburg");
        assert_eq!(records[0].date, 400);
        assert_eq!(records[1].band, "Band 1");
    }

    #[tokio::test]
    async fn test_malformed_row_is_reported() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        db.upsert_document(
            "concert::1::2",
            &serde_json::json!({
                "kind": "concert",
                "bandId": "band::1",
                "venueId": "venue::2",
                "date": "next tuesday",
            }),
        )
        .unwrap();

        let result = db.execute(&location_query(2.0, &[])).await;
        assert!(matches!(result, Err(QueryFailure::RowShape(_))));
    }
}
