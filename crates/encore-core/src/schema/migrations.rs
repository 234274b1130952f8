/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Every band, venue and concert is one JSON document under its key
-- (band::<id>, venue::<id>, concert::<bandId>::<venueId>).
CREATE TABLE IF NOT EXISTS documents (
    key TEXT PRIMARY KEY,
    body TEXT NOT NULL CHECK (json_valid(body))
);

CREATE INDEX IF NOT EXISTS idx_documents_kind
    ON documents(json_extract(body, '$.kind'));
"#;

const MIGRATION_002: &str = r#"
-- Join columns of concert documents
CREATE INDEX IF NOT EXISTS idx_documents_venue_id
    ON documents(json_extract(body, '$.venueId'));
CREATE INDEX IF NOT EXISTS idx_documents_band_id
    ON documents(json_extract(body, '$.bandId'));
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "documents",
        sql: MIGRATION_001,
    },
    Migration {
        version: 2,
        name: "concert_join_indexes",
        sql: MIGRATION_002,
    },
];
