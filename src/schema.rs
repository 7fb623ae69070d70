use rusqlite::{Connection, OptionalExtension};

use crate::errors::TypedGraphError;

pub const SCHEMA_VERSION: i64 = 1;

pub fn ensure_schema(conn: &Connection) -> Result<(), TypedGraphError> {
    ensure_base_schema(conn)?;
    ensure_meta(conn)?;
    Ok(())
}

fn ensure_base_schema(conn: &Connection) -> Result<(), TypedGraphError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS engine_types (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            object_type TEXT NOT NULL,
            directed    INTEGER NOT NULL DEFAULT 0,
            neighbors   INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS engine_attributes (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            type_id   INTEGER NOT NULL,
            name      TEXT NOT NULL,
            data_type TEXT NOT NULL,
            kind      TEXT NOT NULL,
            UNIQUE(type_id, name)
        );
        CREATE TABLE IF NOT EXISTS engine_objects (
            oid     INTEGER PRIMARY KEY AUTOINCREMENT,
            type_id INTEGER NOT NULL,
            tail    INTEGER,
            head    INTEGER
        );
        CREATE TABLE IF NOT EXISTS engine_values (
            attr_id INTEGER NOT NULL,
            oid     INTEGER NOT NULL,
            value   NOT NULL,
            PRIMARY KEY(attr_id, oid)
        );
        CREATE INDEX IF NOT EXISTS idx_objects_type ON engine_objects(type_id, oid);
        CREATE INDEX IF NOT EXISTS idx_objects_tail ON engine_objects(tail);
        CREATE INDEX IF NOT EXISTS idx_objects_head ON engine_objects(head);
        CREATE INDEX IF NOT EXISTS idx_values_attr_value ON engine_values(attr_id, value, oid);
        CREATE INDEX IF NOT EXISTS idx_values_oid ON engine_values(oid);
        CREATE TABLE IF NOT EXISTS engine_meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            schema_version INTEGER NOT NULL
        );
        "#,
    )
    .map_err(|e| TypedGraphError::schema(e.to_string()))
}

pub fn read_schema_version(conn: &Connection) -> Result<i64, TypedGraphError> {
    conn.query_row(
        "SELECT schema_version FROM engine_meta WHERE id=1",
        [],
        |row| row.get(0),
    )
    .map_err(|e| TypedGraphError::schema(e.to_string()))
}

fn ensure_meta(conn: &Connection) -> Result<(), TypedGraphError> {
    let version: Option<i64> = conn
        .query_row(
            "SELECT schema_version FROM engine_meta WHERE id=1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| TypedGraphError::schema(e.to_string()))?;
    match version {
        Some(existing) if existing > SCHEMA_VERSION => Err(TypedGraphError::schema(format!(
            "store schema version {existing} is newer than supported {SCHEMA_VERSION}"
        ))),
        Some(_) => Ok(()),
        None => {
            conn.execute(
                "INSERT INTO engine_meta(id, schema_version) VALUES(1, ?1)",
                [SCHEMA_VERSION],
            )
            .map_err(|e| TypedGraphError::schema(e.to_string()))?;
            Ok(())
        }
    }
}
