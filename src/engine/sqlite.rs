use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashSet;
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params, types::Value as SqlValue};

use super::{
    AttributeId, AttributeInfo, AttributeKind, EdgeData, EdgesDirection, EngineMetrics,
    EngineMetricsSnapshot, GraphEngine, ObjectType, Objects, Oid, SessionId, TypeId, TypeInfo,
};
use crate::{
    config::SqliteConfig,
    errors::TypedGraphError,
    schema::ensure_schema,
    value::{DataType, Value},
};

/// File-backed engine storing types, attributes, objects and attribute values
/// in SQLite tables.
///
/// The connection is serialized behind a mutex; sessions are logical handles
/// tracked by the engine and every primitive checks that its session is open.
pub struct SqliteEngine {
    conn: Mutex<Option<Connection>>,
    path: Option<PathBuf>,
    sessions: Mutex<AHashSet<SessionId>>,
    next_session: AtomicU64,
    metrics: EngineMetrics,
}

impl SqliteEngine {
    /// Initializes a new store at `path`.
    pub fn create<P: AsRef<Path>>(path: P, config: &SqliteConfig) -> Result<Self, TypedGraphError> {
        let path = path.as_ref();
        let conn =
            Connection::open(path).map_err(|e| TypedGraphError::connection(e.to_string()))?;
        log::debug!("created engine store at {}", path.display());
        Self::from_connection(conn, Some(path.to_path_buf()), config)
    }

    /// Opens an existing store read-write. Fails when `path` does not exist.
    pub fn open<P: AsRef<Path>>(path: P, config: &SqliteConfig) -> Result<Self, TypedGraphError> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| TypedGraphError::connection(format!("{}: {e}", path.display())))?;
        log::debug!("opened engine store at {}", path.display());
        Self::from_connection(conn, Some(path.to_path_buf()), config)
    }

    pub fn in_memory(config: &SqliteConfig) -> Result<Self, TypedGraphError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| TypedGraphError::connection(e.to_string()))?;
        Self::from_connection(conn, None, config)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn open_session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    fn from_connection(
        conn: Connection,
        path: Option<PathBuf>,
        config: &SqliteConfig,
    ) -> Result<Self, TypedGraphError> {
        if let Some(capacity) = config.cache_size {
            conn.set_prepared_statement_cache_capacity(capacity);
        }
        for (key, value) in &config.pragma_settings {
            let pragma_sql = format!("PRAGMA {} = {}", key, value);
            match conn.execute(&pragma_sql, []) {
                Ok(_) => {}
                // Some PRAGMAs report their new value as a row.
                Err(rusqlite::Error::ExecuteReturnedResults) => {}
                Err(e) => {
                    return Err(TypedGraphError::connection(format!(
                        "PRAGMA {} = {}: {}",
                        key, value, e
                    )));
                }
            }
        }
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            path,
            sessions: Mutex::new(AHashSet::new()),
            next_session: AtomicU64::new(1),
            metrics: EngineMetrics::default(),
        })
    }

    fn check_session(&self, session: SessionId) -> Result<(), TypedGraphError> {
        if self.sessions.lock().contains(&session) {
            Ok(())
        } else {
            Err(TypedGraphError::invalid_state(format!(
                "session {} is not open",
                session.0
            )))
        }
    }

    fn with_conn<T>(
        &self,
        session: SessionId,
        f: impl FnOnce(&Connection) -> Result<T, TypedGraphError>,
    ) -> Result<T, TypedGraphError> {
        self.check_session(session)?;
        let guard = self.conn.lock();
        let conn = guard
            .as_ref()
            .ok_or_else(|| TypedGraphError::invalid_state("database is closed"))?;
        f(conn)
    }
}

impl GraphEngine for SqliteEngine {
    fn open_session(&self) -> Result<SessionId, TypedGraphError> {
        if self.conn.lock().is_none() {
            return Err(TypedGraphError::invalid_state("database is closed"));
        }
        let session = SessionId(self.next_session.fetch_add(1, Ordering::Relaxed));
        self.sessions.lock().insert(session);
        self.metrics.record_session_open();
        Ok(session)
    }

    fn close_session(&self, session: SessionId) -> Result<(), TypedGraphError> {
        if !self.sessions.lock().remove(&session) {
            return Err(TypedGraphError::invalid_state(format!(
                "session {} is not open",
                session.0
            )));
        }
        self.metrics.record_session_close();
        Ok(())
    }

    fn is_session_open(&self, session: SessionId) -> bool {
        self.sessions.lock().contains(&session)
    }

    fn find_type(&self, session: SessionId, name: &str) -> Result<Option<TypeId>, TypedGraphError> {
        self.with_conn(session, |conn| find_type_id(conn, name))
    }

    fn type_info(&self, session: SessionId, ty: TypeId) -> Result<TypeInfo, TypedGraphError> {
        self.with_conn(session, |conn| type_row(conn, ty))
    }

    fn new_node_type(&self, session: SessionId, name: &str) -> Result<TypeId, TypedGraphError> {
        self.with_conn(session, |conn| {
            insert_type(conn, name, ObjectType::Node, false, false)
        })
    }

    fn new_edge_type(
        &self,
        session: SessionId,
        name: &str,
        directed: bool,
        neighbors: bool,
    ) -> Result<TypeId, TypedGraphError> {
        self.with_conn(session, |conn| {
            insert_type(conn, name, ObjectType::Edge, directed, neighbors)
        })
    }

    fn find_types(
        &self,
        session: SessionId,
        object_type: ObjectType,
    ) -> Result<Vec<TypeId>, TypedGraphError> {
        self.with_conn(session, |conn| {
            let ids = collect_ids(
                conn,
                "SELECT id FROM engine_types WHERE object_type=?1 ORDER BY id",
                params![object_type.as_str()],
            )?;
            Ok(ids.into_iter().map(TypeId).collect())
        })
    }

    fn find_attribute(
        &self,
        session: SessionId,
        ty: TypeId,
        name: &str,
    ) -> Result<Option<AttributeId>, TypedGraphError> {
        self.with_conn(session, |conn| find_attribute_id(conn, ty, name))
    }

    fn find_attributes(
        &self,
        session: SessionId,
        ty: TypeId,
    ) -> Result<Vec<AttributeId>, TypedGraphError> {
        self.with_conn(session, |conn| {
            let ids = collect_ids(
                conn,
                "SELECT id FROM engine_attributes WHERE type_id=?1 ORDER BY id",
                params![ty.0],
            )?;
            Ok(ids.into_iter().map(AttributeId).collect())
        })
    }

    fn attribute_info(
        &self,
        session: SessionId,
        attr: AttributeId,
    ) -> Result<AttributeInfo, TypedGraphError> {
        self.with_conn(session, |conn| attribute_row(conn, attr))
    }

    fn new_attribute(
        &self,
        session: SessionId,
        ty: TypeId,
        name: &str,
        data_type: DataType,
        kind: AttributeKind,
    ) -> Result<AttributeId, TypedGraphError> {
        self.with_conn(session, |conn| {
            if name.trim().is_empty() {
                return Err(TypedGraphError::invalid_input("attribute name must be set"));
            }
            let owner = type_row(conn, ty)?;
            if find_attribute_id(conn, ty, name)?.is_some() {
                return Err(TypedGraphError::already_exists(format!(
                    "attribute '{name}' on type '{}'",
                    owner.name
                )));
            }
            conn.execute(
                "INSERT INTO engine_attributes(type_id, name, data_type, kind) VALUES(?1, ?2, ?3, ?4)",
                params![ty.0, name, data_type.as_str(), kind.as_str()],
            )
            .map_err(|e| TypedGraphError::query(e.to_string()))?;
            Ok(AttributeId(conn.last_insert_rowid()))
        })
    }

    fn index_attribute(
        &self,
        session: SessionId,
        attr: AttributeId,
        kind: AttributeKind,
    ) -> Result<(), TypedGraphError> {
        self.with_conn(session, |conn| {
            let info = attribute_row(conn, attr)?;
            if kind == AttributeKind::Unique {
                let duplicates: i64 = conn
                    .query_row(
                        "SELECT COUNT(*) FROM (SELECT value FROM engine_values \
                         WHERE attr_id=?1 GROUP BY value HAVING COUNT(*) > 1)",
                        params![attr.0],
                        |row| row.get(0),
                    )
                    .map_err(|e| TypedGraphError::query(e.to_string()))?;
                if duplicates > 0 {
                    return Err(TypedGraphError::invalid_input(format!(
                        "attribute '{}' holds duplicate values and cannot be unique",
                        info.name
                    )));
                }
            }
            conn.execute(
                "UPDATE engine_attributes SET kind=?1 WHERE id=?2",
                params![kind.as_str(), attr.0],
            )
            .map_err(|e| TypedGraphError::query(e.to_string()))?;
            Ok(())
        })
    }

    fn new_node(&self, session: SessionId, ty: TypeId) -> Result<Oid, TypedGraphError> {
        self.with_conn(session, |conn| {
            let info = type_row(conn, ty)?;
            if info.object_type != ObjectType::Node {
                return Err(TypedGraphError::invalid_input(format!(
                    "type '{}' is not a node type",
                    info.name
                )));
            }
            conn.execute(
                "INSERT INTO engine_objects(type_id) VALUES(?1)",
                params![ty.0],
            )
            .map_err(|e| TypedGraphError::query(e.to_string()))?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn new_edge(
        &self,
        session: SessionId,
        ty: TypeId,
        tail: Oid,
        head: Oid,
    ) -> Result<Oid, TypedGraphError> {
        self.with_conn(session, |conn| {
            let info = type_row(conn, ty)?;
            if info.object_type != ObjectType::Edge {
                return Err(TypedGraphError::invalid_input(format!(
                    "type '{}' is not an edge type",
                    info.name
                )));
            }
            for endpoint in [tail, head] {
                if object_kind(conn, endpoint)? != Some(ObjectType::Node) {
                    return Err(TypedGraphError::invalid_input(format!(
                        "edge endpoint {endpoint} is not an existing node"
                    )));
                }
            }
            conn.execute(
                "INSERT INTO engine_objects(type_id, tail, head) VALUES(?1, ?2, ?3)",
                params![ty.0, tail, head],
            )
            .map_err(|e| TypedGraphError::query(e.to_string()))?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn object_type(&self, session: SessionId, oid: Oid) -> Result<Option<TypeId>, TypedGraphError> {
        self.with_conn(session, |conn| {
            conn.query_row(
                "SELECT type_id FROM engine_objects WHERE oid=?1",
                params![oid],
                |row| row.get(0),
            )
            .optional()
            .map(|ty| ty.map(TypeId))
            .map_err(|e| TypedGraphError::query(e.to_string()))
        })
    }

    fn edge_data(&self, session: SessionId, edge: Oid) -> Result<EdgeData, TypedGraphError> {
        self.with_conn(session, |conn| {
            conn.query_row(
                "SELECT oid, tail, head FROM engine_objects WHERE oid=?1 AND tail IS NOT NULL",
                params![edge],
                |row| {
                    Ok(EdgeData {
                        edge: row.get(0)?,
                        tail: row.get(1)?,
                        head: row.get(2)?,
                    })
                },
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => {
                    TypedGraphError::not_found(format!("edge {edge}"))
                }
                other => TypedGraphError::query(other.to_string()),
            })
        })
    }

    fn drop_object(&self, session: SessionId, oid: Oid) -> Result<(), TypedGraphError> {
        self.with_conn(session, |conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| TypedGraphError::query(e.to_string()))?;
            let incident = collect_ids(
                &tx,
                "SELECT oid FROM engine_objects WHERE tail=?1 OR head=?1",
                params![oid],
            )?;
            for edge in incident {
                delete_object_row(&tx, edge)?;
            }
            if delete_object_row(&tx, oid)? == 0 {
                return Err(TypedGraphError::not_found(format!("object {oid}")));
            }
            tx.commit()
                .map_err(|e| TypedGraphError::query(e.to_string()))?;
            Ok(())
        })
    }

    fn select_type(&self, session: SessionId, ty: TypeId) -> Result<Objects, TypedGraphError> {
        self.with_conn(session, |conn| {
            self.metrics.record_type_scan();
            let ids = collect_ids(
                conn,
                "SELECT oid FROM engine_objects WHERE type_id=?1 ORDER BY oid",
                params![ty.0],
            )?;
            Ok(Objects::new(ids))
        })
    }

    fn select_value(
        &self,
        session: SessionId,
        attr: AttributeId,
        value: &Value,
    ) -> Result<Objects, TypedGraphError> {
        self.with_conn(session, |conn| {
            let info = attribute_row(conn, attr)?;
            if !info.kind.is_indexed() {
                return Err(TypedGraphError::invalid_input(format!(
                    "attribute '{}' is not indexed",
                    info.name
                )));
            }
            if value.data_type() != info.data_type {
                return Err(TypedGraphError::invalid_input(format!(
                    "attribute '{}' holds {} values, got {}",
                    info.name,
                    info.data_type,
                    value.data_type()
                )));
            }
            self.metrics.record_value_lookup();
            let ids = collect_ids(
                conn,
                "SELECT oid FROM engine_values WHERE attr_id=?1 AND value = ?2 ORDER BY oid",
                params![attr.0, to_sql_value(value)],
            )?;
            Ok(Objects::new(ids))
        })
    }

    fn explode(
        &self,
        session: SessionId,
        node: Oid,
        edge_type: TypeId,
        direction: EdgesDirection,
    ) -> Result<Objects, TypedGraphError> {
        self.with_conn(session, |conn| {
            let sql = match direction {
                EdgesDirection::Outgoing => {
                    "SELECT oid FROM engine_objects WHERE type_id=?1 AND tail=?2 ORDER BY oid"
                }
                EdgesDirection::Ingoing => {
                    "SELECT oid FROM engine_objects WHERE type_id=?1 AND head=?2 ORDER BY oid"
                }
            };
            let ids = collect_ids(conn, sql, params![edge_type.0, node])?;
            Ok(Objects::new(ids))
        })
    }

    fn attribute_value(
        &self,
        session: SessionId,
        oid: Oid,
        attr: AttributeId,
    ) -> Result<Option<Value>, TypedGraphError> {
        self.with_conn(session, |conn| read_value(conn, oid, attr))
    }

    fn set_attribute_value(
        &self,
        session: SessionId,
        oid: Oid,
        attr: AttributeId,
        value: &Value,
    ) -> Result<(), TypedGraphError> {
        self.with_conn(session, |conn| {
            let info = attribute_row(conn, attr)?;
            let owner: Option<i64> = conn
                .query_row(
                    "SELECT type_id FROM engine_objects WHERE oid=?1",
                    params![oid],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| TypedGraphError::query(e.to_string()))?;
            match owner {
                None => return Err(TypedGraphError::not_found(format!("object {oid}"))),
                Some(ty) if ty != info.type_id.0 => {
                    return Err(TypedGraphError::invalid_input(format!(
                        "object {oid} does not belong to the type of attribute '{}'",
                        info.name
                    )));
                }
                Some(_) => {}
            }
            if value.data_type() != info.data_type {
                return Err(TypedGraphError::invalid_input(format!(
                    "attribute '{}' holds {} values, got {}",
                    info.name,
                    info.data_type,
                    value.data_type()
                )));
            }
            if matches!(value, Value::Double(v) if !v.is_finite()) {
                return Err(TypedGraphError::invalid_input(format!(
                    "attribute '{}' can not hold a non-finite double",
                    info.name
                )));
            }
            let sql_value = to_sql_value(value);
            if info.kind == AttributeKind::Unique {
                let taken: Option<i64> = conn
                    .query_row(
                        "SELECT oid FROM engine_values WHERE attr_id=?1 AND value = ?2 AND oid <> ?3",
                        params![attr.0, sql_value, oid],
                        |row| row.get(0),
                    )
                    .optional()
                    .map_err(|e| TypedGraphError::query(e.to_string()))?;
                if let Some(other) = taken {
                    return Err(TypedGraphError::invalid_input(format!(
                        "unique attribute '{}' already holds this value on object {other}",
                        info.name
                    )));
                }
            }
            conn.execute(
                "INSERT INTO engine_values(attr_id, oid, value) VALUES(?1, ?2, ?3) \
                 ON CONFLICT(attr_id, oid) DO UPDATE SET value=excluded.value",
                params![attr.0, oid, sql_value],
            )
            .map_err(|e| TypedGraphError::query(e.to_string()))?;
            Ok(())
        })
    }

    fn remove_attribute_value(
        &self,
        session: SessionId,
        oid: Oid,
        attr: AttributeId,
    ) -> Result<Option<Value>, TypedGraphError> {
        self.with_conn(session, |conn| {
            let previous = read_value(conn, oid, attr)?;
            if previous.is_some() {
                conn.execute(
                    "DELETE FROM engine_values WHERE attr_id=?1 AND oid=?2",
                    params![attr.0, oid],
                )
                .map_err(|e| TypedGraphError::query(e.to_string()))?;
            }
            Ok(previous)
        })
    }

    fn metrics(&self) -> EngineMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn location(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }

    fn close(&self) -> Result<(), TypedGraphError> {
        let mut sessions = self.sessions.lock();
        if !sessions.is_empty() {
            log::warn!(
                "closing engine store with {} open session(s)",
                sessions.len()
            );
            sessions.clear();
        }
        drop(sessions);
        let conn = self.conn.lock().take();
        match conn {
            Some(conn) => conn
                .close()
                .map_err(|(_, e)| TypedGraphError::connection(e.to_string())),
            None => Ok(()),
        }
    }
}

fn collect_ids<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<i64>, TypedGraphError> {
    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| TypedGraphError::query(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| row.get(0))
        .map_err(|e| TypedGraphError::query(e.to_string()))?;
    let mut ids = Vec::new();
    for row in rows {
        ids.push(row.map_err(|e| TypedGraphError::query(e.to_string()))?);
    }
    Ok(ids)
}

fn find_type_id(conn: &Connection, name: &str) -> Result<Option<TypeId>, TypedGraphError> {
    conn.query_row(
        "SELECT id FROM engine_types WHERE name=?1",
        params![name],
        |row| row.get(0),
    )
    .optional()
    .map(|id| id.map(TypeId))
    .map_err(|e| TypedGraphError::query(e.to_string()))
}

fn type_row(conn: &Connection, ty: TypeId) -> Result<TypeInfo, TypedGraphError> {
    let (name, raw_kind): (String, String) = conn
        .query_row(
            "SELECT name, object_type FROM engine_types WHERE id=?1",
            params![ty.0],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|err| match err {
            rusqlite::Error::QueryReturnedNoRows => {
                TypedGraphError::not_found(format!("type {}", ty.0))
            }
            other => TypedGraphError::query(other.to_string()),
        })?;
    let object_type = ObjectType::parse(&raw_kind)
        .ok_or_else(|| TypedGraphError::schema(format!("unknown object type '{raw_kind}'")))?;
    Ok(TypeInfo {
        id: ty,
        name,
        object_type,
    })
}

fn insert_type(
    conn: &Connection,
    name: &str,
    object_type: ObjectType,
    directed: bool,
    neighbors: bool,
) -> Result<TypeId, TypedGraphError> {
    if name.trim().is_empty() {
        return Err(TypedGraphError::invalid_input("type name must be set"));
    }
    if find_type_id(conn, name)?.is_some() {
        return Err(TypedGraphError::already_exists(format!("type '{name}'")));
    }
    conn.execute(
        "INSERT INTO engine_types(name, object_type, directed, neighbors) VALUES(?1, ?2, ?3, ?4)",
        params![name, object_type.as_str(), directed, neighbors],
    )
    .map_err(|e| TypedGraphError::query(e.to_string()))?;
    Ok(TypeId(conn.last_insert_rowid()))
}

fn find_attribute_id(
    conn: &Connection,
    ty: TypeId,
    name: &str,
) -> Result<Option<AttributeId>, TypedGraphError> {
    conn.query_row(
        "SELECT id FROM engine_attributes WHERE type_id=?1 AND name=?2",
        params![ty.0, name],
        |row| row.get(0),
    )
    .optional()
    .map(|id| id.map(AttributeId))
    .map_err(|e| TypedGraphError::query(e.to_string()))
}

fn attribute_row(conn: &Connection, attr: AttributeId) -> Result<AttributeInfo, TypedGraphError> {
    let (type_id, name, raw_data_type, raw_kind): (i64, String, String, String) = conn
        .query_row(
            "SELECT type_id, name, data_type, kind FROM engine_attributes WHERE id=?1",
            params![attr.0],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .map_err(|err| match err {
            rusqlite::Error::QueryReturnedNoRows => {
                TypedGraphError::not_found(format!("attribute {}", attr.0))
            }
            other => TypedGraphError::query(other.to_string()),
        })?;
    let data_type = DataType::parse(&raw_data_type)
        .ok_or_else(|| TypedGraphError::schema(format!("unknown data type '{raw_data_type}'")))?;
    let kind = AttributeKind::parse(&raw_kind)
        .ok_or_else(|| TypedGraphError::schema(format!("unknown attribute kind '{raw_kind}'")))?;
    Ok(AttributeInfo {
        id: attr,
        type_id: TypeId(type_id),
        name,
        data_type,
        kind,
    })
}

fn object_kind(conn: &Connection, oid: Oid) -> Result<Option<ObjectType>, TypedGraphError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT t.object_type FROM engine_objects o \
             JOIN engine_types t ON t.id = o.type_id WHERE o.oid=?1",
            params![oid],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| TypedGraphError::query(e.to_string()))?;
    Ok(raw.as_deref().and_then(ObjectType::parse))
}

fn delete_object_row(conn: &Connection, oid: Oid) -> Result<usize, TypedGraphError> {
    conn.execute("DELETE FROM engine_values WHERE oid=?1", params![oid])
        .map_err(|e| TypedGraphError::query(e.to_string()))?;
    conn.execute("DELETE FROM engine_objects WHERE oid=?1", params![oid])
        .map_err(|e| TypedGraphError::query(e.to_string()))
}

fn read_value(
    conn: &Connection,
    oid: Oid,
    attr: AttributeId,
) -> Result<Option<Value>, TypedGraphError> {
    let row: Option<(SqlValue, String)> = conn
        .query_row(
            "SELECT v.value, a.data_type FROM engine_values v \
             JOIN engine_attributes a ON a.id = v.attr_id \
             WHERE v.attr_id=?1 AND v.oid=?2",
            params![attr.0, oid],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| TypedGraphError::query(e.to_string()))?;
    match row {
        None => Ok(None),
        Some((raw, raw_data_type)) => {
            let data_type = DataType::parse(&raw_data_type).ok_or_else(|| {
                TypedGraphError::schema(format!("unknown data type '{raw_data_type}'"))
            })?;
            from_sql_value(data_type, raw).map(Some)
        }
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Boolean(v) => SqlValue::Integer(i64::from(*v)),
        Value::Integer(v) => SqlValue::Integer(i64::from(*v)),
        Value::Long(v) => SqlValue::Integer(*v),
        Value::Double(v) => SqlValue::Real(*v),
        Value::String(v) => SqlValue::Text(v.clone()),
    }
}

fn from_sql_value(data_type: DataType, raw: SqlValue) -> Result<Value, TypedGraphError> {
    match (data_type, raw) {
        (DataType::Boolean, SqlValue::Integer(v)) => Ok(Value::Boolean(v != 0)),
        (DataType::Integer, SqlValue::Integer(v)) => i32::try_from(v)
            .map(Value::Integer)
            .map_err(|e| TypedGraphError::schema(e.to_string())),
        (DataType::Long, SqlValue::Integer(v)) => Ok(Value::Long(v)),
        (DataType::Double, SqlValue::Real(v)) => Ok(Value::Double(v)),
        (DataType::Double, SqlValue::Integer(v)) => Ok(Value::Double(v as f64)),
        (DataType::String, SqlValue::Text(v)) => Ok(Value::String(v)),
        (data_type, other) => Err(TypedGraphError::schema(format!(
            "stored value {other:?} does not match data type {data_type}"
        ))),
    }
}
