use std::path::{Path, PathBuf};

use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags, OptionalExtension};

use super::error::{CatalogError, CatalogResult};
use super::model::{FilterOptions, Filters, MatrixView, ModelRow, Reference};
use super::query::build_query;

// ---------------------------------------------------------------------------
// Catalog – read-only access to the model database
// ---------------------------------------------------------------------------

/// Handle on the SQLite catalog file.
///
/// No connection is held between calls: each operation opens a read-only
/// connection, runs one statement and drops the connection on return.
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
}

impl Catalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Catalog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> CatalogResult<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| CatalogError::StorageUnavailable {
            path: self.path.clone(),
            source,
        })?;
        register_ulower(&conn)?;
        Ok(conn)
    }

    /// Rows matching all non-empty `filters`, ordered by `sort_by`.
    pub fn query_models(&self, filters: &Filters, sort_by: &str) -> CatalogResult<Vec<ModelRow>> {
        let query = build_query(filters, sort_by)?;
        log::debug!("model query: {}", query.sql);

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&query.sql).map_err(|e| self.classify(e))?;
        let rows = stmt
            .query_map(params_from_iter(query.params.iter()), |row| {
                let name: String = row.get(0)?;
                let author = text_or_empty(row.get(1)?);
                let publication_date = text_or_empty(row.get(2)?);
                let article = text_or_empty(row.get(3)?);
                Ok(ModelRow {
                    name,
                    reference: Reference::new(&author, &publication_date, &article),
                    taxonomic_group: text_or_empty(row.get(4)?),
                    matrix_type: text_or_empty(row.get(5)?),
                    comments: text_or_empty(row.get(6)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("model query returned {} rows", rows.len());
        Ok(rows)
    }

    /// Distinct taxonomic groups and matrix types for the filter dropdowns.
    pub fn filter_options(&self) -> CatalogResult<FilterOptions> {
        Ok(FilterOptions {
            taxonomic_groups: self.distinct_values("taxonomic_group")?,
            matrix_types: self.distinct_values("matrix_type")?,
        })
    }

    /// `column` is always one of our own literals, never user input.
    fn distinct_values(&self, column: &'static str) -> CatalogResult<Vec<String>> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT DISTINCT {column} FROM AMINOACID_SUBSTITUTION_MODELS \
             WHERE {column} IS NOT NULL ORDER BY ulower({column})"
        );
        let mut stmt = conn.prepare(&sql).map_err(|e| self.classify(e))?;
        let mut values = vec![String::new()];
        for value in stmt.query_map([], |row| row.get::<_, String>(0))? {
            values.push(value?);
        }
        Ok(values)
    }

    /// Raw stored matrix payload for `model`, or `None` if there is no row
    /// or the payload is NULL. TEXT and BLOB storage are both accepted.
    pub fn fetch_matrix(&self, model: &str) -> CatalogResult<Option<Vec<u8>>> {
        let conn = self.connect()?;
        fetch_matrix_with(&conn, model)
    }

    /// Matrix content prepared for on-screen display.
    pub fn matrix_view(&self, model: &str) -> CatalogResult<MatrixView> {
        let payload = self.fetch_matrix(model)?;
        if payload.as_deref().map_or(true, <[u8]>::is_empty) {
            log::warn!("no matrix stored for model {model}");
        }
        Ok(MatrixView::from_payload(payload.as_deref()))
    }

    /// Run `f` with a single read-only connection (used for multi-row reads
    /// such as archive export).
    pub(crate) fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> CatalogResult<T>,
    ) -> CatalogResult<T> {
        let conn = self.connect()?;
        f(&conn)
    }

    /// A file that opens but is not a catalog reports as unavailable storage.
    fn classify(&self, err: rusqlite::Error) -> CatalogError {
        let unavailable = matches!(
            &err,
            rusqlite::Error::SqliteFailure(failure, _)
                if matches!(
                    failure.code,
                    rusqlite::ErrorCode::NotADatabase | rusqlite::ErrorCode::CannotOpen
                )
        );
        if unavailable {
            CatalogError::StorageUnavailable {
                path: self.path.clone(),
                source: err,
            }
        } else {
            CatalogError::Query(err)
        }
    }
}

pub(crate) fn fetch_matrix_with(conn: &Connection, model: &str) -> CatalogResult<Option<Vec<u8>>> {
    let payload = conn
        .query_row(
            "SELECT binary_matrix FROM SUBSTITUTION_MATRIX WHERE model_id = ?1",
            [model],
            |row| {
                Ok(match row.get_ref(0)? {
                    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(bytes.to_vec()),
                    ValueRef::Null => None,
                    ValueRef::Integer(i) => Some(i.to_string().into_bytes()),
                    ValueRef::Real(f) => Some(f.to_string().into_bytes()),
                })
            },
        )
        .optional()?;
    Ok(payload.flatten())
}

/// `ulower(x)`: Unicode lowercase of a text value. SQLite's built-in
/// `lower()` only folds ASCII, so `É` would never match `é`.
fn register_ulower(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "ulower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            Ok(match ctx.get_raw(0) {
                ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).to_lowercase()),
                ValueRef::Null => None,
                ValueRef::Integer(i) => Some(i.to_string()),
                ValueRef::Real(f) => Some(f.to_string()),
                ValueRef::Blob(bytes) => Some(String::from_utf8_lossy(bytes).to_lowercase()),
            })
        },
    )
}

fn text_or_empty(value: Option<String>) -> String {
    value.unwrap_or_default()
}
