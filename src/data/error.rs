use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the catalog layer.
///
/// A model without a stored matrix is not an error; see
/// [`MatrixView::Missing`](super::model::MatrixView::Missing).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(
        "unrecognized sort field '{0}' (expected one of Name, Author, PublicationDate, TaxonomicGroup, MatrixType)"
    )]
    InvalidSort(String),

    #[error("catalog database {} is unavailable: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("catalog query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("failed to build matrix archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
