use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::error::CatalogResult;
use super::model::{ModelRecord, ModelRow};
use super::store::{fetch_matrix_with, Catalog};

/// File name proposed when saving the matrix archive.
pub const ARCHIVE_FILE_NAME: &str = "matrices_selected.zip";

/// File name proposed when saving the table as CSV.
pub const TABLE_FILE_NAME: &str = "models.csv";

/// Archive entry name for a model's matrix.
pub fn entry_name(model: &str) -> String {
    format!("{model}_matrix.txt")
}

/// Result of packaging the selected matrices.
#[derive(Debug)]
pub struct MatrixArchive {
    /// Complete ZIP file contents.
    pub bytes: Vec<u8>,
    /// Models that got an entry, in selection order.
    pub written: Vec<String>,
    /// Models skipped because no matrix is stored for them.
    pub skipped: Vec<String>,
}

/// Package the stored matrices of `models` into an in-memory ZIP archive.
///
/// Each model with a stored payload becomes a deflated entry
/// `<name>_matrix.txt` holding the payload bytes unchanged. Models without a
/// payload are left out of the archive.
pub fn build_matrix_archive(catalog: &Catalog, models: &[String]) -> CatalogResult<MatrixArchive> {
    catalog.with_connection(|conn| {
        let mut written = Vec::new();
        let mut skipped = Vec::new();

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut cursor);
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

            for model in models {
                match fetch_matrix_with(conn, model)? {
                    Some(payload) => {
                        zip.start_file(entry_name(model), options)?;
                        zip.write_all(&payload)?;
                        written.push(model.clone());
                    }
                    None => {
                        log::warn!("skipping {model}: no matrix stored");
                        skipped.push(model.clone());
                    }
                }
            }

            zip.finish()?;
        }

        log::info!(
            "built matrix archive with {} entries ({} skipped)",
            written.len(),
            skipped.len()
        );
        Ok(MatrixArchive {
            bytes: cursor.into_inner(),
            written,
            skipped,
        })
    })
}

/// Write the listed rows as CSV (one header row, then one record per model).
pub fn write_table_csv<W: Write>(rows: &[ModelRow], writer: W) -> anyhow::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for row in rows {
        out.serialize(ModelRecord::from(row))?;
    }
    out.flush()?;
    Ok(())
}
