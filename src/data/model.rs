use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::CatalogError;

// ---------------------------------------------------------------------------
// SortField – the column the result table is ordered by
// ---------------------------------------------------------------------------

/// Recognised sort fields, in the order they are offered in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Author,
    PublicationDate,
    TaxonomicGroup,
    MatrixType,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Name,
        SortField::Author,
        SortField::PublicationDate,
        SortField::TaxonomicGroup,
        SortField::MatrixType,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Author => "Author",
            SortField::PublicationDate => "PublicationDate",
            SortField::TaxonomicGroup => "TaxonomicGroup",
            SortField::MatrixType => "MatrixType",
        }
    }

    /// ORDER BY expression. Text columns sort case-insensitively (Unicode
    /// `ulower`), the date column sorts on the stored string.
    pub(crate) fn order_expr(self) -> &'static str {
        match self {
            SortField::Name => "ulower(name)",
            SortField::Author => "ulower(author)",
            SortField::PublicationDate => "publication_date",
            SortField::TaxonomicGroup => "ulower(taxonomic_group)",
            SortField::MatrixType => "ulower(matrix_type)",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CatalogError::InvalidSort(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Filters – the six optional text inputs
// ---------------------------------------------------------------------------

/// Free-text filters as typed by the user. Empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub author: String,
    pub name: String,
    pub year: String,
    pub taxonomic_group: String,
    pub matrix_type: String,
    pub comments: String,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        [
            &self.author,
            &self.name,
            &self.year,
            &self.taxonomic_group,
            &self.matrix_type,
            &self.comments,
        ]
        .iter()
        .all(|f| f.is_empty())
    }
}

// ---------------------------------------------------------------------------
// ModelRow – one listed substitution model
// ---------------------------------------------------------------------------

/// Citation built from author, publication date and article URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// `"<author> (<publication date>)"`
    pub label: String,
    pub url: String,
}

impl Reference {
    pub fn new(author: &str, publication_date: &str, url: &str) -> Self {
        Reference {
            label: format!("{author} ({publication_date})"),
            url: url.to_string(),
        }
    }
}

/// Projection of a catalog row as displayed in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRow {
    pub name: String,
    pub matrix_type: String,
    pub taxonomic_group: String,
    pub comments: String,
    pub reference: Reference,
}

/// Flat record used for the CSV table export.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModelRecord<'a> {
    pub name: &'a str,
    pub matrix_type: &'a str,
    pub taxonomic_group: &'a str,
    pub comments: &'a str,
    pub reference: &'a str,
    pub url: &'a str,
}

impl<'a> From<&'a ModelRow> for ModelRecord<'a> {
    fn from(row: &'a ModelRow) -> Self {
        ModelRecord {
            name: &row.name,
            matrix_type: &row.matrix_type,
            taxonomic_group: &row.taxonomic_group,
            comments: &row.comments,
            reference: &row.reference.label,
            url: &row.reference.url,
        }
    }
}

/// Dropdown choices, each list starting with `""` ("no filter").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub taxonomic_groups: Vec<String>,
    pub matrix_types: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            taxonomic_groups: vec![String::new()],
            matrix_types: vec![String::new()],
        }
    }
}

// ---------------------------------------------------------------------------
// MatrixView – what the per-row expander shows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixView {
    /// Display text with tabs already expanded.
    Text(String),
    /// No matrix row, or an empty payload.
    Missing,
}

impl MatrixView {
    pub fn from_payload(payload: Option<&[u8]>) -> Self {
        match payload {
            Some(bytes) if !bytes.is_empty() => MatrixView::Text(display_matrix_text(bytes)),
            _ => MatrixView::Missing,
        }
    }
}

const TAB_WIDTH: usize = 8;

/// Render a stored payload for on-screen display: lossy UTF-8, tabs expanded
/// to the next multiple of eight columns. Exports never go through this.
pub fn display_matrix_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = TAB_WIDTH - column % TAB_WIDTH;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}
