use super::error::CatalogResult;
use super::model::{Filters, SortField};

// ---------------------------------------------------------------------------
// Query builder: filters + sort field → SQL text and bound parameters
// ---------------------------------------------------------------------------

const SELECT_MODELS: &str = "SELECT name, author, publication_date, article, \
     taxonomic_group, matrix_type, comments \
     FROM AMINOACID_SUBSTITUTION_MODELS";

/// A ready-to-run statement. User input only ever lives in `params`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// Build the model listing query.
///
/// Every non-empty filter adds one `AND` predicate, with the value bound
/// exactly as typed (no trimming):
/// * `year` → prefix match on the stored publication date
/// * all others → case-insensitive substring match on the column, folded
///   with the Unicode-aware `ulower` function registered by
///   [`Catalog`](super::store::Catalog)
///
/// `sort_by` must be one of the [`SortField`] names, otherwise
/// [`CatalogError::InvalidSort`](super::error::CatalogError::InvalidSort)
/// is returned before any SQL is produced.
pub fn build_query(filters: &Filters, sort_by: &str) -> CatalogResult<BuiltQuery> {
    let sort: SortField = sort_by.parse()?;

    let mut predicates: Vec<&'static str> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    let substring_filters = [
        ("ulower(author) LIKE ? ESCAPE '\\'", &filters.author),
        ("ulower(name) LIKE ? ESCAPE '\\'", &filters.name),
        ("ulower(taxonomic_group) LIKE ? ESCAPE '\\'", &filters.taxonomic_group),
        ("ulower(matrix_type) LIKE ? ESCAPE '\\'", &filters.matrix_type),
        ("ulower(comments) LIKE ? ESCAPE '\\'", &filters.comments),
    ];

    for (predicate, value) in substring_filters {
        if value.is_empty() {
            continue;
        }
        predicates.push(predicate);
        params.push(format!("%{}%", escape_like(&value.to_lowercase())));
    }

    if !filters.year.is_empty() {
        predicates.push("publication_date LIKE ? ESCAPE '\\'");
        params.push(format!("{}%", escape_like(&filters.year)));
    }

    let mut sql = String::from(SELECT_MODELS);
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }
    sql.push_str(" ORDER BY ");
    sql.push_str(sort.order_expr());
    sql.push_str(" ASC, name ASC");

    Ok(BuiltQuery { sql, params })
}

/// Escape LIKE metacharacters so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::CatalogError;

    #[test]
    fn no_filters_selects_everything() {
        let q = build_query(&Filters::default(), "Name").unwrap();
        assert!(!q.sql.contains("WHERE"));
        assert!(q.sql.ends_with("ORDER BY ulower(name) ASC, name ASC"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn filters_become_bound_parameters() {
        let filters = Filters {
            author: "Jones".into(),
            year: "1992".into(),
            taxonomic_group: "' OR 1=1 --".into(),
            ..Filters::default()
        };
        let q = build_query(&filters, "PublicationDate").unwrap();

        assert_eq!(q.sql.matches('?').count(), 3);
        assert!(!q.sql.contains("Jones"));
        assert!(!q.sql.contains("OR 1=1"));
        assert_eq!(
            q.params,
            vec!["%jones%".to_string(), "%' or 1=1 --%".to_string(), "1992%".to_string()]
        );
        assert!(q.sql.contains("ORDER BY publication_date ASC"));
    }

    #[test]
    fn only_empty_filters_are_omitted() {
        let filters = Filters {
            comments: "".into(),
            ..Filters::default()
        };
        let q = build_query(&filters, "Author").unwrap();
        assert!(!q.sql.contains("WHERE"));
        assert!(q.sql.contains("ORDER BY ulower(author)"));
    }

    #[test]
    fn surrounding_whitespace_is_kept_in_the_bound_value() {
        let filters = Filters {
            matrix_type: "rate ".into(),
            year: " 1992".into(),
            ..Filters::default()
        };
        let q = build_query(&filters, "Name").unwrap();
        assert_eq!(q.params, vec!["%rate %".to_string(), " 1992%".to_string()]);
    }

    #[test]
    fn filter_values_fold_non_ascii_case() {
        let filters = Filters {
            author: "PÉREZ".into(),
            ..Filters::default()
        };
        let q = build_query(&filters, "Name").unwrap();
        assert!(q.sql.contains("ulower(author) LIKE ?"));
        assert_eq!(q.params, vec!["%pérez%".to_string()]);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        let filters = Filters {
            name: "50%_x\\".into(),
            ..Filters::default()
        };
        let q = build_query(&filters, "Name").unwrap();
        assert_eq!(q.params, vec!["%50\\%\\_x\\\\%".to_string()]);
    }

    #[test]
    fn invalid_sort_fails_before_building() {
        let err = build_query(&Filters::default(), "\"name\"; DROP TABLE x").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSort(_)));
    }
}
