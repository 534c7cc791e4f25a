//! Temporary catalog databases for tests.

use rusqlite::{params, Connection};
use tempfile::TempDir;

use super::store::Catalog;

pub const SCHEMA: &str = "
    CREATE TABLE AMINOACID_SUBSTITUTION_MODELS (
        name TEXT PRIMARY KEY,
        author TEXT,
        publication_date TEXT,
        article TEXT,
        taxonomic_group TEXT,
        matrix_type TEXT,
        comments TEXT
    );
    CREATE TABLE SUBSTITUTION_MATRIX (
        model_id TEXT REFERENCES AMINOACID_SUBSTITUTION_MODELS(name),
        binary_matrix BLOB
    );
";

pub const JTT_MATRIX: &[u8] =
    b"58\n54\t45\n81\t16\t528\n\n0.076748\t0.051691\t0.042645\t0.051544\n";
pub const WAG_MATRIX: &[u8] = b"0.551571\n0.509848 0.635346\n\x00\xffraw\n";

type ModelFixture = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    Option<&'static str>,
);

const MODELS: &[ModelFixture] = &[
    (
        "JTT",
        "Jones DT, Taylor WR, Thornton JM",
        "1992",
        "https://doi.org/10.1093/bioinformatics/8.3.275",
        "general",
        "rate",
        Some("Globular proteins from Swiss-Prot"),
    ),
    (
        "cpREV",
        "Adachi J, Waddell PJ, Martin W, Hasegawa M",
        "2000",
        "https://doi.org/10.1007/s002399910038",
        "chloroplast",
        "rate",
        Some("Chloroplast-encoded proteins"),
    ),
    (
        "WAG",
        "Whelan S, Goldman N",
        "2001",
        "https://doi.org/10.1093/oxfordjournals.molbev.a003851",
        "general",
        "rate",
        Some("Approximate maximum likelihood"),
    ),
    (
        "HIVb",
        "Nickle DC, Heath L, Jensen MA",
        "2007",
        "https://doi.org/10.1371/journal.pone.0000503",
        "viruses",
        "Score",
        None,
    ),
    (
        "LG",
        "Le SQ, Gascuel O",
        "2008",
        "https://doi.org/10.1093/molbev/msn067",
        "general",
        "rate",
        Some("Pfam alignments"),
    ),
    (
        "InsectsMt",
        "Liu Y, Cox CJ, Wang W, Goffinet B",
        "2015-03",
        "https://example.org/insectsmt",
        "Insects",
        "rate",
        Some("Insect mitochondrial proteins"),
    ),
    (
        "mtInv",
        "Le VS, Dang CC, Le SQ",
        "2017",
        "https://doi.org/10.1186/s12862-017-0987-y",
        "insects, invertebrates",
        "rate",
        Some("Invertebrate mitochondrial proteins"),
    ),
];

/// Catalog with seven models:
/// * `JTT`, `cpREV`, `LG`, `HIVb` store TEXT payloads, `WAG` a BLOB
/// * `InsectsMt` has a matrix row whose payload is NULL
/// * `mtInv` has no matrix row at all
/// * `HIVb` has a NULL comment
pub fn sample_catalog() -> (TempDir, Catalog) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();

    for (name, author, date, article, group, kind, comments) in MODELS {
        conn.execute(
            "INSERT INTO AMINOACID_SUBSTITUTION_MODELS VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![name, author, date, article, group, kind, comments],
        )
        .unwrap();
    }

    let text_matrices = [
        ("JTT", std::str::from_utf8(JTT_MATRIX).unwrap()),
        ("cpREV", "105\n227 357\n"),
        ("LG", "0.425093\n0.276818 0.751878\n"),
        ("HIVb", "0.307507\n0.005 0.295543\n"),
    ];
    for (model, text) in text_matrices {
        conn.execute(
            "INSERT INTO SUBSTITUTION_MATRIX (model_id, binary_matrix) VALUES (?1, ?2)",
            params![model, text],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO SUBSTITUTION_MATRIX (model_id, binary_matrix) VALUES (?1, ?2)",
        params!["WAG", WAG_MATRIX],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO SUBSTITUTION_MATRIX (model_id, binary_matrix) VALUES ('InsectsMt', NULL)",
        [],
    )
    .unwrap();

    drop(conn);
    let catalog = Catalog::new(path);
    (dir, catalog)
}
