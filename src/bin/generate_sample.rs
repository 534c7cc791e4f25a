//! Writes a small demo catalog (`models.db` by default) with the same schema
//! the browser reads. Matrices are synthetic: real values come from the
//! curated database, not from this tool.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rusqlite::{params, Connection};

const SCHEMA: &str = "
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

const AMINO_ACIDS: usize = 20;

struct SampleModel {
    name: &'static str,
    author: &'static str,
    date: &'static str,
    article: &'static str,
    group: &'static str,
    matrix_type: &'static str,
    comments: &'static str,
    has_matrix: bool,
}

const MODELS: &[SampleModel] = &[
    SampleModel {
        name: "JTT",
        author: "Jones DT, Taylor WR, Thornton JM",
        date: "1992",
        article: "https://doi.org/10.1093/bioinformatics/8.3.275",
        group: "general",
        matrix_type: "rate",
        comments: "Globular proteins",
        has_matrix: true,
    },
    SampleModel {
        name: "BLOSUM62",
        author: "Henikoff S, Henikoff JG",
        date: "1992-11",
        article: "https://doi.org/10.1073/pnas.89.22.10915",
        group: "general",
        matrix_type: "score",
        comments: "Conserved blocks, 62% identity clustering",
        has_matrix: true,
    },
    SampleModel {
        name: "mtREV",
        author: "Adachi J, Hasegawa M",
        date: "1996",
        article: "https://doi.org/10.1007/BF02498640",
        group: "vertebrates",
        matrix_type: "rate",
        comments: "Mitochondrial proteins",
        has_matrix: true,
    },
    SampleModel {
        name: "WAG",
        author: "Whelan S, Goldman N",
        date: "2001",
        article: "https://doi.org/10.1093/oxfordjournals.molbev.a003851",
        group: "general",
        matrix_type: "rate",
        comments: "Symmetric exchangeabilities",
        has_matrix: true,
    },
    SampleModel {
        name: "LG",
        author: "Le SQ, Gascuel O",
        date: "2008",
        article: "https://doi.org/10.1093/molbev/msn067",
        group: "general",
        matrix_type: "rate",
        comments: "Pfam alignments",
        has_matrix: true,
    },
    SampleModel {
        name: "mtInv",
        author: "Le VS, Dang CC, Le SQ",
        date: "2017",
        article: "https://doi.org/10.1186/s12862-017-0987-y",
        group: "insects",
        matrix_type: "rate",
        comments: "Invertebrate mitochondrial proteins",
        has_matrix: false,
    },
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Lower-triangular exchangeabilities, tab separated, followed by a blank
/// line and twenty equilibrium frequencies that sum to one.
fn rate_matrix(rng: &mut SimpleRng) -> String {
    let mut out = String::new();
    for i in 1..AMINO_ACIDS {
        let row: Vec<String> = (0..i)
            .map(|_| format!("{:.6}", rng.next_f64() * 5.0))
            .collect();
        let _ = writeln!(out, "{}", row.join("\t"));
    }
    out.push('\n');

    let raw: Vec<f64> = (0..AMINO_ACIDS).map(|_| 0.5 + rng.next_f64()).collect();
    let total: f64 = raw.iter().sum();
    let freqs: Vec<String> = raw.iter().map(|f| format!("{:.6}", f / total)).collect();
    let _ = writeln!(out, "{}", freqs.join("\t"));
    out
}

/// Full square integer score matrix, space separated.
fn score_matrix(rng: &mut SimpleRng) -> String {
    let mut out = String::new();
    for i in 0..AMINO_ACIDS {
        let row: Vec<String> = (0..AMINO_ACIDS)
            .map(|j| {
                let score = if i == j {
                    4 + (rng.next_u64() % 8) as i64
                } else {
                    (rng.next_u64() % 7) as i64 - 4
                };
                format!("{score:>3}")
            })
            .collect();
        let _ = writeln!(out, "{}", row.join(" "));
    }
    out
}

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "Write a demo substitution-model catalog", long_about = None)]
struct Cli {
    /// Database file to create; must not exist yet.
    #[arg(default_value = "models.db")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let output_path = Cli::parse().output;

    if output_path.exists() {
        bail!(
            "{} already exists; remove it or pass another path",
            output_path.display()
        );
    }

    let mut conn = Connection::open(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    conn.execute_batch(SCHEMA).context("creating schema")?;

    let mut rng = SimpleRng::new(42);
    let tx = conn.transaction()?;
    for model in MODELS {
        tx.execute(
            "INSERT INTO AMINOACID_SUBSTITUTION_MODELS VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                model.name,
                model.author,
                model.date,
                model.article,
                model.group,
                model.matrix_type,
                model.comments
            ],
        )
        .with_context(|| format!("inserting model {}", model.name))?;

        if !model.has_matrix {
            continue;
        }
        let matrix = match model.matrix_type {
            "score" => score_matrix(&mut rng),
            _ => rate_matrix(&mut rng),
        };
        tx.execute(
            "INSERT INTO SUBSTITUTION_MATRIX (model_id, binary_matrix) VALUES (?1, ?2)",
            params![model.name, matrix.as_bytes()],
        )
        .with_context(|| format!("inserting matrix for {}", model.name))?;
    }
    tx.commit()?;

    println!(
        "Wrote {} models to {}",
        MODELS.len(),
        output_path.display()
    );
    Ok(())
}
