//! Board records as written to `boards.json` by the position aggregator.
//! Each record is one averaged evaluation table for a piece under a condition
//! (e.g. "white rook" with "Number of Enemies" = 3).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Extension appended to every output name.
pub const IMAGE_EXTENSION: &str = "png";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BoardRecord {
    #[serde(rename = "Piece")]
    pub piece: String,
    #[serde(rename = "Condition")]
    pub condition: String,
    #[serde(rename = "ConditionValue")]
    pub condition_value: ConditionValue,
    #[serde(rename = "Board")]
    pub board: Vec<f64>,
    /// Number of positions averaged into `board`, when the producer recorded it.
    #[serde(rename = "NumCases", default)]
    pub num_cases: Option<i64>,
}

/// Scalar attached to a condition. Printed verbatim in output names.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Number(n) => write!(f, "{}", n),
            ConditionValue::Text(s) => f.write_str(s),
        }
    }
}

impl BoardRecord {
    /// Output file name: `<Piece>_<condition>_<value>.png`, where spaces are
    /// stripped from the piece and the condition is also lower-cased.
    pub fn output_file_name(&self) -> String {
        format!(
            "{}_{}_{}.{}",
            self.piece.replace(' ', ""),
            self.condition.to_lowercase().replace(' ', ""),
            self.condition_value,
            IMAGE_EXTENSION
        )
    }
}

/// Parses a JSON array of records. A record missing any field fails the whole load.
pub fn records_from_reader<R: Read>(reader: R) -> Result<Vec<BoardRecord>> {
    serde_json::from_reader(reader).context("Failed to decode board records")
}

/// Loads every record from a JSON file such as `boards.json`.
pub fn load_records(path: &Path) -> Result<Vec<BoardRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open board file {}", path.display()))?;
    records_from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid board file {}", path.display()))
}
