//! Level records and their match history.
//!
//! A level document is an arbitrary JSON object. Only the `history` array is
//! interpreted here; every other field is carried through untouched so puzzle
//! definitions survive a load/persist cycle.

use crate::error::{CatalogError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Document field holding the match history array.
pub const HISTORY_FIELD: &str = "history";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        matches!(self, Outcome::Won)
    }
}

impl From<bool> for Outcome {
    fn from(won: bool) -> Self {
        if won { Outcome::Won } else { Outcome::Lost }
    }
}

/// One finished play-through. Serialized as
/// `{"won": bool, "moves": n, "date": "<rfc3339>", "elapsedSeconds": n}`.
/// Dates without an offset are read as UTC.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    #[serde(rename = "won", with = "outcome_flag")]
    outcome: Outcome,
    moves: u32,
    #[serde(deserialize_with = "match_date::deserialize")]
    date: DateTime<Utc>,
    #[serde(rename = "elapsedSeconds")]
    elapsed_seconds: u64,
}

impl MatchEntry {
    pub fn new(outcome: Outcome, moves: u32, date: DateTime<Utc>, elapsed_seconds: u64) -> Self {
        Self {
            outcome,
            moves,
            date,
            elapsed_seconds,
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }
}

mod outcome_flag {
    use super::Outcome;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(outcome: &Outcome, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(outcome.is_win())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Outcome, D::Error> {
        bool::deserialize(deserializer).map(Outcome::from)
    }
}

mod match_date {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(date) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(date.with_timezone(&Utc));
        }
        raw.parse::<NaiveDateTime>()
            .map(|naive| naive.and_utc())
            .map_err(|err| D::Error::custom(format!("invalid match date '{raw}': {err}")))
    }
}

/// Serialized shape of a level file.
#[derive(Serialize)]
struct LevelDocument<'a> {
    #[serde(flatten)]
    payload: &'a Map<String, Value>,
    history: &'a [MatchEntry],
}

/// A level loaded from the store, keyed by the file it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelRecord {
    path: PathBuf,
    payload: Map<String, Value>,
    history: Vec<MatchEntry>,
}

impl LevelRecord {
    /// Build a record from an already-parsed document.
    ///
    /// The document must be an object. A missing `history` is treated as empty;
    /// a present but malformed one is rejected.
    pub fn from_document(path: impl Into<PathBuf>, document: Value) -> Result<Self> {
        let path = path.into();
        let Value::Object(mut payload) = document else {
            return Err(CatalogError::malformed(&path, "level document must be a JSON object"));
        };

        let history = match payload.remove(HISTORY_FIELD) {
            None | Some(Value::Null) => Vec::new(),
            Some(raw @ Value::Array(_)) => {
                serde_json::from_value(raw).map_err(|source| CatalogError::Parse {
                    path: path.clone(),
                    source,
                })?
            }
            Some(_) => {
                return Err(CatalogError::malformed(
                    &path,
                    format!("'{HISTORY_FIELD}' must be an array"),
                ));
            }
        };

        Ok(Self {
            path,
            payload,
            history,
        })
    }

    /// Read and parse a level file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| CatalogError::io("reading", path, err))?;
        let document: Value = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_document(path, document)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File stem of the source path; how bundled blobs were named.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Puzzle-specific fields, without `history`.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn history(&self) -> &[MatchEntry] {
        &self.history
    }

    /// Append to the in-memory history. Does not touch disk.
    pub fn append_match(
        &mut self,
        outcome: Outcome,
        moves: u32,
        date: DateTime<Utc>,
        elapsed_seconds: u64,
    ) -> &MatchEntry {
        self.history.push(MatchEntry::new(outcome, moves, date, elapsed_seconds));
        &self.history[self.history.len() - 1]
    }

    fn document(&self) -> LevelDocument<'_> {
        LevelDocument {
            payload: &self.payload,
            history: &self.history,
        }
    }

    /// Full document: payload fields plus `history`.
    pub fn to_document(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self.document())
    }

    /// Overwrite the source file with the current state.
    ///
    /// Writes a sibling temp file and renames it over the target, so a failed
    /// write leaves the previous content in place.
    pub fn persist(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|err| CatalogError::io("creating temp file in", dir, err))?;

        // Temp files are created 0600; keep the mode the level file already had.
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|err| CatalogError::io("setting permissions on", &self.path, err))?;
        }

        serde_json::to_writer_pretty(&mut tmp, &self.document())
            .map_err(|err| CatalogError::io("writing", &self.path, err.into()))?;
        tmp.write_all(b"\n")
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|err| CatalogError::io("writing", &self.path, err))?;

        tmp.persist(&self.path)
            .map_err(|err| CatalogError::io("replacing", &self.path, err.error))?;
        Ok(())
    }
}
