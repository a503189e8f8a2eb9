//! Scalar replay sequences for stochastic collocation runs.
//!
//! Collocation workflows replace fresh random draws with a prescribed,
//! reproducible sequence of values read from a flat file (one value consumed
//! per simulated event). The [`ScalarSequence`] trait abstracts that input so
//! the generator never touches file paths directly and tests can substitute
//! canned sequences.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default replay file for pitch angles (degrees, one value per event).
pub const PITCH_ANGLE_FILE: &str = "pitchAngleFile.csv";

/// Default replay file for kinetic energies (keV, one value per event).
pub const ENERGY_FILE: &str = "energyFile.csv";

/// Errors from reading a replay sequence.
#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("Failed to read replay file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Replay file '{path}' contains unparsable token '{token}'")]
    Parse { path: PathBuf, token: String },

    #[error("Replay sequence '{name}' exhausted after {consumed} values")]
    Exhausted { name: String, consumed: usize },
}

/// A source of scalar values, one per generated event.
pub trait ScalarSequence {
    /// Produce the next value, failing once the sequence runs out.
    fn next_value(&mut self) -> Result<f64, SequenceError>;
}

/// Replay sequence backed by a whitespace-delimited numeric file.
///
/// The file is read and parsed eagerly at open time, so malformed content is
/// reported before the run starts rather than partway through event
/// generation.
#[derive(Debug)]
pub struct FileSequence {
    path: PathBuf,
    values: Vec<f64>,
    cursor: usize,
}

impl FileSequence {
    /// Open and parse a replay file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SequenceError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|source| SequenceError::Io {
            path: path.clone(),
            source,
        })?;

        let mut values = Vec::new();
        for token in content.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| SequenceError::Parse {
                path: path.clone(),
                token: token.to_string(),
            })?;
            values.push(value);
        }

        log::debug!("Replay file '{}': {} values", path.display(), values.len());

        Ok(Self {
            path,
            values,
            cursor: 0,
        })
    }

    /// Number of values remaining.
    pub fn remaining(&self) -> usize {
        self.values.len() - self.cursor
    }
}

impl ScalarSequence for FileSequence {
    fn next_value(&mut self) -> Result<f64, SequenceError> {
        let value = self
            .values
            .get(self.cursor)
            .copied()
            .ok_or_else(|| SequenceError::Exhausted {
                name: self.path.display().to_string(),
                consumed: self.cursor,
            })?;
        self.cursor += 1;
        Ok(value)
    }
}

/// In-memory replay sequence, mainly for tests and programmatic drivers.
#[derive(Debug, Clone)]
pub struct VecSequence {
    name: String,
    values: Vec<f64>,
    cursor: usize,
}

impl VecSequence {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            cursor: 0,
        }
    }
}

impl ScalarSequence for VecSequence {
    fn next_value(&mut self) -> Result<f64, SequenceError> {
        let value = self
            .values
            .get(self.cursor)
            .copied()
            .ok_or_else(|| SequenceError::Exhausted {
                name: self.name.clone(),
                consumed: self.cursor,
            })?;
        self.cursor += 1;
        Ok(value)
    }
}
