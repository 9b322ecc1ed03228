//! JSON profiles: a saved set of `DoughInputs`.

use dough_core::DoughInputs;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid profile JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize profile: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write profile {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub fn load(path: &Path) -> Result<DoughInputs, ProfileError> {
    let txt = fs::read_to_string(path).map_err(|source| ProfileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| ProfileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save(path: &Path, inputs: &DoughInputs) -> Result<(), ProfileError> {
    let txt = serde_json::to_string_pretty(inputs)?;
    fs::write(path, txt).map_err(|source| ProfileError::Write {
        path: path.to_path_buf(),
        source,
    })
}
