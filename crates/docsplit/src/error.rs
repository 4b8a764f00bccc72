// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Error types for document splitting
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed source document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: crate::document::ParseError,
    },

    #[error("No naming field found for element {index} of {}", list.display())]
    Unnamed { list: PathBuf, index: usize },

    #[error("Row {index} of collection {} has no key field '{field}'", collection.display())]
    MissingKey {
        collection: PathBuf,
        index: usize,
        field: String,
    },

    #[error("Name '{name}' resolved more than once in {}", dir.display())]
    DuplicateName { dir: PathBuf, name: String },

    #[error("Entry already exists: {}", path.display())]
    Collision { path: PathBuf },

    #[error("Name '{name}' is not a valid directory name in {}", dir.display())]
    InvalidName { dir: PathBuf, name: String },

    #[error("Output directory is not empty: {}", path.display())]
    OutputNotEmpty { path: PathBuf },

    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Invalid profile: {message}")]
    Config { message: String },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn collision<P: AsRef<Path>>(path: P) -> Self {
        Error::Collision {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

/// Attach a path to a raw `std::io::Error`.
pub(crate) trait IoContext<T> {
    fn at_path<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at_path<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_io_context_keeps_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(ErrorKind::NotFound, "gone"));
        let err = result.at_path("/out/body.txt").unwrap_err();
        assert!(err.to_string().contains("/out/body.txt"));
    }

    #[test]
    fn test_duplicate_name_message() {
        let err = Error::DuplicateName {
            dir: PathBuf::from("Items"),
            name: "X".to_string(),
        };
        assert_eq!(err.to_string(), "Name 'X' resolved more than once in Items");
    }
}
