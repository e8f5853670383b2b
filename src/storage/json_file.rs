use super::{FileFormat, StorageError};
use crate::movie::Collection;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// JSON object keyed by title, pretty-printed with a trailing newline.
#[derive(Debug)]
pub struct JsonFormat;

impl FileFormat for JsonFormat {
    fn load(path: &Path) -> Result<Collection, StorageError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Collection::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    fn save(path: &Path, movies: &Collection) -> Result<(), StorageError> {
        let mut text = serde_json::to_string_pretty(movies).map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        text.push('\n');

        fs::write(path, text).map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
