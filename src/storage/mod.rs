// Storage layer: the contract every backend satisfies plus the two
// file-backed implementations. A backend loads its whole file once when it
// is opened and rewrites it after every successful mutation.
//
// Both backends are `FileStorage` over a `FileFormat`; the format only knows
// how to read and write a whole collection.

use crate::movie::{Collection, Movie, Outcome};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod csv_file;
mod json_file;

pub use csv_file::CsvFormat;
pub use json_file::JsonFormat;

/// Movie store backed by a pretty-printed JSON object keyed by title.
pub type JsonStorage = FileStorage<JsonFormat>;

/// Movie store backed by a CSV file with a `title,year,rating,poster` header.
pub type CsvStorage = FileStorage<CsvFormat>;

/// Failures reading or writing the backing file. A file that does not exist
/// yet is not an error: it loads as an empty collection.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid movie file", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error in {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// The operations the application needs from a movie store, independent of
/// the file format behind it.
pub trait Storage {
    /// The current in-memory collection.
    fn list(&self) -> &Collection;

    /// Adds `movie` unless its title is taken. Persists on success.
    fn add(&mut self, movie: Movie) -> Result<Outcome, StorageError>;

    /// Removes the movie called `title`. Persists on success.
    fn delete(&mut self, title: &str) -> Result<Outcome, StorageError>;

    /// Replaces the rating of `title`. Persists on success.
    fn update(&mut self, title: &str, rating: f64) -> Result<Outcome, StorageError>;
}

/// Whole-file encoding of a collection.
pub trait FileFormat {
    /// Reads `path`. A missing file is an empty collection.
    fn load(path: &Path) -> Result<Collection, StorageError>;

    /// Rewrites `path` with `movies`. The parent directory exists.
    fn save(path: &Path, movies: &Collection) -> Result<(), StorageError>;
}

/// A collection held in memory and mirrored to one file in format `F`.
#[derive(Debug)]
pub struct FileStorage<F> {
    path: PathBuf,
    movies: Collection,
    format: PhantomData<F>,
}

impl<F: FileFormat> FileStorage<F> {
    /// Loads `path` into memory. A missing file starts an empty collection.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let movies = F::load(&path)?;
        log::debug!("loaded {} movies from {}", movies.len(), path.display());
        Ok(FileStorage {
            path,
            movies,
            format: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist_if(&self, outcome: Outcome) -> Result<Outcome, StorageError> {
        if outcome.is_applied() {
            ensure_parent(&self.path)?;
            F::save(&self.path, &self.movies)?;
            log::debug!("saved {} movies to {}", self.movies.len(), self.path.display());
        }
        Ok(outcome)
    }
}

impl<F: FileFormat> Storage for FileStorage<F> {
    fn list(&self) -> &Collection {
        &self.movies
    }

    fn add(&mut self, movie: Movie) -> Result<Outcome, StorageError> {
        let outcome = self.movies.insert(movie);
        self.persist_if(outcome)
    }

    fn delete(&mut self, title: &str) -> Result<Outcome, StorageError> {
        let outcome = self.movies.remove(title);
        self.persist_if(outcome)
    }

    fn update(&mut self, title: &str, rating: f64) -> Result<Outcome, StorageError> {
        let outcome = self.movies.set_rating(title, rating);
        self.persist_if(outcome)
    }
}

/// Opens the backend matching the file extension: `.csv` files get the CSV
/// backend, everything else is treated as JSON.
pub fn open(path: impl AsRef<Path>) -> Result<Box<dyn Storage>, StorageError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        Ok(Box::new(CsvStorage::open(path)?))
    } else {
        Ok(Box::new(JsonStorage::open(path)?))
    }
}

/// Creates the parent directory of `path` if needed, so a fresh data
/// directory does not fail the first save.
fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
