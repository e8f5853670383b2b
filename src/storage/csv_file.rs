use super::{FileFormat, StorageError};
use crate::movie::{format_rating, Collection, Movie};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

const HEADER: [&str; 4] = ["title", "year", "rating", "poster"];

#[derive(Debug, Deserialize)]
struct Row {
    title: String,
    year: String,
    // "N/A" or an empty cell both mean unrated.
    #[serde(deserialize_with = "csv::invalid_option")]
    rating: Option<f64>,
    poster: String,
}

/// Header row plus one row per movie, in collection order.
#[derive(Debug)]
pub struct CsvFormat;

impl FileFormat for CsvFormat {
    fn load(path: &Path) -> Result<Collection, StorageError> {
        let mut rdr = match csv::Reader::from_path(path) {
            Ok(rdr) => rdr,
            Err(e) => {
                let missing =
                    matches!(e.kind(), csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound);
                if missing {
                    return Ok(Collection::new());
                }
                return Err(StorageError::Csv {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let mut movies = Collection::new();
        for row in rdr.deserialize::<Row>() {
            let row = row.map_err(|source| StorageError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            let replaced = movies.upsert(Movie {
                title: row.title,
                year: row.year,
                rating: row.rating,
                poster: row.poster,
            });
            if let Some(old) = replaced {
                log::warn!(
                    "duplicate title {:?} in {}, keeping the later row",
                    old.title,
                    path.display()
                );
            }
        }
        Ok(movies)
    }

    fn save(path: &Path, movies: &Collection) -> Result<(), StorageError> {
        let csv_err = |source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut wrt = csv::Writer::from_path(path).map_err(csv_err)?;
        wrt.write_record(HEADER).map_err(csv_err)?;
        for movie in movies {
            let rating = movie.rating.map(format_rating).unwrap_or_default();
            wrt.write_record([
                movie.title.as_str(),
                movie.year.as_str(),
                rating.as_str(),
                movie.poster.as_str(),
            ])
            .map_err(csv_err)?;
        }
        wrt.flush().map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
