// Movie model: the record kept for each title and the ordered collection
// the storage backends load, mutate and save.
//
// The collection is a plain `Vec` searched by title. Collections are small
// (a personal shelf), and a vector keeps insertion/file order for free.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One movie on the shelf. `title` is the unique key of the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub year: String,
    /// `None` when the source had no rating (OMDb reports "N/A").
    pub rating: Option<f64>,
    pub poster: String,
}

impl Movie {
    pub fn new(
        title: impl Into<String>,
        year: impl Into<String>,
        rating: Option<f64>,
        poster: impl Into<String>,
    ) -> Self {
        Movie {
            title: title.into(),
            year: year.into(),
            rating,
            poster: poster.into(),
        }
    }

    /// Rating as shown to the user: `8.8`, `7.0`, or `N/A`.
    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(r) => format_rating(r),
            None => "N/A".into(),
        }
    }
}

/// Formats a rating with at least one decimal so `7` reads as `7.0`.
pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{:.1}", rating)
    } else {
        rating.to_string()
    }
}

/// Result of a mutation on the collection. Duplicates and missing titles
/// are reported to the user, they are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    AlreadyExists,
    NotFound,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}

/// Movies keyed by title, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    movies: Vec<Movie>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Movie> {
        self.movies.iter()
    }

    pub fn get(&self, title: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.title == title)
    }

    fn position(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|m| m.title == title)
    }

    /// Appends `movie` unless its title is already present.
    pub fn insert(&mut self, movie: Movie) -> Outcome {
        if self.position(&movie.title).is_some() {
            return Outcome::AlreadyExists;
        }
        self.movies.push(movie);
        Outcome::Applied
    }

    /// Inserts `movie`, replacing a record with the same title in place.
    /// Returns the replaced record. Used when loading files, where a later
    /// row for a title wins.
    pub fn upsert(&mut self, movie: Movie) -> Option<Movie> {
        match self.position(&movie.title) {
            Some(idx) => Some(std::mem::replace(&mut self.movies[idx], movie)),
            None => {
                self.movies.push(movie);
                None
            }
        }
    }

    pub fn remove(&mut self, title: &str) -> Outcome {
        match self.position(title) {
            Some(idx) => {
                self.movies.remove(idx);
                Outcome::Applied
            }
            None => Outcome::NotFound,
        }
    }

    /// Overwrites the rating only; year and poster are left alone.
    pub fn set_rating(&mut self, title: &str, rating: f64) -> Outcome {
        match self.movies.iter_mut().find(|m| m.title == title) {
            Some(movie) => {
                movie.rating = Some(rating);
                Outcome::Applied
            }
            None => Outcome::NotFound,
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Movie;
    type IntoIter = std::slice::Iter<'a, Movie>;

    fn into_iter(self) -> Self::IntoIter {
        self.movies.iter()
    }
}

impl FromIterator<Movie> for Collection {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for movie in iter {
            collection.insert(movie);
        }
        collection
    }
}

// JSON shape: { "<title>": { "year": ..., "rating": ..., "poster": ... } }

#[derive(Serialize)]
struct EntryRef<'a> {
    year: &'a str,
    rating: Option<f64>,
    poster: &'a str,
}

#[derive(Deserialize)]
struct Entry {
    #[serde(deserialize_with = "lenient_year")]
    year: String,
    #[serde(default, deserialize_with = "lenient_rating")]
    rating: Option<f64>,
    #[serde(default)]
    poster: String,
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.movies.len()))?;
        for movie in &self.movies {
            map.serialize_entry(
                &movie.title,
                &EntryRef {
                    year: &movie.year,
                    rating: movie.rating,
                    poster: &movie.poster,
                },
            )?;
        }
        map.end()
    }
}

struct CollectionVisitor;

impl<'de> Visitor<'de> for CollectionVisitor {
    type Value = Collection;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping movie titles to their details")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Collection, A::Error> {
        let mut collection = Collection::new();
        while let Some((title, entry)) = access.next_entry::<String, Entry>()? {
            let replaced = collection.upsert(Movie {
                title,
                year: entry.year,
                rating: entry.rating,
                poster: entry.poster,
            });
            if let Some(old) = replaced {
                log::warn!(
                    "duplicate title {:?} in movie file, keeping the later entry",
                    old.title
                );
            }
        }
        Ok(collection)
    }
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CollectionVisitor)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => n.to_string(),
        NumberOrText::Text(s) => s,
    })
}

// Older files stored the OMDb rating verbatim, e.g. "8.8" or "N/A".
fn lenient_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(
        match Option::<NumberOrText>::deserialize(deserializer)? {
            Some(NumberOrText::Number(n)) => Some(n),
            Some(NumberOrText::Text(s)) => parse_rating_text(&s),
            None => None,
        },
    )
}

/// Parses a rating cell or API value; anything non-numeric means "no rating".
pub fn parse_rating_text(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> Movie {
        Movie::new("Inception", "2010", Some(8.8), "https://img/inception.jpg")
    }

    #[test]
    fn insert_keeps_first_record_on_duplicate_title() {
        let mut shelf = Collection::new();
        assert_eq!(shelf.insert(inception()), Outcome::Applied);

        let imposter = Movie::new("Inception", "1999", Some(1.0), "other");
        assert_eq!(shelf.insert(imposter), Outcome::AlreadyExists);
        assert_eq!(shelf.len(), 1);
        assert_eq!(shelf.get("Inception"), Some(&inception()));
    }

    #[test]
    fn titles_are_case_sensitive() {
        let mut shelf = Collection::new();
        shelf.insert(inception());
        assert!(shelf.get("inception").is_none());
        assert_eq!(shelf.remove("INCEPTION"), Outcome::NotFound);
        assert_eq!(shelf.len(), 1);
    }

    #[test]
    fn set_rating_only_touches_rating() {
        let mut shelf = Collection::new();
        shelf.insert(inception());
        assert_eq!(shelf.set_rating("Inception", 9.5), Outcome::Applied);

        let movie = shelf.get("Inception").unwrap();
        assert_eq!(movie.rating, Some(9.5));
        assert_eq!(movie.year, "2010");
        assert_eq!(movie.poster, "https://img/inception.jpg");

        assert_eq!(shelf.set_rating("Heat", 5.0), Outcome::NotFound);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut shelf: Collection = vec![inception(), Movie::new("Heat", "1995", Some(8.3), "h")]
            .into_iter()
            .collect();
        let newer = Movie::new("Inception", "2010", Some(9.0), "new");

        assert_eq!(shelf.upsert(newer.clone()), Some(inception()));
        assert_eq!(shelf.upsert(Movie::new("Alien", "1979", None, "a")), None);

        let titles: Vec<_> = shelf.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Inception", "Heat", "Alien"]);
        assert_eq!(shelf.get("Inception"), Some(&newer));
    }

    #[test]
    fn json_duplicate_titles_keep_the_later_entry() {
        let text = r#"{
            "Heat": {"year": "1995", "rating": 8.3, "poster": "old"},
            "Alien": {"year": "1979", "rating": 8.5, "poster": "a"},
            "Heat": {"year": "1995", "rating": 6.0, "poster": "new"}
        }"#;
        let shelf: Collection = serde_json::from_str(text).unwrap();
        assert_eq!(shelf.len(), 2);
        assert_eq!(shelf.get("Heat").unwrap().poster, "new");
        assert_eq!(shelf.get("Heat").unwrap().rating, Some(6.0));
    }

    #[test]
    fn json_keeps_insertion_order() {
        let shelf: Collection = vec![
            Movie::new("Zodiac", "2007", Some(7.7), "z"),
            Movie::new("Alien", "1979", Some(8.5), "a"),
        ]
        .into_iter()
        .collect();

        let text = serde_json::to_string(&shelf).unwrap();
        assert!(text.find("Zodiac").unwrap() < text.find("Alien").unwrap());

        let back: Collection = serde_json::from_str(&text).unwrap();
        let titles: Vec<_> = back.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Zodiac", "Alien"]);
    }

    #[test]
    fn json_accepts_legacy_string_values() {
        let text = r#"{
            "Heat": {"year": 1995, "rating": "8.3", "poster": "h"},
            "Obscure": {"year": "2001", "rating": "N/A", "poster": "N/A"}
        }"#;
        let shelf: Collection = serde_json::from_str(text).unwrap();
        assert_eq!(shelf.get("Heat").unwrap().year, "1995");
        assert_eq!(shelf.get("Heat").unwrap().rating, Some(8.3));
        assert_eq!(shelf.get("Obscure").unwrap().rating, None);
    }

    #[test]
    fn rating_label_formats_whole_numbers_and_missing() {
        assert_eq!(Movie::new("A", "2000", Some(7.0), "").rating_label(), "7.0");
        assert_eq!(Movie::new("A", "2000", Some(7.5), "").rating_label(), "7.5");
        assert_eq!(Movie::new("A", "2000", None, "").rating_label(), "N/A");
    }
}
