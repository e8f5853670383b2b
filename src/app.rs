// Application controller: owns the store, the lookup client and the console,
// and implements one handler per menu entry. `run` is the menu loop.

use crate::movie::{format_rating, Collection, Movie, Outcome};
use crate::omdb::MovieLookup;
use crate::site;
use crate::storage::Storage;
use crate::ui::Console;
use anyhow::Result;
use std::path::PathBuf;
use thiserror::Error;

const MENU: &str = "
Movie App Menu:
1. List movies
2. Movie stats
3. Add movie
4. Delete movie
5. Update movie
6. Generate website
7. Quit";

/// Why a rating answer was rejected. The message is shown as-is.
#[derive(Error, Debug, PartialEq)]
pub enum RatingError {
    #[error("Please enter a valid rate.")]
    Empty,
    #[error("Invalid input. Please enter a valid rate.")]
    NotANumber,
    #[error("Rate out of range! (0-10)")]
    OutOfRange(f64),
}

/// Parses a user-supplied rating: a finite number within [0, 10].
pub fn parse_rating(input: &str) -> Result<f64, RatingError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(RatingError::Empty);
    }
    let rating: f64 = input.parse().map_err(|_| RatingError::NotANumber)?;
    if !rating.is_finite() {
        return Err(RatingError::NotANumber);
    }
    if !(0.0..=10.0).contains(&rating) {
        return Err(RatingError::OutOfRange(rating));
    }
    Ok(rating)
}

/// Summary printed by the stats command.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub total: usize,
    /// Mean over rated movies; `None` when nothing is rated.
    pub average: Option<f64>,
}

/// Count and mean rating, or `None` for an empty collection.
pub fn stats(movies: &Collection) -> Option<Stats> {
    if movies.is_empty() {
        return None;
    }
    let ratings: Vec<f64> = movies.iter().filter_map(|m| m.rating).collect();
    let average = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };
    Some(Stats {
        total: movies.len(),
        average,
    })
}

/// Mean rating as printed: two decimals at most, one at least
/// (`7.0`, `7.33`).
pub fn format_average(average: f64) -> String {
    format_rating((average * 100.0).round() / 100.0)
}

/// Where the site generator reads its template and writes the page.
#[derive(Debug, Clone)]
pub struct SitePaths {
    pub template: PathBuf,
    pub output: PathBuf,
}

pub struct MovieApp<C: Console> {
    storage: Box<dyn Storage>,
    lookup: Box<dyn MovieLookup>,
    console: C,
    site: SitePaths,
}

impl<C: Console> MovieApp<C> {
    pub fn new(
        storage: Box<dyn Storage>,
        lookup: Box<dyn MovieLookup>,
        console: C,
        site: SitePaths,
    ) -> Self {
        MovieApp {
            storage,
            lookup,
            console,
            site,
        }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Runs the menu until the user quits. Errors out of a handler (storage
    /// I/O, missing site template, closed input) end the loop.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.console.say(MENU);
            let command = self.console.ask("Enter command")?;
            match command.trim() {
                "1" => self.list_movies(),
                "2" => self.movie_stats(),
                "3" => self.add_movie()?,
                "4" => self.delete_movie()?,
                "5" => self.update_movie()?,
                "6" => self.generate_website()?,
                "7" => {
                    self.console.say("Goodbye!");
                    break;
                }
                _ => self.console.say("Invalid command. Please try again."),
            }
        }
        Ok(())
    }

    pub fn list_movies(&mut self) {
        for movie in self.storage.list() {
            self.console.say(&format!(
                "{}: {} - Rating: {}",
                movie.title,
                movie.year,
                movie.rating_label()
            ));
        }
    }

    pub fn movie_stats(&mut self) {
        let Some(stats) = stats(self.storage.list()) else {
            self.console.say("No movies found.");
            return;
        };
        self.console.say(&format!("Total movies: {}", stats.total));
        let average = stats
            .average
            .map(format_average)
            .unwrap_or_else(|| "N/A".into());
        self.console.say(&format!("Average rating: {}", average));
    }

    /// Asks for titles until the lookup finds one. An empty title goes back
    /// to the main menu.
    pub fn add_movie(&mut self) -> Result<()> {
        loop {
            let title = self
                .console
                .ask("Please insert the movie name (empty to cancel)")?;
            if title.is_empty() {
                return Ok(());
            }

            self.console.busy(&format!("Looking up {}...", title));
            let found = self.lookup.find(&title);
            self.console.idle();

            let found = match found {
                Ok(Some(found)) => found,
                Ok(None) => {
                    self.console.say("Movie not found.");
                    continue;
                }
                Err(e) => {
                    log::warn!("lookup for {:?} failed: {:#}", title, e);
                    self.console.say("Invalid movie name.");
                    continue;
                }
            };

            let year = found.year.clone();
            let movie = Movie::new(title.clone(), found.year, found.rating, found.poster);
            match self.storage.add(movie)? {
                Outcome::AlreadyExists => {
                    self.console.say(&format!("Movie {} already exists.", title))
                }
                _ => self.console.say(&format!("Movie {} : {} added.", title, year)),
            }
            return Ok(());
        }
    }

    pub fn delete_movie(&mut self) -> Result<()> {
        let title = self.console.ask("Please insert the movie name")?;
        match self.storage.delete(&title)? {
            Outcome::Applied => self.console.say(&format!("Movie {} deleted.", title)),
            _ => self.console.say("Movie not found."),
        }
        Ok(())
    }

    /// Asks for the title once, then for a rating until one is valid.
    pub fn update_movie(&mut self) -> Result<()> {
        let title = self.console.ask("Please insert the movie name")?;
        let rating = loop {
            let answer = self.console.ask("Please insert the movie rate (0-10)")?;
            match parse_rating(&answer) {
                Ok(rating) => break rating,
                Err(e) => self.console.say(&e.to_string()),
            }
        };
        match self.storage.update(&title, rating)? {
            Outcome::Applied => self.console.say(&format!("Movie {} updated.", title)),
            _ => self.console.say("Movie not found."),
        }
        Ok(())
    }

    pub fn generate_website(&mut self) -> Result<()> {
        if let Err(e) = site::generate(&self.site.template, &self.site.output, self.storage.list()) {
            log::error!("site generation failed: {:#}", e);
            return Err(e);
        }
        self.console.say("Website was generated successfully.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_validation_distinguishes_failures() {
        assert_eq!(parse_rating("11"), Err(RatingError::OutOfRange(11.0)));
        assert_eq!(parse_rating("-0.5"), Err(RatingError::OutOfRange(-0.5)));
        assert_eq!(parse_rating("abc"), Err(RatingError::NotANumber));
        assert_eq!(parse_rating("NaN"), Err(RatingError::NotANumber));
        assert_eq!(parse_rating("  "), Err(RatingError::Empty));
        assert_eq!(parse_rating("7.5"), Ok(7.5));
        assert_eq!(parse_rating("0"), Ok(0.0));
        assert_eq!(parse_rating("10"), Ok(10.0));
    }

    #[test]
    fn stats_of_empty_collection_is_none() {
        assert_eq!(stats(&Collection::new()), None);
    }

    #[test]
    fn stats_averages_ratings() {
        let movies: Collection = vec![
            Movie::new("A", "2000", Some(8.0), ""),
            Movie::new("B", "2001", Some(6.0), ""),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            stats(&movies),
            Some(Stats {
                total: 2,
                average: Some(7.0)
            })
        );
    }

    #[test]
    fn average_is_printed_with_two_decimals_at_most() {
        assert_eq!(format_average(7.0), "7.0");
        assert_eq!(format_average(22.0 / 3.0), "7.33");
        assert_eq!(format_average(8.25), "8.25");
        assert_eq!(format_average(6.996), "7.0");
    }

    #[test]
    fn stats_skips_unrated_movies_in_the_mean() {
        let movies: Collection = vec![
            Movie::new("A", "2000", Some(9.0), ""),
            Movie::new("B", "2001", None, ""),
        ]
        .into_iter()
        .collect();
        let s = stats(&movies).unwrap();
        assert_eq!(s.total, 2);
        assert_eq!(s.average, Some(9.0));

        let unrated: Collection = vec![Movie::new("B", "2001", None, "")].into_iter().collect();
        assert_eq!(stats(&unrated).unwrap().average, None);
    }
}
