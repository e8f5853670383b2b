// Static site generation: fills the HTML template with one card per movie
// and writes the result next to it.

use crate::movie::Collection;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

const PAGE_TITLE: &str = "My Movie Shelf";

/// Substitutes the page title and the movie grid into `template`.
pub fn render(template: &str, movies: &Collection) -> String {
    let mut grid = String::new();
    for movie in movies {
        // Writing into a String cannot fail.
        let _ = write!(
            grid,
            concat!(
                "        <li>\n",
                "            <div class=\"movie\">\n",
                "                <img class=\"movie-poster\" src=\"{poster}\" alt=\"{title}\"/>\n",
                "                <div class=\"movie-title\">{title}</div>\n",
                "                <div class=\"movie-year\">{year}</div>\n",
                "                <div class=\"movie-rating\">{rating}</div>\n",
                "            </div>\n",
                "        </li>\n",
            ),
            poster = escape(&movie.poster),
            title = escape(&movie.title),
            year = escape(&movie.year),
            rating = movie.rating_label(),
        );
    }

    template
        .replace(TITLE_PLACEHOLDER, PAGE_TITLE)
        .replace(GRID_PLACEHOLDER, &grid)
}

/// Reads the template, renders `movies` into it and overwrites `output`.
/// A missing template is an error for the caller to surface.
pub fn generate(template: &Path, output: &Path, movies: &Collection) -> Result<()> {
    let text = fs::read_to_string(template)
        .with_context(|| format!("Failed to read site template {}", template.display()))?;
    let page = render(&text, movies);

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    fs::write(output, page).with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("wrote {} movies to {}", movies.len(), output.display());
    Ok(())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
