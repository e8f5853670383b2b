// Entrypoint for the movie shelf.
// - Keeps `main` small: build config, storage and lookup client, then hand
//   them to the menu loop.
// - Returns `anyhow::Result` so fatal errors exit non-zero with context.

use movie_shelf::app::{MovieApp, SitePaths};
use movie_shelf::config::Config;
use movie_shelf::logging::setup_logging;
use movie_shelf::omdb::OmdbClient;
use movie_shelf::storage;
use movie_shelf::ui::Terminal;

fn main() -> anyhow::Result<()> {
    setup_logging();

    let config = Config::from_env()?;
    let store = storage::open(&config.movies_file)?;
    let omdb = OmdbClient::new(config.omdb_url, config.omdb_api_key)?;
    let site = SitePaths {
        template: config.site_template,
        output: config.site_output,
    };

    // Blocks until the user picks "Quit" or a fatal error occurs.
    MovieApp::new(store, Box::new(omdb), Terminal::new(), site).run()
}
