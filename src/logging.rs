/// Sets up `env_logger` on stderr.
///
/// The menu shares the terminal with the log output, so the default filter
/// is `warn`: storage and lookup chatter stays at debug and only failures
/// show up between prompts. `RUST_LOG` overrides the filter, e.g.
/// `RUST_LOG=movie_shelf=debug`.
pub fn setup_logging() {
    let mut builder = env_logger::Builder::new();

    builder.filter(None, log::LevelFilter::Warn);

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    }

    builder.init();
}
