// Library root
// -----------
// A personal movie shelf driven from an interactive menu. The binary
// (`main.rs`) wires these modules together.
//
// Module responsibilities:
// - `movie`: the movie record and the ordered, title-keyed collection.
// - `storage`: the storage contract plus JSON and CSV file backends.
// - `omdb`: blocking client resolving titles to year/rating/poster.
// - `site`: renders the collection into a static HTML page.
// - `ui`: console abstraction and the interactive terminal.
// - `app`: menu loop and one handler per menu command.
// - `config` / `logging`: environment-driven settings and log setup.
pub mod app;
pub mod config;
pub mod logging;
pub mod movie;
pub mod omdb;
pub mod site;
pub mod storage;
pub mod ui;
