//! Terminal front-end for the analyzer page.
mod app;
pub mod cli;
mod effects;
mod logging;
mod settings;
mod ui;

pub use app::run_app;
