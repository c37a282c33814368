//! webindex console library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (status, rebuild, search, chart, console)
//! - `console`: Interactive line-driven session
//! - `session`: Controller wiring
//! - `terminal`: Text rendering of the views

pub mod cli;
pub mod commands;
pub mod console;
pub mod session;
pub mod terminal;

pub use cli::{Cli, Commands};
pub use commands::{
    handle_chart, handle_console, handle_rebuild, handle_search, init_logging, load_settings,
    show_status,
};
pub use console::{handle_line, run_console, Flow};
pub use session::Session;
pub use terminal::TerminalView;
