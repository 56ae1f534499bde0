//! Service settings, loaded from a TOML file selected on the command line.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
