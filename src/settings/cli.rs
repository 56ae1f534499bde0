use super::Parser;

/// Token issuing and session service.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Path to a TOML settings file.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<String>,

    /// Print the Argon2 hash of the given password and exit.
    #[arg(long, value_name = "PASSWORD", conflicts_with = "check")]
    pub hash_password: Option<String>,

    /// Load settings, keys and the store, then exit without serving.
    #[arg(long)]
    pub check: bool,
}
