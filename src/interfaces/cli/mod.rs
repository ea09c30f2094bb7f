use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;
mod credentials;


pub use args::GenerateArgs;
pub use credentials::{CredentialsArgs, CredentialsCommand};

#[derive(Debug, Parser)]
#[command(name = "casegen")]
#[command(
    about = "Generate compliance-aware test cases from requirements and push them to ALM tools",
    version
)]
pub struct Cli {
    /// TOML configuration file (defaults to `casegen.toml` when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate test cases from a requirement file or text.
    Generate(GenerateArgs),
    /// Inspect or edit stored platform credentials.
    Credentials(CredentialsArgs),
    /// List supported platforms.
    Platforms,
}
