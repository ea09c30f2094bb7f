use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct CredentialsArgs {
    #[command(subcommand)]
    pub command: CredentialsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CredentialsCommand {
    /// Show one platform's record with secrets masked.
    Show { platform: String },
    /// Change one field; kept only with `--save`.
    Set {
        platform: String,
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[arg(long, default_value_t = false)]
        save: bool,
    },
    /// Report which platforms have complete credentials.
    Check,
}
