use std::path::PathBuf;

use clap::{ArgGroup, Args};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("requirement").required(true).args(["text", "file"])))]
pub struct GenerateArgs {
    /// Requirement text.
    #[arg(long, allow_hyphen_values = true)]
    pub text: Option<String>,
    /// Requirement document (.txt, .md, .pdf, .docx, .xml).
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Regulatory domain; falls back to `default_domain` from configuration.
    #[arg(long)]
    pub domain: Option<String>,
    /// Print or write an export instead of the summary listing: json, gherkin, xml
    /// or docx. `docx` is binary and needs `--output`.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
    /// Write the export to this path; implies `--format json` when no format is given.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
    /// Send the generated test cases to this platform with its stored credentials.
    #[arg(long, value_name = "PLATFORM")]
    pub push: Option<String>,
    /// Print the requirement traceability matrix.
    #[arg(long, default_value_t = false)]
    pub matrix: bool,
    /// Print the final workflow state as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
