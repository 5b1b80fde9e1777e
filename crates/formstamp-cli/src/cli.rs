use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use formstamp::RoleContext;

/// Fill medical leave forms and find coordinates on form pages.
#[derive(Debug, Parser)]
#[command(name = "formstamp", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fill a form from a leave record
    Fill {
        /// Path to the blank form
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Where to write the filled form (parent directories are created)
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// Leave record as JSON
        #[arg(long, value_name = "FILE")]
        record: PathBuf,

        /// Form template (TOML). Default: the embedded medical leave layout
        #[arg(long, value_name = "FILE")]
        template: Option<PathBuf>,

        /// Output format for the fill report
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Extract words with bounding box coordinates
    Words {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Horizontal tolerance for word grouping (default: 3.0)
        #[arg(long, default_value_t = 3.0)]
        x_tolerance: f64,

        /// Vertical tolerance for word grouping (default: 3.0)
        #[arg(long, default_value_t = 3.0)]
        y_tolerance: f64,
    },

    /// Find a term and suggest where to write next to it
    Search {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Text to look for (case-insensitive substring)
        #[arg(value_name = "TERM")]
        term: String,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Words of context on each side of a match
        #[arg(long, default_value_t = 5)]
        context: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Extract text from PDF pages
    Text {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,
    },

    /// Run the scored name-line search for a role
    Locate {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Whose name line to look for
        #[arg(long, value_enum, default_value_t = RoleArg::Employee)]
        role: RoleArg,

        /// Only search this page (1-indexed)
        #[arg(long)]
        page: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

/// Output format for tabular data.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Output format for the text subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum TextFormat {
    Text,
    Json,
}

/// Output format for single results.
#[derive(Debug, Clone, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Employee,
    Patient,
}

impl From<RoleArg> for RoleContext {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Employee => RoleContext::Employee,
            RoleArg::Patient => RoleContext::Patient,
        }
    }
}
