// scrubgrid CLI - blacklist scrubbing of contact lists

mod edit;
mod exit_codes;
mod run;
mod settings;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use scrubgrid_engine::config::OutputFormat;
use scrubgrid_engine::ScrubError;

use exit_codes::{scrub_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "sgrid")]
#[command(about = "Filter a contact list against a company/email blacklist")]
#[command(version)]
struct Cli {
    /// Config file (default: ./scrubgrid.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrub an input table in one pass and export the clean rows
    #[command(after_help = "\
Examples:
  sgrid run contacts.csv --blacklist 'https://docs.google.com/spreadsheets/d/abc/edit#gid=0'
  sgrid run contacts.xlsx --blacklist blacklist.csv -o clean.csv
  sgrid run contacts.csv --delete 4 --delete 9 --json
  sgrid run contacts.csv --blocked-output blocked.csv")]
    Run {
        /// Input table (.csv, .tsv, .xlsx, .xls, .ods)
        input: PathBuf,

        /// Blacklist locator: sheet URL, CSV URL or local file
        #[arg(long, env = "SGRID_BLACKLIST", value_name = "LOC")]
        blacklist: Option<String>,

        /// Output file (default: [output] file from config)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format (default: inferred from output extension)
        #[arg(long)]
        format: Option<FormatArg>,

        /// Also write the blocked rows to this file
        #[arg(long, value_name = "PATH")]
        blocked_output: Option<PathBuf>,

        /// Remove a clean row by id before export (repeatable)
        #[arg(long = "delete", value_name = "ID")]
        delete: Vec<usize>,

        /// Re-apply the blacklist to the working set before export
        #[arg(long)]
        purge: bool,

        /// Print the run report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Suppress the summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Scrub an input table, then edit the clean rows interactively
    #[command(after_help = "\
Commands read from stdin, one per line:
  list | blocked | delete <id>... | reset | purge | status | export [path] | help | quit

Examples:
  sgrid edit contacts.csv --blacklist blacklist.csv
  printf 'delete 3 5\\nexport\\n' | sgrid edit contacts.csv -o clean.xlsx")]
    Edit {
        /// Input table (.csv, .tsv, .xlsx, .xls, .ods)
        input: PathBuf,

        /// Blacklist locator: sheet URL, CSV URL or local file
        #[arg(long, env = "SGRID_BLACKLIST", value_name = "LOC")]
        blacklist: Option<String>,

        /// Default export target (default: [output] file from config)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the fetch locator a blacklist link resolves to
    #[command(after_help = "\
Examples:
  sgrid locator 'https://docs.google.com/spreadsheets/d/abc123/edit#gid=42'
  sgrid locator ./blacklist.csv")]
    Locator {
        /// Sheet URL, CSV URL or local file path
        locator: String,
    },

    /// Check a config file without running
    Validate,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Xlsx,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Xlsx => OutputFormat::Xlsx,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run {
            input,
            blacklist,
            output,
            format,
            blocked_output,
            delete,
            purge,
            json,
            quiet,
        } => settings::load(config, blacklist.as_deref()).and_then(|cfg| {
            run::cmd_run(
                &cfg,
                run::RunArgs {
                    input,
                    output,
                    format: format.map(Into::into),
                    blocked_output,
                    delete,
                    purge,
                    json,
                    quiet,
                },
            )
        }),
        Commands::Edit {
            input,
            blacklist,
            output,
        } => settings::load(config, blacklist.as_deref())
            .and_then(|cfg| edit::cmd_edit(&cfg, input, output)),
        Commands::Locator { locator } => run::cmd_locator(&locator),
        Commands::Validate => settings::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ScrubError> for CliError {
    fn from(err: ScrubError) -> Self {
        let code = scrub_exit_code(&err);
        let hint = match &err {
            ScrubError::Config(msg) if msg.contains("placeholder") => {
                Some("pass --blacklist <sheet-url|file> or set SGRID_BLACKLIST".to_string())
            }
            ScrubError::InputValidation { table, .. } if table == "input" => Some(
                "set [input] company_column / email_column in scrubgrid.toml to match the headers"
                    .to_string(),
            ),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}
