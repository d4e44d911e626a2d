// expedicao CLI - daily shipping back-office batch tools

mod exit_codes;
mod mandae;
mod track;
mod util;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use expedicao_config::Settings;
use expedicao_io::csv::Table;
use expedicao_io::{ExportError, InputError};

use exit_codes::{
    EXIT_ERROR, EXIT_INPUT_INVALID, EXIT_INPUT_UNREADABLE, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "expedicao")]
#[command(about = "Shipment tracking lookups and Mandae intake spreadsheets")]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/expedicao/settings.json)
    #[arg(long, global = true, value_name = "PATH", env = "EXPEDICAO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the latest carrier status of every order in a CSV export
    #[command(after_help = "\
Input: Latin-1 text, ';'-separated, with columns Pedido and Envio codigo
(accents and case in the header do not matter).

Examples:
  expedicao track pedidos.csv
  expedicao track pedidos.csv --out ~/relatorios --quiet
  cat pedidos.csv | expedicao track - --no-preview")]
    Track {
        /// Order export (use - for stdin)
        input: PathBuf,

        /// Directory for status_rastreamento.csv
        #[arg(long, short = 'o', value_name = "DIR")]
        out: Option<PathBuf>,

        /// Tracking endpoint prefix
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Suppress per-row progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,

        /// Do not print the result table
        #[arg(long)]
        no_preview: bool,
    },

    /// Build the styled Mandae intake workbook from an order export
    #[command(after_help = "\
Input: Latin-1 text, ';'-separated, with the exact order-export headers.

Examples:
  expedicao mandae pedidos.csv
  expedicao mandae pedidos.csv --date 2024-03-01 --out ~/mandae")]
    Mandae {
        /// Order export (use - for stdin)
        input: PathBuf,

        /// Directory for the generated workbook
        #[arg(long, short = 'o', value_name = "DIR")]
        out: Option<PathBuf>,

        /// Use this date as "today" for the file name (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,

        /// Only print the written path
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Settings file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print where settings are read from
    Path,
    /// Print the effective settings as JSON
    Show,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let result = match cli.command {
        Commands::Track { input, out, base_url, timeout, quiet, no_preview } => {
            track::cmd_track(&settings, track::TrackArgs {
                input,
                out,
                base_url,
                timeout,
                quiet,
                no_preview,
            })
        }
        Commands::Mandae { input, out, date, quiet } => {
            mandae::cmd_mandae(&settings, input, out, date, quiet)
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                match &cli.config {
                    Some(path) => println!("{}", path.display()),
                    None => println!("{}", Settings::config_path_display()),
                }
                Ok(())
            }
            ConfigCommands::Show => cmd_config_show(&settings),
        },
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
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Map an input failure to its exit code. Messages are the user-facing
    /// Portuguese ones from the io crate.
    pub fn input(err: InputError) -> Self {
        let code = match err {
            InputError::Unreadable(_) => EXIT_INPUT_UNREADABLE,
            InputError::MissingColumns(_) | InputError::EmptyField { .. } => EXIT_INPUT_INVALID,
        };
        let hint = match &err {
            InputError::Unreadable(_) => {
                Some("expected Latin-1 text with ';' between columns".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    pub fn export(err: ExportError) -> Self {
        Self::output(err.to_string())
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<expedicao_io::Error> for CliError {
    fn from(err: expedicao_io::Error) -> Self {
        match err {
            expedicao_io::Error::Input(e) => Self::input(e),
            expedicao_io::Error::Export(e) => Self::export(e),
        }
    }
}

fn cmd_config_show(settings: &Settings) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| CliError::general(format!("cannot serialize settings: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// Read an order export from a file, or from stdin when `input` is `-`.
pub(crate) fn read_table(input: &Path) -> Result<Table, CliError> {
    let table = if input.as_os_str() == "-" {
        expedicao_io::csv::import_reader(io::stdin().lock())
    } else {
        expedicao_io::csv::import(input)
    };
    table.map_err(CliError::input)
}

/// Output directory: flag, then settings, then the current directory.
/// Created if missing.
pub(crate) fn output_dir(flag: Option<PathBuf>, settings: &Settings) -> Result<PathBuf, CliError> {
    let dir = flag.unwrap_or_else(|| settings.output_dir());
    std::fs::create_dir_all(&dir).map_err(|e| {
        CliError::output(format!("cannot create {}: {}", dir.display(), e))
    })?;
    Ok(dir)
}

/// Create `path` for writing, mapping failures to the output exit code.
pub(crate) fn create_file(path: &Path) -> Result<io::BufWriter<File>, CliError> {
    let file = File::create(path)
        .map_err(|e| CliError::output(format!("cannot create {}: {}", path.display(), e)))?;
    Ok(io::BufWriter::new(file))
}
