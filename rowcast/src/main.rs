//! Rowcast CLI - Validate and typecast tabular documents against a template
//!
//! # Commands
//!
//! ```bash
//! rowcast check input.csv --template template.json   # One JSON line per row
//! rowcast types                                      # Registered type names
//! rowcast codes                                      # Stable message codes
//! ```

use clap::{Parser, Subcommand};
use rowcast::logging::{init_logging, LogConfig};
use rowcast::messaging::validation;
use rowcast::{
    BackendRegistry, CsvOptions, Error, MessageCode, MessagingConfig, ProcessResult, RowResult,
    SheetProcessor, SheetSource, Template, TemplateConfig,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rowcast")]
#[command(
    about = "Validate and typecast tabular documents against a declarative template",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a document and output one JSON line per row
    Check {
        /// Input document (.csv, .tsv, .txt)
        input: PathBuf,

        /// Template JSON file
        #[arg(short, long)]
        template: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Input encoding label (auto-detect if not specified)
        #[arg(short, long)]
        encoding: Option<String>,

        /// Check every message against the shape of its code
        #[arg(long)]
        validate_messages: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered scalar and composite types
    Types,

    /// List stable message codes
    Codes,
}

type CliResult<T> = ProcessResult<T>;

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose));

    let result = match cli.command {
        Commands::Check {
            input,
            template,
            delimiter,
            encoding,
            validate_messages,
            output,
        } => cmd_check(
            &input,
            &template,
            CsvOptions { delimiter, encoding },
            MessagingConfig { validate_messages },
            output.as_deref(),
        ),

        Commands::Types => cmd_types(),

        Commands::Codes => cmd_codes(),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the sheet and every row succeeded.
fn cmd_check(
    input: &Path,
    template: &Path,
    csv: CsvOptions,
    messaging: MessagingConfig,
    output: Option<&Path>,
) -> CliResult<bool> {
    eprintln!("Processing: {}", input.display());

    let template = Template::from_path(template)?;
    let specification = template.apply(&TemplateConfig::default())?;
    eprintln!("   Columns: {}", specification.len());

    let processor = SheetProcessor::new(specification)
        .with_registry(BackendRegistry::with_csv_options(csv))
        .with_messaging(messaging);

    let mut out = open_output(output)?;
    let mut total = 0usize;
    let mut failed = 0usize;
    let mut errors = 0usize;
    let mut warnings = 0usize;
    let mut write_error: Option<Error> = None;

    let result = processor.call(SheetSource::Path(input.to_path_buf()), |row: RowResult| {
        total += 1;
        if !row.is_success() {
            failed += 1;
        }
        let row_errors = row.messages.iter().filter(|m| m.is_error()).count();
        errors += row_errors;
        warnings += row.messages.len() - row_errors;
        if write_error.is_some() {
            return;
        }
        let line = match serde_json::to_string(&row) {
            Ok(line) => line,
            Err(e) => {
                write_error = Some(e.into());
                return;
            }
        };
        if let Err(e) = writeln!(out, "{}", line) {
            write_error = Some(e.into());
        }
    })?;

    if let Some(e) = write_error {
        return Err(e);
    }
    out.flush()?;

    if !result.is_success() {
        eprintln!("\nSheet failed:");
        for message in &result.messages {
            eprintln!("   {}", message);
        }
    }

    let sheet_errors = result.messages.iter().filter(|m| m.is_error()).count();
    errors += sheet_errors;
    warnings += result.messages.len() - sheet_errors;
    eprintln!(
        "\nResults: {} rows, {} valid, {} invalid ({} errors, {} warnings)",
        total,
        total - failed,
        failed,
        errors,
        warnings
    );

    Ok(result.is_success() && failed == 0)
}

fn cmd_types() -> CliResult<bool> {
    let types = TemplateConfig::default().types;
    println!("Scalars:");
    for name in types.scalars() {
        println!("  {}", name);
    }
    println!("Composites:");
    for name in types.composites() {
        println!("  {}", name);
    }
    Ok(true)
}

fn cmd_codes() -> CliResult<bool> {
    for code in MessageCode::BUILTIN {
        match validation::shape(&code) {
            Some(shape) => println!("{:<24} {}", code.as_str(), shape.scope),
            None => println!("{}", code.as_str()),
        }
    }
    Ok(true)
}

fn open_output(path: Option<&Path>) -> CliResult<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}
