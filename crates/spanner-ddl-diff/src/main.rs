//! spanner-ddl-diff CLI
//!
//! Compares two Cloud Spanner DDL files and prints the statements that
//! migrate the first schema into the second.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use spanner_ddl_diff::prelude::*;

/// Generates the DDL statements that migrate one Cloud Spanner schema to another.
#[derive(Parser)]
#[command(name = "spanner-ddl-diff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// DDL file describing the current schema.
    #[arg(long)]
    original_ddl_file: PathBuf,

    /// DDL file describing the target schema.
    #[arg(long)]
    new_ddl_file: PathBuf,

    /// File to write the statements to (stdout if not specified).
    #[arg(long)]
    output_ddl_file: Option<PathBuf>,

    /// Drop and recreate indexes that changed beyond their STORING clause.
    #[arg(long)]
    allow_recreate_indexes: bool,

    /// Drop and recreate changed constraints.
    #[arg(long)]
    allow_recreate_constraints: bool,

    /// Drop tables, columns and other objects missing from the new DDL.
    #[arg(long)]
    allow_drop_statements: bool,

    /// Fail when a table's interleave parent changes.
    #[arg(long)]
    strict_interleave: bool,

    /// Skip CREATE/ALTER PROTO BUNDLE statements.
    #[arg(long)]
    ignore_proto_bundles: bool,

    /// JSON file with default values for the options above.
    #[arg(long, env = "SPANNER_DDL_DIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Check foreign keys and indexes of the new DDL before diffing.
    #[arg(long)]
    validate: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn options(&self) -> Result<DiffOptions> {
        let flags = DiffOptions {
            allow_recreate_indexes: self.allow_recreate_indexes,
            allow_recreate_constraints: self.allow_recreate_constraints,
            allow_drop_statements: self.allow_drop_statements,
            strict_interleave: self.strict_interleave,
            ignore_proto_bundles: self.ignore_proto_bundles,
        };
        match &self.config {
            Some(path) => Ok(DiffOptions::from_json_file(path)?.merge(flags)),
            None => Ok(flags),
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = cli.options()?;
    let original = read_ddl(&cli.original_ddl_file)?;
    let new = read_ddl(&cli.new_ddl_file)?;

    if cli.validate {
        validate_ddl(&new, &options)?;
    }

    let statements = generate_diff(&original, &new, &options)?;
    info!(count = statements.len(), "Generated statements");

    let output = render_statements(&statements, cli.format)?;
    write_output(cli.output_ddl_file.as_deref(), &output)?;
    if let Some(path) = &cli.output_ddl_file {
        info!("Wrote statements to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {err}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
