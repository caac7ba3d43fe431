//! Reading DDL files and writing generated statements.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Output encoding of generated statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Each statement followed by `;` and a blank line.
    #[default]
    Text,
    /// A JSON array of statement strings.
    Json,
}

/// Reads a UTF-8 DDL file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_ddl(path: &Path) -> Result<String> {
    let ddl = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = ddl.len(), "Read DDL file");
    Ok(ddl)
}

/// Renders statements in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_statements(statements: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(statements
            .iter()
            .map(|statement| format!("{statement};\n\n"))
            .collect()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(statements)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Writes `content` to `path`, or to stdout when no path is given.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            debug!(path = %path.display(), "Wrote output file");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
