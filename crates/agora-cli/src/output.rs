//! Output formatting for CLI commands.
//!
//! API responses are JSON; stdout carries only the JSON so it stays
//! machine-parseable. Pretty-printed by default, one line with `compact`.

use std::io::Write;

use serde_json::Value;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter for JSON values.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Write a JSON value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W: Write>(&self, writer: &mut W, value: &Value) -> Result<(), CliError> {
        match self.format {
            Format::Pretty => serde_json::to_writer_pretty(&mut *writer, value)
                .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?,
            Format::Compact => serde_json::to_writer(&mut *writer, value)
                .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?,
        }
        writeln!(writer)?;
        Ok(())
    }

    /// Write a JSON value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string(&self, value: &Value) -> Result<String, CliError> {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Pretty)
    }
}
