use anyhow::{Context, Result};
use std::io::Write;

use crate::advisory::Advisory;
use crate::merge::Generation;
use crate::types::Entity;

/// Rendering of a generation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Indented JSON
    #[default]
    Pretty,
    /// Single-line JSON
    Compact,
    /// Plain-text listing of entities and their fields
    Outline,
}

/// Writes generated entities to any output
pub struct SchemaWriter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> SchemaWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        SchemaWriter { writer, format }
    }

    pub fn write_generation(&mut self, generation: &Generation) -> Result<()> {
        match self.format {
            OutputFormat::Pretty => {
                let json = serde_json::to_string_pretty(generation).context("Failed to serialize generation")?;
                writeln!(self.writer, "{}", json).context("Failed to write generation")?;
            }
            OutputFormat::Compact => {
                let json = serde_json::to_string(generation).context("Failed to serialize generation")?;
                writeln!(self.writer, "{}", json).context("Failed to write generation")?;
            }
            OutputFormat::Outline => {
                for (i, entity) in generation.entities.iter().enumerate() {
                    if i > 0 {
                        writeln!(self.writer).context("Failed to write outline")?;
                    }
                    self.write_outline(entity)?;
                }
                self.write_advisories(&generation.advisories)?;
            }
        }
        Ok(())
    }

    fn write_outline(&mut self, entity: &Entity) -> Result<()> {
        writeln!(self.writer, "{}", entity.name).context("Failed to write outline")?;
        for field in &entity.fields {
            let optional = if field.optional { "?" } else { "" };
            writeln!(
                self.writer,
                "  {}: {}{}  ({})",
                field.resolved_name, field.kind, optional, field.source_key
            )
            .context("Failed to write outline")?;
        }
        Ok(())
    }

    // outline output carries advisories as trailing comments
    fn write_advisories(&mut self, advisories: &[Advisory]) -> Result<()> {
        for advisory in advisories {
            writeln!(self.writer, "# {}", advisory).context("Failed to write outline")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}
