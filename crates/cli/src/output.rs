// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, Write};

use atst_core::Output;
use clap::ValueEnum;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// `[index]: message`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Render one record as text, without a trailing newline.
pub fn format_text(output: &Output, color: bool) -> String {
    format!("{}: {}", crate::color::index_prefix(output.index, color), output.msg)
}

/// Writes records to a stream in the selected format.
pub struct Printer<W> {
    out: W,
    format: OutputFormat,
    color: bool,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, format: OutputFormat, color: bool) -> Self {
        Self { out, format, color }
    }

    /// Write and flush one record so lines show up as they are produced.
    pub fn print(&mut self, output: &Output) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", format_text(output, self.color))?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, output)?;
                self.out.write_all(b"\n")?;
            }
        }
        self.out.flush()
    }
}
