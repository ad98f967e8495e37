//! Writing accepted programs to their destination.

use comb_core::{Destination, Error, OutputConfig, OutputFormat, Result};
use comb_gen::ProgramSink;
use comb_ir::{Printer, Program};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::debug;

enum Target {
    Stdout(io::StdoutLock<'static>),
    File(BufWriter<File>),
    /// One file per program
    Directory(PathBuf),
}

/// One JSON line per accepted program
#[derive(Serialize)]
struct JsonRecord<'a> {
    index: u64,
    choices: &'a [usize],
    program: &'a Program,
}

pub struct OutputSink {
    target: Target,
    format: OutputFormat,
    printer: Printer,
}

impl OutputSink {
    /// Open the destination up front so a bad path fails before any
    /// generation work.
    pub fn open(config: &OutputConfig, printer: Printer) -> Result<Self> {
        let target = match &config.destination {
            Destination::Stdout => Target::Stdout(io::stdout().lock()),
            Destination::Path(path) if path.is_dir() => Target::Directory(path.clone()),
            Destination::Path(path) => {
                let file = File::create(path).map_err(|e| {
                    Error::Config(format!(
                        "cannot open output destination {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Target::File(BufWriter::new(file))
            }
        };
        debug!(destination = %config.destination, format = ?config.format, "Opened output");

        Ok(Self {
            target,
            format: config.format,
            printer,
        })
    }

    fn render(&self, index: u64, program: &Program, choices: &[usize]) -> Result<String> {
        match self.format {
            OutputFormat::Mlir => {
                let choices = choices
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                Ok(format!(
                    "// program {} choices: {}\n{}",
                    index,
                    choices,
                    self.printer.print(program)
                ))
            }
            OutputFormat::Json => {
                let record = JsonRecord {
                    index,
                    choices,
                    program,
                };
                Ok(format!("{}\n", serde_json::to_string(&record)?))
            }
        }
    }

    pub fn finish(self) -> Result<()> {
        match self.target {
            Target::Stdout(mut out) => out.flush()?,
            Target::File(mut out) => out.flush()?,
            Target::Directory(_) => {}
        }
        Ok(())
    }
}

impl ProgramSink for OutputSink {
    fn emit(&mut self, index: u64, program: &Program, choices: &[usize]) -> Result<()> {
        let text = self.render(index, program, choices)?;
        match &mut self.target {
            Target::Stdout(out) => out.write_all(text.as_bytes())?,
            Target::File(out) => out.write_all(text.as_bytes())?,
            Target::Directory(dir) => {
                let path = dir.join(format!("program-{:06}.{}", index, self.format.extension()));
                std::fs::write(&path, text)?;
            }
        }
        Ok(())
    }
}
