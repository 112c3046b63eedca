use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::error::ErrorKind;

/// Sequential line supplier with its own cursor.
pub trait LineSource {
    /// Next line without its terminator, `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>, ErrorKind>;

    /// Display name used in error locations.
    fn name(&self) -> &str;

    /// 1-based number of the last line returned, 0 before the first read.
    fn line_number(&self) -> usize;
}

/// Sequential line consumer.
pub trait LineSink {
    /// Write `text` followed by a newline. `text` may itself span lines.
    fn emit(&mut self, text: &str) -> Result<(), ErrorKind>;

    fn flush(&mut self) -> Result<(), ErrorKind>;
}

pub struct ReaderSource<R> {
    reader: R,
    name: String,
    line: usize,
    buf: String,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self) -> Result<Option<String>, ErrorKind> {
        self.buf.clear();
        let n = self
            .reader
            .read_line(&mut self.buf)
            .map_err(|source| ErrorKind::Read {
                name: self.name.clone(),
                source,
            })?;
        if n == 0 {
            return Ok(None);
        }
        self.line += 1;

        // Strip LF, then a CR left over from CRLF input
        if self.buf.ends_with('\n') {
            self.buf.pop();
            if self.buf.ends_with('\r') {
                self.buf.pop();
            }
        }
        Ok(Some(self.buf.clone()))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn line_number(&self) -> usize {
        self.line
    }
}

pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn emit(&mut self, text: &str) -> Result<(), ErrorKind> {
        writeln!(self.writer, "{text}").map_err(ErrorKind::Write)
    }

    fn flush(&mut self) -> Result<(), ErrorKind> {
        self.writer.flush().map_err(ErrorKind::Write)
    }
}

/// Open the input file, or stdin when no path is given.
pub fn open_input(path: Option<&Path>) -> Result<ReaderSource<Box<dyn BufRead>>> {
    match path {
        Some(p) => {
            let file = File::open(p)
                .with_context(|| format!("Failed to open input file {}", p.display()))?;
            Ok(ReaderSource::new(
                Box::new(BufReader::new(file)),
                p.display().to_string(),
            ))
        }
        None => Ok(ReaderSource::new(Box::new(io::stdin().lock()), "<stdin>")),
    }
}

/// Create the output file, or use stdout when no path is given.
pub fn open_output(path: Option<&Path>) -> Result<WriterSink<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file {}", p.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    Ok(WriterSink::new(writer))
}
