use std::{
    collections::VecDeque,
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
    sync::Arc,
};

use parking_lot::Mutex;

/// Removes SGR colour sequences so file output stays plain text.
pub fn strip_ansi_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        // skip until the final byte of the sequence
        for c in chars.by_ref() {
            if c.is_ascii_alphabetic() {
                break;
            }
        }
    }
    out
}

/// Log file that keeps roughly the newest `max_lines` lines.
///
/// Lines are appended as they come; once enough new lines have accumulated
/// the file is rewritten with only its tail.
#[derive(Clone)]
pub(crate) struct BoundedLogFile {
    path: PathBuf,
    max_lines: usize,
    since_trim: Arc<Mutex<usize>>,
}

impl BoundedLogFile {
    pub fn new(path: impl Into<PathBuf>, max_lines: u32) -> Self {
        Self {
            path: path.into(),
            max_lines: max_lines.max(1) as usize,
            since_trim: Arc::new(Mutex::new(0)),
        }
    }

    /// New lines tolerated past the cap before the file is rewritten.
    fn slack(&self) -> usize {
        (self.max_lines / 10).max(50)
    }

    fn trim(&self) -> io::Result<()> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };

        let mut tail = VecDeque::with_capacity(self.max_lines + 1);
        let mut total = 0usize;
        for line in BufReader::new(file).lines() {
            tail.push_back(line?);
            total += 1;
            if tail.len() > self.max_lines {
                tail.pop_front();
            }
        }
        if total <= self.max_lines {
            return Ok(());
        }

        let staging = self.path.with_extension("trim");
        {
            let mut out = io::BufWriter::new(File::create(&staging)?);
            for line in &tail {
                writeln!(out, "{}", line)?;
            }
            out.flush()?;
        }
        fs::rename(staging, &self.path)
    }
}

impl Write for BoundedLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?
            .write_all(buf)?;

        let mut since_trim = self.since_trim.lock();
        *since_trim += buf.iter().filter(|&&b| b == b'\n').count();
        if *since_trim >= self.slack() {
            if let Err(e) = self.trim() {
                eprintln!("Failed to trim log file {}: {}", self.path.display(), e);
            }
            *since_trim = 0;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for BoundedLogFile {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
