//! File access with composed open modes.
//!
//! A [`FileResource`] binds a path to an [`OpenMode`] parsed from a mode string
//! over the alphabet `r`, `w`, `a`. The mode set resolves to one
//! [`AccessPolicy`]:
//!
//! | tokens        | policy       | creates | truncates | writes land at |
//! |---------------|--------------|---------|-----------|----------------|
//! | `r`           | `Read`       | no      | no        | -              |
//! | `w`           | `Write`      | yes     | yes       | cursor         |
//! | `rw`          | `ReadWrite`  | yes     | no        | cursor         |
//! | `a`, `wa`     | `Append`     | yes     | no        | end of file    |
//! | `ra`, `rwa`   | `ReadAppend` | yes     | no        | end of file    |
//!
//! Write-capable modes create missing parent directories on open.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("invalid mode character '{token}' (expected 'r', 'w' or 'a')")]
    InvalidMode { token: char },

    #[error("empty mode string")]
    EmptyMode,

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot {op}: {reason}")]
    Usage {
        op: &'static str,
        reason: &'static str,
    },

    #[error("byte offset {offset} is past the end of the file ({len} bytes)")]
    OffsetOutOfRange { offset: u64, len: u64 },

    #[error("line {requested} does not exist (file has {available} lines)")]
    LineOutOfRange { requested: usize, available: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A single mode character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeToken {
    Read,
    Write,
    Append,
}

impl TryFrom<char> for ModeToken {
    type Error = FileError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'r' => Ok(ModeToken::Read),
            'w' => Ok(ModeToken::Write),
            'a' => Ok(ModeToken::Append),
            token => Err(FileError::InvalidMode { token }),
        }
    }
}

/// How the underlying handle is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    Read,
    Write,
    ReadWrite,
    Append,
    ReadAppend,
}

impl AccessPolicy {
    pub fn readable(self) -> bool {
        matches!(
            self,
            AccessPolicy::Read | AccessPolicy::ReadWrite | AccessPolicy::ReadAppend
        )
    }

    pub fn writable(self) -> bool {
        !matches!(self, AccessPolicy::Read)
    }

    fn open_options(self) -> OpenOptions {
        let mut opts = OpenOptions::new();
        match self {
            AccessPolicy::Read => opts.read(true),
            AccessPolicy::Write => opts.write(true).create(true).truncate(true),
            AccessPolicy::ReadWrite => opts.read(true).write(true).create(true),
            AccessPolicy::Append => opts.append(true).create(true),
            AccessPolicy::ReadAppend => opts.read(true).append(true).create(true),
        };
        opts
    }
}

/// A non-empty set of mode tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    read: bool,
    write: bool,
    append: bool,
}

impl OpenMode {
    pub fn from_tokens<I>(tokens: I) -> Result<Self, FileError>
    where
        I: IntoIterator<Item = ModeToken>,
    {
        let mut mode = OpenMode {
            read: false,
            write: false,
            append: false,
        };
        let mut any = false;
        for token in tokens {
            any = true;
            match token {
                ModeToken::Read => mode.read = true,
                ModeToken::Write => mode.write = true,
                ModeToken::Append => mode.append = true,
            }
        }
        if !any {
            return Err(FileError::EmptyMode);
        }
        Ok(mode)
    }

    pub fn contains(&self, token: ModeToken) -> bool {
        match token {
            ModeToken::Read => self.read,
            ModeToken::Write => self.write,
            ModeToken::Append => self.append,
        }
    }

    pub fn policy(&self) -> AccessPolicy {
        match (self.read, self.write, self.append) {
            (false, _, true) => AccessPolicy::Append,
            (true, _, true) => AccessPolicy::ReadAppend,
            (true, true, false) => AccessPolicy::ReadWrite,
            (false, true, false) => AccessPolicy::Write,
            (_, false, false) => AccessPolicy::Read,
        }
    }
}

impl FromStr for OpenMode {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s
            .chars()
            .map(ModeToken::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        OpenMode::from_tokens(tokens)
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.read {
            f.write_str("r")?;
        }
        if self.write {
            f.write_str("w")?;
        }
        if self.append {
            f.write_str("a")?;
        }
        Ok(())
    }
}

/// A path plus an exclusively owned handle opened under an [`OpenMode`].
///
/// The handle is closed by [`close`](Self::close) or when the resource is
/// dropped.
#[derive(Debug)]
pub struct FileResource {
    path: PathBuf,
    mode: OpenMode,
    handle: Option<BufReader<File>>,
}

impl FileResource {
    /// Validate `mode` and bind it to `path`. Nothing on disk is touched.
    pub fn new(path: impl AsRef<Path>, mode: &str) -> Result<Self, FileError> {
        Ok(Self::with_mode(path, mode.parse()?))
    }

    pub fn with_mode(path: impl AsRef<Path>, mode: OpenMode) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            mode,
            handle: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Open the handle; returns whether it is usable. Calling it on an open
    /// resource changes nothing.
    pub fn open(&mut self) -> bool {
        self.try_open().is_ok()
    }

    /// Like [`open`](Self::open) but reports why opening failed.
    pub fn try_open(&mut self) -> Result<(), FileError> {
        if self.handle.is_some() {
            return Ok(());
        }
        let policy = self.mode.policy();
        let open_err = |source| FileError::Open {
            path: self.path.clone(),
            source,
        };

        if policy.writable()
            && let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(open_err)?;
        }

        let file = policy.open_options().open(&self.path).map_err(open_err)?;
        self.handle = Some(BufReader::new(file));
        Ok(())
    }

    pub fn close(&mut self) {
        self.handle = None;
    }

    /// Write each line followed by `\n`.
    pub fn write_lines<I, S>(&mut self, lines: I) -> Result<(), FileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let file = self.writer("write lines")?;
        for line in lines {
            file.write_all(line.as_ref().as_bytes())?;
            file.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Write `text` as-is.
    pub fn write_str(&mut self, text: &str) -> Result<(), FileError> {
        self.writer("write")?.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn seek_to_byte(&mut self, offset: u64) -> Result<(), FileError> {
        let handle = self.handle_mut("seek")?;
        let len = handle.get_ref().metadata()?.len();
        if offset > len {
            return Err(FileError::OffsetOutOfRange { offset, len });
        }
        handle.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Position the cursor at the start of line `line` (1-based).
    pub fn jump_to_line(&mut self, line: usize) -> Result<(), FileError> {
        let handle = self.reader("jump to line")?;
        handle.seek(SeekFrom::Start(0))?;

        let mut skipped = 0;
        let mut scratch = Vec::new();
        while skipped + 1 < line {
            scratch.clear();
            if handle.read_until(b'\n', &mut scratch)? == 0 {
                break;
            }
            skipped += 1;
        }

        // The target line itself must exist, not just the ones before it.
        if line == 0 || skipped + 1 < line || handle.fill_buf()?.is_empty() {
            return Err(FileError::LineOutOfRange {
                requested: line,
                available: skipped,
            });
        }
        Ok(())
    }

    /// Move the cursor to end of file and return the resulting offset.
    pub fn jump_to_end(&mut self) -> Result<u64, FileError> {
        let handle = self.handle_mut("seek")?;
        Ok(handle.seek(SeekFrom::End(0))?)
    }

    /// Read one line without its terminator; `None` at end of file.
    pub fn read_line(&mut self) -> Result<Option<String>, FileError> {
        let handle = self.reader("read")?;
        let mut line = String::new();
        if handle.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    /// Read every remaining line.
    pub fn read_lines(&mut self) -> Result<Vec<String>, FileError> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            lines.push(line);
        }
        Ok(lines)
    }

    fn handle_mut(&mut self, op: &'static str) -> Result<&mut BufReader<File>, FileError> {
        self.handle.as_mut().ok_or(FileError::Usage {
            op,
            reason: "file is not open",
        })
    }

    fn reader(&mut self, op: &'static str) -> Result<&mut BufReader<File>, FileError> {
        if !self.mode.policy().readable() {
            return Err(FileError::Usage {
                op,
                reason: "file was not opened for reading",
            });
        }
        self.handle_mut(op)
    }

    fn writer(&mut self, op: &'static str) -> Result<&mut File, FileError> {
        if !self.mode.policy().writable() {
            return Err(FileError::Usage {
                op,
                reason: "file was not opened for writing",
            });
        }
        let handle = self.handle_mut(op)?;
        // Drop read-ahead so the OS cursor matches the logical position.
        handle.seek(SeekFrom::Current(0))?;
        Ok(handle.get_mut())
    }
}
