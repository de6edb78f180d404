use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, IsTerminal, Read};
use thiserror::Error;

const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

/// Raised when there is nothing to translate.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no input text supplied")]
    NoInput,
}

/// Where the text to translate comes from.
#[derive(Debug, Clone, Copy)]
pub enum InputSource<'a> {
    File(&'a str),
    Words(&'a [String]),
    Stdin,
}

impl<'a> InputSource<'a> {
    /// Picks the source: `--file` first, then positional words, then stdin
    /// when it is not an interactive terminal.
    pub fn detect(file: Option<&'a str>, words: &'a [String]) -> Option<Self> {
        if let Some(path) = file {
            Some(Self::File(path))
        } else if !words.is_empty() {
            Some(Self::Words(words))
        } else if !io::stdin().is_terminal() {
            Some(Self::Stdin)
        } else {
            None
        }
    }
}

pub struct InputReader;

impl InputReader {
    /// Reads and trims the input text.
    ///
    /// Fails with [`InputError::NoInput`] when no source is available or the
    /// text is empty after trimming.
    pub fn read(source: Option<InputSource<'_>>) -> Result<String> {
        let text = match source {
            Some(InputSource::File(path)) => Self::read_file(path)?,
            Some(InputSource::Words(words)) => words.join(" "),
            Some(InputSource::Stdin) => Self::read_stdin()?,
            None => return Err(InputError::NoInput.into()),
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(InputError::NoInput.into());
        }

        Ok(trimmed.to_string())
    }

    fn read_file(path: &str) -> Result<String> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to access file: {path}"))?;

        let size = metadata.len() as usize;
        if size > MAX_INPUT_SIZE {
            bail!(
                "Error: Input size ({:.1} MB) exceeds maximum allowed size (1 MB).\n\n\
                 Consider splitting the file into smaller parts.",
                size as f64 / 1024.0 / 1024.0
            );
        }

        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
    }

    #[allow(clippy::significant_drop_tightening)]
    fn read_stdin() -> Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];
        let mut stdin = io::stdin().lock();

        loop {
            let bytes_read = stdin
                .read(&mut chunk)
                .context("Failed to read from stdin")?;

            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);

            if buffer.len() > MAX_INPUT_SIZE {
                bail!(
                    "Error: Input size ({:.1} MB) exceeds maximum allowed size (1 MB).\n\n\
                     Consider splitting the input into smaller parts.",
                    buffer.len() as f64 / 1024.0 / 1024.0
                );
            }
        }

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}
