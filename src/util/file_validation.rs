//! Pre-flight checks for files handed to the CLI
//!
//! A file is accepted when it is a regular, readable file under
//! [`MAX_INPUT_BYTES`] whose leading bytes look like UTF-8 text.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::csv::Delimiter;

/// Largest file the sheet will load (50 MB)
pub const MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;

/// Bytes sniffed when looking for binary content
const SNIFF_LEN: usize = 8192;

/// Why a file cannot be loaded as delimited text
#[derive(Debug, Clone, PartialEq)]
pub enum InputFileError {
    Missing,
    Unreadable,
    Directory,
    /// NUL byte or invalid UTF-8 at `offset`
    Binary { offset: usize },
    TooLarge { bytes: u64 },
    Io(String),
}

impl InputFileError {
    fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::Missing,
            io::ErrorKind::PermissionDenied => Self::Unreadable,
            _ => Self::Io(err.to_string()),
        }
    }

    /// Message naming the file, for the CLI
    pub fn describe(&self, filename: &str) -> String {
        format!("{}: {}", filename, self)
    }
}

impl std::fmt::Display for InputFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "no such file"),
            Self::Unreadable => write!(f, "permission denied"),
            Self::Directory => write!(f, "is a directory"),
            Self::Binary { offset } => {
                write!(f, "not a text file (binary data at byte {})", offset)
            }
            Self::TooLarge { bytes } => write!(
                f,
                "too large ({:.1} MB, max {} MB)",
                *bytes as f64 / (1024.0 * 1024.0),
                MAX_INPUT_BYTES / (1024 * 1024)
            ),
            Self::Io(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for InputFileError {}

/// How the delimiter of an accepted file will be chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Pinned by the `.csv` / `.tsv` extension
    Pinned(Delimiter),
    /// Detected from the content
    Detected,
}

/// Offset of the first byte that rules out delimited text, if any.
///
/// A multi-byte character cut off at the end of the sample is not an error.
pub fn first_binary_byte(sample: &[u8]) -> Option<usize> {
    if let Some(offset) = sample.iter().position(|&b| b == 0) {
        return Some(offset);
    }
    match std::str::from_utf8(sample) {
        Err(e) if e.error_len().is_some() => Some(e.valid_up_to()),
        _ => None,
    }
}

/// Check `path` before reading it into a document
pub fn check_input_file(path: &Path) -> Result<InputKind, InputFileError> {
    let metadata = fs::metadata(path).map_err(InputFileError::from_io)?;
    if metadata.is_dir() {
        return Err(InputFileError::Directory);
    }
    if metadata.len() > MAX_INPUT_BYTES {
        return Err(InputFileError::TooLarge {
            bytes: metadata.len(),
        });
    }

    let mut sample = Vec::with_capacity(SNIFF_LEN);
    File::open(path)
        .and_then(|file| file.take(SNIFF_LEN as u64).read_to_end(&mut sample))
        .map_err(InputFileError::from_io)?;
    if let Some(offset) = first_binary_byte(&sample) {
        return Err(InputFileError::Binary { offset });
    }

    let pinned = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(Delimiter::from_extension);
    match pinned {
        Some(delimiter) => Ok(InputKind::Pinned(delimiter)),
        None => {
            tracing::debug!(path = %path.display(), "delimiter will be detected");
            Ok(InputKind::Detected)
        }
    }
}

/// File name for messages, falling back to the whole path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_with(suffix: &str, bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_extension_pins_delimiter() {
        let csv = temp_with(".csv", b"a,b\n1,2\n");
        assert_eq!(
            check_input_file(csv.path()),
            Ok(InputKind::Pinned(Delimiter::Comma))
        );

        let tsv = temp_with(".TSV", b"a\tb\n");
        assert_eq!(
            check_input_file(tsv.path()),
            Ok(InputKind::Pinned(Delimiter::Tab))
        );

        let txt = temp_with(".txt", b"a;b\n");
        assert_eq!(check_input_file(txt.path()), Ok(InputKind::Detected));
    }

    #[test]
    fn test_rejects_missing_and_directories() {
        assert_eq!(
            check_input_file(Path::new("/nonexistent/path/data.csv")),
            Err(InputFileError::Missing)
        );
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(check_input_file(dir.path()), Err(InputFileError::Directory));
    }

    #[test]
    fn test_rejects_binary_content() {
        let nul = temp_with(".csv", b"name,city\nAda\x00,London\n");
        assert_eq!(
            check_input_file(nul.path()),
            Err(InputFileError::Binary { offset: 13 })
        );

        let latin1 = temp_with(".csv", b"city\nTroms\xf8\n");
        assert_eq!(
            check_input_file(latin1.path()),
            Err(InputFileError::Binary { offset: 10 })
        );
    }

    #[test]
    fn test_truncated_character_at_sample_end_is_text() {
        // "ø" is 0xC3 0xB8; only the lead byte made it into the sample
        assert_eq!(first_binary_byte(b"Troms\xc3"), None);
        assert_eq!(first_binary_byte("Tromsø".as_bytes()), None);
        assert_eq!(first_binary_byte(b"Troms\xc3x"), Some(5));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            InputFileError::Missing.describe("people.csv"),
            "people.csv: no such file"
        );
        assert_eq!(
            InputFileError::TooLarge {
                bytes: 64 * 1024 * 1024
            }
            .describe("big.csv"),
            "big.csv: too large (64.0 MB, max 50 MB)"
        );
        assert_eq!(display_name(Path::new("/data/stock.tsv")), "stock.tsv");
    }
}
