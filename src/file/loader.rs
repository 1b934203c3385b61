//! JSON document loading.
//!
//! This module reads a document from a file, an inline string or stdin,
//! transparently decompresses gzip input, and parses it into a
//! `serde_json::Value` that queries are matched against.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use flate2::read::GzDecoder;
use log::debug;
use serde_json::{Deserializer, Value};
use thiserror::Error;

/// Where the document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A file on disk. `-` means stdin.
    File(PathBuf),
    /// JSON text given directly on the command line.
    Inline(String),
    Stdin,
}

impl InputSource {
    /// Builds a source from the `-i` and `-s` options, defaulting to stdin.
    pub fn from_options(path: Option<PathBuf>, inline: Option<String>) -> Self {
        match (path, inline) {
            (_, Some(text)) => InputSource::Inline(text),
            (Some(path), None) if path.as_os_str() == "-" => InputSource::Stdin,
            (Some(path), None) => InputSource::File(path),
            (None, None) => InputSource::Stdin,
        }
    }
}

/// Errors that can occur while loading a document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("Failed to read input: {0}")]
    Read(#[source] io::Error),
    #[error("Failed to decompress gzip input: {0}")]
    Decompress(#[source] io::Error),
    #[error("Failed to parse JSON data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to parse JSON data: no JSON value found")]
    Empty,
}

impl LoadError {
    /// Process exit status reported for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            LoadError::Open { .. } => 125,
            _ => 126,
        }
    }
}

/// Loads and parses a document.
///
/// In array mode every JSON value found in the input becomes one element of
/// a top-level array, which suits JSON log files. Otherwise the first value
/// is the document and anything after it is ignored.
///
/// # Examples
///
/// ```
/// use jsonfilter::file::loader::{load_document, InputSource};
///
/// let doc = load_document(&InputSource::Inline("{\"a\": 1}".to_string()), false).unwrap();
/// assert_eq!(doc["a"], 1);
/// ```
pub fn load_document(source: &InputSource, array_mode: bool) -> Result<Value, LoadError> {
    let bytes = read_source(source)?;
    let content = decode(bytes)?;
    debug!("loaded {} bytes from {:?}", content.len(), source);
    parse_content(&content, array_mode)
}

/// Parses JSON text, either as a single value or as a sequence of values.
pub fn parse_content(content: &str, array_mode: bool) -> Result<Value, LoadError> {
    let mut values = Deserializer::from_str(content).into_iter::<Value>();

    if array_mode {
        let items = values.collect::<Result<Vec<_>, _>>()?;
        return Ok(Value::Array(items));
    }

    match values.next() {
        Some(value) => Ok(value?),
        None => Err(LoadError::Empty),
    }
}

fn read_source(source: &InputSource) -> Result<Vec<u8>, LoadError> {
    match source {
        InputSource::File(path) => {
            let mut file = fs::File::open(path).map_err(|source| LoadError::Open {
                path: path.clone(),
                source,
            })?;
            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer).map_err(LoadError::Read)?;
            Ok(buffer)
        }
        InputSource::Inline(text) => Ok(text.as_bytes().to_vec()),
        InputSource::Stdin => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .map_err(LoadError::Read)?;
            Ok(buffer)
        }
    }
}

/// Decompresses gzip data (magic bytes 0x1f 0x8b) and checks UTF-8.
fn decode(bytes: Vec<u8>) -> Result<String, LoadError> {
    if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut content = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut content)
            .map_err(LoadError::Decompress)?;
        return Ok(content);
    }

    String::from_utf8(bytes)
        .map_err(|err| LoadError::Read(io::Error::new(io::ErrorKind::InvalidData, err)))
}
