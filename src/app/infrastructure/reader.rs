//! Read capability: materializes a file's content as text, bytes or a
//! `data:` reference.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::{AppError, Result};
use crate::app::domain::document::FileMeta;
use crate::app::services::classify::guess_mime;
use crate::app::services::text_ops::extract_filename;

/// A file handed to the session (dropped, browsed or named on the command
/// line) before its content has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    pub meta: FileMeta,
    pub path: Option<PathBuf>,
}

impl RawInput {
    /// Metadata-only input, for readers that locate content by name.
    pub fn named(name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        let mime_type_hint = guess_mime(&name).to_string();
        Self {
            meta: FileMeta {
                name,
                size_bytes,
                mime_type_hint,
                last_modified_ms: 0,
            },
            path: None,
        }
    }

    /// Stat a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        if metadata.is_dir() {
            return Err(AppError::UnsupportedInput(format!(
                "{} is a directory",
                path.display()
            )));
        }
        let name = extract_filename(path);
        let last_modified_ms = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Ok(Self {
            meta: FileMeta {
                mime_type_hint: guess_mime(&name).to_string(),
                name,
                size_bytes: metadata.len(),
                last_modified_ms,
            },
            path: Some(path.to_path_buf()),
        })
    }
}

pub trait FileReader {
    fn read_binary(&self, input: &RawInput) -> Result<Vec<u8>>;

    /// UTF-8 decode. A leading byte-order mark is dropped; invalid UTF-8 is
    /// an unsupported input.
    fn read_text(&self, input: &RawInput) -> Result<String> {
        let bytes = self.read_binary(input)?;
        decode_text(&input.meta.name, bytes)
    }

    /// `data:<mime>;base64,<payload>` reference.
    fn read_encoded(&self, input: &RawInput) -> Result<String> {
        let bytes = self.read_binary(input)?;
        Ok(encode_data_url(&input.meta.mime_type_hint, &bytes))
    }
}

fn decode_text(name: &str, bytes: Vec<u8>) -> Result<String> {
    let mut text = String::from_utf8(bytes)
        .map_err(|_| AppError::UnsupportedInput(format!("{name} is not valid UTF-8 text")))?;
    if text.starts_with('\u{feff}') {
        text.replace_range(..'\u{feff}'.len_utf8(), "");
    }
    Ok(text)
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    let mime = if mime.is_empty() { "application/octet-stream" } else { mime };
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Inverse of [`encode_data_url`]; returns the mime type and raw bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| AppError::UnsupportedInput("not a data reference".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::UnsupportedInput("data reference has no payload".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| AppError::UnsupportedInput("data reference is not base64".to_string()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| AppError::UnsupportedInput(format!("bad base64 payload: {e}")))?;
    Ok((mime.to_string(), bytes))
}

/// Reads from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read_binary(&self, input: &RawInput) -> Result<Vec<u8>> {
        let path = input.path.as_ref().ok_or_else(|| {
            AppError::UnsupportedInput(format!("{} has no path on disk", input.meta.name))
        })?;
        Ok(fs::read(path)?)
    }
}

/// Serves files from memory by name. Names marked as failing return an I/O
/// error, which lets hosts and tests exercise the failure path.
#[derive(Debug, Default, Clone)]
pub struct MemoryReader {
    files: HashMap<String, Vec<u8>>,
    failing: Vec<String>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), bytes.into());
    }

    pub fn with_file(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn fail_on(&mut self, name: impl Into<String>) {
        self.failing.push(name.into());
    }

    /// Build a [`RawInput`] for a stored file.
    pub fn input(&self, name: &str) -> Option<RawInput> {
        let bytes = self.files.get(name)?;
        Some(RawInput::named(name, bytes.len() as u64))
    }
}

impl FileReader for MemoryReader {
    fn read_binary(&self, input: &RawInput) -> Result<Vec<u8>> {
        let name = &input.meta.name;
        if self.failing.iter().any(|f| f == name) {
            return Err(AppError::Io(std::io::Error::other(format!("failed to read {name}"))));
        }
        self.files.get(name).cloned().ok_or_else(|| {
            AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{name} not found"),
            ))
        })
    }
}
