//! Reading and writing whole documents.
//!
//! Writes go to `<file>.tmp` first and are renamed over the destination, so a
//! failed save leaves the previous file intact.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::schema::decode_attribute;
use crate::tree::{FormatError, Node, json, xml};

/// On-disk document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Xml,
    Json,
}

impl DocumentFormat {
    /// Pick a format from the file extension; anything but `.json` is XML.
    pub fn from_path(path: &Path) -> DocumentFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Xml,
        }
    }

    /// # Errors
    /// JSON serialisation failures.
    pub fn render(self, root: &Node) -> Result<String, FormatError> {
        match self {
            DocumentFormat::Xml => Ok(xml::to_xml_string(root)),
            DocumentFormat::Json => json::to_json_string(root),
        }
    }

    /// Parse a document. XML attributes are typed through the field schema.
    ///
    /// # Errors
    /// Malformed text or a tree shape the format can't express.
    pub fn parse(self, text: &str) -> Result<Node, FormatError> {
        match self {
            DocumentFormat::Xml => xml::from_xml_str(text, &decode_attribute),
            DocumentFormat::Json => json::from_json_str(text),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Xml => write!(f, "XML"),
            DocumentFormat::Json => write!(f, "JSON"),
        }
    }
}

/// Replace `path` with `text`, creating parent directories as needed.
///
/// # Errors
/// Any I/O failure; the destination is unchanged and the temp file removed.
pub fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, text)?;
    if let Err(error) = fs::rename(&tmp_path, path) {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            warn!("could not remove temp file {}: {cleanup}", tmp_path.display());
        }
        return Err(error);
    }
    info!("wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document");
    path.with_file_name(format!("{file_name}.tmp"))
}
