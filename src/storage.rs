//! Reading and writing the scraped document as JSON on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Document;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Pretty-print with a 4-space indent, non-ASCII kept verbatim.
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Serialize `value` fully, then write it to `path`.
///
/// Nothing touches the file system until serialization has succeeded, so a
/// failure leaves any existing file as it was.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), StorageError> {
    let buf = to_pretty_json(value).map_err(StorageError::Serialize)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, &buf).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} bytes to {}", buf.len(), path.display());
    Ok(())
}

/// Save the document to `path`.
pub fn save(document: &Document, path: &Path) -> Result<(), StorageError> {
    write_json(document, path)?;
    let counts = document.counts();
    info!(
        "Saved {} products, {} reviews, {} testimonials to {}",
        counts.products,
        counts.reviews,
        counts.testimonials,
        path.display()
    );
    Ok(())
}

/// Load a document from `path`.
pub fn load(path: &Path) -> Result<Document, StorageError> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StorageError::NotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&contents).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Which of the two document files was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentVariant {
    Annotated,
    Unannotated,
}

impl DocumentVariant {
    pub fn is_annotated(&self) -> bool {
        matches!(self, Self::Annotated)
    }
}

/// A document together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    pub variant: DocumentVariant,
    pub path: PathBuf,
}

/// Load the annotated document, falling back to the unannotated one.
///
/// Returns `NotFound` for the unannotated path when neither file exists.
pub fn load_preferred(annotated: &Path, unannotated: &Path) -> Result<LoadedDocument, StorageError> {
    match load(annotated) {
        Ok(document) => {
            return Ok(LoadedDocument {
                document,
                variant: DocumentVariant::Annotated,
                path: annotated.to_path_buf(),
            })
        }
        Err(e) if e.is_not_found() => {
            debug!("{} missing, falling back to {}", annotated.display(), unannotated.display());
        }
        Err(e) => return Err(e),
    }
    let document = load(unannotated)?;
    Ok(LoadedDocument {
        document,
        variant: DocumentVariant::Unannotated,
        path: unannotated.to_path_buf(),
    })
}
