// src/file_validator.rs
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::utils::{media_type_for_name, DOCX_MEDIA_TYPE, PDF_MEDIA_TYPE};

/// Upload ceiling shared with the backend (10 MiB)
pub const MAX_CV_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Docx,
}

impl MediaType {
    pub fn from_declared(media_type: &str) -> Option<Self> {
        match media_type {
            PDF_MEDIA_TYPE => Some(Self::Pdf),
            DOCX_MEDIA_TYPE => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => PDF_MEDIA_TYPE,
            Self::Docx => DOCX_MEDIA_TYPE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        }
    }
}

/// Where the binary content of a file lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    OnDisk(PathBuf),
    InMemory(Vec<u8>),
}

impl FileContent {
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::OnDisk(path) => fs::read(path).await,
            Self::InMemory(bytes) => Ok(bytes.clone()),
        }
    }
}

/// A user selection before validation, identical for both origins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub content: FileContent,
}

/// The two ways a CV reaches the selector
#[derive(Debug, Clone)]
pub enum SelectionEvent {
    /// File picker: type declared from the extension, size from metadata
    Picked(PathBuf),
    /// Drag and drop: the drop payload declares its own type
    Dropped {
        name: String,
        media_type: String,
        bytes: Vec<u8>,
    },
}

impl SelectionEvent {
    pub async fn into_candidate(self) -> Result<FileCandidate, ValidationError> {
        match self {
            Self::Picked(path) => FileCandidate::from_path(&path).await,
            Self::Dropped {
                name,
                media_type,
                bytes,
            } => Ok(FileCandidate {
                name,
                media_type,
                size_bytes: bytes.len() as u64,
                content: FileContent::InMemory(bytes),
            }),
        }
    }
}

impl FileCandidate {
    pub async fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ValidationError::Unreadable {
                    path: path.to_path_buf(),
                    reason: "fichier introuvable".to_string(),
                })
            }
            Err(e) => {
                return Err(ValidationError::Unreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        if !metadata.is_file() {
            return Err(ValidationError::Unreadable {
                path: path.to_path_buf(),
                reason: "pas un fichier ordinaire".to_string(),
            });
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Ok(Self {
            media_type: media_type_for_name(&name).to_string(),
            name,
            size_bytes: metadata.len(),
            content: FileContent::OnDisk(path.to_path_buf()),
        })
    }
}

/// A CV that passed validation. Only `FileValidator` constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    media_type: MediaType,
    size_bytes: u64,
    content: FileContent,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn content(&self) -> &FileContent {
        &self.content
    }

    /// Path to report when the content cannot be read back
    pub fn display_path(&self) -> PathBuf {
        match &self.content {
            FileContent::OnDisk(path) => path.clone(),
            FileContent::InMemory(_) => PathBuf::from(&self.name),
        }
    }
}

pub struct FileValidator;

impl FileValidator {
    /// Presence, then media type, then size
    pub fn validate_file(candidate: Option<FileCandidate>) -> Result<SelectedFile, ValidationError> {
        let candidate = candidate.ok_or(ValidationError::NoFileProvided)?;

        let media_type = match MediaType::from_declared(&candidate.media_type) {
            Some(media_type) => media_type,
            None => {
                warn!(
                    "Rejected {}: unsupported media type {}",
                    candidate.name, candidate.media_type
                );
                return Err(ValidationError::InvalidFormat {
                    media_type: candidate.media_type,
                });
            }
        };

        if candidate.size_bytes > MAX_CV_SIZE {
            warn!(
                "Rejected {}: {} bytes exceeds limit",
                candidate.name, candidate.size_bytes
            );
            return Err(ValidationError::FileTooLarge {
                size_bytes: candidate.size_bytes,
            });
        }

        debug!(
            "Accepted {} ({}, {} bytes)",
            candidate.name,
            media_type.label(),
            candidate.size_bytes
        );

        Ok(SelectedFile {
            name: candidate.name,
            media_type,
            size_bytes: candidate.size_bytes,
            content: candidate.content,
        })
    }
}
