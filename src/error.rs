// src/error.rs
//! Error taxonomy for file selection, analysis requests and configuration

use std::path::PathBuf;
use thiserror::Error;

/// Rejections raised locally, before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Aucun fichier sélectionné")]
    NoFileProvided,

    #[error("Impossible de lire {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("Type de fichier non supporté '{media_type}'. Seuls les fichiers PDF et DOCX sont acceptés.")]
    InvalidFormat { media_type: String },

    #[error("Fichier trop volumineux: {:.1} Mo (max 10 Mo)", megabytes(.size_bytes))]
    FileTooLarge { size_bytes: u64 },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoFileProvided => "CV_NOT_PROVIDED",
            Self::Unreadable { .. } => "CV_UNREADABLE",
            Self::InvalidFormat { .. } => "CV_INVALID_FORMAT",
            Self::FileTooLarge { .. } => "CV_TOO_LARGE",
        }
    }

    /// Hint shown next to the error so the user knows what to pick instead
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NoFileProvided => "Sélectionnez un fichier PDF ou DOCX",
            Self::Unreadable { .. } => "Vérifiez les droits d'accès ou choisissez un autre fichier",
            Self::InvalidFormat { .. } => "Exportez votre CV en PDF ou DOCX puis réessayez",
            Self::FileTooLarge { .. } => "Compressez le document ou retirez les images intégrées",
        }
    }
}

/// Failures of a submitted analysis attempt. Every variant ends the attempt
/// and moves the session to `Failed`.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No response reached the client
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("Backend returned status {status}{}", detail_suffix(.detail))]
    Backend { status: u16, detail: Option<String> },

    /// Success status but the payload lacks what the normalizer needs
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The multipart body could not be assembled
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The staged file could not be read back at submission time
    #[error("Failed to read {}: {source}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Localized fallback used when the backend gave no usable detail
    pub fn fallback_message(port: u16) -> String {
        format!(
            "Erreur lors de l'analyse du CV. Vérifiez que le backend est lancé sur le port {}.",
            port
        )
    }

    /// Single human-readable line for the `Failed` state
    pub fn user_message(&self, port: u16) -> String {
        match self {
            Self::Backend {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            Self::Backend { .. } | Self::Transport(_) => {
                Self::fallback_message(port)
            }
            Self::MalformedResponse(reason) => {
                format!("Réponse inattendue du serveur d'analyse: {}", reason)
            }
            Self::InvalidRequest(reason) => {
                format!("Impossible de préparer la requête: {}", reason)
            }
            Self::FileUnreadable { path, .. } => {
                format!("Impossible de relire le fichier {}", path.display())
            }
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

fn megabytes(size_bytes: &u64) -> f64 {
    *size_bytes as f64 / 1024.0 / 1024.0
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
