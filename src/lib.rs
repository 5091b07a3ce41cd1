//! Client for the JobMatchAI CV analysis backend: file selection and
//! validation, the upload call, normalization of the answer into a
//! view-model, and the session state machine tying them together.

pub mod core;
pub mod environment;
pub mod error;
pub mod file_validator;
pub mod normalizer;
pub mod render;
pub mod session;
pub mod types;
pub mod utils;

pub use crate::core::ServiceClient;
pub use environment::EnvironmentConfig;
pub use error::{AnalysisError, ConfigError, ValidationError};
pub use file_validator::{FileCandidate, FileValidator, SelectedFile, SelectionEvent, MAX_CV_SIZE};
pub use normalizer::normalize;
pub use render::{JsonRenderer, Renderer, TerminalRenderer};
pub use session::{AnalysisBackend, AnalysisRequestState, AnalysisSession, SessionView};
pub use types::view_model::AnalysisResult;
