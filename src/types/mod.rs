// src/types/mod.rs
//! Backend wire types and the normalized view-model

pub mod response;
pub mod view_model;

pub use response::{
    AnalysisResponse, CvAnalysis, HealthStatus, JobCatalog, JobRecommendation, RealJobOffer,
    TrainingCatalog, TrainingRecommendation, UploadReceipt,
};
pub use view_model::{
    AnalysisResult, Profile, JobOffer, RecommendedOccupation, RecommendedTraining,
};
