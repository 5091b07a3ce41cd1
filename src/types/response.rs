// src/types/response.rs
//! Payloads exactly as the analysis backend sends them (snake_case)

use serde::{Deserialize, Serialize};

// ===== POST /api/analyze-cv =====

/// Top-level critical fields stay optional here so the normalizer can
/// report which one is missing instead of a generic decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub cv_analysis: Option<CvAnalysis>,
    pub job_recommendations: Option<Vec<JobRecommendation>>,
    pub real_job_offers: Option<Vec<RealJobOffer>>,
    pub training_recommendations: Option<Vec<TrainingRecommendation>>,
    pub ai_insights: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvAnalysis {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub experience_years: Option<u32>,
    pub education: Option<TextOrList>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub summary: Option<String>,
}

/// Education comes back as a list of entries, older backends send one string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl TextOrList {
    pub fn into_entries(self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text],
            Self::List(entries) => entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecommendation {
    pub job_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub match_score: f64,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    pub salary_range: Option<String>,
    pub education_level: Option<String>,
    pub is_alternative: Option<bool>,
    pub alternative_reason: Option<String>,
}

/// Live offer relayed by the backend from France Travail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealJobOffer {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub contract_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub experience_required: String,
    pub salary: Option<String>,
    pub publication_date: Option<String>,
    pub url: Option<String>,
    pub rome_code: Option<String>,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecommendation {
    pub training_id: String,
    pub title: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub skills_acquired: Vec<String>,
    pub relevance_score: f64,
}

// ===== Auxiliary endpoints =====

/// Error body shape used by the backend for non-2xx answers
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub models_loaded: bool,
    #[serde(default)]
    pub database_connected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCatalog {
    pub total: usize,
    #[serde(default)]
    pub jobs: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingCatalog {
    pub total: usize,
    #[serde(default)]
    pub trainings: Vec<serde_json::Value>,
}
