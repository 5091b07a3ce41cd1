// src/types/view_model.rs
//! Flat, presentation-ready shape of one analysis (camelCase when serialized)

use chrono::NaiveDate;
use serde::Serialize;

/// Result of one analysis. Replaced wholesale by every new analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub profile: Profile,
    /// Rank order as returned by the backend
    pub occupations: Vec<RecommendedOccupation>,
    pub job_offers: Vec<JobOffer>,
    pub trainings: Vec<RecommendedTraining>,
    /// Opaque narrative, shown verbatim
    pub ai_insight_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub years_experience: Option<u32>,
    pub skills: Vec<String>,
    pub languages_spoken: Vec<String>,
    pub education_summary: Vec<String>,
    pub free_text_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedOccupation {
    pub id: String,
    pub title: String,
    pub description: String,
    /// 0..=100
    pub match_score: u8,
    pub required_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub salary_range: Option<String>,
    pub education_level: Option<String>,
    pub is_alternative: bool,
    pub alternative_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOffer {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub contract_type: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub experience_required: String,
    pub salary: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub external_url: Option<String>,
    /// ROME occupation code
    pub classification_code: Option<String>,
    pub source_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedTraining {
    pub id: String,
    pub title: String,
    pub provider: String,
    pub external_url: String,
    pub duration: String,
    pub skills_acquired: Vec<String>,
    /// 0..=100
    pub relevance_score: u8,
}
