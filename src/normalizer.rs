// src/normalizer.rs
//! Maps the backend payload onto the view-model. Pure: no I/O, same input
//! gives the same output.

use chrono::{DateTime, NaiveDate};
use tracing::warn;

use crate::error::AnalysisError;
use crate::types::response::{
    AnalysisResponse, CvAnalysis, JobRecommendation, RealJobOffer, TrainingRecommendation,
};
use crate::types::view_model::{
    AnalysisResult, JobOffer, Profile, RecommendedOccupation, RecommendedTraining,
};
use crate::utils::fraction_to_percent;

pub fn normalize(raw: &AnalysisResponse) -> Result<AnalysisResult, AnalysisError> {
    let cv_analysis = raw
        .cv_analysis
        .as_ref()
        .ok_or_else(|| AnalysisError::malformed("missing cv_analysis"))?;
    let jobs = raw
        .job_recommendations
        .as_ref()
        .ok_or_else(|| AnalysisError::malformed("missing job_recommendations"))?;
    let offers = raw
        .real_job_offers
        .as_ref()
        .ok_or_else(|| AnalysisError::malformed("missing real_job_offers"))?;
    let trainings = raw
        .training_recommendations
        .as_ref()
        .ok_or_else(|| AnalysisError::malformed("missing training_recommendations"))?;

    Ok(AnalysisResult {
        profile: normalize_profile(cv_analysis)?,
        occupations: jobs
            .iter()
            .map(normalize_occupation)
            .collect::<Result<_, _>>()?,
        job_offers: offers.iter().map(normalize_offer).collect(),
        trainings: trainings
            .iter()
            .map(normalize_training)
            .collect::<Result<_, _>>()?,
        ai_insight_text: raw.ai_insights.clone(),
    })
}

fn normalize_profile(cv: &CvAnalysis) -> Result<Profile, AnalysisError> {
    let name = cv
        .name
        .clone()
        .ok_or_else(|| AnalysisError::malformed("missing cv_analysis.name"))?;

    Ok(Profile {
        name,
        email: cv.email.clone(),
        phone: cv.phone.clone(),
        years_experience: cv.experience_years,
        skills: cv.skills.clone(),
        languages_spoken: cv.languages.clone(),
        education_summary: cv
            .education
            .clone()
            .map(|education| education.into_entries())
            .unwrap_or_default(),
        free_text_summary: cv.summary.clone(),
    })
}

fn normalize_occupation(job: &JobRecommendation) -> Result<RecommendedOccupation, AnalysisError> {
    let match_score = fraction_to_percent(job.match_score).ok_or_else(|| {
        AnalysisError::malformed(format!("invalid match_score for job {}", job.job_id))
    })?;

    Ok(RecommendedOccupation {
        id: job.job_id.clone(),
        title: job.title.clone(),
        description: job.description.clone(),
        match_score,
        required_skills: job.required_skills.clone(),
        missing_skills: job.missing_skills.clone(),
        salary_range: job.salary_range.clone(),
        education_level: job.education_level.clone(),
        is_alternative: job.is_alternative.unwrap_or(false),
        alternative_reason: job.alternative_reason.clone(),
    })
}

fn normalize_offer(offer: &RealJobOffer) -> JobOffer {
    JobOffer {
        id: offer.id.clone(),
        title: offer.title.clone(),
        company: offer.company.clone(),
        location: offer.location.clone(),
        contract_type: offer.contract_type.clone(),
        description: offer.description.clone(),
        required_skills: offer.required_skills.clone(),
        experience_required: offer.experience_required.clone(),
        salary: offer.salary.clone(),
        publication_date: offer
            .publication_date
            .as_deref()
            .and_then(|raw| parse_publication_date(&offer.id, raw)),
        external_url: offer.url.clone(),
        classification_code: offer.rome_code.clone(),
        source_label: offer.source.clone(),
    }
}

fn normalize_training(
    training: &TrainingRecommendation,
) -> Result<RecommendedTraining, AnalysisError> {
    let relevance_score = fraction_to_percent(training.relevance_score).ok_or_else(|| {
        AnalysisError::malformed(format!(
            "invalid relevance_score for training {}",
            training.training_id
        ))
    })?;

    Ok(RecommendedTraining {
        id: training.training_id.clone(),
        title: training.title.clone(),
        provider: training.provider.clone(),
        external_url: training.url.clone(),
        duration: training.duration.clone(),
        skills_acquired: training.skills_acquired.clone(),
        relevance_score,
    })
}

/// France Travail sends RFC 3339 timestamps; plain dates are accepted too
fn parse_publication_date(offer_id: &str, raw: &str) -> Option<NaiveDate> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    // Date part of a timestamp without offset, e.g. "2025-10-30T08:15:00"
    let date_part = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(
                "Unparseable publication_date '{}' on offer {}",
                raw, offer_id
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane_doe_payload() -> serde_json::Value {
        serde_json::json!({
            "cv_analysis": {
                "name": "Jane Doe",
                "email": "jane@example.com",
                "skills": ["Python", "SQL"],
                "experience_years": 5,
                "summary": "Data professional"
            },
            "job_recommendations": [{
                "job_id": "1",
                "title": "Data Analyst",
                "description": "Analyse data",
                "match_score": 0.82,
                "required_skills": ["SQL"],
                "missing_skills": ["Tableau"],
                "salary_range": "35-45k€",
                "education_level": "Bac+3"
            }],
            "real_job_offers": [],
            "training_recommendations": [],
            "ai_insights": "Focus on..."
        })
    }

    fn parse(value: serde_json::Value) -> AnalysisResponse {
        serde_json::from_value(value).unwrap()
    }

    fn occupation(id: &str, score: f64) -> serde_json::Value {
        serde_json::json!({
            "job_id": id,
            "title": format!("Job {}", id),
            "description": "",
            "match_score": score,
            "required_skills": [],
            "missing_skills": []
        })
    }

    #[test]
    fn test_jane_doe_scenario() {
        let result = normalize(&parse(jane_doe_payload())).unwrap();

        assert_eq!(result.profile.name, "Jane Doe");
        assert_eq!(result.profile.email.as_deref(), Some("jane@example.com"));
        assert_eq!(result.profile.years_experience, Some(5));
        assert_eq!(result.profile.skills, vec!["Python", "SQL"]);
        assert!(result.profile.languages_spoken.is_empty());
        assert!(result.profile.education_summary.is_empty());
        assert_eq!(result.profile.phone, None);

        assert_eq!(result.occupations.len(), 1);
        let occupation = &result.occupations[0];
        assert_eq!(occupation.match_score, 82);
        assert_eq!(occupation.missing_skills, vec!["Tableau"]);
        assert_eq!(occupation.salary_range.as_deref(), Some("35-45k€"));
        assert!(!occupation.is_alternative);

        assert!(result.job_offers.is_empty());
        assert!(result.trainings.is_empty());
        assert_eq!(result.ai_insight_text.as_deref(), Some("Focus on..."));
    }

    #[test]
    fn test_normalize_is_repeatable() {
        let raw = parse(jane_doe_payload());
        assert_eq!(normalize(&raw).unwrap(), normalize(&raw).unwrap());
    }

    #[test]
    fn test_backend_order_is_kept() {
        let mut payload = jane_doe_payload();
        payload["job_recommendations"] = serde_json::json!([
            occupation("B", 0.40),
            occupation("A", 0.90),
            occupation("C", 0.10)
        ]);

        let result = normalize(&parse(payload)).unwrap();
        let ids: Vec<&str> = result.occupations.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_score_rounding() {
        let mut payload = jane_doe_payload();
        payload["job_recommendations"] = serde_json::json!([
            occupation("a", 0.873),
            occupation("b", 0.005),
            occupation("c", 0.0),
            occupation("d", 1.0)
        ]);
        payload["training_recommendations"] = serde_json::json!([{
            "training_id": "t1",
            "title": "SQL avancé",
            "provider": "OpenClassrooms",
            "url": "https://example.org/sql",
            "duration": "20h",
            "skills_acquired": ["SQL"],
            "relevance_score": 0.765
        }]);

        let result = normalize(&parse(payload)).unwrap();
        let scores: Vec<u8> = result.occupations.iter().map(|o| o.match_score).collect();
        assert_eq!(scores, vec![87, 1, 0, 100]);
        assert_eq!(result.trainings[0].relevance_score, 77);
        assert_eq!(result.trainings[0].external_url, "https://example.org/sql");
    }

    #[test]
    fn test_missing_critical_fields() {
        for field in [
            "cv_analysis",
            "job_recommendations",
            "real_job_offers",
            "training_recommendations",
        ] {
            let mut payload = jane_doe_payload();
            payload.as_object_mut().unwrap().remove(field);
            let err = normalize(&parse(payload)).unwrap_err();
            assert!(
                matches!(&err, AnalysisError::MalformedResponse(msg) if msg.contains(field)),
                "unexpected error for {}: {:?}",
                field,
                err
            );
        }

        let mut payload = jane_doe_payload();
        payload["cv_analysis"]["name"] = serde_json::Value::Null;
        assert!(matches!(
            normalize(&parse(payload)),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_absent_optionals_stay_absent() {
        let mut payload = jane_doe_payload();
        payload["cv_analysis"]
            .as_object_mut()
            .unwrap()
            .remove("email");
        payload["cv_analysis"]["summary"] = serde_json::json!("");
        payload.as_object_mut().unwrap().remove("ai_insights");

        let result = normalize(&parse(payload)).unwrap();
        assert_eq!(result.profile.email, None);
        assert_eq!(result.profile.free_text_summary.as_deref(), Some(""));
        assert_eq!(result.ai_insight_text, None);
    }

    #[test]
    fn test_real_offer_mapping() {
        let mut payload = jane_doe_payload();
        payload["cv_analysis"]["education"] = serde_json::json!(["Master Data Science"]);
        payload["real_job_offers"] = serde_json::json!([{
            "id": "190XKLM",
            "title": "Data Analyst H/F",
            "company": "ACME",
            "location": "75 - Paris",
            "contract_type": "CDI",
            "description": "Poste en CDI",
            "required_skills": ["SQL", "Power BI"],
            "experience_required": "2 ans",
            "publication_date": "2025-10-30T08:15:00.000Z",
            "url": "https://candidat.francetravail.fr/offres/190XKLM",
            "rome_code": "M1403",
            "source": "France Travail"
        }]);

        let result = normalize(&parse(payload)).unwrap();
        assert_eq!(result.profile.education_summary, vec!["Master Data Science"]);

        let offer = &result.job_offers[0];
        assert_eq!(offer.salary, None);
        assert_eq!(offer.classification_code.as_deref(), Some("M1403"));
        assert_eq!(offer.source_label, "France Travail");
        assert_eq!(
            offer.publication_date,
            NaiveDate::from_ymd_opt(2025, 10, 30)
        );
    }

    #[test]
    fn test_publication_date_formats() {
        assert_eq!(
            parse_publication_date("x", "2025-01-02"),
            NaiveDate::from_ymd_opt(2025, 1, 2)
        );
        assert_eq!(
            parse_publication_date("x", "2025-01-02T23:10:00"),
            NaiveDate::from_ymd_opt(2025, 1, 2)
        );
        assert_eq!(parse_publication_date("x", "hier"), None);
    }

    #[test]
    fn test_view_model_serializes_camel_case() {
        let result = normalize(&parse(jane_doe_payload())).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["profile"]["yearsExperience"], 5);
        assert_eq!(json["occupations"][0]["matchScore"], 82);
        assert_eq!(json["occupations"][0]["missingSkills"][0], "Tableau");
        assert_eq!(json["aiInsightText"], "Focus on...");
        assert!(json["profile"]["phone"].is_null());
    }
}
