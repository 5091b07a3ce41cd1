// src/render.rs
//! Presentation: renderers read a `SessionView` and write it out. They keep
//! no state about the session between calls.

use std::io::Write;

use crate::session::{AnalysisRequestState, SessionView};
use crate::types::view_model::{AnalysisResult, JobOffer, RecommendedOccupation};
use crate::utils::{format_size, truncate_chars};

const OFFER_DESCRIPTION_CHARS: usize = 200;
const OFFER_SKILLS_SHOWN: usize = 5;

pub trait Renderer {
    fn render(&mut self, view: &SessionView<'_>) -> std::io::Result<()>;
}

/// Plain-text report, French labels as in the web UI
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_result(&mut self, result: &AnalysisResult) -> std::io::Result<()> {
        let profile = &result.profile;
        writeln!(self.out, "👤 Profil analysé")?;
        writeln!(self.out, "Nom: {}", profile.name)?;
        if let Some(email) = &profile.email {
            writeln!(self.out, "Email: {}", email)?;
        }
        if let Some(years) = profile.years_experience {
            writeln!(self.out, "Expérience: {} ans", years)?;
        }
        writeln!(self.out, "Compétences détectées: {}", profile.skills.join(", "))?;
        if !profile.languages_spoken.is_empty() {
            writeln!(self.out, "Langues: {}", profile.languages_spoken.join(", "))?;
        }
        if !profile.education_summary.is_empty() {
            writeln!(self.out, "Formation: {}", profile.education_summary.join("; "))?;
        }
        if let Some(summary) = profile.free_text_summary.as_deref().filter(|s| !s.is_empty()) {
            writeln!(self.out, "  {}", summary)?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "💼 Métiers recommandés")?;
        for occupation in &result.occupations {
            self.render_occupation(occupation)?;
        }

        if let Some(insights) = result.ai_insight_text.as_deref().filter(|s| !s.is_empty()) {
            writeln!(self.out)?;
            writeln!(self.out, "🤖 Conseils IA personnalisés")?;
            writeln!(self.out, "{}", insights)?;
        }

        if !result.job_offers.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "💼 Offres d'emploi réelles")?;
            for offer in &result.job_offers {
                self.render_offer(offer)?;
            }
        }

        if !result.trainings.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "🎓 Formations recommandées")?;
            for training in &result.trainings {
                writeln!(
                    self.out,
                    "- {} ({}% pertinent)",
                    training.title, training.relevance_score
                )?;
                writeln!(self.out, "  📚 {} • ⏱️ {}", training.provider, training.duration)?;
                if !training.skills_acquired.is_empty() {
                    writeln!(self.out, "  {}", training.skills_acquired.join(", "))?;
                }
                writeln!(self.out, "  🔗 {}", training.external_url)?;
            }
        }

        Ok(())
    }

    fn render_occupation(&mut self, occupation: &RecommendedOccupation) -> std::io::Result<()> {
        writeln!(
            self.out,
            "- {} ({}% match)",
            occupation.title, occupation.match_score
        )?;
        if let Some(salary) = &occupation.salary_range {
            writeln!(self.out, "  💰 {}", salary)?;
        }
        if occupation.is_alternative {
            if let Some(reason) = &occupation.alternative_reason {
                writeln!(self.out, "  ↪ {}", reason)?;
            }
        }
        if !occupation.description.is_empty() {
            writeln!(self.out, "  {}", occupation.description)?;
        }
        if !occupation.missing_skills.is_empty() {
            writeln!(
                self.out,
                "  ⚠️ Compétences à développer: {}",
                occupation.missing_skills.join(", ")
            )?;
        }
        Ok(())
    }

    fn render_offer(&mut self, offer: &JobOffer) -> std::io::Result<()> {
        writeln!(self.out, "- {} [{}]", offer.title, offer.source_label)?;
        writeln!(self.out, "  🏢 {} • 📍 {}", offer.company, offer.location)?;
        match &offer.salary {
            Some(salary) => writeln!(
                self.out,
                "  📝 {} • {} • 💰 {}",
                offer.contract_type, offer.experience_required, salary
            )?,
            None => writeln!(
                self.out,
                "  📝 {} • {}",
                offer.contract_type, offer.experience_required
            )?,
        }
        if !offer.description.is_empty() {
            writeln!(
                self.out,
                "  {}",
                truncate_chars(&offer.description, OFFER_DESCRIPTION_CHARS)
            )?;
        }
        if !offer.required_skills.is_empty() {
            let shown: Vec<&str> = offer
                .required_skills
                .iter()
                .take(OFFER_SKILLS_SHOWN)
                .map(String::as_str)
                .collect();
            writeln!(self.out, "  {}", shown.join(", "))?;
        }
        if let Some(url) = offer.external_url.as_deref().filter(|u| !u.is_empty()) {
            writeln!(self.out, "  Voir l'offre → {}", url)?;
        }
        if let Some(date) = offer.publication_date {
            writeln!(self.out, "  Publié le {}", date.format("%d/%m/%Y"))?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &SessionView<'_>) -> std::io::Result<()> {
        match view.selected {
            Some(file) => writeln!(
                self.out,
                "📎 {} ({}, {})",
                file.name(),
                file.media_type().label(),
                format_size(file.size_bytes())
            )?,
            None => writeln!(self.out, "📎 Aucun fichier sélectionné")?,
        }
        if let Some(error) = view.selection_error {
            writeln!(self.out, "❌ Erreur: {}", error)?;
        }

        match view.state {
            AnalysisRequestState::Idle => {}
            AnalysisRequestState::InFlight => writeln!(self.out, "🔄 Analyse en cours...")?,
            AnalysisRequestState::Failed(message) => {
                writeln!(self.out, "❌ Erreur: {}", message)?
            }
            AnalysisRequestState::Succeeded(result) => {
                writeln!(self.out)?;
                self.render_result(result)?;
            }
        }
        self.out.flush()
    }
}

/// Machine-readable output: the camelCase view-model, or an error object
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, view: &SessionView<'_>) -> std::io::Result<()> {
        let value = match view.state {
            AnalysisRequestState::Succeeded(result) => serde_json::to_value(result)?,
            AnalysisRequestState::Failed(message) => serde_json::json!({ "error": message }),
            AnalysisRequestState::InFlight => serde_json::json!({ "status": "in_flight" }),
            AnalysisRequestState::Idle => match view.selection_error {
                Some(error) => serde_json::json!({ "error": error }),
                None => serde_json::json!({ "status": "idle" }),
            },
        };
        serde_json::to_writer_pretty(&mut self.out, &value)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::view_model::{Profile, RecommendedTraining};
    use chrono::NaiveDate;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            profile: Profile {
                name: "Jane Doe".to_string(),
                email: None,
                phone: None,
                years_experience: Some(5),
                skills: vec!["Python".to_string(), "SQL".to_string()],
                languages_spoken: vec![],
                education_summary: vec![],
                free_text_summary: None,
            },
            occupations: vec![RecommendedOccupation {
                id: "M1403".to_string(),
                title: "Data Analyst".to_string(),
                description: "Analyse data".to_string(),
                match_score: 82,
                required_skills: vec!["SQL".to_string()],
                missing_skills: vec![],
                salary_range: Some("35-45k€".to_string()),
                education_level: None,
                is_alternative: false,
                alternative_reason: None,
            }],
            job_offers: vec![JobOffer {
                id: "190XKLM".to_string(),
                title: "Data Analyst H/F".to_string(),
                company: "ACME".to_string(),
                location: "75 - Paris".to_string(),
                contract_type: "CDI".to_string(),
                description: "x".repeat(300),
                required_skills: (1..=7).map(|i| format!("S{}", i)).collect(),
                experience_required: "2 ans".to_string(),
                salary: None,
                publication_date: NaiveDate::from_ymd_opt(2025, 10, 30),
                external_url: None,
                classification_code: Some("M1403".to_string()),
                source_label: "France Travail".to_string(),
            }],
            trainings: vec![RecommendedTraining {
                id: "t1".to_string(),
                title: "Tableau".to_string(),
                provider: "Coursera".to_string(),
                external_url: "https://example.org".to_string(),
                duration: "4 semaines".to_string(),
                skills_acquired: vec!["Tableau".to_string()],
                relevance_score: 77,
            }],
            ai_insight_text: None,
        }
    }

    fn render_text(state: &AnalysisRequestState) -> String {
        let view = SessionView {
            state,
            selected: None,
            selection_error: None,
        };
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&view).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_terminal_sections_follow_data() {
        let text = render_text(&AnalysisRequestState::Succeeded(sample_result()));

        assert!(text.contains("Nom: Jane Doe"));
        assert!(!text.contains("Email:"));
        assert!(text.contains("Expérience: 5 ans"));
        assert!(text.contains("Data Analyst (82% match)"));
        assert!(!text.contains("Compétences à développer"));
        assert!(!text.contains("Conseils IA"));
        assert!(text.contains(&format!("{}...", "x".repeat(200))));
        assert!(text.contains("S5"));
        assert!(!text.contains("S6"));
        assert!(text.contains("Publié le 30/10/2025"));
        assert!(text.contains("Tableau (77% pertinent)"));
    }

    #[test]
    fn test_terminal_failure_and_progress() {
        let text = render_text(&AnalysisRequestState::Failed("backend down".to_string()));
        assert!(text.contains("❌ Erreur: backend down"));

        let text = render_text(&AnalysisRequestState::InFlight);
        assert!(text.contains("Analyse en cours"));
    }

    #[test]
    fn test_json_renderer() {
        let state = AnalysisRequestState::Succeeded(sample_result());
        let view = SessionView {
            state: &state,
            selected: None,
            selection_error: None,
        };
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render(&view).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&renderer.into_inner()).unwrap();
        assert_eq!(value["occupations"][0]["matchScore"], 82);
        assert_eq!(value["jobOffers"][0]["publicationDate"], "2025-10-30");
        assert!(value["profile"]["email"].is_null());
    }
}
