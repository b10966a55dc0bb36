//! Language-model exam selection
//!
//! Given the exams of one catalog, asks the chat backend which label best
//! fits the patient's own words.

use examcode_core::{ChatBackend, ChatMessage, ExamCatalog};
use std::sync::Arc;
use tracing::{error, info};

/// Literal answer the model gives when no exam fits
pub const NO_MATCH_TOKEN: &str = "None";

/// Outcome of asking the model for an exam
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The model answered with this text, verbatim
    Matched(String),

    /// The model said no exam fits
    NoMatch,

    /// The model could not be asked or its reply was unusable
    Failed(String),
}

impl Selection {
    /// Classify a raw model answer
    pub fn from_answer(answer: String) -> Self {
        if answer.trim() == NO_MATCH_TOKEN {
            Selection::NoMatch
        } else {
            Selection::Matched(answer)
        }
    }

    /// Label chosen by the model, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            Selection::Matched(label) => Some(label),
            Selection::NoMatch | Selection::Failed(_) => None,
        }
    }

    /// Short outcome name, used as a metrics label
    pub fn outcome(&self) -> &'static str {
        match self {
            Selection::Matched(_) => "matched",
            Selection::NoMatch => "no_match",
            Selection::Failed(_) => "failed",
        }
    }
}

/// Picks the best exam label for a query using a chat backend
#[derive(Clone)]
pub struct ExamSelector {
    backend: Arc<dyn ChatBackend>,
}

impl ExamSelector {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// System instruction listing every exam label of the catalog
    pub fn system_prompt(catalog: &ExamCatalog) -> String {
        let labels = catalog.labels().collect::<Vec<_>>().join(", ");
        format!(
            "Voici la liste des examens médicaux proposés par notre centre d'imagerie médicale : {}. \n\
             Veuillez analyser la phrase suivante exprimée par un patient et identifier l'examen le plus adapté à son besoin. \
             Répondez uniquement par le nom de l'examen correspondant. Si aucun ne convient répondre par '{}' ",
            labels, NO_MATCH_TOKEN
        )
    }

    /// Ask the backend which exam fits `text`. Backend failures are logged
    /// and reported as `Selection::Failed`, never propagated.
    pub async fn select(&self, text: &str, catalog: &ExamCatalog) -> Selection {
        let messages = [
            ChatMessage::system(Self::system_prompt(catalog)),
            ChatMessage::user(text),
        ];

        match self.backend.complete(&messages).await {
            Ok(answer) => {
                info!("Model answer from {}: {}", self.backend.name(), answer);
                Selection::from_answer(answer)
            }
            Err(e) => {
                error!("Exam selection failed on {}: {}", self.backend.name(), e);
                Selection::Failed(e.to_string())
            }
        }
    }
}
