//! Static quiz content: the question bank and the candidate pool.
//!
//! Content lives in `data/questions.json` and `data/candidates.json`.
//! The same files are compiled into the library as `Catalog::builtin()`,
//! so the engine always has a valid default without touching disk.

use crate::{
    archetype::Archetype,
    error::{MatchError, MatchResult},
    score::Weights,
    types::EntityId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which side of a question the player picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'l' => Some(Self::Left),
            'r' => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label:      String,
    pub image_ref:  String,
    /// Short quip shown after the option is picked. Display only.
    pub commentary: String,
    #[serde(default)]
    pub weights:    Weights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id:     EntityId,
    pub prompt: String,
    pub left:   AnswerOption,
    pub right:  AnswerOption,
}

impl Question {
    pub fn option(&self, direction: Direction) -> &AnswerOption {
        match direction {
            Direction::Left  => &self.left,
            Direction::Right => &self.right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub id:        EntityId,
    pub archetype: Archetype,
    pub name:      String,
    pub origin:    String,
    pub tagline:   String,
    pub why_text:  String,
    pub image_ref: String,
}

#[derive(Debug, Clone, Deserialize)]
struct QuestionBankFile {
    questions: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatePoolFile {
    candidates: Vec<MatchCandidate>,
}

const BUILTIN_QUESTIONS: &str = include_str!("../../data/questions.json");
const BUILTIN_CANDIDATES: &str = include_str!("../../data/candidates.json");

#[derive(Debug, Clone)]
pub struct Catalog {
    pub questions:  Vec<Question>,
    pub candidates: Vec<MatchCandidate>,
}

impl Catalog {
    /// Build and validate a catalog from already-parsed content.
    pub fn new(questions: Vec<Question>, candidates: Vec<MatchCandidate>) -> MatchResult<Self> {
        let catalog = Self { questions, candidates };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The content shipped with the crate.
    pub fn builtin() -> MatchResult<Self> {
        Self::from_json(BUILTIN_QUESTIONS, BUILTIN_CANDIDATES)
    }

    pub fn from_json(questions_json: &str, candidates_json: &str) -> MatchResult<Self> {
        let bank: QuestionBankFile = serde_json::from_str(questions_json)?;
        let pool: CandidatePoolFile = serde_json::from_str(candidates_json)?;
        Self::new(bank.questions, pool.candidates)
    }

    /// Load from the data/ directory.
    /// In tests, use Catalog::builtin() or Catalog::new().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let question_path = format!("{data_dir}/questions.json");
        let question_content = std::fs::read_to_string(&question_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {question_path}: {e}"))?;

        let candidate_path = format!("{data_dir}/candidates.json");
        let candidate_content = std::fs::read_to_string(&candidate_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {candidate_path}: {e}"))?;

        let catalog = Self::from_json(&question_content, &candidate_content)?;
        log::debug!(
            "Loaded catalog from {data_dir}: {} questions, {} candidates",
            catalog.questions.len(),
            catalog.candidates.len()
        );
        Ok(catalog)
    }

    /// Ids must be unique and the pool must not be empty.
    /// An archetype without candidates is only a warning: selection falls
    /// back to the first candidate in the pool.
    pub fn validate(&self) -> MatchResult<()> {
        let mut seen = HashSet::new();
        for q in &self.questions {
            if !seen.insert(q.id.as_str()) {
                return Err(MatchError::DuplicateId { kind: "question", id: q.id.clone() });
            }
        }

        if self.candidates.is_empty() {
            return Err(MatchError::EmptyCandidatePool);
        }
        let mut seen = HashSet::new();
        for c in &self.candidates {
            if !seen.insert(c.id.as_str()) {
                return Err(MatchError::DuplicateId { kind: "candidate", id: c.id.clone() });
            }
        }

        for archetype in Archetype::ALL {
            if !self.candidates.iter().any(|c| c.archetype == archetype) {
                log::warn!("No match candidates for archetype '{archetype}'");
            }
        }
        Ok(())
    }

    /// Fails when the bank cannot fill a session of `count` questions.
    pub fn require_questions(&self, count: usize) -> MatchResult<()> {
        if self.questions.len() < count {
            return Err(MatchError::BankTooSmall {
                available: self.questions.len(),
                required:  count,
            });
        }
        Ok(())
    }

    pub fn candidate(&self, id: &str) -> Option<&MatchCandidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}
