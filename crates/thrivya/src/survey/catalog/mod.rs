//! Question catalog loading and validation.
//!
//! The catalog is an ordered, immutable list of questions read once per
//! process from JSON (`[{id, pillar, question}]`) or CSV with the same
//! columns. Any structural problem rejects the whole resource.

mod parser;

use super::classifier::{PillarClassifier, UnknownPillar};
use super::domain::{Category, Question, QuestionId};
use serde::Serialize;
use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::info;

const BUNDLED_QUESTIONS: &str = include_str!("../../../data/culture_questions.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("question resource not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read question resource: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed question JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed question CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("question resource contains no questions")]
    Empty,
    #[error("duplicate question id '{0}'")]
    DuplicateId(String),
    #[error("question '{id}' has a blank {field}")]
    BlankField { id: String, field: &'static str },
    #[error("question '{id}' references an unmapped pillar: {source}")]
    UnknownPillar {
        id: String,
        #[source]
        source: UnknownPillar,
    },
}

impl CatalogError {
    /// True when the resource itself is missing rather than malformed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

/// Where the question resource comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Bundled,
    Path(PathBuf),
}

impl CatalogSource {
    pub fn from_optional_path(path: Option<PathBuf>) -> Self {
        path.map(Self::Path).unwrap_or(Self::Bundled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

/// Questions of one category, in catalog order.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSection {
    pub category: Category,
    pub label: &'static str,
    pub icon: &'static str,
    pub questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for question in &questions {
            let id = question.id.as_str();
            if id.trim().is_empty() {
                return Err(CatalogError::BlankField {
                    id: String::new(),
                    field: "id",
                });
            }
            if question.pillar.trim().is_empty() {
                return Err(CatalogError::BlankField {
                    id: id.to_string(),
                    field: "pillar",
                });
            }
            if question.text.trim().is_empty() {
                return Err(CatalogError::BlankField {
                    id: id.to_string(),
                    field: "question",
                });
            }
            if !seen.insert(id) {
                return Err(CatalogError::DuplicateId(id.to_string()));
            }
        }

        Ok(Self { questions })
    }

    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_reader(Cursor::new(BUNDLED_QUESTIONS))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(err) => return Err(err.into()),
        };

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            Self::from_csv_reader(file)
        } else {
            Self::from_json_reader(file)
        }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Self::from_questions(parser::parse_json(reader)?)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Self::from_questions(parser::parse_csv(reader)?)
    }

    pub fn load(source: &CatalogSource) -> Result<Self, CatalogError> {
        let catalog = match source {
            CatalogSource::Bundled => Self::bundled()?,
            CatalogSource::Path(path) => Self::from_path(path)?,
        };
        info!(questions = catalog.len(), ?source, "question catalog loaded");
        Ok(catalog)
    }

    /// Checks every pillar against the classifier so a mismatch surfaces at load time.
    pub fn ensure_classified(&self, classifier: &PillarClassifier) -> Result<(), CatalogError> {
        for question in &self.questions {
            classifier
                .classify(&question.pillar)
                .map_err(|source| CatalogError::UnknownPillar {
                    id: question.id.to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| &question.id == id)
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Distinct pillars in order of first appearance.
    pub fn pillars(&self) -> Vec<&str> {
        let mut pillars: Vec<&str> = Vec::new();
        for question in &self.questions {
            if !pillars.contains(&question.pillar.as_str()) {
                pillars.push(&question.pillar);
            }
        }
        pillars
    }

    pub fn sections(
        &self,
        classifier: &PillarClassifier,
    ) -> Result<Vec<CatalogSection>, UnknownPillar> {
        let mut sections: Vec<CatalogSection> = Category::ordered()
            .into_iter()
            .map(|category| CatalogSection {
                category,
                label: category.label(),
                icon: category.icon(),
                questions: Vec::new(),
            })
            .collect();

        for question in &self.questions {
            let category = classifier.classify(&question.pillar)?;
            if let Some(section) = sections
                .iter_mut()
                .find(|section| section.category == category)
            {
                section.questions.push(question.clone());
            }
        }

        Ok(sections)
    }
}

static CACHED_CATALOG: OnceLock<Arc<QuestionCatalog>> = OnceLock::new();

/// Loads the catalog on first use and hands out the same instance afterwards.
/// The first successful load wins for the lifetime of the process.
pub fn load_cached(source: &CatalogSource) -> Result<Arc<QuestionCatalog>, CatalogError> {
    if let Some(catalog) = CACHED_CATALOG.get() {
        return Ok(catalog.clone());
    }

    let loaded = Arc::new(QuestionCatalog::load(source)?);
    let cached = CACHED_CATALOG.get_or_init(|| loaded);
    Ok(cached.clone())
}
