use super::catalog::QuestionCatalog;
use super::domain::{LikertLevel, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("question '{0}' is not part of the survey")]
    UnknownQuestion(QuestionId),
    #[error("'{0}' is not a valid agreement level")]
    InvalidLevel(String),
    #[error("failed to encode responses: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode responses as CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write responses: {0}")]
    Io(#[from] std::io::Error),
}

/// Selected agreement level per question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet {
    answers: BTreeMap<QuestionId, LikertLevel>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResponseRow {
    question_id: String,
    level: String,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records or overwrites the answer for a catalog question.
    pub fn record(
        &mut self,
        catalog: &QuestionCatalog,
        question_id: QuestionId,
        level: LikertLevel,
    ) -> Result<Option<LikertLevel>, ResponseError> {
        if !catalog.contains(&question_id) {
            return Err(ResponseError::UnknownQuestion(question_id));
        }
        Ok(self.answers.insert(question_id, level))
    }

    pub fn get(&self, question_id: &QuestionId) -> Option<LikertLevel> {
        self.answers.get(question_id).copied()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, LikertLevel)> {
        self.answers.iter().map(|(id, level)| (id, *level))
    }

    /// Catalog questions that still have no answer, in catalog order.
    pub fn unanswered<'a>(&self, catalog: &'a QuestionCatalog) -> Vec<&'a QuestionId> {
        catalog
            .questions()
            .iter()
            .filter(|question| !self.answers.contains_key(&question.id))
            .map(|question| &question.id)
            .collect()
    }

    pub fn is_complete(&self, catalog: &QuestionCatalog) -> bool {
        self.unanswered(catalog).is_empty()
    }

    pub fn to_json(&self) -> Result<String, ResponseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json<R: Read>(
        reader: R,
        catalog: &QuestionCatalog,
    ) -> Result<Self, ResponseError> {
        let raw: BTreeMap<QuestionId, LikertLevel> = serde_json::from_reader(reader)?;
        let mut responses = Self::new();
        for (question_id, level) in raw {
            responses.record(catalog, question_id, level)?;
        }
        Ok(responses)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ResponseError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for (question_id, level) in self.iter() {
            csv_writer.serialize(ResponseRow {
                question_id: question_id.to_string(),
                level: level.label().to_string(),
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn from_csv<R: Read>(reader: R, catalog: &QuestionCatalog) -> Result<Self, ResponseError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut responses = Self::new();

        for row in csv_reader.deserialize::<ResponseRow>() {
            let row = row?;
            let level = LikertLevel::from_label(&row.level)
                .ok_or_else(|| ResponseError::InvalidLevel(row.level.clone()))?;
            responses.record(catalog, QuestionId(row.question_id), level)?;
        }

        Ok(responses)
    }
}
