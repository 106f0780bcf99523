use super::super::domain::{Question, QuestionId};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct QuestionRow {
    id: String,
    pillar: String,
    question: String,
}

impl QuestionRow {
    fn into_question(self) -> Question {
        Question {
            id: QuestionId(self.id.trim().to_string()),
            pillar: collapse_whitespace(&self.pillar),
            text: self.question.trim().to_string(),
        }
    }
}

pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<Question>, serde_json::Error> {
    let rows: Vec<QuestionRow> = serde_json::from_reader(reader)?;
    Ok(rows.into_iter().map(QuestionRow::into_question).collect())
}

pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<Question>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut questions = Vec::new();

    for record in csv_reader.deserialize::<QuestionRow>() {
        questions.push(record?.into_question());
    }

    Ok(questions)
}

fn collapse_whitespace(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
