use super::super::domain::{Band, Category};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct OverallScoreView {
    pub score: f64,
    pub band: Band,
    pub band_label: &'static str,
    pub band_icon: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryScoreEntry {
    pub category: Category,
    pub label: &'static str,
    pub icon: &'static str,
    pub average: f64,
    pub answered: u32,
    pub band: Band,
    pub band_label: &'static str,
    pub band_icon: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PillarScoreEntry {
    pub pillar: String,
    pub category: Category,
    pub average: f64,
    pub answered: usize,
    pub band: Band,
    pub band_label: &'static str,
    pub band_icon: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreCardSummary {
    pub overall: OverallScoreView,
    pub categories: Vec<CategoryScoreEntry>,
    pub pillars: Vec<PillarScoreEntry>,
    pub answered: usize,
    pub total_questions: usize,
}
