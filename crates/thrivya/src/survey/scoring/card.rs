use super::super::domain::{round2, Band, Category};
use super::views::{CategoryScoreEntry, OverallScoreView, PillarScoreEntry, ScoreCardSummary};
use std::collections::BTreeMap;

/// Running sum and count of answered question scores for one category.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTally {
    pub sum: u32,
    pub count: u32,
}

impl CategoryTally {
    /// Rounded mean, or 0 when nothing in the category was answered.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        round2(f64::from(self.sum) / f64::from(self.count))
    }
}

/// Individual question scores for a single pillar, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillarScores {
    pub pillar: String,
    pub category: Category,
    pub scores: Vec<u8>,
}

impl PillarScores {
    pub(crate) fn new(pillar: String, category: Category) -> Self {
        Self {
            pillar,
            category,
            scores: Vec::new(),
        }
    }

    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let total: u32 = self.scores.iter().map(|score| u32::from(*score)).sum();
        round2(f64::from(total) / self.scores.len() as f64)
    }

    pub fn band(&self) -> Band {
        Band::from_score(self.average())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub pillar_scores: Vec<PillarScores>,
    pub category_tallies: BTreeMap<Category, CategoryTally>,
    pub category_averages: BTreeMap<Category, f64>,
    pub overall_score: f64,
    pub answered: usize,
    pub total_questions: usize,
}

impl ScoreCard {
    pub(crate) fn from_tallies(
        pillar_scores: Vec<PillarScores>,
        category_tallies: BTreeMap<Category, CategoryTally>,
        answered: usize,
        total_questions: usize,
    ) -> Self {
        let category_averages: BTreeMap<Category, f64> = Category::ordered()
            .into_iter()
            .map(|category| {
                let average = category_tallies
                    .get(&category)
                    .map(CategoryTally::average)
                    .unwrap_or(0.0);
                (category, average)
            })
            .collect();

        // Averages of already-rounded category averages, not of raw scores.
        let overall_score = round2(
            category_averages.values().sum::<f64>() / category_averages.len() as f64,
        );

        Self {
            pillar_scores,
            category_tallies,
            category_averages,
            overall_score,
            answered,
            total_questions,
        }
    }

    pub fn category_average(&self, category: Category) -> f64 {
        self.category_averages
            .get(&category)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn category_band(&self, category: Category) -> Band {
        Band::from_score(self.category_average(category))
    }

    pub fn overall_band(&self) -> Band {
        Band::from_score(self.overall_score)
    }

    pub fn pillar_average(&self, pillar: &str) -> Option<f64> {
        self.pillar_scores
            .iter()
            .find(|entry| entry.pillar == pillar)
            .map(PillarScores::average)
    }

    /// Highest category average; ties resolve to the earlier category.
    pub fn strongest_category(&self) -> Category {
        let mut best = Category::Culture;
        for category in Category::ordered() {
            if self.category_average(category) > self.category_average(best) {
                best = category;
            }
        }
        best
    }

    /// Lowest category average; ties resolve to the earlier category.
    pub fn weakest_category(&self) -> Category {
        let mut worst = Category::Culture;
        for category in Category::ordered() {
            if self.category_average(category) < self.category_average(worst) {
                worst = category;
            }
        }
        worst
    }

    pub fn summary(&self) -> ScoreCardSummary {
        let overall_band = self.overall_band();
        let overall = OverallScoreView {
            score: self.overall_score,
            band: overall_band,
            band_label: overall_band.label(),
            band_icon: overall_band.icon(),
        };

        let categories = Category::ordered()
            .into_iter()
            .map(|category| {
                let band = self.category_band(category);
                CategoryScoreEntry {
                    category,
                    label: category.label(),
                    icon: category.icon(),
                    average: self.category_average(category),
                    answered: self
                        .category_tallies
                        .get(&category)
                        .map(|tally| tally.count)
                        .unwrap_or(0),
                    band,
                    band_label: band.label(),
                    band_icon: band.icon(),
                }
            })
            .collect();

        let pillars = self
            .pillar_scores
            .iter()
            .map(|entry| {
                let band = entry.band();
                PillarScoreEntry {
                    pillar: entry.pillar.clone(),
                    category: entry.category,
                    average: entry.average(),
                    answered: entry.scores.len(),
                    band,
                    band_label: band.label(),
                    band_icon: band.icon(),
                }
            })
            .collect();

        ScoreCardSummary {
            overall,
            categories,
            pillars,
            answered: self.answered,
            total_questions: self.total_questions,
        }
    }
}
