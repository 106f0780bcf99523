use super::domain::Category;

/// Pillar missing from the classifier map; a data-integrity bug, never user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pillar '{0}' is not mapped to a category")]
pub struct UnknownPillar(pub String);

/// Static lookup from fine-grained pillar to coarse category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillarClassifier {
    entries: Vec<(String, Category)>,
}

impl PillarClassifier {
    pub fn standard() -> Self {
        Self::from_entries([
            ("Leadership & Vision", Category::Culture),
            ("Inclusivity & Belonging", Category::Culture),
            ("Recognition & Motivation", Category::Culture),
            ("Well-being & Work-Life", Category::Wellness),
            ("Feedback & Communication", Category::Wellness),
            ("Learning & Growth", Category::Growth),
            ("Team Dynamics & Trust", Category::Growth),
            ("Autonomy & Empowerment", Category::Growth),
        ])
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Category)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(pillar, category)| (pillar.into(), category))
                .collect(),
        }
    }

    pub fn classify(&self, pillar: &str) -> Result<Category, UnknownPillar> {
        self.entries
            .iter()
            .find(|(name, _)| name == pillar)
            .map(|(_, category)| *category)
            .ok_or_else(|| UnknownPillar(pillar.to_string()))
    }

    pub fn pillars_for(&self, category: Category) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, mapped)| *mapped == category)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PillarClassifier {
    fn default() -> Self {
        Self::standard()
    }
}
