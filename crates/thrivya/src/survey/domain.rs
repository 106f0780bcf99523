use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse grouping of culture pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Culture,
    Wellness,
    Growth,
}

impl Category {
    pub const fn ordered() -> [Self; 3] {
        [Self::Culture, Self::Wellness, Self::Growth]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Culture => "Culture",
            Self::Wellness => "Wellness",
            Self::Growth => "Growth",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Culture => "🎯",
            Self::Wellness => "🧘",
            Self::Growth => "📈",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Five-point agreement scale; the score of a level is its ordinal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LikertLevel {
    #[serde(rename = "Strongly Disagree")]
    StronglyDisagree,
    #[serde(rename = "Disagree")]
    Disagree,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Agree")]
    Agree,
    #[serde(rename = "Strongly Agree")]
    StronglyAgree,
}

impl LikertLevel {
    pub const MAX_SCORE: u8 = 4;

    pub const fn ordered() -> [Self; 5] {
        [
            Self::StronglyDisagree,
            Self::Disagree,
            Self::Neutral,
            Self::Agree,
            Self::StronglyAgree,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::StronglyDisagree => "Strongly Disagree",
            Self::Disagree => "Disagree",
            Self::Neutral => "Neutral",
            Self::Agree => "Agree",
            Self::StronglyAgree => "Strongly Agree",
        }
    }

    pub const fn score(self) -> u8 {
        match self {
            Self::StronglyDisagree => 0,
            Self::Disagree => 1,
            Self::Neutral => 2,
            Self::Agree => 3,
            Self::StronglyAgree => 4,
        }
    }

    pub fn from_score(score: u8) -> Option<Self> {
        Self::ordered().get(usize::from(score)).copied()
    }

    /// Case and whitespace insensitive lookup by label.
    pub fn from_label(raw: &str) -> Option<Self> {
        let wanted = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::ordered()
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(&wanted))
    }
}

impl fmt::Display for LikertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative interpretation of a 0-4 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Band {
    pub const EXCELLENT_THRESHOLD: f64 = 3.5;
    pub const GOOD_THRESHOLD: f64 = 2.5;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::EXCELLENT_THRESHOLD {
            Self::Excellent
        } else if score >= Self::GOOD_THRESHOLD {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    /// Same thresholds scaled onto a 0-100 percentage.
    pub fn from_percentage(percentage: f64) -> Self {
        let scale = 100.0 / f64::from(LikertLevel::MAX_SCORE);
        Self::from_score(percentage / scale)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Excellent => "🌟",
            Self::Good => "👍",
            Self::NeedsImprovement => "⚠️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single survey item tagged with its fine-grained pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub pillar: String,
    #[serde(rename = "question")]
    pub text: String,
}

/// Rounds half away from zero at two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
