use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::catalog::QuestionCatalog;
use super::domain::Category;
use super::responses::ResponseSet;
use super::scoring::ScoreCard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSize {
    #[serde(rename = "1-10")]
    Micro,
    #[serde(rename = "11-50")]
    Small,
    #[serde(rename = "51-200")]
    Medium,
    #[serde(rename = "201-500")]
    Large,
    #[serde(rename = "500+")]
    Enterprise,
}

impl TeamSize {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Micro => "1-10",
            Self::Small => "11-50",
            Self::Medium => "51-200",
            Self::Large => "201-500",
            Self::Enterprise => "500+",
        }
    }

    pub const fn ordered() -> [Self; 5] {
        [
            Self::Micro,
            Self::Small,
            Self::Medium,
            Self::Large,
            Self::Enterprise,
        ]
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered().into_iter().find(|size| size.label() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CulturalPriority {
    Transparency,
    Flexibility,
    Diversity,
    Wellbeing,
    Recognition,
}

impl CulturalPriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Transparency => "Transparency",
            Self::Flexibility => "Flexibility",
            Self::Diversity => "Diversity",
            Self::Wellbeing => "Wellbeing",
            Self::Recognition => "Recognition",
        }
    }
}

/// Organization details gathered before the assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub team_size: Option<TeamSize>,
    #[serde(default)]
    pub culture_focus: Vec<CulturalPriority>,
    #[serde(default)]
    pub years_active: Option<u16>,
}

const NOT_PROVIDED: &str = "Not provided";

fn or_missing(value: &Option<String>) -> &str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(NOT_PROVIDED)
}

/// Formats organization metadata, scores and answered questions into one
/// prompt for the advisory report generator.
pub fn build_report_prompt(
    organization: &OrganizationProfile,
    card: &ScoreCard,
    catalog: &QuestionCatalog,
    responses: &ResponseSet,
) -> String {
    let mut content = String::new();

    writeln!(
        &mut content,
        "You are a professional culture and HR consultant focused on people analytics. \
Using the culture pulse results below, provide a clear, confident, structured three-part response:"
    )
    .expect("write role");
    content.push('\n');
    writeln!(
        &mut content,
        "1. Pulse Summary: overall observations, with strengths and weaknesses by pillar."
    )
    .expect("write summary instruction");
    writeln!(
        &mut content,
        "2. HR Recommendations: for each of {}, specific low-cost actions HR can implement in the next 90 days.",
        Category::ordered().map(Category::label).join(", ")
    )
    .expect("write recommendation instruction");
    writeln!(
        &mut content,
        "3. Tools & Templates: relevant HR templates, software or frameworks such as DEI dashboards, wellbeing pulse surveys or growth trackers."
    )
    .expect("write tools instruction");
    content.push('\n');
    writeln!(
        &mut content,
        "Be sharp and realistic. Avoid generalities and do not repeat the input. Work only from the data below."
    )
    .expect("write constraints");
    content.push('\n');

    let years = organization
        .years_active
        .map(|years| years.to_string())
        .unwrap_or_else(|| NOT_PROVIDED.to_string());
    writeln!(
        &mut content,
        "Organization: {}, Industry: {}, Size: {}, City: {}, Years Active: {}",
        or_missing(&organization.name),
        or_missing(&organization.industry),
        organization
            .team_size
            .map(TeamSize::label)
            .unwrap_or(NOT_PROVIDED),
        or_missing(&organization.location),
        years
    )
    .expect("write organization");

    let priorities = if organization.culture_focus.is_empty() {
        "None".to_string()
    } else {
        organization
            .culture_focus
            .iter()
            .map(|priority| priority.label())
            .collect::<Vec<_>>()
            .join(", ")
    };
    writeln!(&mut content, "Cultural Priorities: {priorities}").expect("write priorities");
    content.push('\n');

    writeln!(&mut content, "Scores (0-4):").expect("write scores heading");
    for category in Category::ordered() {
        writeln!(
            &mut content,
            "- {}: {:.2} ({})",
            category.label(),
            card.category_average(category),
            card.category_band(category).label()
        )
        .expect("write category score");
    }
    writeln!(
        &mut content,
        "Overall: {:.2} ({})",
        card.overall_score,
        card.overall_band().label()
    )
    .expect("write overall score");
    content.push('\n');

    writeln!(&mut content, "Responses:").expect("write responses heading");
    for question in catalog.questions() {
        if let Some(level) = responses.get(&question.id) {
            writeln!(
                &mut content,
                "- {} - {}: {} ({}/4)",
                question.pillar,
                question.text,
                level.label(),
                level.score()
            )
            .expect("write response");
        }
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::domain::LikertLevel;
    use crate::survey::scoring::ScoringEngine;

    #[test]
    fn prompt_lists_scores_and_answered_questions() {
        let catalog = QuestionCatalog::bundled().expect("bundled");
        let mut responses = ResponseSet::new();
        responses
            .record(&catalog, "LV1".into(), LikertLevel::Agree)
            .expect("record");
        responses
            .record(&catalog, "LV2".into(), LikertLevel::StronglyAgree)
            .expect("record");
        let card = ScoringEngine::default()
            .score(&catalog, &responses)
            .expect("scores");
        let organization = OrganizationProfile {
            name: Some("Acme Health".to_string()),
            industry: Some("Healthcare".to_string()),
            location: Some("Pune".to_string()),
            team_size: Some(TeamSize::Medium),
            culture_focus: vec![CulturalPriority::Wellbeing, CulturalPriority::Diversity],
            years_active: Some(12),
        };

        let prompt = build_report_prompt(&organization, &card, &catalog, &responses);

        assert!(prompt.contains(
            "Organization: Acme Health, Industry: Healthcare, Size: 51-200, City: Pune, Years Active: 12"
        ));
        assert!(prompt.contains("Cultural Priorities: Wellbeing, Diversity"));
        assert!(prompt.contains("- Culture: 3.50 (Excellent)"));
        assert!(prompt.contains("- Wellness: 0.00 (Needs Improvement)"));
        assert!(prompt.contains("Overall: 1.17 (Needs Improvement)"));
        assert!(prompt.contains(
            "- Leadership & Vision - Leadership communicates a clear vision for where the organization is heading.: Agree (3/4)"
        ));
        assert_eq!(prompt.matches("/4)").count(), 2);
    }

    #[test]
    fn missing_organization_fields_are_marked() {
        let catalog = QuestionCatalog::bundled().expect("bundled");
        let responses = ResponseSet::new();
        let card = ScoringEngine::default()
            .score(&catalog, &responses)
            .expect("scores");
        let prompt =
            build_report_prompt(&OrganizationProfile::default(), &card, &catalog, &responses);
        assert!(prompt.contains("Organization: Not provided, Industry: Not provided"));
        assert!(prompt.contains("Cultural Priorities: None"));
    }

    #[test]
    fn team_size_uses_bucket_labels() {
        let json = serde_json::to_string(&TeamSize::Enterprise).unwrap();
        assert_eq!(json, "\"500+\"");
        assert_eq!(TeamSize::parse(" 11-50 "), Some(TeamSize::Small));
        assert_eq!(TeamSize::parse("200+"), None);
    }
}
