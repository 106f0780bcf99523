use crate::infra::load_catalog;
use chrono::Utc;
use clap::Args;
use std::fs::File;
use std::path::{Path, PathBuf};
use thrivya::config::AppConfig;
use thrivya::error::AppError;
use thrivya::survey::{
    advise, build_report_prompt, Advisory, CohereReportGenerator, CompletionPolicy,
    CulturalPriority, LikertLevel, OrganizationProfile, PopulationError, PopulationScore,
    QuestionCatalog, ResponseSet, ScoreCard, ScoringEngine, SubmissionLog, SurveyServiceError,
    TeamSize, DEFAULT_MINIMUM_SUBMISSIONS,
};

const BAR_WIDTH: usize = 20;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Saved responses: JSON object of question id to level, or CSV with question_id,level
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Question catalog (JSON or CSV). Defaults to THRIVYA_QUESTIONS_PATH or the bundled set.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    #[arg(long)]
    pub(crate) org_name: Option<String>,
    #[arg(long)]
    pub(crate) industry: Option<String>,
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// Team size bracket (1-10, 11-50, 51-200, 201-500, 500+)
    #[arg(long, value_parser = crate::infra::parse_team_size)]
    pub(crate) team_size: Option<TeamSize>,
    /// Refuse to score until every question is answered
    #[arg(long)]
    pub(crate) require_complete: bool,
    /// Print the prompt sent to the report generator
    #[arg(long)]
    pub(crate) show_prompt: bool,
    /// Request recommendations from the configured report generator
    #[arg(long)]
    pub(crate) report: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct QuestionsArgs {
    /// Question catalog (JSON or CSV). Defaults to THRIVYA_QUESTIONS_PATH or the bundled set.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Synthetic respondents submitted to the population log
    #[arg(long, default_value_t = DEFAULT_MINIMUM_SUBMISSIONS)]
    pub(crate) respondents: usize,
    /// Print the prompt sent to the report generator
    #[arg(long)]
    pub(crate) show_prompt: bool,
    /// Request recommendations from the configured report generator
    #[arg(long)]
    pub(crate) report: bool,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        responses,
        catalog,
        org_name,
        industry,
        city,
        team_size,
        require_complete,
        show_prompt,
        report,
    } = args;

    let config = AppConfig::load()?;
    let catalog = load_catalog(catalog, &config)?;
    let answers = read_responses(&responses, &catalog)?;

    let policy = if require_complete {
        CompletionPolicy::Complete
    } else {
        config.survey.completion_policy
    };
    let card = ScoringEngine::with_policy(policy).score(&catalog, &answers)?;

    let organization = OrganizationProfile {
        name: org_name,
        industry,
        location: city,
        team_size,
        ..OrganizationProfile::default()
    };
    render_score_card(&card, &organization);

    if show_prompt || report {
        let prompt = build_report_prompt(&organization, &card, &catalog, &answers);
        if show_prompt {
            println!("\nReport prompt\n{prompt}");
        }
        if report {
            let generator = CohereReportGenerator::from_config(&config.advisor)?;
            let advisory = advise(&generator, &prompt, config.advisor.timeout).await;
            render_advisory(&advisory);
        }
    }

    Ok(())
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = load_catalog(args.catalog, &config)?;
    let engine = ScoringEngine::default();
    let sections = catalog
        .sections(engine.classifier())
        .map_err(SurveyServiceError::from)?;

    println!("Culture pulse questions ({} total)", catalog.len());
    for section in sections {
        println!("\n{} {}", section.icon, section.label);
        for question in &section.questions {
            println!("  [{}] {}: {}", question.id, question.pillar, question.text);
        }
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        respondents,
        show_prompt,
        report,
    } = args;

    let config = AppConfig::load()?;
    let catalog = QuestionCatalog::bundled()?;
    let engine = ScoringEngine::default();
    let organization = sample_organization();

    println!("Thrivya culture pulse demo");
    let partial = synthetic_responses(&catalog, 0, 5)?;
    match ScoringEngine::with_policy(CompletionPolicy::Complete).score(&catalog, &partial) {
        Ok(_) => println!("Partial submission scored under the complete policy"),
        Err(err) => println!("Complete policy after 5 answers: {err}"),
    }
    let partial_card = engine.score(&catalog, &partial)?;
    println!(
        "Partial policy after 5 answers: overall {:.2} ({})",
        partial_card.overall_score,
        partial_card.overall_band().label()
    );

    let responses = synthetic_responses(&catalog, 0, catalog.len())?;
    let card = engine.score(&catalog, &responses)?;
    println!();
    render_score_card(&card, &organization);

    let prompt = build_report_prompt(&organization, &card, &catalog, &responses);
    if show_prompt {
        println!("\nReport prompt\n{prompt}");
    }
    if report {
        let generator = CohereReportGenerator::from_config(&config.advisor)?;
        let advisory = advise(&generator, &prompt, config.advisor.timeout).await;
        render_advisory(&advisory);
    }

    println!("\nPopulation pulse");
    let mut log = SubmissionLog::new();
    for respondent in 0..respondents {
        let answers = synthetic_responses(&catalog, respondent, catalog.len())?;
        let submission = log
            .append(&catalog, answers, Utc::now())
            .map_err(SurveyServiceError::from)?;
        println!(
            "- submission #{} recorded {}",
            submission.sequence(),
            submission.submitted_at().format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    match population_outcome(&log, &catalog, &config) {
        Ok(population) => println!(
            "{} submissions | {}/{} points | {:.2}% {} {}",
            population.submissions,
            population.total_score,
            population.max_score,
            population.percentage,
            population.band_icon,
            population.band_label
        ),
        Err(err) => println!("Population results unavailable: {err}"),
    }

    Ok(())
}

/// Population score gated by `THRIVYA_MIN_SUBMISSIONS`.
fn population_outcome(
    log: &SubmissionLog,
    catalog: &QuestionCatalog,
    config: &AppConfig,
) -> Result<PopulationScore, PopulationError> {
    log.population_score(catalog, config.survey.minimum_submissions)
}

fn read_responses(path: &Path, catalog: &QuestionCatalog) -> Result<ResponseSet, AppError> {
    let file = File::open(path)?;
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let responses = if is_csv {
        ResponseSet::from_csv(file, catalog)?
    } else {
        ResponseSet::from_json(file, catalog)?
    };
    Ok(responses)
}

pub(crate) fn render_score_card(card: &ScoreCard, organization: &OrganizationProfile) {
    let summary = card.summary();

    println!("Culture pulse results");
    if let Some(name) = organization.name.as_deref() {
        println!("Organization: {name}");
    }
    println!(
        "Answered {}/{} questions",
        summary.answered, summary.total_questions
    );
    println!(
        "\nOverall: {:.2} / 4 {} {} {}",
        summary.overall.score,
        score_bar(summary.overall.score),
        summary.overall.band_icon,
        summary.overall.band_label
    );

    println!("\nCategories");
    for entry in &summary.categories {
        println!(
            "- {} {}: {:.2} {} {} {} ({} answered)",
            entry.icon,
            entry.label,
            entry.average,
            score_bar(entry.average),
            entry.band_icon,
            entry.band_label,
            entry.answered
        );
    }

    println!("\nPillars");
    for entry in &summary.pillars {
        println!(
            "- {}: {:.2} {} {}",
            entry.pillar, entry.average, entry.band_icon, entry.band_label
        );
    }

    println!(
        "\nStrongest area: {} | Focus area: {}",
        card.strongest_category().label(),
        card.weakest_category().label()
    );
}

fn render_advisory(advisory: &Advisory) {
    match advisory {
        Advisory::Generated { text } => println!("\nRecommendations\n{text}"),
        Advisory::Unavailable { warning } => println!("\n{warning}"),
    }
}

/// Fixed-width bar for a 0-4 score.
pub(crate) fn score_bar(score: f64) -> String {
    let ratio = (score / f64::from(LikertLevel::MAX_SCORE)).clamp(0.0, 1.0);
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn sample_organization() -> OrganizationProfile {
    OrganizationProfile {
        name: Some("Lotus Design Collective".to_string()),
        industry: Some("Creative services".to_string()),
        location: Some("Bengaluru".to_string()),
        team_size: Some(TeamSize::Small),
        culture_focus: vec![CulturalPriority::Flexibility, CulturalPriority::Recognition],
        years_active: Some(6),
    }
}

const SAMPLE_PATTERN: [LikertLevel; 8] = [
    LikertLevel::Agree,
    LikertLevel::StronglyAgree,
    LikertLevel::Neutral,
    LikertLevel::Agree,
    LikertLevel::Disagree,
    LikertLevel::StronglyAgree,
    LikertLevel::Agree,
    LikertLevel::Neutral,
];

/// Answers the first `count` questions with a pattern shifted per respondent.
fn synthetic_responses(
    catalog: &QuestionCatalog,
    respondent: usize,
    count: usize,
) -> Result<ResponseSet, AppError> {
    let mut responses = ResponseSet::new();
    for (index, question) in catalog.questions().iter().take(count).enumerate() {
        let level = SAMPLE_PATTERN[(index + respondent * 3) % SAMPLE_PATTERN.len()];
        responses.record(catalog, question.id.clone(), level)?;
    }
    Ok(responses)
}
