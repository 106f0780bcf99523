use crate::demo::{run_demo, run_questions, run_score, DemoArgs, QuestionsArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use thrivya::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Thrivya Culture Pulse",
    about = "Score workplace culture pulse surveys and serve the survey API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a saved set of responses and print the score card
    Score(ScoreArgs),
    /// List the survey questions grouped by category
    Questions(QuestionsArgs),
    /// Walk through a sample respondent and a small population
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args).await,
        Command::Questions(args) => run_questions(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
