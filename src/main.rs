use clap::builder::TypedValueParser;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use log::warn;
use quizcraft::generator::{DEFAULT_QUESTIONS, MAX_QUESTIONS, MIN_QUESTIONS};
use quizcraft::{
    load_questions_from_json, logging, App, Difficulty, GeneratorConfig, QuizGenerator, Session,
    SourceSpec,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("source").args(["file", "url", "topic", "questions"])))]
struct Args {
    /// Document to generate questions from (.txt, .md, .docx)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Web page to generate questions from
    #[arg(short, long)]
    url: Option<String>,

    /// Topic to generate questions about; without any source a short
    /// dialogue asks for one
    #[arg(short, long)]
    topic: Option<String>,

    /// Saved quiz (JSON) to take instead of generating one
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Number of questions to generate
    #[arg(short = 'n', long, default_value_t = DEFAULT_QUESTIONS,
          value_parser = clap::value_parser!(u16).range(MIN_QUESTIONS as i64..=MAX_QUESTIONS as i64).map(usize::from))]
    count: usize,

    #[arg(short, long, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Write every generated quiz to this file
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Model name, e.g. gemini-2.0-flash
    #[arg(long, env = "GEMINI_MODEL")]
    model: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    logging::init(args.log_file.as_deref()).context("failed to open log file")?;

    let generator = match GeneratorConfig::resolve(args.api_key, args.model) {
        Ok(config) => Some(QuizGenerator::new(config).context("failed to build HTTP client")?),
        Err(e) if args.questions.is_some() => {
            warn!("{}; generating new quizzes is disabled", e);
            None
        }
        Err(e) => return Err(e).context("cannot generate questions"),
    };

    let app = match args.questions {
        Some(path) => App::with_questions(
            load_questions_from_json(&path).context("failed to load saved quiz")?,
        ),
        None => {
            let source = args
                .file
                .map(SourceSpec::File)
                .or(args.url.map(SourceSpec::Link))
                .or(args.topic.map(SourceSpec::Topic));
            App::new(source, args.count, args.difficulty)
        }
    };

    Session::new(app, generator, args.save)
        .run()
        .await
        .context("quiz session failed")?;

    Ok(())
}
