use clap::{Args, Parser, Subcommand};
use student_performance::components::{DataTransformation, ModelTrainer};
use student_performance::config::AppConfig;
use student_performance::logging::{init_logging, parse_level};
use student_performance::pipeline::{CustomData, PredictPipeline};
use student_performance::Result;
use std::path::PathBuf;
use tracing::info;

/// Student performance: fit the preprocessing plan, train the model, predict.
#[derive(Parser, Debug)]
#[command(name = "student-performance", version, about)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fit the preprocessing plan on the training split and persist it
    Transform(SplitArgs),
    /// Transform both splits, then train, evaluate and persist the model
    Train(SplitArgs),
    /// Predict the math score of one student
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// Training CSV
    #[arg(long)]
    train: PathBuf,
    /// Held-out CSV
    #[arg(long)]
    test: PathBuf,
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    race_ethnicity: Option<String>,
    #[arg(long)]
    parental_level_of_education: Option<String>,
    #[arg(long)]
    lunch: Option<String>,
    #[arg(long)]
    test_preparation_course: Option<String>,
    #[arg(long)]
    reading_score: Option<f64>,
    #[arg(long)]
    writing_score: Option<f64>,
}

impl From<PredictArgs> for CustomData {
    fn from(args: PredictArgs) -> Self {
        CustomData {
            gender: args.gender,
            race_ethnicity: args.race_ethnicity,
            parental_level_of_education: args.parental_level_of_education,
            lunch: args.lunch,
            test_preparation_course: args.test_preparation_course,
            reading_score: args.reading_score,
            writing_score: args.writing_score,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(parse_level(&cli.log_level)?, cli.json_logs)?;

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Transform(split) => {
            let (train, test, path) = DataTransformation::new(&config)?
                .fit_and_apply_paths(&split.train, &split.test)?;
            println!(
                "train {:?}, test {:?}, plan saved to {}",
                train.dim(),
                test.dim(),
                path.display()
            );
        }
        Commands::Train(split) => {
            let (train, test, _) = DataTransformation::new(&config)?
                .fit_and_apply_paths(&split.train, &split.test)?;
            let report = ModelTrainer::new(&config)?.initiate_model_trainer(&train, &test)?;
            println!(
                "test r2 = {:.4}, test rmse = {:.4}, model saved to {}",
                report.test_r2,
                report.test_rmse,
                report.model_path.display()
            );
        }
        Commands::Predict(args) => {
            let record = CustomData::from(args);
            let pipeline: PredictPipeline = PredictPipeline::new(config.artifacts.clone());
            let predictions = pipeline.predict(&record.to_table()?)?;
            for value in predictions.iter() {
                info!(prediction = value, "predicted math score");
                println!("{value:.2}");
            }
        }
    }
    Ok(())
}
