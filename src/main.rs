mod answer;
mod bayes;
mod config;
mod stats;
mod store;
mod survey;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use std::{io, path::PathBuf};

use crate::{
    answer::LabeledRow,
    bayes::NaiveBayesClassifier,
    config::AppConfig,
    survey::{default_questions, Session},
};

#[derive(Parser, Debug)]
#[command(version, about = "Political survey that guesses your party as you answer")]
struct Cli {
    /// Csv file of previous responses (overrides the config file)
    #[arg(long)]
    data: Option<PathBuf>,

    /// TOML file with `data_path` and `[model] weights`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase output verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Take the survey and record the response (default)
    Survey,
    /// Report accuracy of the model on the stored responses
    Evaluate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    let questions = default_questions();
    anyhow::ensure!(
        config.model.num_questions() == questions.len(),
        "{} weights configured for {} questions",
        config.model.num_questions(),
        questions.len()
    );

    let (model, rows) = load_model(&config);

    if model.is_trained() {
        let accuracy = model.evaluate(&rows)?;
        println!(
            "Current model accuracy on past data: {:.2}%\n",
            accuracy * 100.0
        );
    } else {
        println!("Model cannot be evaluated yet - not enough data.\n");
    }

    if cli.command.unwrap_or(Command::Survey) == Command::Evaluate {
        return Ok(());
    }

    let stdin = io::stdin();
    let row = Session::new(&model, &questions).run(&mut stdin.lock(), &mut io::stdout())?;

    store::append_row(&config.data_path, &row).context("error saving your response")?;
    println!("\nThank you! Your responses have been recorded.");

    Ok(())
}

/// Trains on the stored surveys. A store that cannot be read or holds
/// malformed rows is reported and replaced by an untrained model; the rows
/// returned are the ones the model was trained on.
fn load_model(config: &AppConfig) -> (NaiveBayesClassifier, Vec<LabeledRow>) {
    let trained = store::load_rows(&config.data_path).and_then(|rows| {
        let model = NaiveBayesClassifier::train(&config.model, &rows)?;
        Ok((model, rows))
    });

    match trained {
        Ok((model, rows)) if model.is_trained() => {
            log::info!(
                "{} stored surveys from {}",
                model.statistics().total_rows(),
                config.data_path.display()
            );
            println!("\nModel trained on previous survey data.\n");
            (model, rows)
        }
        Ok((model, _)) => {
            println!("No training data yet - model will learn as users take the survey.");
            (model, Vec::new())
        }
        Err(err) => {
            log::error!("{:#}", err);
            println!("Stored survey data is unusable - model will learn as users take the survey.");
            (NaiveBayesClassifier::untrained(&config.model), Vec::new())
        }
    }
}

fn init_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.filter_level(level);
    builder.try_init().map_err(|err| err.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::Answer::*;
    use std::fs;
    use tempfile::tempdir;

    fn config_for(data_path: PathBuf) -> AppConfig {
        AppConfig {
            data_path,
            ..AppConfig::default()
        }
    }

    #[test]
    fn trains_on_stored_surveys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        store::append_row(&path, &LabeledRow::new(vec![A, B, C, D, A], "Green")).unwrap();
        store::append_row(&path, &LabeledRow::new(vec![B, B, B, B, B], "Republican")).unwrap();

        let (model, rows) = load_model(&config_for(path));
        assert!(model.is_trained());
        assert_eq!(rows.len(), 2);
        assert_eq!(model.statistics().total_rows(), 2);
    }

    #[test]
    fn missing_store_gives_untrained_model() {
        let dir = tempdir().unwrap();
        let (model, rows) = load_model(&config_for(dir.path().join("data.csv")));
        assert!(!model.is_trained());
        assert!(rows.is_empty());
    }

    #[test]
    fn blank_answer_cell_gives_untrained_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(
            &path,
            "Q1,Q2,Q3,Q4,Q5,Party\nA,B,C,D,A,Green\n,B,C,D,A,Green\n",
        )
        .unwrap();

        let (model, rows) = load_model(&config_for(path));
        assert!(!model.is_trained());
        assert!(rows.is_empty());
        assert_eq!(model.predict(&[Some(A); 5]), None);
    }

    #[test]
    fn short_row_gives_untrained_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "Q1,Q2,Q3,Q4,Q5,Party\nA,B,C,D,A,Green\nA,B,Green\n").unwrap();

        let (model, rows) = load_model(&config_for(path));
        assert!(!model.is_trained());
        assert!(rows.is_empty());
    }
}
