use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::info;
use neurodx::catalog::{self, Category};
use neurodx::{ClassifierKind, DataConfig, DiagnosisError, EnsembleBuilder, Pipeline, PredictionResult, TrainingConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding Training.csv and the knowledge base tables
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Symptom to diagnose; repeat the flag or separate with commas
    #[arg(short, long = "symptom", value_delimiter = ',')]
    symptoms: Vec<String>,

    /// Models to fit, primary first (random_forest, decision_tree, naive_bayes)
    #[arg(short, long = "model", value_delimiter = ',', default_value = "random_forest")]
    models: Vec<ClassifierKind>,

    /// Trees grown by the random forest
    #[arg(long, default_value_t = 100)]
    trees: usize,

    /// Seed for random forest training
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// List the known symptoms instead of diagnosing
    #[arg(short, long)]
    list: bool,

    /// Only list symptoms containing this text
    #[arg(long, requires = "list")]
    search: Option<String>,

    /// Only list symptoms in this category
    #[arg(long, requires = "list")]
    category: Option<Category>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let client_error = e
                .downcast_ref::<DiagnosisError>()
                .is_some_and(DiagnosisError::is_client_error);
            if client_error {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let data_dir = args.data_dir.unwrap_or_else(DataConfig::default_data_dir);
    let config = DataConfig::from_dir(&data_dir);

    let mut builder = EnsembleBuilder::new().with_training_config(TrainingConfig {
        n_estimators: args.trees,
        seed: args.seed,
        ..TrainingConfig::default()
    });
    for kind in &args.models {
        builder = builder.add_model(*kind)?;
    }

    info!("=== Starting NeuroDx ===");
    let start_time = Instant::now();
    let pipeline = Pipeline::start(&config, builder)
        .with_context(|| format!("could not start from {}", data_dir.display()))?;
    info!("=== Pipeline ready (took {:.2?}) ===", start_time.elapsed());

    if args.list {
        let names = pipeline.symptoms()?;
        let found = catalog::search(names, args.search.as_deref().unwrap_or_default(), args.category);
        if args.json {
            println!("{}", serde_json::json!({ "symptoms": found }));
        } else {
            for name in found {
                println!("{:<32} {:<32} {}", name, catalog::display_name(name), Category::of(name));
            }
        }
        return Ok(());
    }

    let classify_start = Instant::now();
    if args.models.len() > 1 {
        let diagnosis = pipeline.diagnose_all(&args.symptoms)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&diagnosis)?);
        } else {
            print_result(&diagnosis.primary);
            println!("\nModel verdicts:");
            for verdict in &diagnosis.verdicts {
                println!("  {:<14} {}", verdict.model, verdict.disease);
            }
            if !diagnosis.is_unanimous() {
                println!("  (models disagree)");
            }
        }
    } else {
        let result = pipeline.diagnose(&args.symptoms)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_result(&result);
        }
    }
    info!("Diagnosis time: {:.2?}", classify_start.elapsed());

    Ok(())
}

fn print_result(result: &PredictionResult) {
    println!("\nPredicted disease: {}", result.disease);
    println!("\n{}", result.description);
    print_list("Precautions", &result.precautions);
    print_list("Medications", &result.medications);
    print_list("Diet", &result.diet);
    println!("\nWorkout: {}", result.workout);
}

fn print_list(title: &str, items: &[String]) {
    println!("\n{}:", title);
    if items.is_empty() {
        println!("  (none listed)");
    }
    for item in items {
        println!("  - {}", item);
    }
}
