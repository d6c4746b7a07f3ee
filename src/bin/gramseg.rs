use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use gramseg::corpus::load_text_corpus;
use gramseg::{
    evaluate, segment_text, EvalConfig, Granularity, GramModel, IngestConfig, Metric,
    ProfileVariant, Trainer, TrainerConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde_json::json;

const DEFAULT_MODEL: &str = "gramseg.model";

#[derive(Parser, Debug)]
#[command(author, version, about = "Unsupervised word-boundary detection toolkit", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train a gram-statistics model from text inputs
    Train(TrainArgs),
    /// Segment text with a trained model
    Segment(SegmentArgs),
    /// Score segmentation configurations against the reference tokenizer
    Evaluate(EvaluateArgs),
    /// Drop low-mass entries from a trained model
    Compress(CompressArgs),
    /// Inspect model metadata
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Files or directories to ingest
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output path for the trained model
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_MODEL)]
    output: PathBuf,

    /// Largest gram length to collect
    #[arg(long, value_name = "N", default_value_t = 7)]
    max_n: usize,

    /// Unit stream to train over (chars or tokens)
    #[arg(long, value_name = "MODE", default_value = "chars")]
    granularity: Granularity,

    /// Load each file as one text instead of one text per line
    #[arg(long)]
    whole_files: bool,

    /// Disable per-text logging/progress
    #[arg(long)]
    no_progress: bool,

    /// Compress the trained model with this mass threshold before saving
    #[arg(long, value_name = "RATIO")]
    compress: Option<f64>,

    /// Disable recursive directory traversal
    #[arg(long)]
    no_recursive: bool,

    /// Follow symlinks during traversal
    #[arg(long)]
    follow_symlinks: bool,
}

#[derive(Args, Debug)]
struct SegmentArgs {
    /// Trained model to load
    #[arg(short = 'm', long, value_name = "PATH")]
    model: PathBuf,

    /// Text to segment; read texts from --input when omitted
    #[arg(value_name = "TEXT", required_unless_present = "input")]
    text: Option<String>,

    /// Path to line-delimited texts to segment
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Forward boundary metric
    #[arg(long, value_name = "METRIC", default_value = "dev-both")]
    metric: Metric,

    /// Backward metric enabling the opposite-metrics policy
    #[arg(long, value_name = "METRIC")]
    backward_metric: Option<Metric>,

    /// Gram length to aggregate over (repeat flag)
    #[arg(long = "n", value_name = "N", default_values_t = [1usize])]
    n_list: Vec<usize>,

    /// Boundary threshold
    #[arg(long, value_name = "RATIO", default_value_t = 0.5)]
    threshold: f64,

    /// Profile variant (freedom or probability)
    #[arg(long, value_name = "VARIANT", default_value = "freedom")]
    variant: ProfileVariant,

    /// Emit JSON lines instead of human-readable output
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Trained model to load
    #[arg(short = 'm', long, value_name = "PATH")]
    model: PathBuf,

    /// Files or directories holding evaluation texts
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Forward boundary metric
    #[arg(long, value_name = "METRIC", default_value = "dev-both")]
    metric: Metric,

    /// Backward metric enabling the opposite-metrics policy
    #[arg(long, value_name = "METRIC")]
    backward_metric: Option<Metric>,

    /// Gram length to aggregate over (repeat flag)
    #[arg(long = "n", value_name = "N", default_values_t = [1usize])]
    n_list: Vec<usize>,

    /// Threshold to score (repeat flag to sweep several)
    #[arg(long, value_name = "RATIO", default_values_t = [0.5])]
    thresholds: Vec<f64>,

    /// Profile variant (freedom or probability)
    #[arg(long, value_name = "VARIANT", default_value = "freedom")]
    variant: ProfileVariant,

    /// Keep space-only tokens when scoring
    #[arg(long)]
    keep_spaces: bool,

    /// Load each file as one text instead of one text per line
    #[arg(long)]
    whole_files: bool,

    /// Emit JSON lines instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct CompressArgs {
    /// Trained model to load
    #[arg(short = 'm', long, value_name = "PATH")]
    model: PathBuf,

    /// Mass fraction below which entries are dropped
    #[arg(long, value_name = "RATIO")]
    threshold: f64,

    /// Output path; overwrites the input model when omitted
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Trained model to inspect
    #[arg(short = 'm', long, value_name = "PATH")]
    model: PathBuf,

    /// Emit machine-readable JSON summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Segment(args) => run_segment(args),
        Commands::Evaluate(args) => run_evaluate(args),
        Commands::Compress(args) => run_compress(args),
        Commands::Info(args) => run_info(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            0 => LevelFilter::Info,
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn load_model(path: &PathBuf) -> Result<GramModel> {
    GramModel::load(path).with_context(|| format!("failed to load model from {}", path.display()))
}

fn run_train(args: TrainArgs) -> Result<()> {
    let trainer_cfg = TrainerConfig::builder()
        .max_n(args.max_n)
        .granularity(args.granularity)
        .show_progress(!args.no_progress)
        .build()?;

    let ingest_cfg = IngestConfig {
        line_delimited: !args.whole_files,
        recursive: !args.no_recursive,
        follow_symlinks: args.follow_symlinks,
    };

    let texts =
        load_text_corpus(&args.inputs, &ingest_cfg).with_context(|| "failed to load text corpus")?;
    let corpus_chars: usize = texts.iter().map(String::len).sum();
    info!(
        "loaded {} texts totalling {:.2} KiB",
        texts.len(),
        corpus_chars as f64 / 1024.0
    );

    let spinner = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} collecting gram statistics... {elapsed}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let trainer = Trainer::new(trainer_cfg);
    let start = Instant::now();
    let mut artifacts = trainer.train_from_texts(&texts)?;
    if let Some(pb) = spinner {
        pb.finish_with_message("training complete");
    }

    if let Some(threshold) = args.compress {
        let before = artifacts.model.size();
        artifacts.model.compress(threshold);
        info!(
            "compressed model from {} to {} entries at threshold {}",
            before,
            artifacts.model.size(),
            threshold
        );
    }

    artifacts
        .model
        .save(&args.output)
        .with_context(|| format!("failed to save model to {}", args.output.display()))?;

    let elapsed = start.elapsed();
    info!(
        "training complete: texts={} units={} size={} duration={elapsed:.2?}",
        artifacts.metrics.texts_processed, artifacts.metrics.total_units, artifacts.metrics.model_size
    );
    println!(
        "wrote model with {} entries (max_n {}, {}) to {}",
        artifacts.model.size(),
        artifacts.model.max_n(),
        artifacts.model.granularity(),
        args.output.display()
    );

    Ok(())
}

fn run_segment(args: SegmentArgs) -> Result<()> {
    let model = load_model(&args.model)?;

    let texts = if let Some(text) = args.text {
        vec![text]
    } else {
        let input = args.input.as_ref().expect("clap enforces text or input");
        let contents = fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_owned)
            .collect()
    };

    for text in &texts {
        let tokens = segment_text(
            &model,
            text,
            args.metric,
            args.backward_metric,
            &args.n_list,
            args.threshold,
            args.variant,
        )?;
        if args.json {
            let record = json!({
                "text": text,
                "tokens": tokens,
            });
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", tokens.join("|"));
        }
    }

    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    if args.thresholds.is_empty() {
        return Err(anyhow!("at least one threshold is required"));
    }
    let model = load_model(&args.model)?;

    let ingest_cfg = IngestConfig {
        line_delimited: !args.whole_files,
        ..IngestConfig::default()
    };
    let texts = load_text_corpus(&args.inputs, &ingest_cfg)
        .with_context(|| "failed to load evaluation texts")?;
    info!("evaluating {} texts", texts.len());

    if !args.json {
        println!("n_list\tthres.\tF1");
    }
    for &threshold in &args.thresholds {
        let cfg = EvalConfig {
            forward: args.metric,
            backward: args.backward_metric,
            n_list: args.n_list.clone(),
            threshold,
            variant: args.variant,
            keep_spaces: args.keep_spaces,
        };
        let evaluation = evaluate(&model, &texts, &cfg)?;
        if args.json {
            println!("{}", serde_json::to_string(&evaluation)?);
        } else {
            println!(
                "{:?}\t{}\t{}",
                evaluation.n_list, evaluation.threshold, evaluation.mean_f1
            );
        }
    }

    Ok(())
}

fn run_compress(args: CompressArgs) -> Result<()> {
    let mut model = load_model(&args.model)?;
    let before = model.size();
    model.compress(args.threshold);
    let output = args.output.unwrap_or(args.model);
    model
        .save(&output)
        .with_context(|| format!("failed to save model to {}", output.display()))?;
    println!(
        "compressed model from {} to {} entries -> {}",
        before,
        model.size(),
        output.display()
    );
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    let model = load_model(&args.model)?;
    let summary = json!({
        "path": args.model.display().to_string(),
        "max_n": model.max_n(),
        "granularity": model.granularity().to_string(),
        "size": model.size(),
        "distinct_grams": model.counts().len(),
        "successor_keys": model.successors().len(),
        "predecessor_keys": model.predecessors().len(),
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Max n           : {}", model.max_n());
        println!("Granularity     : {}", model.granularity());
        println!("Model size      : {}", model.size());
        println!("Distinct grams  : {}", model.counts().len());
        println!("Successor keys  : {}", model.successors().len());
        println!("Predecessor keys: {}", model.predecessors().len());
    }

    Ok(())
}
