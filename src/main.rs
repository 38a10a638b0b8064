use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use hansard::stages::match_speaker;
use hansard::{
    AggregateConfig, AnthropicClient, AnthropicConfig, ColonPolicy, EntityRecognizer,
    LlmRecognizer, LlmRecognizerConfig, MatchConfig, OutputOptions, PatternRecognizer, Pipeline,
    PipelineConfig, RosterCache, UnresolvedPolicy, join_roster, list_protocol_files,
    load_protocol_file, load_roster_file,
};

#[derive(Parser)]
#[command(name = "hansard")]
#[command(author, version, about = "Plenary protocol speaker segmentation pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RecognizerKind {
    /// Offline capitalized-name patterns
    Pattern,
    /// Claude tool-use name extraction (needs ANTHROPIC_API_KEY)
    Llm,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColonPolicyArg {
    /// Keep only the text between the first and second colon
    SecondField,
    /// Keep everything after the first colon
    DropFirst,
}

impl From<ColonPolicyArg> for ColonPolicy {
    fn from(arg: ColonPolicyArg) -> Self {
        match arg {
            ColonPolicyArg::SecondField => ColonPolicy::SecondFieldOnly,
            ColonPolicyArg::DropFirst => ColonPolicy::DropFirstField,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Segment protocols and aggregate speech text per legislator
    Process {
        /// Protocol file (JSON) or directory of protocol files
        #[arg(short, long)]
        input: PathBuf,

        /// Roster file with legislators and terms (JSON)
        #[arg(short, long)]
        roster: PathBuf,

        /// Directory for per-session output files
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Also write a human-readable text file per session
        #[arg(long)]
        human_readable: bool,

        /// Minimum similarity for a speaker label to match a roster name
        #[arg(long, default_value = "0.5")]
        cutoff: f64,

        /// Leave speakers without a roster match out of the output
        #[arg(long)]
        drop_unresolved: bool,

        /// How to clean colons out of aggregated speech text
        #[arg(long, value_enum, default_value = "second-field")]
        colon_policy: ColonPolicyArg,

        /// Entity recognizer
        #[arg(long, value_enum, default_value = "pattern")]
        recognizer: RecognizerKind,

        /// Model for the llm recognizer
        #[arg(long)]
        model: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show boundaries and segments of one protocol without writing output
    Analyze {
        /// Protocol file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Roster file; when given, speaker labels are matched as well
        #[arg(short, long)]
        roster: Option<PathBuf>,

        /// Entity recognizer
        #[arg(long, value_enum, default_value = "pattern")]
        recognizer: RecognizerKind,

        /// Model for the llm recognizer
        #[arg(long)]
        model: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            roster,
            output_dir,
            human_readable,
            cutoff,
            drop_unresolved,
            colon_policy,
            recognizer,
            model,
            verbose,
        } => {
            setup_logging(verbose);
            let config = PipelineConfig {
                matching: MatchConfig { cutoff },
                aggregate: AggregateConfig {
                    colon_policy: colon_policy.into(),
                    unresolved: if drop_unresolved {
                        UnresolvedPolicy::Drop
                    } else {
                        UnresolvedPolicy::Retain
                    },
                },
                ..Default::default()
            };
            let output = OutputOptions {
                dir: output_dir,
                human_readable,
            };
            process_protocols(input, roster, output, config, recognizer, model).await
        }
        Commands::Analyze {
            input,
            roster,
            recognizer,
            model,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_protocol(input, roster, recognizer, model).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_recognizer(kind: RecognizerKind, model: Option<String>) -> Result<Arc<dyn EntityRecognizer>> {
    match kind {
        RecognizerKind::Pattern => Ok(Arc::new(PatternRecognizer::new())),
        RecognizerKind::Llm => {
            let mut api_config = AnthropicConfig::from_env()?;
            if let Some(model) = model {
                api_config.model = model;
            }
            let client = AnthropicClient::new(api_config);
            Ok(Arc::new(LlmRecognizer::new(client, LlmRecognizerConfig::default())))
        }
    }
}

fn load_rosters(path: &Path) -> Result<RosterCache> {
    info!("Loading roster from {:?}", path);
    let tables = load_roster_file(path).context("Failed to load roster")?;
    let terms = join_roster(&tables);
    info!(
        "Loaded {} legislators, {} terms ({} joined)",
        tables.legislators.len(),
        tables.terms.len(),
        terms.len()
    );
    Ok(RosterCache::new(terms))
}

async fn process_protocols(
    input: PathBuf,
    roster: PathBuf,
    output: OutputOptions,
    config: PipelineConfig,
    recognizer: RecognizerKind,
    model: Option<String>,
) -> Result<()> {
    let mut rosters = load_rosters(&roster)?;
    let files = list_protocol_files(&input)?;
    info!("Found {} protocol files in {:?}", files.len(), input);

    let pipeline = Pipeline::new(build_recognizer(recognizer, model)?, config);
    info!("Run {}", pipeline.run_id());

    let summary = pipeline.run_batch(&files, &mut rosters, &output).await?;

    info!(
        "Complete: {} sessions written to {:?}, {} skipped",
        summary.written.len(),
        output.dir,
        summary.skipped.len()
    );
    for skipped in &summary.skipped {
        println!("skipped {}: {}", skipped.source.display(), skipped.reason);
    }

    Ok(())
}

async fn analyze_protocol(
    input: PathBuf,
    roster: Option<PathBuf>,
    recognizer: RecognizerKind,
    model: Option<String>,
) -> Result<()> {
    info!("Analyzing protocol from {:?}", input);
    let record = load_protocol_file(&input)?;
    let pipeline = Pipeline::new(build_recognizer(recognizer, model)?, PipelineConfig::default());
    let result = pipeline.segment(&record.text).await?;

    println!("Protocol Analysis");
    println!("=================");
    println!("Protocol: {} ({})", record.protocol_number, record.date.format("%d.%m.%Y"));
    println!("Raw length: {} chars", record.text.chars().count());
    println!("Normalized length: {} chars", result.normalized.text.chars().count());
    println!("End marker: {}", result.normalized.end_marker);
    println!("Interjections removed: {}", result.normalized.interjections.len());
    println!("Person spans: {}", result.person_spans);
    println!();

    println!("Speaker Boundaries");
    println!("------------------");
    for mark in &result.marks {
        println!(
            "{:>8}  {:<18} {:?}  {:?}",
            mark.start,
            format!("{:?}", mark.rule),
            mark.speaker_label,
            mark.trailing_context
        );
    }
    println!();

    println!("Segments: {}", result.segments.len());
    if let Some(roster) = roster {
        let mut rosters = load_rosters(&roster)?;
        let active = rosters.get(record.date);
        let cutoff = pipeline.config().matching.cutoff;
        println!("Active legislators: {}", active.len());
        println!();

        println!("Speaker Matches");
        println!("---------------");
        let mut seen: Vec<&str> = Vec::new();
        for segment in &result.segments {
            let label = segment.raw_speaker_label.as_str();
            if seen.contains(&label) {
                continue;
            }
            seen.push(label);
            match match_speaker(label, active, cutoff) {
                Some(m) => println!(
                    "{:?} -> {} ({}) {:.2}",
                    label, m.canonical_full_name, m.legislator_id, m.score
                ),
                None => println!("{:?} -> unresolved", label),
            }
        }
    }

    Ok(())
}
