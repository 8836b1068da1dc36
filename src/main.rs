use anyhow::Context;
use breedmatch::{
    export_json, load_records, BreedMatch, BreedMatcher, Error, ErrorKind, Feature,
    FeatureVector, MatchExplanation, MatchSummary, PopulationOptions, Preference,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Find similar dog breeds by example or by trait preferences
#[derive(Parser, Debug)]
#[command(name = "breedmatch")]
#[command(about = "Find similar dog breeds by example or by trait preferences", long_about = None)]
struct Args {
    /// Breed dataset (.json array or .jsonl rows)
    #[arg(short, long)]
    data: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Drop rows with out-of-range values (max < min height, traits outside 0-1)
    #[arg(long)]
    strict_ranges: bool,

    /// Include a per-feature breakdown of every match
    #[arg(long)]
    explain: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Breeds most similar to an existing breed
    Example {
        /// Breed name (case-sensitive)
        breed: String,

        /// Number of breeds to return
        #[arg(short, default_value_t = 5)]
        k: usize,
    },

    /// Breeds closest to a set of trait preferences
    Prefer {
        #[arg(long)]
        popularity: Option<f64>,
        #[arg(long)]
        trainability: Option<f64>,
        #[arg(long)]
        demeanor: Option<f64>,
        #[arg(long)]
        energy_level: Option<f64>,
        #[arg(long)]
        min_height: Option<f64>,
        #[arg(long)]
        max_height: Option<f64>,

        /// Number of breeds to return
        #[arg(short, default_value_t = 5)]
        k: usize,
    },

    /// Fitted normalization statistics
    Stats {
        /// Also write the statistics to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct QueryOutput {
    matches: Vec<BreedMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanations: Option<Vec<MatchExplanation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<MatchSummary>,
}

#[derive(Serialize)]
struct FeatureStats {
    feature: Feature,
    mean: f64,
    std: f64,
}

#[derive(Serialize)]
struct StatsOutput {
    population_size: usize,
    features: Vec<FeatureStats>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let (message, code) = match e.downcast_ref::<Error>() {
                Some(err) => {
                    let mut message = describe(err);
                    if let Some(hint) = e.downcast_ref::<DidYouMean>() {
                        message = format!("{message}; {hint}");
                    }
                    (message, exit_code(err.kind()))
                }
                None => (format!("{:#}", e), 1),
            };
            eprintln!("error: {message}");
            ExitCode::from(code)
        }
    }
}

fn init_logging(log_level: &str) -> anyhow::Result<()> {
    let log_level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_ascii_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    info!("Starting breedmatch v{}", env!("CARGO_PKG_VERSION"));

    let records = load_records(&args.data)
        .with_context(|| format!("loading dataset {:?}", args.data))?;
    let options = PopulationOptions {
        validate_ranges: args.strict_ranges,
    };
    let matcher = BreedMatcher::with_options(records, &options)?;
    info!(breeds = matcher.population_size(), "population ready");

    match args.command {
        Command::Example { breed, k } => {
            let matches = match matcher.match_by_example(&breed, k) {
                Err(err @ Error::BreedNotFound(_)) => {
                    let err = anyhow::Error::new(err);
                    return Err(match suggest_breed(&matcher, &breed) {
                        Some(name) => err.context(DidYouMean(name)),
                        None => err,
                    });
                }
                other => other?,
            };
            let query = matcher.example_query(&breed)?;
            print_json(&query_output(&matcher, &query, matches, args.explain))
        }
        Command::Prefer {
            popularity,
            trainability,
            demeanor,
            energy_level,
            min_height,
            max_height,
            k,
        } => {
            let preference = Preference {
                popularity,
                trainability,
                demeanor,
                energy_level,
                min_height,
                max_height,
            };
            let matches = matcher.match_by_preference(&preference, k)?;
            let query = matcher.preference_query(&preference)?;
            print_json(&query_output(&matcher, &query, matches, args.explain))
        }
        Command::Stats { out } => {
            let stats = matcher.stats();
            if let Some(path) = out {
                export_json(&path, stats)
                    .with_context(|| format!("writing statistics to {:?}", path))?;
                info!(path = ?path, "statistics exported");
            }
            let output = StatsOutput {
                population_size: matcher.population_size(),
                features: stats
                    .means()
                    .iter()
                    .zip(stats.stds().iter())
                    .map(|((feature, mean), (_, std))| FeatureStats { feature, mean, std })
                    .collect(),
            };
            print_json(&output)
        }
    }
}

fn query_output(
    matcher: &BreedMatcher,
    query: &FeatureVector,
    matches: Vec<BreedMatch>,
    explain: bool,
) -> QueryOutput {
    if !explain {
        return QueryOutput {
            matches,
            explanations: None,
            summary: None,
        };
    }
    let explanations = matcher.explain(query, &matches);
    let summary = MatchSummary::compute(&explanations);
    QueryOutput {
        matches,
        explanations: Some(explanations),
        summary: Some(summary),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Case-insensitive spelling of a breed name that was not found
#[derive(Debug)]
struct DidYouMean(String);

impl fmt::Display for DidYouMean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "did you mean '{}'?", self.0)
    }
}

fn suggest_breed(matcher: &BreedMatcher, name: &str) -> Option<String> {
    matcher
        .population()
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(name))
        .map(|r| r.name.clone())
}

fn describe(err: &Error) -> String {
    match err {
        Error::BreedNotFound(name) => {
            format!("no breed named {name}; names are matched exactly")
        }
        Error::InvalidPreference { feature, reason } => format!(
            "preference for {feature} is unusable ({reason}); pass --{} with a number",
            feature.name().replace('_', "-")
        ),
        Error::InvalidK { k, max } => {
            format!("cannot return {k} breed(s); choose -k between 1 and {max}")
        }
        Error::DegenerateFeature { feature, value } => format!(
            "every breed in the dataset has {feature} = {value}, so breeds cannot be compared on it"
        ),
        other => other.to_string(),
    }
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Data => 65,
        ErrorKind::DegenerateFeature => 65,
        ErrorKind::BreedNotFound => 2,
        ErrorKind::InvalidPreference => 2,
        ErrorKind::InvalidK => 2,
    }
}
