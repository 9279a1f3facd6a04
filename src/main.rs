mod allocator;
mod loader;
mod models;
mod progress;
mod report;
mod search;
mod stats;
mod writer;

use allocator::TopicAllocator;
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use loader::TableLoader;
use models::Config;
use progress::ProgressBar;
use rand::rngs::StdRng;
use rand::SeedableRng;
use search::{AssignmentSearch, ProgressObserver, SearchResult};
use stats::OutcomeStats;
use std::io;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;
use writer::ResultWriter;

fn cli() -> Command {
    Command::new("topic-assigner")
        .version("0.1.0")
        .about("Assign topics to students based on randomized priority until the number of unassigned students is at or below a threshold")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Preference table: a name column followed by choice columns in rank order")
                .required(true),
        )
        .arg(
            Arg::new("iterations")
                .short('i')
                .long("iterations")
                .value_name("N")
                .help("How many iterations may be run. Default is 1.")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("unassigned")
                .short('u')
                .long("unassigned")
                .value_name("M")
                .help("Maximum number of unassigned students. Default is 0.")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("save")
                .short('s')
                .long("save")
                .help("Save the result to a file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed the random priority order for a reproducible run")
                .value_parser(clap::value_parser!(u64)),
        )
}

/// Config file values overridden by whatever was given on the command line.
fn resolve_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = match matches.get_one::<String>("config") {
        Some(config_file) => {
            println!("📋 Loading configuration from: {}", config_file);
            Config::load_from_file(config_file)
                .with_context(|| format!("Failed to load configuration: {}", config_file))?
        }
        None => Config::default(),
    };

    if let Some(iterations) = matches.get_one::<usize>("iterations") {
        config.iterations = *iterations;
    }
    if let Some(unassigned) = matches.get_one::<usize>("unassigned") {
        config.unassigned = *unassigned;
    }
    if matches.get_flag("save") {
        config.save = true;
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.seed = Some(*seed);
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let matches = cli().get_matches();

    if let Some(config_file) = matches.get_one::<String>("config") {
        if !Path::new(config_file).exists() {
            println!("📝 Creating default configuration file: {}", config_file);
            Config::default().save_to_file(config_file)?;
            println!("⚠️  Edit {} as needed, then run the program again.", config_file);
            return Ok(());
        }
    }

    let config = resolve_config(&matches)?;
    let Some(file) = matches.get_one::<String>("file") else {
        anyhow::bail!("an input file is required");
    };

    run(file, &config)
}

fn run(file: &str, config: &Config) -> Result<()> {
    print!("{}", report::banner("Student Topic Assigner"));
    println!();
    println!("{}", report::problem_description(file, config.iterations, config.unassigned, config.save));

    let table = TableLoader::new(config.delimiter_byte(), config.unassigned_marker.as_str())
        .load_file(Path::new(file))
        .with_context(|| format!("Failed to read preference table: {}", file))?;

    let allocator = TopicAllocator::new(&table.entities, table.width);
    info!(
        rows = table.entities.len(),
        considered = allocator.considered(),
        "starting search"
    );
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut bar = ProgressBar::new(io::stdout());
    let mut silent = ();
    let observer: &mut dyn ProgressObserver = if config.iterations > 1 { &mut bar } else { &mut silent };

    let result = AssignmentSearch::new(&allocator)
        .max_iterations(config.iterations)
        .unassigned_threshold(config.unassigned)
        .run(&mut rng, observer);

    let (outcome, attempt) = match result {
        SearchResult::Accepted { outcome, attempt } => (outcome, attempt),
        SearchResult::Exhausted { attempts } => {
            info!(attempts, "giving up");
            println!("\n");
            println!("  No valid solutions found.\n");
            return Ok(());
        }
    };

    let result_writer = ResultWriter::new(
        &table.name_column,
        &config.unassigned_marker,
        &config.not_applicable_marker,
    );

    println!("\n\nCriteria met at iteration {}\n", attempt);
    print!(
        "{}",
        report::result_table(
            [table.name_column.as_str(), "Selection", "Choice"],
            &result_writer.rows(&outcome)
        )
    );
    println!();

    info!(
        attempt,
        assigned = outcome.assigned(),
        unassigned = outcome.unassigned,
        "accepted outcome"
    );
    let stats = OutcomeStats::from_outcome(&outcome, config.weighted_ranks);
    println!("{}", report::summary(&outcome.rank_vector, &stats, config.weighted_ranks));

    if config.save {
        let output_dir = config.output_directory.as_deref().map(Path::new);
        let saved = result_writer.save(&outcome, Path::new(file), output_dir)?;
        println!("Result saved to file \"{}\"\n", saved.display());
    }

    print!("{}", report::footer());
    Ok(())
}
