use clap::{Args, Parser, Subcommand};
use iban_checker::batch::{check_csv, write_results, BatchReport};
use iban_checker::corrupt::corrupt_iban;
use iban_checker::generator::generate_ibans;
use iban_checker::logging;
use iban_checker::{CharacterPolicy, CountryLengths, Validator};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Instant;

const SAMPLE_IBAN: &str = "DE227902007600279131";

#[derive(Parser)]
#[command(name = "iban-checker")]
#[command(about = "IBAN validator (country length + MOD 97-10)", long_about = None)]
struct Cli {
    #[command(flatten)]
    table: TableArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct TableArgs {
    #[arg(long, global = true, conflicts_with = "registry")]
    lengths: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    registry: bool,
    #[arg(long, global = true, default_value_t = false)]
    strict: bool,
}

#[derive(Subcommand)]
enum Command {
    Check(CheckArgs),
    Batch(BatchArgs),
    Generate(GenerateArgs),
    Corrupt(CorruptArgs),
    Lengths,
}

#[derive(Parser)]
struct CheckArgs {
    #[arg(required = true)]
    ibans: Vec<String>,
}

#[derive(Parser)]
struct BatchArgs {
    #[arg(long, default_value = "data/ibans.csv")]
    input: PathBuf,
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct GenerateArgs {
    #[arg(long, default_value = "DE")]
    country: String,
    #[arg(long, default_value_t = 10)]
    count: usize,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser)]
struct CorruptArgs {
    iban: String,
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("iban-checker")?;
    let cli = Cli::parse();
    let validator = build_validator(&cli.table)?;
    match cli.command {
        None => run_sample(&validator),
        Some(Command::Check(args)) => run_check(&validator, args),
        Some(Command::Batch(args)) => run_batch(&validator, args),
        Some(Command::Generate(args)) => run_generate(&validator, args),
        Some(Command::Corrupt(args)) => run_corrupt(&validator, args),
        Some(Command::Lengths) => run_lengths(&validator),
    }
}

fn build_validator(args: &TableArgs) -> Result<Validator, String> {
    let lengths = match (&args.lengths, args.registry) {
        (Some(path), _) => CountryLengths::from_csv_path(path)?,
        (None, true) => CountryLengths::registry(),
        (None, false) => CountryLengths::default(),
    };
    let policy = if args.strict {
        CharacterPolicy::Strict
    } else {
        CharacterPolicy::Permissive
    };
    log::debug!(
        "country table has {} entries, policy {:?}",
        lengths.entries().len(),
        policy
    );
    Ok(Validator::new(lengths).with_policy(policy))
}

fn run_sample(validator: &Validator) -> Result<(), String> {
    println!("Welcome to the IBAN Checker!");
    println!("IBAN {} is {}", SAMPLE_IBAN, validator.validate(SAMPLE_IBAN));
    Ok(())
}

fn run_check(validator: &Validator, args: CheckArgs) -> Result<(), String> {
    let mut invalid = 0usize;
    for iban in &args.ibans {
        match validator.check(iban) {
            Ok(()) => println!("{iban}: valid"),
            Err(issue) => {
                invalid += 1;
                println!("{iban}: invalid ({issue})");
            }
        }
    }
    if invalid > 0 {
        return Err(format!("{} of {} IBAN(s) invalid", invalid, args.ibans.len()));
    }
    Ok(())
}

fn run_batch(validator: &Validator, args: BatchArgs) -> Result<(), String> {
    let start = Instant::now();
    let report = check_csv(&args.input, validator)?;
    let elapsed = start.elapsed();
    log_batch_report(&report);

    if let Some(output) = args.output {
        write_results(&output, &report.results)?;
        emit_info_line(&format!("Results written to {}", output.display()));
    }
    emit_info_line(&format!("Batch time: {} ms", elapsed.as_millis()));
    Ok(())
}

fn run_generate(validator: &Validator, args: GenerateArgs) -> Result<(), String> {
    let country = args.country.trim().to_uppercase();
    let seed = args.seed.unwrap_or_else(random_seed);
    let ibans = generate_ibans(validator.lengths(), &country, args.count, seed)?;
    log::info!("Generated {} IBAN(s) for {} (seed {})", ibans.len(), country, seed);
    for iban in ibans {
        println!("{iban}");
    }
    Ok(())
}

fn run_corrupt(validator: &Validator, args: CorruptArgs) -> Result<(), String> {
    let seed = args.seed.unwrap_or_else(random_seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mutation = corrupt_iban(&mut rng, &args.iban, validator)?;
    log::info!(
        "Corrupt: position {} '{}' -> '{}' (seed {})",
        mutation.position,
        mutation.original,
        mutation.replacement,
        seed
    );
    println!("{}", mutation.iban);
    Ok(())
}

fn run_lengths(validator: &Validator) -> Result<(), String> {
    for (code, len) in validator.lengths().entries() {
        println!("{code} {len}");
    }
    Ok(())
}

fn log_batch_report(report: &BatchReport) {
    emit_info_line(&format!(
        "Batch check: records={} valid={} invalid={}",
        report.total_records,
        report.valid_records,
        report.invalid_records()
    ));

    let items = report.top_reasons();
    let max_items = 5usize;
    for (reason, count) in items.iter().take(max_items) {
        emit_info_line(&format!("Batch failures: {} = {}", reason, count));
    }
    if items.len() > max_items {
        emit_info_line(&format!(
            "Batch failures: {} additional reasons not shown",
            items.len() - max_items
        ));
    }
}

fn random_seed() -> u64 {
    let mut rng = rand::rngs::OsRng;
    rng.gen()
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        println!("{message}");
    }
}
