use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use roster_planner::display::{print_diagnostics, print_outcome};
use roster_planner::export::{write_report_json, write_roster_csv};
use roster_planner::sample::{self, SampleOptions};
use roster_planner::{logging, parser, MilpBackend, PlannerConfig, Planner};

const USAGE: &str = "\
Usage:
  roster-planner plan <registry.csv> <availability.csv> [priorities.csv] [--config FILE] [--out FILE] [--report FILE]
  roster-planner diagnose <registry.csv> <availability.csv> [--config FILE]
  roster-planner demo [PERSONS] [DAYS] [--seed N] [--out FILE]";

/// Positional arguments plus the `--flag value` pairs that follow them.
struct Args {
    positional: Vec<String>,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    report: Option<PathBuf>,
    seed: Option<u64>,
}

fn parse_args(raw: &[String]) -> Result<Args> {
    let mut args = Args {
        positional: Vec::new(),
        config: None,
        out: None,
        report: None,
        seed: None,
    };
    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--config" => args.config = Some(PathBuf::from(value("--config")?)),
            "--out" => args.out = Some(PathBuf::from(value("--out")?)),
            "--report" => args.report = Some(PathBuf::from(value("--report")?)),
            "--seed" => {
                let raw = value("--seed")?;
                args.seed = Some(raw.parse().with_context(|| format!("invalid seed `{}`", raw))?);
            }
            flag if flag.starts_with("--") => bail!("unknown option `{}`\n{}", flag, USAGE),
            _ => args.positional.push(arg.clone()),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::from_json_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(PlannerConfig::default()),
    }
}

fn run_plan(args: Args) -> Result<()> {
    if args.positional.len() < 2 {
        bail!("plan needs a registry and an availability file\n{}", USAGE);
    }
    let config = load_config(args.config.as_deref())?;
    let priorities = args.positional.get(2).map(Path::new);
    let input = parser::load_input(Path::new(&args.positional[0]), Path::new(&args.positional[1]), priorities)
        .context("failed to read planning input")?;

    println!("Loaded {} persons over {} availability entries", input.registry.len(), input.availability.len());

    let planner = Planner::new(config, MilpBackend::new())?;
    let outcome = planner.plan(&input).context("planning failed")?;
    print_outcome(&outcome);

    if let Some(out) = &args.out {
        write_roster_csv(&outcome.roster, out).with_context(|| format!("failed to write {}", out.display()))?;
        println!("\nRoster saved to {}", out.display());
    }
    if let Some(report) = &args.report {
        write_report_json(&outcome.report, report).with_context(|| format!("failed to write {}", report.display()))?;
        println!("Quality report saved to {}", report.display());
    }
    Ok(())
}

fn run_diagnose(args: Args) -> Result<()> {
    if args.positional.len() < 2 {
        bail!("diagnose needs a registry and an availability file\n{}", USAGE);
    }
    let config = load_config(args.config.as_deref())?;
    let input = parser::load_input(Path::new(&args.positional[0]), Path::new(&args.positional[1]), None)
        .context("failed to read planning input")?;

    let planner = Planner::new(config, MilpBackend::new())?;
    let report = planner.diagnose(&input)?;
    print_diagnostics(&report);
    Ok(())
}

fn run_demo(args: Args) -> Result<()> {
    let mut options = SampleOptions::default();
    if let Some(persons) = args.positional.first() {
        options.persons = persons.parse().with_context(|| format!("invalid person count `{}`", persons))?;
    }
    if let Some(days) = args.positional.get(1) {
        options.days = days.parse().with_context(|| format!("invalid day count `{}`", days))?;
    }
    if let Some(seed) = args.seed {
        options.seed = seed;
    }
    let config = load_config(args.config.as_deref())?;

    println!(
        "Generating a sample station: {} persons, {} days, seed {}",
        options.persons, options.days, options.seed
    );
    let input = sample::generate(&options)?;
    let planner = Planner::new(config, MilpBackend::new())?;
    let outcome = planner.plan(&input).context("planning failed")?;
    print_outcome(&outcome);

    if let Some(out) = &args.out {
        write_roster_csv(&outcome.roster, out).with_context(|| format!("failed to write {}", out.display()))?;
        println!("\nRoster saved to {}", out.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    logging::init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = raw.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };
    let args = parse_args(rest)?;

    match command.as_str() {
        "plan" => run_plan(args),
        "diagnose" => run_diagnose(args),
        "demo" => run_demo(args),
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => bail!("unknown command `{}`\n{}", other, USAGE),
    }
}
