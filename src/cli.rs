use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::domain::Network;
use crate::optimizer::{
    CostModel, HillClimber, NetworkOptimizer, SearchStrategy, SequentialDescent, TiePolicy,
};
use crate::persistence::{load_network, save_network};
use crate::report::NetworkSummary;

#[derive(Debug, Parser)]
#[command(
    name = "grid-allocator",
    version,
    about = "Inspect and rebalance house-to-generator assignments"
)]
pub struct Cli {
    /// TOML configuration file (defaults to config/default.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load a network file and print it with its cost
    Show(ShowArgs),
    /// Load a network file, improve its assignment and print the result
    Optimize(OptimizeArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Network file
    pub file: PathBuf,

    /// Overload severity weight
    #[arg(long)]
    pub lambda: Option<f64>,

    /// Print a JSON summary instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Randomized hill climbing
    Random,
    /// Deterministic sequential descent
    Descent,
}

#[derive(Debug, Args)]
pub struct OptimizeArgs {
    /// Network file
    pub file: PathBuf,

    #[arg(long, value_enum, default_value_t = Strategy::Descent)]
    pub strategy: Strategy,

    /// Trial moves for the random strategy
    #[arg(long, short = 'k', value_parser = at_least_one())]
    pub iterations: Option<usize>,

    /// Seed for the random strategy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overload severity weight
    #[arg(long)]
    pub lambda: Option<f64>,

    /// Revert equal-cost moves instead of keeping them
    #[arg(long)]
    pub reject_ties: bool,

    /// Pass cap for the descent strategy
    #[arg(long, value_parser = at_least_one())]
    pub max_passes: Option<usize>,

    /// Save the optimized network to this file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Print a JSON summary instead of text
    #[arg(long)]
    pub json: bool,
}

fn at_least_one() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Show(args) => show(&config, args),
        Commands::Optimize(args) => optimize(&config, args),
    }
}

fn cost_model(config: &Config, lambda: Option<f64>) -> Result<CostModel> {
    match lambda {
        Some(lambda) => Ok(CostModel::new(lambda)?),
        None => config.cost_model(),
    }
}

fn load(path: &Path) -> Result<Network> {
    load_network(path).with_context(|| format!("failed to load network from {}", path.display()))
}

fn show(config: &Config, args: ShowArgs) -> Result<()> {
    let cost = cost_model(config, args.lambda)?;
    let network = load(&args.file)?;

    if args.json {
        let summary = NetworkSummary::new(&network, &cost);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let breakdown = cost.evaluate(&network);
    println!("{}", network);
    println!(
        "Cost: {:.4} (dispersion {:.4} + {} x surcharge {:.4})",
        breakdown.total, breakdown.dispersion, breakdown.lambda, breakdown.surcharge
    );
    Ok(())
}

fn optimize(config: &Config, args: OptimizeArgs) -> Result<()> {
    let cost = cost_model(config, args.lambda)?;
    let network = load(&args.file)?;

    let tie_policy = if args.reject_ties {
        TiePolicy::Reject
    } else {
        config.search.tie_policy()
    };
    let strategy: Box<dyn SearchStrategy> = match args.strategy {
        Strategy::Random => {
            let iterations = args.iterations.unwrap_or(config.search.iterations);
            let seed = args.seed.or(config.search.seed);
            Box::new(HillClimber::seeded(iterations, seed).with_tie_policy(tie_policy))
        }
        Strategy::Descent => {
            let max_passes = args.max_passes.unwrap_or(config.search.max_passes);
            Box::new(SequentialDescent::new(tie_policy, max_passes))
        }
    };

    let mut optimizer = NetworkOptimizer::new(strategy, cost);
    let report = optimizer.optimize(network);
    info!(
        strategy = report.strategy,
        initial_cost = report.initial_cost,
        final_cost = report.final_cost,
        "optimization done"
    );

    if let Some(output) = &args.output {
        save_network(output, &report.network)
            .with_context(|| format!("failed to save network to {}", output.display()))?;
    }

    if args.json {
        let body = serde_json::json!({
            "search": report.stats(),
            "summary": NetworkSummary::new(&report.network, &cost),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("{}", report.network);
    println!(
        "Cost: {:.4} -> {:.4} ({} strategy, {} moves kept)",
        report.initial_cost, report.final_cost, report.strategy, report.accepted_moves
    );
    if !report.converged {
        println!("Stopped on the pass cap before reaching a fixed point");
    }
    if let Some(output) = &args.output {
        println!("Saved to {}", output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_optimize_arguments() {
        let cli = Cli::parse_from([
            "grid-allocator",
            "optimize",
            "net.txt",
            "--strategy",
            "random",
            "-k",
            "50",
            "--seed",
            "3",
            "--reject-ties",
        ]);
        match cli.command {
            Commands::Optimize(args) => {
                assert_eq!(args.strategy, Strategy::Random);
                assert_eq!(args.iterations, Some(50));
                assert_eq!(args.seed, Some(3));
                assert!(args.reject_ties);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_zero_budgets_rejected() {
        for flag in ["-k", "--max-passes"] {
            let err = Cli::try_parse_from(["grid-allocator", "optimize", "net.txt", flag, "0"])
                .unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }

        let cli = Cli::parse_from(["grid-allocator", "optimize", "net.txt", "--max-passes", "1"]);
        match cli.command {
            Commands::Optimize(args) => assert_eq!(args.max_passes, Some(1)),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
