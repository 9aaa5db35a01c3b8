//! parley: command-line runner for negotiation simulations.
//!
//! Usage:
//!   cargo run -p demo -- run
//!   cargo run -p demo -- run --config sim.toml --seed 7 --ticks 100
//!   cargo run -p demo -- check-protocol crates/parley-protocol/protocols/negotiation.toml

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use parley_contracts::{error::ParleyResult, performative::Performative};
use parley_core::traits::Protocol;
use parley_protocol::TomlProtocol;
use parley_sim::{NegotiationModel, SimulationConfig};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Pairwise agent negotiation simulator.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "parley negotiation simulator",
    long_about = "Runs tick-based negotiations between agents that propose, accept,\n\
                  question and argue about items under a validated protocol graph."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulation and print each agent's bag.
    Run {
        /// Simulation config file; the bundled engine catalogue when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Protocol graph overriding the one named in the config.
        #[arg(long)]
        protocol: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        ticks: Option<u64>,
        /// Number of generated agents, replacing the configured ones.
        #[arg(long)]
        agents: Option<usize>,
    },
    /// Validate a protocol graph file and print its transitions.
    CheckProtocol {
        path: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=info to follow every message, debug for every transition.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run {
            config,
            protocol,
            seed,
            ticks,
            agents,
        } => run(config, protocol, seed, ticks, agents),
        Command::CheckProtocol { path } => check_protocol(path),
    };

    if let Err(e) = result {
        eprintln!("parley error: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run(
    config: Option<PathBuf>,
    protocol: Option<PathBuf>,
    seed: Option<u64>,
    ticks: Option<u64>,
    agents: Option<usize>,
) -> ParleyResult<()> {
    let mut config = match config {
        Some(path) => SimulationConfig::from_file(&path)?,
        None => SimulationConfig::bundled()?,
    };
    if let Some(protocol) = protocol {
        config.protocol = Some(protocol);
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(ticks) = ticks {
        config.ticks = ticks;
    }
    if let Some(count) = agents {
        config.set_agent_count(count);
    }

    info!(seed = config.seed, ticks = config.ticks, "starting simulation");
    let mut model = NegotiationModel::from_config(&config)?;
    model.run_n(config.ticks)?;

    println!();
    println!("parley simulation (seed {}, {} ticks)", config.seed, model.tick());
    println!("=========================================");
    for agent in model.agents() {
        let state = agent.state();
        let bag: Vec<&str> = state.bag().iter().map(|i| i.name.as_str()).collect();
        println!(
            "  {:<12} gave {:>2}  received {:>2}  bag: [{}]",
            agent.id().to_string(),
            state.given(),
            state.received(),
            bag.join(", ")
        );
    }
    println!();
    println!(
        "{} messages delivered, {} still in flight",
        model.mailbox().transcript().len(),
        model.mailbox().pending()
    );
    Ok(())
}

fn check_protocol(path: PathBuf) -> ParleyResult<()> {
    let protocol = TomlProtocol::from_file(&path)?;
    let reachable = protocol.reachable();
    let dead_ends = protocol.dead_ends();

    println!("{}: valid protocol graph", path.display());
    println!("  initial: {}", protocol.initial());
    for state in Performative::ALL {
        let successors: Vec<String> = protocol.successors(state).iter().map(|s| s.to_string()).collect();
        let mut flags = Vec::new();
        if protocol.is_final(state) {
            flags.push("final");
        }
        if !reachable.contains(&state) {
            flags.push("unreachable");
        }
        if dead_ends.contains(&state) {
            flags.push("dead end");
        }
        println!(
            "  {:<10} -> [{}]{}",
            state.label(),
            successors.join(", "),
            if flags.is_empty() {
                String::new()
            } else {
                format!("  ({})", flags.join(", "))
            }
        );
    }
    Ok(())
}
