//! `birdseye` CLI: run tracking episodes with the bearing sensor and report their outcome.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::Rng;
use rand_core::SeedableRng;
use serde::Serialize;

use birdseye::config::EnvConfig;
use birdseye::env::RfEnv;
use birdseye::geometry::pol2cart;
use birdseye::models::{Control, State};
use birdseye::sensors::BearingSensor;

#[derive(Parser)]
#[command(name = "birdseye", about = "Particle filter emitter tracking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    /// Hold course at the lowest speed
    Hold,
    /// Uniformly random maneuvers
    Random,
}

#[derive(Subcommand)]
enum Commands {
    /// Run episodes and print a JSON summary of each.
    Run {
        /// Number of episodes
        #[arg(long, default_value_t = 1)]
        episodes: usize,
        /// Steps per episode
        #[arg(long, default_value_t = 100)]
        steps: usize,
        /// Random seed, overrides the configuration
        #[arg(long)]
        seed: Option<u64>,
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Policy::Hold)]
        policy: Policy,
        /// Bearing observation noise (degrees)
        #[arg(long, default_value_t = 5.0)]
        bearing_std: f64,
        /// Write the summaries to a JSON file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct EpisodeSummary {
    episode: usize,
    steps: usize,
    total_reward: f64,
    true_state: State,
    estimate: State,
    /// Distance between true and estimated emitter position
    position_error: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            episodes,
            steps,
            seed,
            config,
            policy,
            bearing_std,
            output,
        } => {
            let mut config = match config {
                Some(path) => EnvConfig::from_json_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => EnvConfig::default(),
            };
            if seed.is_some() {
                config.seed = seed;
            }
            let summaries = run(config, episodes, steps, policy, bearing_std)?;
            let json = serde_json::to_string_pretty(&summaries)?;
            match output {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}

fn run(
    config: EnvConfig,
    episodes: usize,
    steps: usize,
    policy: Policy,
    bearing_std: f64,
) -> Result<Vec<EpisodeSummary>> {
    let mut policy_rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };
    let sensor = BearingSensor::new(bearing_std, 10., 10.)?;
    let mut env = RfEnv::new(sensor, config)?;
    let hold = env.action_to_index(&Control::new(0, 1))?;
    let n_actions = env.catalog().len();

    let mut summaries = Vec::with_capacity(episodes);
    for episode in 0..episodes {
        env.reset()?;
        let mut total_reward = 0.;
        for _ in 0..steps {
            let action = match policy {
                Policy::Hold => hold,
                Policy::Random => policy_rng.gen_range(0..n_actions),
            };
            let step = env.step(action)?;
            total_reward += step.reward;
        }

        let true_state = *env.true_state().context("episode not running")?;
        let estimate = env.estimate()?;
        let position_error = (pol2cart(true_state.range, true_state.bearing.to_radians())
            - pol2cart(estimate.range, estimate.bearing.to_radians()))
        .norm();
        summaries.push(EpisodeSummary {
            episode,
            steps,
            total_reward,
            true_state,
            estimate,
            position_error,
        });
    }
    Ok(summaries)
}
