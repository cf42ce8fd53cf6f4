use maze_search::config::{Cli, Config};
use maze_search::map::{Map, Overlay};
use maze_search::scenario::Task;
use maze_search::solver::Solver;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let map = Map::from_file(&config.map_path)?;
    let mut task = Task::from_map(&map, config.adversary_facing);
    if config.scatter_goals > 0 {
        let mut rng = StdRng::seed_from_u64(config.seed);
        task.scatter_goals(&map, config.scatter_goals, &mut rng)?;
    }

    let mut solver = Solver::new(&map, &task, config.search_options());
    let solution = solver.solve(&config.variant())?;

    if solution.success {
        if config.render {
            let mut overlay = Overlay::new(&map);
            overlay.stamp(&map, &solution);
            println!("{overlay}");
        }
        println!("Path length: {}", solution.step_cost);
        println!("Total cost: {}", solution.solution_cost);
    } else {
        error!("search ended without a path: {:?}", solution.termination);
    }
    println!("Nodes expanded: {}", solution.nodes_expanded);

    if let Some(output_path) = &config.output_path {
        solution.write_to_file(output_path)?;
        info!("solution written to {output_path}");
    }

    Ok(())
}
