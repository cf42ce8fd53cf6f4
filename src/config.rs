use crate::algorithm::{SearchLimits, Strategy};
use crate::common::Direction;
use crate::solver::{SearchOptions, Variant};

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum VariantKind {
    Plain,
    Penalty,
    Guarded,
    MultiGoal,
}

#[derive(Parser, Debug, Default)]
#[command(
    name = "maze_search",
    about = "Best-first search over grid mazes with turn penalties, a patrolling adversary and multiple goals.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the maze file")]
    pub map_path: Option<String>,

    #[arg(long, value_enum, help = "Problem variant to solve")]
    pub variant: Option<VariantKind>,

    #[arg(long, value_enum, help = "Frontier ordering")]
    pub strategy: Option<Strategy>,

    #[arg(long, help = "Cost of a step that keeps the current facing")]
    pub forward_cost: Option<usize>,

    #[arg(long, help = "Extra cost of a step that changes facing")]
    pub turn_cost: Option<usize>,

    #[arg(long, value_enum, help = "Initial facing of the adversary")]
    pub adversary_facing: Option<Direction>,

    #[arg(long, value_enum, help = "Initial facing of the agent")]
    pub initial_facing: Option<Direction>,

    #[arg(long, help = "Stop after this many node expansions")]
    pub max_expansions: Option<usize>,

    #[arg(long, help = "Number of extra goals to place at random")]
    pub scatter_goals: Option<usize>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Path to the output file (.json or .yaml)")]
    pub output_path: Option<String>,

    #[arg(long, help = "Do not print the maze with the path drawn in", default_value_t = false)]
    pub no_render: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub map_path: String,
    pub variant: VariantKind,
    pub strategy: Strategy,
    pub forward_cost: usize,
    pub turn_cost: usize,
    pub adversary_facing: Direction,
    pub initial_facing: Direction,
    pub max_expansions: Option<usize>,
    pub scatter_goals: usize,
    pub seed: u64,
    pub output_path: Option<String>,
    pub render: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            map_path: "map_file/test/medium.lay".to_string(),
            variant: VariantKind::Plain,
            strategy: Strategy::AStar,
            forward_cost: 2,
            turn_cost: 1,
            adversary_facing: Direction::Right,
            initial_facing: Direction::Right,
            max_expansions: None,
            scatter_goals: 0,
            seed: 0,
            output_path: None,
            render: true,
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Flags given on the command line win over the file.
    pub fn override_from_command_line(mut self, cli: &Cli) -> Result<Self> {
        if let Some(map_path) = &cli.map_path {
            self.map_path = map_path.clone();
        }
        if let Some(variant) = cli.variant {
            self.variant = variant;
        }
        if let Some(strategy) = cli.strategy {
            self.strategy = strategy;
        }
        if let Some(forward_cost) = cli.forward_cost {
            self.forward_cost = forward_cost;
        }
        if let Some(turn_cost) = cli.turn_cost {
            self.turn_cost = turn_cost;
        }
        if let Some(facing) = cli.adversary_facing {
            self.adversary_facing = facing;
        }
        if let Some(facing) = cli.initial_facing {
            self.initial_facing = facing;
        }
        if cli.max_expansions.is_some() {
            self.max_expansions = cli.max_expansions;
        }
        if let Some(count) = cli.scatter_goals {
            self.scatter_goals = count;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if cli.output_path.is_some() {
            self.output_path = cli.output_path.clone();
        }
        if cli.no_render {
            self.render = false;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.map_path.is_empty() {
            return Err(anyhow!("Map path must not be empty"));
        }

        if self.forward_cost == 0 {
            return Err(anyhow!("Forward cost must be at least 1, got 0"));
        }

        if self.max_expansions == Some(0) {
            return Err(anyhow!("Expansion budget must be at least 1, got 0"));
        }
        Ok(())
    }

    pub fn variant(&self) -> Variant {
        match self.variant {
            VariantKind::Plain => Variant::Plain,
            VariantKind::Penalty => Variant::Penalty {
                forward_cost: self.forward_cost,
                turn_cost: self.turn_cost,
            },
            VariantKind::Guarded => Variant::Guarded,
            VariantKind::MultiGoal => Variant::MultiGoal,
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            strategy: self.strategy,
            limits: SearchLimits {
                max_expansions: self.max_expansions,
                cancel: None,
            },
            initial_facing: self.initial_facing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.forward_cost, 2);
        assert_eq!(config.turn_cost, 1);
        assert_eq!(config.strategy, Strategy::AStar);
        assert_eq!(config.initial_facing, Direction::Right);
        assert!(config.validate().is_ok());
        assert_eq!(config.variant(), Variant::Plain);
    }

    #[test]
    fn test_yaml_with_missing_fields() {
        let config = Config::from_yaml_str(
            "map_path: map_file/test/ghost.lay\nvariant: guarded\nadversary_facing: left\nmax_expansions: 500\n",
        )
        .unwrap();
        assert_eq!(config.map_path, "map_file/test/ghost.lay");
        assert_eq!(config.variant(), Variant::Guarded);
        assert_eq!(config.adversary_facing, Direction::Left);
        assert_eq!(config.forward_cost, 2);
        assert_eq!(config.search_options().limits.max_expansions, Some(500));

        let config = Config::from_yaml_str("variant: multi-goal\nstrategy: greedy\n").unwrap();
        assert_eq!(config.variant(), Variant::MultiGoal);
        assert_eq!(config.search_options().strategy, Strategy::Greedy);
    }

    #[test]
    fn test_command_line_wins() {
        let file = Config::from_yaml_str("variant: penalty\nforward_cost: 5\nturn_cost: 3\n").unwrap();
        let cli = Cli::parse_from(["maze_search", "--turn-cost", "7", "--no-render"]);
        let config = file.override_from_command_line(&cli).unwrap();

        assert_eq!(
            config.variant(),
            Variant::Penalty {
                forward_cost: 5,
                turn_cost: 7
            }
        );
        assert!(!config.render);
    }

    #[test]
    fn test_validate_rejects() {
        let cli = Cli {
            forward_cost: Some(0),
            ..Cli::default()
        };
        assert!(Config::default().override_from_command_line(&cli).is_err());

        let config = Config {
            max_expansions: Some(0),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            map_path: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        assert!(Config::from_yaml_str("variant: teleport\n").is_err());
    }
}
