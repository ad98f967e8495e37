//! Command-line flags and how they fold into a `FuzzerConfig`.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use comb_core::{Destination, FuzzerConfig, GuideConfig, OutputFormat, Type};
use std::path::PathBuf;

const DEFAULT_SEED: u64 = 42;
const DEFAULT_SAMPLES: u64 = 1000;

#[derive(Parser, Debug)]
#[command(name = "comb-fuzzer")]
#[command(version)]
#[command(about = "Enumerate small comb programs for compiler fuzzing", long_about = None)]
pub struct Cli {
    /// Output destination: `-` for stdout, a directory for one file per
    /// program, or a file to hold every program
    #[arg(short, long, value_name = "DEST")]
    pub output: Option<Destination>,

    /// Instructions per program
    #[arg(long)]
    pub fuel: Option<usize>,

    /// Function argument types, comma separated (e.g. `i1,i1,i1`)
    #[arg(long, value_delimiter = ',', value_name = "TYPES")]
    pub args: Option<Vec<Type>>,

    /// Name of the generated function
    #[arg(long)]
    pub function_name: Option<String>,

    /// How choice sequences are produced
    #[arg(long, value_enum)]
    pub guide: Option<GuideKind>,

    /// Seed for the random guide
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of programs the random guide attempts
    #[arg(long)]
    pub samples: Option<u64>,

    /// Stop after this many attempts
    #[arg(long)]
    pub limit: Option<u64>,

    /// Output format: `mlir` or `json`
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Print module and function in generic operation form too
    #[arg(long)]
    pub generic: bool,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GuideKind {
    /// Exhaustive breadth-first enumeration
    Bfs,
    /// Seeded random sampling
    Random,
}

impl Cli {
    /// Defaults, overlaid with the config file, overlaid with flags.
    pub fn to_config(&self) -> Result<FuzzerConfig> {
        let mut config = match &self.config {
            Some(path) => FuzzerConfig::from_json_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => FuzzerConfig::default(),
        };

        if let Some(fuel) = self.fuel {
            config.generator.fuel = fuel;
        }
        if let Some(args) = &self.args {
            config.generator.arguments = args.clone();
        }
        if let Some(name) = &self.function_name {
            config.generator.function_name = name.clone();
        }
        if let Some(limit) = self.limit {
            config.generator.max_attempts = Some(limit);
        }
        if let Some(destination) = &self.output {
            config.output.destination = destination.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }

        config.guide = self.guide_config(config.guide)?;
        Ok(config)
    }

    fn guide_config(&self, from_file: GuideConfig) -> Result<GuideConfig> {
        let kind = match (self.guide, &from_file) {
            (Some(kind), _) => kind,
            (None, GuideConfig::Bfs { .. }) => GuideKind::Bfs,
            (None, GuideConfig::Random { .. }) => GuideKind::Random,
        };

        match (kind, from_file) {
            (GuideKind::Bfs, from_file) => {
                if self.seed.is_some() || self.samples.is_some() {
                    bail!("--seed and --samples only apply to the random guide");
                }
                let max_choosers = match from_file {
                    GuideConfig::Bfs { max_choosers } => max_choosers,
                    GuideConfig::Random { .. } => None,
                };
                Ok(GuideConfig::Bfs { max_choosers })
            }
            (GuideKind::Random, GuideConfig::Random { seed, samples }) => Ok(GuideConfig::Random {
                seed: self.seed.unwrap_or(seed),
                samples: self.samples.unwrap_or(samples),
            }),
            (GuideKind::Random, GuideConfig::Bfs { .. }) => Ok(GuideConfig::Random {
                seed: self.seed.unwrap_or(DEFAULT_SEED),
                samples: self.samples.unwrap_or(DEFAULT_SAMPLES),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("comb-fuzzer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).to_config().unwrap();
        assert_eq!(config, FuzzerConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&["-o", "out.mlir", "--fuel", "2", "--args", "i1,i2,i2", "--limit", "10"])
            .to_config()
            .unwrap();
        assert_eq!(config.generator.fuel, 2);
        assert_eq!(config.generator.arguments[1], Type::integer(2).unwrap());
        assert_eq!(config.generator.max_attempts, Some(10));
        assert_eq!(
            config.output.destination,
            Destination::Path(PathBuf::from("out.mlir"))
        );
    }

    #[test]
    fn test_random_guide_defaults() {
        let config = parse(&["--guide", "random", "--seed", "7"]).to_config().unwrap();
        assert_eq!(
            config.guide,
            GuideConfig::Random {
                seed: 7,
                samples: DEFAULT_SAMPLES
            }
        );
    }

    #[test]
    fn test_seed_without_random_guide_is_rejected() {
        assert!(parse(&["--seed", "7"]).to_config().is_err());
    }

    #[test]
    fn test_malformed_flags_fail_to_parse() {
        let bad = [
            vec!["--fuel", "many"],
            vec!["--args", "i1,f32"],
            vec!["--format", "bitcode"],
            vec!["--guide", "dfs"],
            vec!["-o", ""],
        ];
        for args in bad {
            let argv = std::iter::once("comb-fuzzer").chain(args.iter().copied());
            assert!(Cli::try_parse_from(argv).is_err(), "{:?} parsed", args);
        }
    }
}
