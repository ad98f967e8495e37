//! Configuration types for the program enumerator.

use crate::error::{Error, Result};
use crate::types::{Type, MAX_WIDTH};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Program construction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Name of the generated function
    pub function_name: String,
    /// Number of instructions in every generated program
    pub fuel: usize,
    /// Types of the function arguments seeded into the value pool
    pub arguments: Vec<Type>,
    /// Stop after this many attempts even if the guide has more choosers
    pub max_attempts: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            function_name: "foo".to_string(),
            fuel: 3,
            arguments: vec![Type::I1; 3],
            max_attempts: None,
        }
    }
}

impl GeneratorConfig {
    /// Reject configurations under which no instruction could ever be built.
    pub fn validate(&self) -> Result<()> {
        if self.fuel == 0 {
            return Err(Error::Config("fuel must be at least 1".to_string()));
        }
        if self.function_name.is_empty() {
            return Err(Error::Config("function name must not be empty".to_string()));
        }
        if self.arguments.is_empty() {
            return Err(Error::Config("at least one argument is required".to_string()));
        }
        if let Some(ty) = self.arguments.iter().find(|ty| ty.width() > MAX_WIDTH) {
            return Err(Error::Config(format!("argument type {} is too wide", ty)));
        }

        // Every instruction takes two operands of one type, so some type has
        // to be seeded at least twice for the first instruction to exist.
        let mut counts: HashMap<Type, usize> = HashMap::new();
        for ty in &self.arguments {
            *counts.entry(*ty).or_default() += 1;
        }
        if counts.values().all(|&count| count < 2) {
            return Err(Error::Config(format!(
                "no argument type appears twice in [{}]; no instruction could be built",
                self.arguments
                    .iter()
                    .map(|ty| ty.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        Ok(())
    }
}

/// How choice sequences are produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuideConfig {
    /// Exhaustive breadth-first walk of the choice tree
    Bfs {
        /// Optional cap on the number of sequences handed out
        max_choosers: Option<u64>,
    },
    /// Seeded uniform sampling
    Random {
        seed: u64,
        samples: u64,
    },
}

impl Default for GuideConfig {
    fn default() -> Self {
        GuideConfig::Bfs { max_choosers: None }
    }
}

/// Where accepted programs are written
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Destination {
    #[default]
    Stdout,
    Path(PathBuf),
}

impl FromStr for Destination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Err(Error::Config("output destination must not be empty".to_string())),
            "-" => Ok(Destination::Stdout),
            path => Ok(Destination::Path(PathBuf::from(path))),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => write!(f, "-"),
            Destination::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl TryFrom<String> for Destination {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Destination> for String {
    fn from(dest: Destination) -> Self {
        dest.to_string()
    }
}

/// Textual form of emitted programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Mlir,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mlir => "mlir",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mlir" => Ok(OutputFormat::Mlir),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Config(format!(
                "unsupported output format `{}` (expected `mlir` or `json`)",
                other
            ))),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub destination: Destination,
    pub format: OutputFormat,
}

/// Everything a full enumeration run needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzerConfig {
    pub generator: GeneratorConfig,
    pub guide: GuideConfig,
    pub output: OutputConfig,
}

impl FuzzerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: FuzzerConfig = serde_json::from_str(&text)?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        if let GuideConfig::Random { samples: 0, .. } = self.guide {
            return Err(Error::Config("random guide needs at least one sample".to_string()));
        }
        Ok(())
    }
}
