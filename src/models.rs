use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNASSIGNED_MARKER: &str = "<< None >>";
pub const NOT_APPLICABLE_MARKER: &str = "-";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Maximum number of allocation attempts
    pub iterations: usize,
    /// Largest unassigned count an attempt may have and still be accepted
    pub unassigned: usize,
    pub save: bool,
    // Output configuration
    pub output_directory: Option<String>,
    pub delimiter: char,
    pub weighted_ranks: usize,
    pub unassigned_marker: String,
    pub not_applicable_marker: String,
    pub seed: Option<u64>,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("iterations must be at least 1")]
    ZeroIterations,
    #[error("weighted_ranks must be at least 1")]
    ZeroWeightedRanks,
    #[error("delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(char),
    #[error("the unassigned marker must not be empty")]
    EmptyUnassignedMarker,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: 1,
            unassigned: 0,
            save: false,
            output_directory: None,
            delimiter: ',',
            weighted_ranks: 3,
            unassigned_marker: UNASSIGNED_MARKER.to_string(),
            not_applicable_marker: NOT_APPLICABLE_MARKER.to_string(),
            seed: None,
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.weighted_ranks == 0 {
            return Err(ConfigError::ZeroWeightedRanks);
        }
        if !self.delimiter.is_ascii() {
            return Err(ConfigError::InvalidDelimiter(self.delimiter));
        }
        if self.unassigned_marker.is_empty() {
            return Err(ConfigError::EmptyUnassignedMarker);
        }
        Ok(())
    }

    /// The delimiter as the single byte the csv reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}

/// One input row: a name followed by ranked choice slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub choices: Vec<Option<String>>,
}

impl Entity {
    pub fn new(name: impl Into<String>, choices: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            choices,
        }
    }

    pub fn has_choices(&self) -> bool {
        self.choices.iter().any(Option::is_some)
    }

    /// Non-empty choices in rank order; empty slots are skipped.
    pub fn stated_choices(&self) -> impl Iterator<Item = &str> {
        self.choices.iter().filter_map(|choice| choice.as_deref())
    }
}

/// A loaded input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Header of the identifier column, reused when writing results
    pub name_column: String,
    /// Declared number of choice columns (K)
    pub width: usize,
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub resource: String,
    /// 1-based position among the entity's stated choices
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub name: String,
    pub grant: Option<Grant>,
}

/// Result of a single allocation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub placements: Vec<Placement>,
    pub rank_vector: Vec<usize>,
    pub unassigned: usize,
}

impl Outcome {
    pub fn empty(width: usize) -> Self {
        Self {
            placements: Vec::new(),
            rank_vector: vec![0; width],
            unassigned: 0,
        }
    }

    /// Number of entities that took part in the attempt.
    pub fn considered(&self) -> usize {
        self.placements.len()
    }

    pub fn assigned(&self) -> usize {
        self.rank_vector.iter().sum()
    }

    /// Placements ordered by name for presentation; ties keep attempt order.
    pub fn sorted_by_name(&self) -> Vec<&Placement> {
        let mut sorted: Vec<&Placement> = self.placements.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }
}
