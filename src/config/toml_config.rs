use crate::utils::error::{Result, RowkitError};
use crate::utils::validation::{validate_path, validate_positive_number, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// TOML-backed configuration for the HR report pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub data: DataPaths,
    pub output: OutputPaths,
    pub performance_year: Option<i32>,
    #[serde(default)]
    pub ranking: RankingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    pub employees: String,
    pub salaries: String,
    pub performance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputPaths {
    pub summary: String,
    pub outliers: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_rating_weight")]
    pub rating_weight: f64,
    #[serde(default = "default_goals_weight")]
    pub goals_weight: f64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_rating_weight() -> f64 {
    0.7
}

fn default_goals_weight() -> f64 {
    0.3
}

fn default_top_n() -> usize {
    10
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            rating_weight: default_rating_weight(),
            goals_weight: default_goals_weight(),
            top_n: default_top_n(),
        }
    }
}

impl ReportConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data.employees", &self.data.employees)?;
        validate_path("data.salaries", &self.data.salaries)?;
        validate_path("data.performance", &self.data.performance)?;
        validate_path("output.summary", &self.output.summary)?;
        validate_path("output.outliers", &self.output.outliers)?;

        validate_range("ranking.rating_weight", self.ranking.rating_weight, 0.0, 1.0)?;
        validate_range("ranking.goals_weight", self.ranking.goals_weight, 0.0, 1.0)?;
        let weight_sum = self.ranking.rating_weight + self.ranking.goals_weight;
        if (weight_sum - 1.0).abs() > 1e-9 {
            return Err(RowkitError::InvalidConfigValue {
                field: "ranking".to_string(),
                value: weight_sum.to_string(),
                reason: "rating_weight and goals_weight must sum to 1".to_string(),
            });
        }
        validate_positive_number("ranking.top_n", self.ranking.top_n, 1)?;
        Ok(())
    }
}
