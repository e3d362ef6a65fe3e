use crate::core::{ClusterSelection, ConfigProvider};
use crate::domain::sector::{DEFAULT_ARC_SAMPLES, DEFAULT_RADIUS_KM, MAX_ARC_SAMPLES};
use crate::utils::error::{CoverageError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub sector: SectorConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub map: MapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub bts_file: String,
    pub revenue_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorConfig {
    pub radius_km: Option<f64>,
    pub arc_samples: Option<usize>,
}

impl Default for SectorConfig {
    fn default() -> Self {
        Self {
            radius_km: Some(DEFAULT_RADIUS_KM),
            arc_samples: Some(DEFAULT_ARC_SAMPLES),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub archive: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    pub enabled: Option<bool>,
    pub cluster: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CoverageError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CoverageError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn bts_path(&self) -> &str {
        &self.input.bts_file
    }

    fn revenue_path(&self) -> &str {
        &self.input.revenue_file
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn radius_km(&self) -> f64 {
        self.sector.radius_km.unwrap_or(DEFAULT_RADIUS_KM)
    }

    fn arc_samples(&self) -> usize {
        self.sector.arc_samples.unwrap_or(DEFAULT_ARC_SAMPLES)
    }

    fn archive(&self) -> bool {
        self.output.archive.unwrap_or(false)
    }

    fn show_map(&self) -> bool {
        self.map.enabled.unwrap_or(false)
    }

    fn map_selection(&self) -> ClusterSelection {
        match &self.map.cluster {
            Some(cluster) => ClusterSelection::Only(cluster.clone()),
            None => ClusterSelection::All,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input.bts_file", &self.input.bts_file)?;
        validation::validate_file_extension("input.bts_file", &self.input.bts_file, &["csv"])?;
        validation::validate_path("input.revenue_file", &self.input.revenue_file)?;
        validation::validate_file_extension(
            "input.revenue_file",
            &self.input.revenue_file,
            &["csv"],
        )?;
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_positive_finite("sector.radius_km", self.radius_km())?;
        validation::validate_range("sector.arc_samples", self.arc_samples(), 0, MAX_ARC_SAMPLES)?;
        if let Some(cluster) = &self.map.cluster {
            validation::validate_non_empty_string("map.cluster", cluster)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[input]
bts_file = "data/data_bts.csv"
revenue_file = "data/data_revenue.csv"

[sector]
radius_km = 0.75
arc_samples = 36

[output]
path = "./coverage"
archive = true

[map]
enabled = true
cluster = "Bandung"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.bts_path(), "data/data_bts.csv");
        assert_eq!(config.radius_km(), 0.75);
        assert_eq!(config.arc_samples(), 36);
        assert!(config.archive());
        assert!(config.show_map());
        assert_eq!(
            config.map_selection(),
            ClusterSelection::Only("Bandung".to_string())
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optional_sections_use_defaults() {
        let toml_content = r#"
[input]
bts_file = "bts.csv"
revenue_file = "revenue.csv"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.radius_km(), 0.5);
        assert_eq!(config.arc_samples(), 20);
        assert!(!config.archive());
        assert!(!config.show_map());
        assert_eq!(config.map_selection(), ClusterSelection::All);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BTS_COVERAGE_TEST_OUTPUT", "/tmp/coverage-out");

        let toml_content = r#"
[input]
bts_file = "bts.csv"
revenue_file = "revenue.csv"

[output]
path = "${BTS_COVERAGE_TEST_OUTPUT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "/tmp/coverage-out");

        std::env::remove_var("BTS_COVERAGE_TEST_OUTPUT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[input]
bts_file = "bts.xlsx"
revenue_file = "revenue.csv"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[input]
bts_file = "bts.csv"
revenue_file = "revenue.csv"

[sector]
radius_km = -1.0

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[input\nbts_file = 1").unwrap_err();
        assert!(matches!(err, CoverageError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[input]
bts_file = "bts.csv"
revenue_file = "revenue.csv"

[output]
path = "./from-file"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./from-file");
    }
}
