pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ClusterSelection, ConfigProvider};
#[cfg(feature = "cli")]
use crate::domain::sector::{DEFAULT_ARC_SAMPLES, DEFAULT_RADIUS_KM, MAX_ARC_SAMPLES};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "bts-coverage")]
#[command(about = "Generate sector coverage KML and map overlays from BTS and revenue CSV files")]
pub struct CliConfig {
    /// BTS sector table (site_id, longitude, latitude, azimuth, beam, ...)
    #[arg(long, default_value = "data_bts.csv")]
    pub bts_file: String,

    /// Revenue / utilization table (site id, prb, sa cluster, ...)
    #[arg(long, default_value = "data_revenue.csv")]
    pub revenue_file: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Sector wedge depth in kilometers
    #[arg(long, default_value_t = DEFAULT_RADIUS_KM)]
    pub radius_km: f64,

    /// Angular subdivisions of each sector arc
    #[arg(long, default_value_t = DEFAULT_ARC_SAMPLES)]
    pub arc_samples: usize,

    /// Also bundle every KML file into a single zip archive
    #[arg(long)]
    pub archive: bool,

    /// Write the interactive map overlay (map_overlay.json)
    #[arg(long)]
    pub map_overlay: bool,

    /// Only show this cluster on the map overlay
    #[arg(long)]
    pub map_cluster: Option<String>,

    /// Load settings from a TOML file instead of the flags above
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn bts_path(&self) -> &str {
        &self.bts_file
    }

    fn revenue_path(&self) -> &str {
        &self.revenue_file
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn radius_km(&self) -> f64 {
        self.radius_km
    }

    fn arc_samples(&self) -> usize {
        self.arc_samples
    }

    fn archive(&self) -> bool {
        self.archive
    }

    fn show_map(&self) -> bool {
        self.map_overlay
    }

    fn map_selection(&self) -> ClusterSelection {
        match &self.map_cluster {
            Some(cluster) => ClusterSelection::Only(cluster.clone()),
            None => ClusterSelection::All,
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("bts_file", &self.bts_file)?;
        validation::validate_file_extension("bts_file", &self.bts_file, &["csv"])?;
        validation::validate_path("revenue_file", &self.revenue_file)?;
        validation::validate_file_extension("revenue_file", &self.revenue_file, &["csv"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_finite("radius_km", self.radius_km)?;
        validation::validate_range("arc_samples", self.arc_samples, 0, MAX_ARC_SAMPLES)?;
        if let Some(cluster) = &self.map_cluster {
            validation::validate_non_empty_string("map_cluster", cluster)?;
        }
        Ok(())
    }
}
