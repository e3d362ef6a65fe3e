pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{engine::CoverageEngine, pipeline::CoveragePipeline};
pub use domain::geodesy::{destination_point, GeoPoint};
pub use domain::sector::{build_sector_ring, SectorRing, SectorSpec};
pub use domain::severity::{classify, SeverityTier};
pub use utils::error::{CoverageError, Result};
