pub mod dataset;
pub mod engine;
pub mod kml;
pub mod overlay;
pub mod pipeline;

pub use crate::domain::model::{
    CoverageResult, LoadReport, Record, SectorFeature, SectorRow, SourceTables, Table,
};
pub use crate::domain::ports::{ClusterSelection, ConfigProvider, Pipeline, Storage};
pub use crate::domain::severity::SeverityTier;
pub use crate::utils::error::Result;
