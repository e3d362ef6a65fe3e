use crate::domain::model::{CoverageResult, LoadReport, SourceTables};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Which sectors the map overlay shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterSelection {
    All,
    Only(String),
}

pub trait ConfigProvider: Send + Sync {
    fn bts_path(&self) -> &str;
    fn revenue_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn radius_km(&self) -> f64;
    fn arc_samples(&self) -> usize;
    fn archive(&self) -> bool;
    /// Caller-held show/hide state of the map overlay.
    fn show_map(&self) -> bool;
    fn map_selection(&self) -> ClusterSelection;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceTables>;
    async fn transform(&self, tables: SourceTables) -> Result<CoverageResult>;
    async fn load(&self, result: CoverageResult) -> Result<LoadReport>;
}
