use crate::core::{LoadReport, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

pub struct CoverageEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> CoverageEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<LoadReport> {
        let started = Instant::now();
        tracing::info!("Starting sector coverage run");

        // Extract
        let tables = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} BTS rows and {} revenue rows",
            tables.bts.records.len(),
            tables.revenue.records.len()
        );

        // Transform
        let result = self.pipeline.transform(tables).await?;
        tracing::info!(
            "Built {} sector polygons across {} clusters ({} joined rows, {} non-numeric, {} bad geometry)",
            result.features.len(),
            result.clusters.len(),
            result.rows_joined,
            result.rows_non_numeric,
            result.rows_bad_geometry
        );

        // Load
        let report = self.pipeline.load(result).await?;
        tracing::info!(
            "Exported {} sectors into {} KML files in {:?}",
            report.sectors_exported,
            report.kml_files.len(),
            started.elapsed()
        );

        Ok(report)
    }
}
