use crate::core::dataset::{parse_csv, prepare_rows, unique_clusters};
use crate::core::kml::{kml_file_name, render_cluster_kml};
use crate::core::overlay::{build_overlay, selectable_clusters, OVERLAY_FILE_NAME};
use crate::core::{
    ClusterSelection, ConfigProvider, CoverageResult, LoadReport, Pipeline, SectorFeature,
    SeverityTier, SourceTables, Storage,
};
use crate::domain::sector::build_sector_ring;
use crate::utils::error::Result;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub const ARCHIVE_FILE_NAME: &str = "bts_coverage_kml.zip";

/// Claim `name` in `used`, or the first free `{stem}_{n}.kml` when another
/// cluster already cleaned to the same file name.
fn claim_file_name(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    let stem = name.strip_suffix(".kml").unwrap_or(&name);
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}.kml", stem, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

pub struct CoveragePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CoveragePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    async fn write_archive(&self, files: &[(String, String)]) -> Result<String> {
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, content) in files {
                zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                zip.write_all(content.as_bytes())?;
            }
            zip.finish()?.into_inner()
        };

        let path = self.output_file(ARCHIVE_FILE_NAME);
        tracing::debug!("Writing KML archive ({} bytes) to {}", zip_data.len(), path);
        self.storage.write_file(&path, &zip_data).await?;
        Ok(path)
    }

    async fn write_overlay(&self, result: &CoverageResult) -> Result<Option<String>> {
        let selection = self.config.map_selection();
        if let ClusterSelection::Only(name) = &selection {
            let options = selectable_clusters(&result.clusters);
            if !options.contains(name) {
                tracing::warn!(
                    "Cluster '{}' not found, available clusters: {}",
                    name,
                    options.join(", ")
                );
            }
        }

        let Some(overlay) = build_overlay(&result.features, &selection) else {
            tracing::warn!("No sectors to display for the selected map view");
            return Ok(None);
        };

        let json = serde_json::to_string_pretty(&overlay)?;
        let path = self.output_file(OVERLAY_FILE_NAME);
        self.storage.write_file(&path, json.as_bytes()).await?;
        tracing::info!("Map overlay with {} polygons saved to {}", overlay.polygons.len(), path);
        Ok(Some(path))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CoveragePipeline<S, C> {
    async fn extract(&self) -> Result<SourceTables> {
        tracing::debug!("Reading BTS data from {}", self.config.bts_path());
        let bts_bytes = self.storage.read_file(self.config.bts_path()).await?;
        tracing::debug!("Reading revenue data from {}", self.config.revenue_path());
        let revenue_bytes = self.storage.read_file(self.config.revenue_path()).await?;

        Ok(SourceTables {
            bts: parse_csv("bts", &bts_bytes)?,
            revenue: parse_csv("revenue", &revenue_bytes)?,
        })
    }

    async fn transform(&self, tables: SourceTables) -> Result<CoverageResult> {
        let (rows, rows_joined, rows_non_numeric) = prepare_rows(tables.bts, tables.revenue)?;
        let clusters = unique_clusters(&rows);

        let mut features = Vec::with_capacity(rows.len());
        let mut rows_bad_geometry = 0;
        for row in rows {
            let spec = row.sector_spec(self.config.radius_km(), self.config.arc_samples());
            match build_sector_ring(&spec) {
                Ok(ring) => {
                    let tier = SeverityTier::from_usage(row.prb);
                    features.push(SectorFeature { row, ring, tier });
                }
                Err(e) => {
                    rows_bad_geometry += 1;
                    tracing::warn!("Skipping site {}: {}", row.site_id, e);
                }
            }
        }

        Ok(CoverageResult {
            features,
            clusters,
            rows_joined,
            rows_non_numeric,
            rows_bad_geometry,
        })
    }

    async fn load(&self, result: CoverageResult) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        if result.clusters.is_empty() {
            tracing::warn!("No clusters found, no KML files will be written");
        }

        let mut rendered = Vec::with_capacity(result.clusters.len());
        let mut used_names = HashSet::with_capacity(result.clusters.len());
        for cluster in &result.clusters {
            let members: Vec<&SectorFeature> = result
                .features
                .iter()
                .filter(|f| f.row.cluster.as_ref() == Some(cluster))
                .collect();

            let base_name = kml_file_name(cluster);
            let name = claim_file_name(base_name.clone(), &mut used_names);
            if name != base_name {
                tracing::warn!(
                    "Cluster '{}' maps to an existing file name {}, writing {} instead",
                    cluster,
                    base_name,
                    name
                );
            }
            let kml = render_cluster_kml(cluster, members.iter().copied());
            let path = self.output_file(&name);
            self.storage.write_file(&path, kml.as_bytes()).await?;
            tracing::debug!("Cluster {}: {} sectors written to {}", cluster, members.len(), path);

            report.sectors_exported += members.len();
            report.kml_files.push(path);
            rendered.push((name, kml));
        }

        if self.config.archive() && !rendered.is_empty() {
            report.archive = Some(self.write_archive(&rendered).await?);
        }

        if self.config.show_map() {
            report.overlay = self.write_overlay(&result).await?;
        }

        Ok(report)
    }
}
