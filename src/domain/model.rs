use crate::domain::geodesy::GeoPoint;
use crate::domain::sector::{SectorRing, SectorSpec};
use crate::domain::severity::SeverityTier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One table row keyed by (normalized) column name. Empty cells are `Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&serde_json::Value> {
        self.data.get(column).filter(|v| !v.is_null())
    }

    /// Cell rendered for display labels; missing cells become `N/A`.
    pub fn display(&self, column: &str) -> String {
        match self.get(column) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "N/A".to_string(),
        }
    }

    pub fn is_all_null(&self) -> bool {
        self.data.values().all(|v| v.is_null())
    }
}

/// A parsed CSV file: ordered column names plus rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect()
    }
}

/// The two raw inputs of a run.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub bts: Table,
    pub revenue: Table,
}

/// A joined row whose geometry and load columns are all numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorRow {
    pub site_id: String,
    pub cluster: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub azimuth: f64,
    pub beam: f64,
    pub prb: f64,
    pub attributes: Record,
}

impl SectorRow {
    pub fn sector_spec(&self, radius_km: f64, arc_samples: usize) -> SectorSpec {
        SectorSpec::new(
            GeoPoint::new(self.longitude, self.latitude),
            self.azimuth,
            self.beam,
        )
        .with_radius_km(radius_km)
        .with_arc_samples(arc_samples)
    }
}

/// A sector ready for export.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorFeature {
    pub row: SectorRow,
    pub ring: SectorRing,
    pub tier: SeverityTier,
}

#[derive(Debug, Clone, Default)]
pub struct CoverageResult {
    pub features: Vec<SectorFeature>,
    /// Distinct clusters in first-appearance order.
    pub clusters: Vec<String>,
    pub rows_joined: usize,
    pub rows_non_numeric: usize,
    pub rows_bad_geometry: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub kml_files: Vec<String>,
    pub archive: Option<String>,
    pub overlay: Option<String>,
    pub sectors_exported: usize,
}
