use crate::core::kml::sector_description;
use crate::core::{ClusterSelection, SectorFeature, SeverityTier};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const OVERLAY_FILE_NAME: &str = "map_overlay.json";
const ZOOM_START: u8 = 12;
const TILES: &str = "cartodbdark_matter";

/// Named web colour used to draw a tier on the interactive map.
pub fn map_color(tier: SeverityTier) -> &'static str {
    match tier {
        SeverityTier::High => "red",
        SeverityTier::Medium => "yellow",
        SeverityTier::Low => "blue",
        SeverityTier::Unknown => "grey",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlayPolygon {
    pub site_id: String,
    pub cluster: Option<String>,
    pub tier: SeverityTier,
    /// Ring in (lat, lon) order.
    pub locations: Vec<(f64, f64)>,
    pub color: &'static str,
    pub fill_color: &'static str,
    pub weight: u8,
    pub fill_opacity: f64,
    pub popup_html: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapOverlay {
    pub generated_at: DateTime<Utc>,
    /// `None` when every cluster is shown.
    pub cluster: Option<String>,
    /// (lat, lon) mean of the displayed sectors.
    pub center: (f64, f64),
    pub zoom_start: u8,
    pub tiles: &'static str,
    pub polygons: Vec<OverlayPolygon>,
}

impl OverlayPolygon {
    fn from_feature(feature: &SectorFeature) -> Self {
        let color = map_color(feature.tier);
        Self {
            site_id: feature.row.site_id.clone(),
            cluster: feature.row.cluster.clone(),
            tier: feature.tier,
            locations: feature.ring.lat_lon(),
            color,
            fill_color: color,
            weight: 2,
            fill_opacity: 0.5,
            popup_html: sector_description(&feature.row),
            tooltip: format!("Site: {}", feature.row.site_id),
        }
    }
}

/// Cluster names offered to the map's selector: sorted, deduplicated.
pub fn selectable_clusters(clusters: &[String]) -> Vec<String> {
    let mut sorted = clusters.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted
}

/// Build the overlay for the selected sectors, or `None` if nothing matches.
pub fn build_overlay(features: &[SectorFeature], selection: &ClusterSelection) -> Option<MapOverlay> {
    let shown: Vec<&SectorFeature> = features
        .iter()
        .filter(|f| match selection {
            ClusterSelection::All => true,
            ClusterSelection::Only(name) => f.row.cluster.as_deref() == Some(name.as_str()),
        })
        .collect();

    if shown.is_empty() {
        return None;
    }

    let n = shown.len() as f64;
    let center = (
        shown.iter().map(|f| f.row.latitude).sum::<f64>() / n,
        shown.iter().map(|f| f.row.longitude).sum::<f64>() / n,
    );

    Some(MapOverlay {
        generated_at: Utc::now(),
        cluster: match selection {
            ClusterSelection::All => None,
            ClusterSelection::Only(name) => Some(name.clone()),
        },
        center,
        zoom_start: ZOOM_START,
        tiles: TILES,
        polygons: shown.into_iter().map(OverlayPolygon::from_feature).collect(),
    })
}
