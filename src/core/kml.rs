use crate::core::{SectorFeature, SectorRow, SeverityTier};
use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

/// (label, column, unit) rows of the sector description.
const DESCRIPTION_FIELDS: [(&str, &str, &str); 21] = [
    ("Site Sector", "site_sectorid", ""),
    ("Site Name", "sitename", ""),
    ("Site ID", "site_id", ""),
    ("eNodeB ID", "enbid", ""),
    ("Longitude", "longitude", ""),
    ("Latitude", "latitude", ""),
    ("Azimuth", "azimuth", "°"),
    ("EUT", "eut", ""),
    ("CQI", "cqi", ""),
    ("TLP Partner", "tlp", ""),
    ("FLP Partner", "flp", ""),
    ("Transmission", "transport_fo_mw", ""),
    ("Revenue IOH", "prepaid_revenue_nett", ""),
    ("VLR IOH", "vlr_subs_3id", ""),
    ("Battery", "capacity_bank", ""),
    ("Height", "ant_height", ""),
    ("Area", "area", ""),
    ("Config Bandwidth", "config_bandwidth", ""),
    ("Beam Width", "beam", "°"),
    ("PRB Usage", "prb", "%"),
    ("Cluster", "sa cluster", ""),
];

/// KML `aabbggrr` fill colour, alpha 200.
pub fn kml_fill_color(tier: SeverityTier) -> &'static str {
    match tier {
        SeverityTier::High => "c80000ff",
        SeverityTier::Medium => "c800ffff",
        SeverityTier::Low => "c8008000",
        SeverityTier::Unknown => "c8808080",
    }
}

const LINE_COLOR: &str = "ff000000";

/// HTML label listing the sector's attributes; absent columns read `N/A`.
/// Attribute values are escaped, labels are markup.
pub fn sector_description(row: &SectorRow) -> String {
    DESCRIPTION_FIELDS
        .iter()
        .map(|(label, column, unit)| {
            format!(
                "<b>{}:</b> {}{}",
                label,
                escape_markup(&row.attributes.display(column)),
                unit
            )
        })
        .collect::<Vec<_>>()
        .join("<br>\n")
}

/// Strip characters that are not allowed in file names.
pub fn clean_filename(name: &str) -> String {
    static FORBIDDEN: OnceLock<Regex> = OnceLock::new();
    let re = FORBIDDEN.get_or_init(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("valid regex"));
    re.replace_all(name, "").into_owned()
}

pub fn kml_file_name(cluster: &str) -> String {
    format!("{}_bts_coverage.kml", clean_filename(cluster))
}

/// Entity-escape text for both XML and HTML.
fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn write_placemark(out: &mut String, feature: &SectorFeature) {
    let coordinates = feature
        .ring
        .lon_lat()
        .iter()
        .map(|(lon, lat)| format!("{},{},0", lon, lat))
        .collect::<Vec<_>>()
        .join(" ");

    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "    <Placemark>\n\
         \x20     <name>{name}</name>\n\
         \x20     <description><![CDATA[{description}]]></description>\n\
         \x20     <Style>\n\
         \x20       <LineStyle><color>{line}</color><width>1</width></LineStyle>\n\
         \x20       <PolyStyle><color>{fill}</color><outline>1</outline></PolyStyle>\n\
         \x20     </Style>\n\
         \x20     <Polygon>\n\
         \x20       <outerBoundaryIs><LinearRing><coordinates>{coordinates}</coordinates></LinearRing></outerBoundaryIs>\n\
         \x20     </Polygon>\n\
         \x20   </Placemark>\n",
        name = escape_markup(&feature.row.site_id),
        description = sector_description(&feature.row),
        line = LINE_COLOR,
        fill = kml_fill_color(feature.tier),
        coordinates = coordinates,
    );
}

/// One KML document holding a styled polygon per sector of `cluster`.
pub fn render_cluster_kml<'a>(
    cluster: &str,
    features: impl IntoIterator<Item = &'a SectorFeature>,
) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
    out.push_str("  <Document>\n");
    let _ = writeln!(out, "    <name>{}</name>", escape_markup(&format!("Beam Coverage - {}", cluster)));

    for feature in features {
        write_placemark(&mut out, feature);
    }

    out.push_str("  </Document>\n");
    out.push_str("</kml>\n");
    out
}
