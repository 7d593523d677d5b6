use serde::Serialize;

pub const GOOGLE_SATELLITE_URL: &str = "http://mt0.google.com/vt/lyrs=s&hl=en&x={x}&y={y}&z={z}";
pub const GOOGLE_TERRAIN_URL: &str = "http://mt0.google.com/vt/lyrs=p&hl=en&x={x}&y={y}&z={z}";
pub const OSM_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const CARTO_DARK_URL: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png";

const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
const CARTO_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";

/// A background imagery source.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    /// Label shown in the layer control.
    pub name: String,
    pub url: String,
    pub options: TileOptions,
}

/// Options object handed to `L.tileLayer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileOptions {
    pub attribution: String,
    pub max_zoom: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomains: Option<String>,
}

impl TileLayer {
    pub fn new(name: &str, url: &str, attribution: &str, max_zoom: u8) -> Self {
        TileLayer {
            name: name.to_string(),
            url: url.to_string(),
            options: TileOptions {
                attribution: attribution.to_string(),
                max_zoom,
                subdomains: None,
            },
        }
    }

    pub fn with_subdomains(mut self, subdomains: &str) -> Self {
        self.options.subdomains = Some(subdomains.to_string());
        self
    }
}

/// The base maps offered on the sample map, first entry shown initially.
pub fn default_tiles() -> Vec<TileLayer> {
    vec![
        TileLayer::new("OpenStreetMaps", OSM_URL, OSM_ATTRIBUTION, 16),
        TileLayer::new("Cartodb-dark", CARTO_DARK_URL, CARTO_ATTRIBUTION, 16).with_subdomains("abcd"),
        TileLayer::new("Google Earth", GOOGLE_SATELLITE_URL, "Google", 16),
        TileLayer::new("Google Terrain", GOOGLE_TERRAIN_URL, "Google", 14),
    ]
}
