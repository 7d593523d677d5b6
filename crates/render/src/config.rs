use serde::Serialize;

use sample_map_shared::marker::MarkerOptions;
use sample_map_shared::models::LatLon;

use crate::legend::DEFAULT_LEGEND_RADIUS;
use crate::tiles::{default_tiles, TileLayer};

pub const DEFAULT_LOGO_URL: &str = "https://greenfjord-project.ch/wp-content/uploads/2022/05/logo.svg";
pub const DEFAULT_LOGO_LINK: &str = "https://greenfjord-project.ch/";
pub const DEFAULT_STYLESHEET: &str = "./custom_style.css";
pub const BASE_MAPS_LABEL: &str = "Base Maps";

/// Options object handed to `L.markerClusterGroup`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerClusterOptions {
    pub disable_clustering_at_zoom: u8,
    pub spiderfy_on_max_zoom: bool,
    pub max_cluster_radius: u32,
    pub show_coverage_on_hover: bool,
    pub remove_outside_visible_bounds: bool,
}

impl Default for MarkerClusterOptions {
    fn default() -> Self {
        MarkerClusterOptions {
            disable_clustering_at_zoom: 12,
            spiderfy_on_max_zoom: true,
            max_cluster_radius: 40,
            show_coverage_on_hover: false,
            remove_outside_visible_bounds: true,
        }
    }
}

/// Logo pinned to the top-left corner, linking to the project page.
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    pub image_url: String,
    pub link_url: String,
}

/// Fixed settings of the rendered map.
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub center: LatLon,
    pub zoom_start: u8,
    pub max_zoom: u8,
    pub tiles: Vec<TileLayer>,
    pub logo: Logo,
    /// Stylesheet linked by relative path from the output page.
    pub stylesheet: String,
    pub cluster: MarkerClusterOptions,
    pub marker: MarkerOptions,
    pub legend_radius: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            center: LatLon {
                lat: 61.0,
                lon: -46.0,
            },
            zoom_start: 9,
            max_zoom: 16,
            tiles: default_tiles(),
            logo: Logo {
                image_url: DEFAULT_LOGO_URL.to_string(),
                link_url: DEFAULT_LOGO_LINK.to_string(),
            },
            stylesheet: DEFAULT_STYLESHEET.to_string(),
            cluster: MarkerClusterOptions::default(),
            marker: MarkerOptions::default(),
            legend_radius: DEFAULT_LEGEND_RADIUS,
        }
    }
}
