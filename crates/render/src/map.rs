//! In-memory Leaflet page: layers, controls and overlays, rendered to one
//! self-contained HTML document.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use sample_map_shared::marker::{Marker, MarkerParent};
use sample_map_shared::models::LatLon;

use crate::config::MarkerClusterOptions;
use crate::error::{RenderError, Result};
use crate::tiles::TileLayer;

const MAP_DIV_ID: &str = "map";

const SCRIPTS: &[&str] = &[
    "https://cdn.jsdelivr.net/npm/leaflet@1.9.3/dist/leaflet.js",
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/1.1.0/leaflet.markercluster.js",
    "https://cdn.jsdelivr.net/gh/marslan390/BeautifyMarker/leaflet-beautify-marker-icon.min.js",
    "https://unpkg.com/leaflet.featuregroup.subgroup@1.0.2/dist/leaflet.featuregroup.subgroup.js",
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet-groupedlayercontrol/0.6.1/leaflet.groupedlayercontrol.min.js",
];

const STYLESHEETS: &[&str] = &[
    "https://cdn.jsdelivr.net/npm/leaflet@1.9.3/dist/leaflet.css",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.2.2/dist/css/bootstrap.min.css",
    "https://cdn.jsdelivr.net/npm/@fortawesome/fontawesome-free@6.2.0/css/all.min.css",
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/1.1.0/MarkerCluster.css",
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/1.1.0/MarkerCluster.Default.css",
    "https://cdn.jsdelivr.net/gh/marslan390/BeautifyMarker/leaflet-beautify-marker-icon.min.css",
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet-groupedlayercontrol/0.6.1/leaflet.groupedlayercontrol.min.css",
];

/// Handle to a toggleable layer of a [`LeafletMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerId {
    Tile(usize),
    SubGroup(usize),
}

/// Markers of one (cluster, group) partition, clustered by the map's
/// shared marker cluster but toggled on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct SubGroup {
    pub name: String,
    pub markers: Vec<Marker>,
}

impl MarkerParent for SubGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn attach(&mut self, marker: Marker) -> &Marker {
        self.markers.push(marker);
        &self.markers[self.markers.len() - 1]
    }
}

/// One section of a grouped layer control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSection {
    /// Section heading, raw HTML.
    pub label: String,
    pub layers: Vec<LayerId>,
}

/// `L.control.groupedLayers` with its sections.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedLayerControl {
    pub sections: Vec<ControlSection>,
    /// Radio buttons instead of checkboxes in every section.
    pub exclusive: bool,
    pub collapsed: bool,
    pub sort_layers: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ControlOptions<'a> {
    exclusive_groups: Vec<&'a str>,
    collapsed: bool,
    sort_layers: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    center: [f64; 2],
    zoom: u8,
    max_zoom: u8,
    zoom_control: bool,
}

#[derive(Debug, Clone)]
pub struct LeafletMap {
    pub center: LatLon,
    pub zoom_start: u8,
    pub max_zoom: u8,
    css_links: Vec<(String, String)>,
    tiles: Vec<TileLayer>,
    /// Tile indices removed from the map after the controls are built.
    hidden_tiles: Vec<usize>,
    overlays: Vec<String>,
    cluster: Option<MarkerClusterOptions>,
    sub_groups: Vec<SubGroup>,
    controls: Vec<GroupedLayerControl>,
}

impl LeafletMap {
    /// Empty map without any base tiles.
    pub fn new(center: LatLon, zoom_start: u8, max_zoom: u8) -> Self {
        LeafletMap {
            center,
            zoom_start,
            max_zoom,
            css_links: Vec::new(),
            tiles: Vec::new(),
            hidden_tiles: Vec::new(),
            overlays: Vec::new(),
            cluster: None,
            sub_groups: Vec::new(),
            controls: Vec::new(),
        }
    }

    pub fn add_css_link(&mut self, name: &str, href: &str) {
        self.css_links.push((name.to_string(), href.to_string()));
    }

    pub fn add_tile_layer(&mut self, tile: TileLayer) -> LayerId {
        self.tiles.push(tile);
        LayerId::Tile(self.tiles.len() - 1)
    }

    /// Raw HTML injected into the page body next to the map.
    pub fn add_html_overlay(&mut self, html: String) {
        self.overlays.push(html);
    }

    pub fn set_marker_cluster(&mut self, options: MarkerClusterOptions) {
        self.cluster = Some(options);
    }

    /// Add an empty sub-group of the marker cluster and hand it back for
    /// filling.
    pub fn add_sub_group(&mut self, name: &str) -> (LayerId, &mut SubGroup) {
        let i = self.sub_groups.len();
        self.sub_groups.push(SubGroup {
            name: name.to_string(),
            markers: Vec::new(),
        });
        (LayerId::SubGroup(i), &mut self.sub_groups[i])
    }

    pub fn sub_groups(&self) -> &[SubGroup] {
        &self.sub_groups
    }

    pub fn tiles(&self) -> &[TileLayer] {
        &self.tiles
    }

    pub fn controls(&self) -> &[GroupedLayerControl] {
        &self.controls
    }

    /// Add a grouped layer control. In exclusive controls only the first
    /// tile layer of each section stays visible.
    pub fn add_control(&mut self, control: GroupedLayerControl) {
        if control.exclusive {
            for section in &control.sections {
                for layer in section.layers.iter().skip(1) {
                    if let LayerId::Tile(i) = layer {
                        self.hidden_tiles.push(*i);
                    }
                }
            }
        }
        self.controls.push(control);
    }

    fn layer_name(&self, id: LayerId) -> &str {
        match id {
            LayerId::Tile(i) => self.tiles.get(i).map_or("", |t| t.name.as_str()),
            LayerId::SubGroup(i) => self.sub_groups.get(i).map_or("", |g| g.name.as_str()),
        }
    }

    fn layer_var(id: LayerId) -> String {
        match id {
            LayerId::Tile(i) => format!("tile_layer_{i}"),
            LayerId::SubGroup(i) => format!("sub_group_{i}"),
        }
    }

    pub fn marker_count(&self) -> usize {
        self.sub_groups.iter().map(|g| g.markers.len()).sum()
    }

    /// Render the complete HTML document.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str(r#"    <meta http-equiv="content-type" content="text/html; charset=UTF-8" />"#);
        out.push('\n');
        out.push_str(r#"    <meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no" />"#);
        out.push('\n');
        for src in SCRIPTS {
            let _ = writeln!(out, r#"    <script src="{src}"></script>"#);
        }
        for href in STYLESHEETS {
            let _ = writeln!(out, r#"    <link rel="stylesheet" href="{href}"/>"#);
        }
        for (name, href) in &self.css_links {
            let _ = writeln!(
                out,
                r#"    <link rel="stylesheet" id="{}" href="{}"/>"#,
                attr(name),
                attr(href)
            );
        }
        out.push_str(
            "    <style>\n        html, body {width: 100%; height: 100%; margin: 0; padding: 0;}\n        \
             #map {position: absolute; top: 0; bottom: 0; right: 0; left: 0;}\n    </style>\n",
        );
        out.push_str("</head>\n<body>\n");
        for overlay in &self.overlays {
            out.push_str(overlay);
            out.push('\n');
        }
        let _ = writeln!(out, r#"    <div class="sample-map" id="{MAP_DIV_ID}"></div>"#);
        out.push_str("<script>\n");
        out.push_str(&self.render_script()?);
        out.push_str("</script>\n</body>\n</html>\n");
        Ok(out)
    }

    fn render_script(&self) -> Result<String> {
        let mut js = String::new();

        let options = MapOptions {
            center: self.center.to_array(),
            zoom: self.zoom_start,
            max_zoom: self.max_zoom,
            zoom_control: true,
        };
        let _ = writeln!(
            js,
            "var map = L.map({}, {});",
            js_string(MAP_DIV_ID),
            to_json(&options)?
        );

        for (i, tile) in self.tiles.iter().enumerate() {
            let var = Self::layer_var(LayerId::Tile(i));
            let _ = writeln!(
                js,
                "var {var} = L.tileLayer({}, {});\n{var}.addTo(map);",
                js_string(&tile.url),
                to_json(&tile.options)?
            );
        }

        if let Some(options) = &self.cluster {
            let _ = writeln!(
                js,
                "var marker_cluster = L.markerClusterGroup({});\nmap.addLayer(marker_cluster);",
                to_json(options)?
            );
        }
        let parent = if self.cluster.is_some() {
            "marker_cluster"
        } else {
            "map"
        };

        for (g, group) in self.sub_groups.iter().enumerate() {
            let var = Self::layer_var(LayerId::SubGroup(g));
            let _ = writeln!(
                js,
                "var {var} = L.featureGroup.subGroup({parent});\n{var}.addTo(map);"
            );
            for (m, marker) in group.markers.iter().enumerate() {
                let mv = format!("marker_{g}_{m}");
                let _ = writeln!(
                    js,
                    "var {mv} = L.marker({}, {{}}).addTo({var});\n\
                     {mv}.setIcon(L.BeautifyIcon.icon({}));\n\
                     {mv}.bindPopup({}, {{\"maxWidth\": \"100%\"}});\n\
                     {mv}.bindTooltip({}, {{\"sticky\": true}});",
                    to_json(&marker.location.to_array())?,
                    to_json(&marker.icon)?,
                    js_string(&marker.popup),
                    js_string(&format!("<div>{}</div>", marker.tooltip)),
                );
            }
        }

        for (c, control) in self.controls.iter().enumerate() {
            let mut groups = String::from("{");
            for (s, section) in control.sections.iter().enumerate() {
                if s > 0 {
                    groups.push_str(", ");
                }
                let _ = write!(groups, "{}: {{", js_string(&section.label));
                for (l, layer) in section.layers.iter().enumerate() {
                    if l > 0 {
                        groups.push_str(", ");
                    }
                    let _ = write!(
                        groups,
                        "{}: {}",
                        js_string(&attr(self.layer_name(*layer))),
                        Self::layer_var(*layer)
                    );
                }
                groups.push('}');
            }
            groups.push('}');

            let exclusive_groups = if control.exclusive {
                control.sections.iter().map(|s| s.label.as_str()).collect()
            } else {
                Vec::new()
            };
            let options = ControlOptions {
                exclusive_groups,
                collapsed: control.collapsed,
                sort_layers: control.sort_layers,
            };
            let _ = writeln!(
                js,
                "var layer_control_{c} = L.control.groupedLayers(null, {groups}, {});\nlayer_control_{c}.addTo(map);",
                to_json(&options)?
            );
        }

        for i in &self.hidden_tiles {
            let _ = writeln!(js, "{}.remove();", Self::layer_var(LayerId::Tile(*i)));
        }

        Ok(js)
    }

    /// Render and write the page, creating missing parent directories first.
    pub fn save(&self, path: &Path) -> Result<()> {
        let html = self.render()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| RenderError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, html).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), markers = self.marker_count(), "Map saved");
        Ok(())
    }
}

/// JSON value for embedding in a `<script>` block.
fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(script_safe(serde_json::to_string(value)?))
}

/// Quoted JavaScript string literal safe inside a `<script>` block.
pub fn js_string(text: &str) -> String {
    script_safe(Value::String(text.to_string()).to_string())
}

fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}

fn attr(text: &str) -> String {
    sample_map_shared::html::escape(text)
}
