use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::html::escape;
use crate::models::{
    LatLon, Row, BACKGROUND_COLOR, CLUSTER, GROUP, ICON, LAT, LON, TEXT_COLOR, TYPE, YEAR,
};

/// Heading of the popup's value column.
pub const SAMPLE_INFO_TITLE: &str = "Sample info";

/// Which columns a marker reads its position and icon styling from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerOptions {
    pub lon_column: String,
    pub lat_column: String,
    /// Copied onto the icon and left out of the popup.
    pub style_columns: Vec<String>,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        MarkerOptions {
            lon_column: LON.to_string(),
            lat_column: LAT.to_string(),
            style_columns: vec![
                ICON.to_string(),
                TEXT_COLOR.to_string(),
                BACKGROUND_COLOR.to_string(),
            ],
        }
    }
}

/// Options of a `L.BeautifyIcon` marker icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeautifyIcon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_shape: Option<String>,
    pub border_width: u32,
    pub border_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub inner_icon_style: String,
    pub icon_size: [u32; 2],
    pub spin: bool,
    /// Style columns without a dedicated option are passed through by name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Default for BeautifyIcon {
    fn default() -> Self {
        BeautifyIcon {
            icon: None,
            icon_shape: None,
            border_width: 1,
            border_color: "#000".to_string(),
            text_color: None,
            background_color: None,
            inner_icon_style: "padding-top:0px; font-size:14px".to_string(),
            icon_size: [25, 25],
            spin: false,
            extra: BTreeMap::new(),
        }
    }
}

impl BeautifyIcon {
    /// Override one option from a style column. Missing values clear the option.
    pub fn apply(&mut self, name: &str, value: Option<&str>) {
        let owned = value.map(str::to_string);
        match name {
            ICON => self.icon = owned,
            TEXT_COLOR => self.text_color = owned,
            BACKGROUND_COLOR => self.background_color = owned,
            "icon_shape" => self.icon_shape = owned,
            "border_color" => {
                if let Some(v) = owned {
                    self.border_color = v;
                }
            }
            "border_width" => {
                if let Some(w) = value.and_then(|v| v.trim().parse().ok()) {
                    self.border_width = w;
                }
            }
            "inner_icon_style" => self.inner_icon_style = owned.unwrap_or_default(),
            _ => {
                if let Some(v) = owned {
                    self.extra.insert(name.to_string(), v);
                }
            }
        }
    }
}

/// One placed sample marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub location: LatLon,
    pub icon: BeautifyIcon,
    pub tooltip: String,
    pub popup: String,
}

/// Anything a marker can be attached to.
pub trait MarkerParent {
    fn name(&self) -> &str;

    /// Take ownership of the marker and return the stored copy.
    fn attach(&mut self, marker: Marker) -> &Marker;
}

/// Build the marker for one row.
pub fn build_marker(row: &Row, options: &MarkerOptions) -> Result<Marker> {
    let location = LatLon {
        lat: coordinate(row, &options.lat_column)?,
        lon: coordinate(row, &options.lon_column)?,
    };

    let mut icon = BeautifyIcon::default();
    for column in &options.style_columns {
        icon.apply(column, row.value(column)?);
    }

    Ok(Marker {
        location,
        icon,
        tooltip: tooltip_html(row)?,
        popup: popup_html(row, &options.style_columns),
    })
}

/// Build the marker for `row` and attach it to `parent`.
pub fn add_marker<'p, P: MarkerParent>(
    row: &Row,
    options: &MarkerOptions,
    parent: &'p mut P,
) -> Result<&'p Marker> {
    let marker = build_marker(row, options)?;
    tracing::trace!(
        parent = parent.name(),
        lat = marker.location.lat,
        lon = marker.location.lon,
        "Placing marker"
    );
    Ok(parent.attach(marker))
}

fn coordinate(row: &Row, column: &str) -> Result<f64> {
    let raw = row.required(column)?;
    raw.trim().parse().map_err(|_| Error::BadCoordinate {
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// `<strong>{Cluster} – {Type} {Year}</strong><br>Click for more info`
pub fn tooltip_html(row: &Row) -> Result<String> {
    Ok(format!(
        "<strong>{} \u{2013} {} {}</strong><br>Click for more info",
        escape(row.text(CLUSTER)?),
        escape(row.text(TYPE)?),
        escape(row.text(YEAR)?),
    ))
}

/// Key/value table of every present field except `Group` and the style columns.
pub fn popup_html(row: &Row, style_columns: &[String]) -> String {
    let mut out = String::new();
    out.push_str(r#"<table border="0" class="dataframe table table-hover table-responsive">"#);
    let _ = write!(
        out,
        r#"<thead><tr style="text-align: left;"><th style="min-width: 80px;"></th><th style="min-width: 80px;">{}</th></tr></thead>"#,
        SAMPLE_INFO_TITLE
    );
    out.push_str("<tbody>");
    for field in row.fields() {
        if field.name == GROUP || style_columns.iter().any(|c| *c == field.name) {
            continue;
        }
        let Some(value) = field.value.as_deref() else {
            continue;
        };
        let _ = write!(
            out,
            "<tr><th>{}</th><td>{}</td></tr>",
            escape(&field.name),
            escape(value)
        );
    }
    out.push_str("</tbody></table>");
    out
}
