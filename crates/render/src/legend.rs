use sample_map_shared::html::escape;

pub const DEFAULT_LEGEND_COLOR: &str = "black";
pub const DEFAULT_LEGEND_RADIUS: u32 = 7;

/// Small SVG circle used as a cluster's colour swatch in the legend.
pub fn legend_circle(color: &str, radius: u32) -> String {
    let r = f64::from(radius) * 0.95;
    let c = radius;
    let d = 2 * radius;
    format!(
        r#"<svg class="marker-legend" height="{d}" width="{d}" xmlns="http://www.w3.org/2000/svg"><circle r="{r}" cx="{c}" cy="{c}" fill="{}" stroke-width="1" stroke="black"/></svg>"#,
        escape(color)
    )
}

/// Legend section heading: colour swatch followed by the cluster name.
pub fn cluster_label(color: &str, cluster: &str, radius: u32) -> String {
    format!("{}{}", legend_circle(color, radius), escape(cluster))
}
