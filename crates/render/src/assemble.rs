use sample_map_shared::grouping::{cluster_colors, partition};
use sample_map_shared::html::escape;
use sample_map_shared::marker::add_marker;
use sample_map_shared::models::Table;

use crate::config::{Logo, MapConfig, BASE_MAPS_LABEL};
use crate::error::Result;
use crate::legend::{cluster_label, DEFAULT_LEGEND_COLOR};
use crate::map::{ControlSection, GroupedLayerControl, LayerId, LeafletMap};
use crate::tiles::TileLayer;

/// Build the full sample map from one table.
///
/// Each (cluster, group) partition becomes a sub-group of the shared marker
/// cluster. The legend has one section per cluster, headed by a colour
/// swatch, listing that cluster's groups.
pub fn assemble(table: &Table, config: &MapConfig) -> Result<LeafletMap> {
    let mut map = LeafletMap::new(config.center, config.zoom_start, config.max_zoom);
    map.add_css_link("custom_css", &config.stylesheet);

    add_tiles(&mut map, &config.tiles);
    add_logo_top_left(&mut map, &config.logo);
    map.set_marker_cluster(config.cluster.clone());

    let colors = cluster_colors(&table.rows)?;
    let mut legend: Vec<(String, ControlSection)> = Vec::new();

    for part in partition(table)? {
        let (layer, group) = map.add_sub_group(&part.key.group);
        for row in &part.rows {
            add_marker(row, &config.marker, group)?;
        }

        match legend.last_mut() {
            Some((cluster, section)) if *cluster == part.key.cluster => {
                section.layers.push(layer);
                continue;
            }
            _ => {}
        }

        let color = colors
            .get(&part.key.cluster)
            .and_then(|c| c.as_deref())
            .unwrap_or(DEFAULT_LEGEND_COLOR);
        legend.push((
            part.key.cluster.clone(),
            ControlSection {
                label: cluster_label(color, &part.key.cluster, config.legend_radius),
                layers: vec![layer],
            },
        ));
    }

    tracing::info!(
        rows = table.len(),
        clusters = legend.len(),
        layers = map.sub_groups().len(),
        "Assembled sample map"
    );

    map.add_control(GroupedLayerControl {
        sections: legend.into_iter().map(|(_, section)| section).collect(),
        exclusive: false,
        collapsed: false,
        sort_layers: false,
    });

    Ok(map)
}

/// Add the base maps with an exclusive, expanded switcher.
pub fn add_tiles(map: &mut LeafletMap, tiles: &[TileLayer]) {
    let layers: Vec<LayerId> = tiles
        .iter()
        .cloned()
        .map(|tile| map.add_tile_layer(tile))
        .collect();
    map.add_control(GroupedLayerControl {
        sections: vec![ControlSection {
            label: BASE_MAPS_LABEL.to_string(),
            layers,
        }],
        exclusive: true,
        collapsed: false,
        sort_layers: true,
    });
}

/// Pin the project logo to the top-left corner of the page.
pub fn add_logo_top_left(map: &mut LeafletMap, logo: &Logo) {
    map.add_html_overlay(format!(
        r#"    <style>
        .custom-logo {{
            position: absolute;
            top: 0px;
            left: 0px;
            z-index: 1000;
            background: rgba(200, 42, 68, 1);
            padding-left: 40px;
        }}
        .custom-logo img {{
            height: 90px;
            width: auto;
        }}
    </style>
    <div class="custom-logo">
        <a href="{}" target="_blank">
        <img src="{}" alt="Logo">
        </a>
    </div>"#,
        escape(&logo.link_url),
        escape(&logo.image_url)
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use sample_map_shared::table::parse_table;

    const TWO_CLUSTERS: &str = "\
Lon,Lat,Cluster,Group,Year,icon,text_color,background_color,Type,Depth
-45.39,61.17,Narsaq,Water,2022,tint,white,#1f77b4,CTD,12
-45.41,61.18,Narsaq,Water,,tint,white,#1f77b4,CTD,14
-46.01,61.02,Qassiarsuk,Sediment,2023,circle,black,#ff7f0e,Core,
";

    const NESTED: &str = "\
Lon,Lat,Cluster,Group,Year,icon,text_color,background_color,Type
-45.39,61.17,Narsaq,Water,2022,tint,white,red,CTD
-45.50,61.20,Narsaq,Sediment,2022,circle,black,green,Core
-46.01,61.02,Qassiarsuk,Water,2023,tint,white,blue,CTD
";

    fn legend_of(map: &LeafletMap) -> &GroupedLayerControl {
        map.controls().last().unwrap()
    }

    #[test]
    fn test_two_clusters_two_layers_two_legend_entries() {
        let table = parse_table(TWO_CLUSTERS.as_bytes()).unwrap();
        let map = assemble(&table, &MapConfig::default()).unwrap();

        assert_eq!(map.sub_groups().len(), 2);
        assert_eq!(map.marker_count(), 3);

        let legend = legend_of(&map);
        assert!(!legend.exclusive);
        assert!(!legend.collapsed);
        assert_eq!(legend.sections.len(), 2);
        assert!(legend.sections[0].label.ends_with("Narsaq"));
        assert!(legend.sections[1].label.ends_with("Qassiarsuk"));

        let html = map.render().unwrap();
        assert!(html.contains("var sub_group_0 = L.featureGroup.subGroup(marker_cluster);"));
        assert!(html.contains("var sub_group_1 = L.featureGroup.subGroup(marker_cluster);"));
        assert!(!html.contains("sub_group_2"));
        assert_eq!(html.matches("class=\\\"marker-legend\\\"").count(), 2);
    }

    #[test]
    fn test_groups_nest_under_their_cluster() {
        let table = parse_table(NESTED.as_bytes()).unwrap();
        let map = assemble(&table, &MapConfig::default()).unwrap();

        let legend = legend_of(&map);
        assert_eq!(legend.sections.len(), 2);
        assert_eq!(
            legend.sections[0].layers,
            [LayerId::SubGroup(0), LayerId::SubGroup(1)]
        );
        assert_eq!(legend.sections[1].layers, [LayerId::SubGroup(2)]);

        let names: Vec<_> = map.sub_groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Sediment", "Water", "Water"]);
    }

    #[test]
    fn test_legend_color_from_first_cluster_row() {
        let table = parse_table(NESTED.as_bytes()).unwrap();
        let map = assemble(&table, &MapConfig::default()).unwrap();
        let legend = legend_of(&map);
        assert!(legend.sections[0].label.contains(r#"fill="red""#));
        assert!(legend.sections[1].label.contains(r#"fill="blue""#));
    }

    #[test]
    fn test_every_row_becomes_one_marker() {
        let table = parse_table(NESTED.as_bytes()).unwrap();
        let map = assemble(&table, &MapConfig::default()).unwrap();
        assert_eq!(map.marker_count(), table.len());
        let water = &map.sub_groups()[2];
        assert_eq!(water.markers[0].location.to_array(), [61.02, -46.01]);
    }

    #[test]
    fn test_base_maps_and_logo_present() {
        let table = parse_table(TWO_CLUSTERS.as_bytes()).unwrap();
        let map = assemble(&table, &MapConfig::default()).unwrap();
        assert_eq!(map.tiles().len(), 4);
        assert!(map.controls()[0].exclusive);

        let html = map.render().unwrap();
        assert!(html.contains(r#"<div class="custom-logo">"#));
        assert!(html.contains("logo.svg"));
        assert!(html.contains(r#"href="./custom_style.css""#));
    }

    #[test]
    fn test_group_names_escaped_in_legend_script() {
        let csv = "\
Lon,Lat,Cluster,Group,Year,icon,text_color,background_color,Type
-45.39,61.17,Narsaq,Fish & Chips,2022,tint,white,red,CTD
";
        let table = parse_table(csv.as_bytes()).unwrap();
        let map = assemble(&table, &MapConfig::default()).unwrap();
        let html = map.render().unwrap();
        assert!(html.contains(r#""Fish &amp; Chips": sub_group_0"#));
        assert!(!html.contains(r#""Fish & Chips": sub_group_0"#));
    }

    #[test]
    fn test_empty_table_has_empty_legend() {
        let table = parse_table("Lon,Lat,Cluster,Group,Year\n".as_bytes()).unwrap();
        let map = assemble(&table, &MapConfig::default()).unwrap();
        assert!(map.sub_groups().is_empty());
        assert!(legend_of(&map).sections.is_empty());
    }

    #[test]
    fn test_missing_style_column_fails() {
        let csv = "Lon,Lat,Cluster,Group,Year,Type\n1,2,A,B,2020,CTD\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        assert!(assemble(&table, &MapConfig::default()).is_err());
    }
}
