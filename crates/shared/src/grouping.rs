use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{Row, Table, BACKGROUND_COLOR, CLUSTER, GROUP};

/// The (cluster, group) pair that picks a row's sub-layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub cluster: String,
    pub group: String,
}

/// Rows sharing one [`GroupKey`], in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub key: GroupKey,
    pub rows: Vec<Row>,
}

/// Split the table by `Cluster` then `Group`.
pub fn partition(table: &Table) -> Result<Vec<Partition>> {
    partition_by(&table.rows, CLUSTER, GROUP)
}

/// Split rows by two columns, partitions sorted by key.
///
/// Every row lands in exactly one partition. A missing key cell counts as
/// the empty string rather than dropping the row.
pub fn partition_by(rows: &[Row], first: &str, second: &str) -> Result<Vec<Partition>> {
    let mut groups: BTreeMap<GroupKey, Vec<Row>> = BTreeMap::new();
    for row in rows {
        let key = GroupKey {
            cluster: row.text(first)?.to_string(),
            group: row.text(second)?.to_string(),
        };
        groups.entry(key).or_default().push(row.clone());
    }

    Ok(groups
        .into_iter()
        .map(|(key, rows)| Partition { key, rows })
        .collect())
}

/// Legend colour per cluster: the `background_color` of the first row seen
/// for that cluster. Later rows that disagree are logged and ignored.
pub fn cluster_colors(rows: &[Row]) -> Result<BTreeMap<String, Option<String>>> {
    let mut colors: BTreeMap<String, Option<String>> = BTreeMap::new();
    for row in rows {
        let cluster = row.text(CLUSTER)?;
        let color = row.value(BACKGROUND_COLOR)?;
        match colors.entry(cluster.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(color.map(str::to_string));
            }
            Entry::Occupied(first) if first.get().as_deref() != color => {
                tracing::warn!(
                    cluster,
                    kept = first.get().as_deref().unwrap_or(""),
                    ignored = color.unwrap_or(""),
                    "Cluster rows disagree on background colour"
                );
            }
            Entry::Occupied(_) => {}
        }
    }
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn row(cluster: &str, group: &str, color: &str, id: &str) -> Row {
        Row::from_pairs([
            ("Cluster", cluster),
            ("Group", group),
            ("background_color", color),
            ("ID", id),
        ])
    }

    fn rows() -> Vec<Row> {
        vec![
            row("Narsaq", "Water", "red", "1"),
            row("Ilulissat", "Sediment", "blue", "2"),
            row("Narsaq", "Sediment", "red", "3"),
            row("Narsaq", "Water", "red", "4"),
            row("", "Water", "", "5"),
        ]
    }

    #[test]
    fn test_partition_covers_every_row_once() {
        let input = rows();
        let parts = partition_by(&input, "Cluster", "Group").unwrap();

        let total: usize = parts.iter().map(|p| p.rows.len()).sum();
        assert_eq!(total, input.len());

        for r in &input {
            let hits = parts
                .iter()
                .filter(|p| p.rows.contains(r))
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn test_partition_rows_match_their_key() {
        for part in partition_by(&rows(), "Cluster", "Group").unwrap() {
            for r in &part.rows {
                assert_eq!(r.text("Cluster").unwrap(), part.key.cluster);
                assert_eq!(r.text("Group").unwrap(), part.key.group);
            }
        }
    }

    #[test]
    fn test_partition_sorted_by_key() {
        let keys: Vec<_> = partition_by(&rows(), "Cluster", "Group")
            .unwrap()
            .into_iter()
            .map(|p| (p.key.cluster, p.key.group))
            .collect();
        assert_eq!(
            keys,
            [
                ("".to_string(), "Water".to_string()),
                ("Ilulissat".to_string(), "Sediment".to_string()),
                ("Narsaq".to_string(), "Sediment".to_string()),
                ("Narsaq".to_string(), "Water".to_string()),
            ]
        );
    }

    #[test]
    fn test_partition_keeps_source_order_within_group() {
        let parts = partition_by(&rows(), "Cluster", "Group").unwrap();
        let narsaq_water = parts.last().unwrap();
        let ids: Vec<_> = narsaq_water
            .rows
            .iter()
            .map(|r| r.text("ID").unwrap().to_string())
            .collect();
        assert_eq!(ids, ["1", "4"]);
    }

    #[test]
    fn test_partition_missing_column_is_error() {
        let input = vec![Row::from_pairs([("Cluster", "A")])];
        assert!(matches!(
            partition_by(&input, "Cluster", "Group"),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn test_partition_empty_input() {
        assert!(partition_by(&[], "Cluster", "Group").unwrap().is_empty());
    }

    #[test]
    fn test_cluster_color_uses_first_row() {
        let input = vec![
            row("Narsaq", "Water", "red", "1"),
            row("Narsaq", "Sediment", "green", "2"),
        ];
        let colors = cluster_colors(&input).unwrap();
        assert_eq!(colors["Narsaq"].as_deref(), Some("red"));
    }

    #[test]
    fn test_cluster_color_one_entry_per_cluster() {
        let colors = cluster_colors(&rows()).unwrap();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors["Ilulissat"].as_deref(), Some("blue"));
        assert_eq!(colors[""], None);
    }
}
