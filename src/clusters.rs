use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::graph::column;

/// Precomputed community label per user, read from the node table.
#[derive(Debug, Clone, Default)]
pub struct ClusterLabels {
    labels: HashMap<String, String>,
}

impl ClusterLabels {
    /// Reads a node table with `Id` and `modularity_class` columns.
    ///
    /// Rows with an empty class are left unlabelled.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
        let headers = reader.headers()?.clone();
        let id = column(&headers, "Id", path)?;
        let class = column(&headers, "modularity_class", path)?;

        let mut labels = HashMap::new();
        for record in reader.records() {
            let record = record?;
            if !record[class].is_empty() {
                labels.insert(record[id].to_string(), record[class].to_string());
            }
        }

        info!(file = %path.display(), labelled = labels.len(), "loaded cluster labels");
        Ok(ClusterLabels { labels })
    }

    pub fn get(&self, user: &str) -> Option<&str> {
        self.labels.get(user).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ClusterLabels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ClusterLabels {
            labels: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Within-cluster versus cross-cluster split of the raw edge table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterConnectivity {
    pub total: usize,
    pub within: usize,
    pub cross: usize,
}

impl ClusterConnectivity {
    /// Classifies every row of the edge table, duplicates included.
    pub fn from_csv(edges: impl AsRef<Path>, labels: &ClusterLabels) -> Result<Self> {
        let path = edges.as_ref();
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
        let headers = reader.headers()?.clone();
        let source = column(&headers, "Source", path)?;
        let target = column(&headers, "Target", path)?;

        let mut stats = Self::default();
        for record in reader.records() {
            let record = record?;
            stats.record(&record[source], &record[target], labels);
        }
        Ok(stats)
    }

    pub fn from_pairs<I, S>(edges: I, labels: &ClusterLabels) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut stats = Self::default();
        for (a, b) in edges {
            stats.record(a.as_ref(), b.as_ref(), labels);
        }
        stats
    }

    // An unlabelled endpoint never matches, so such edges count as cross-cluster.
    fn record(&mut self, source: &str, target: &str, labels: &ClusterLabels) {
        self.total += 1;
        match (labels.get(source), labels.get(target)) {
            (Some(a), Some(b)) if a == b => self.within += 1,
            _ => self.cross += 1,
        }
    }

    /// Share of edges that stay inside a cluster; 0 for an empty table.
    pub fn density(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.within as f64 / self.total as f64
        }
    }

    pub fn within_pct(&self) -> f64 {
        self.density() * 100.0
    }

    pub fn cross_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.cross as f64 / self.total as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn labels() -> ClusterLabels {
        [("a", "0"), ("b", "0"), ("c", "1"), ("d", "1")].into_iter().collect()
    }

    #[test]
    fn splits_within_and_cross() {
        let stats = ClusterConnectivity::from_pairs(
            [("a", "b"), ("c", "d"), ("a", "c"), ("b", "d")],
            &labels(),
        );
        assert_eq!(stats.total, 4);
        assert_eq!(stats.within, 2);
        assert_eq!(stats.cross, 2);
        assert_eq!(stats.density(), 0.5);
        assert_eq!(stats.cross_pct(), 50.0);
    }

    #[test]
    fn duplicate_rows_each_count() {
        let stats = ClusterConnectivity::from_pairs([("a", "b"), ("a", "b"), ("b", "a")], &labels());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.within, 3);
    }

    #[test]
    fn unlabelled_endpoint_is_cross() {
        let stats = ClusterConnectivity::from_pairs([("a", "zz"), ("yy", "zz")], &labels());
        assert_eq!(stats.within, 0);
        assert_eq!(stats.cross, 2);
    }

    #[test]
    fn empty_table_has_zero_density() {
        let stats = ClusterConnectivity::from_pairs(Vec::<(&str, &str)>::new(), &labels());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.density(), 0.0);
        assert_eq!(stats.within_pct(), 0.0);
        assert_eq!(stats.cross_pct(), 0.0);
    }

    #[test]
    fn label_table_skips_blank_classes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Id,Label,modularity_class").unwrap();
        writeln!(file, "a,Alice,3").unwrap();
        writeln!(file, "b,Bob,").unwrap();
        file.flush().unwrap();

        let labels = ClusterLabels::from_csv(file.path()).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels.get("a"), Some("3"));
        assert_eq!(labels.get("b"), None);
    }
}
