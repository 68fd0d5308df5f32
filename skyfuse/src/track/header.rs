//! Column header of a track file.

use std::collections::HashMap;

/// Maps column names to field indices.
///
/// Built from the first row of a track file. Aliases let older files
/// (`timeMillis`, `latitude`, ...) resolve under the canonical names.
#[derive(Debug, Clone, Default)]
pub struct TrackHeader {
    columns: HashMap<String, usize>,
}

impl TrackHeader {
    /// Build a header from the column names in file order.
    ///
    /// Blank names are skipped but still take up their index.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut columns = HashMap::new();
        for (index, name) in names.into_iter().enumerate() {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            // First occurrence wins on duplicate names
            columns.entry(name.to_string()).or_insert(index);
        }
        Self { columns }
    }

    /// Build a header with the standard legacy aliases applied.
    pub fn with_standard_aliases<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut header = Self::new(names);
        header.add_alias("timeMillis", "millis");
        header.add_alias("latitude", "lat");
        header.add_alias("longitude", "lon");
        header.add_alias("altitude_gps", "hMSL");
        header
    }

    /// Make `alias` resolve to the same column as `existing`.
    ///
    /// No-op if `existing` is missing or `alias` is already a real column.
    pub fn add_alias(&mut self, existing: &str, alias: &str) {
        if self.columns.contains_key(alias) {
            return;
        }
        if let Some(&index) = self.columns.get(existing) {
            self.columns.insert(alias.to_string(), index);
        }
    }

    /// Index of a column by name.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Whether no named column was found.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_column_order() {
        let header = TrackHeader::new(["time", "lat", "lon"]);

        assert_eq!(header.get("time"), Some(0));
        assert_eq!(header.get("lon"), Some(2));
        assert_eq!(header.get("hMSL"), None);
    }

    #[test]
    fn test_names_are_trimmed() {
        let header = TrackHeader::new([" millis", "lat "]);

        assert_eq!(header.get("millis"), Some(0));
        assert_eq!(header.get("lat"), Some(1));
    }

    #[test]
    fn test_blank_names_are_skipped() {
        let header = TrackHeader::new(["", "lat", "  "]);

        assert_eq!(header.get("lat"), Some(1));
        assert!(!header.contains(""));
        assert!(!header.is_empty());
        assert!(TrackHeader::new([" ", ""]).is_empty());
    }

    #[test]
    fn test_standard_aliases() {
        let header = TrackHeader::with_standard_aliases([
            "timeMillis",
            "sensor",
            "latitude",
            "longitude",
            "altitude_gps",
        ]);

        assert_eq!(header.get("millis"), Some(0));
        assert_eq!(header.get("lat"), Some(2));
        assert_eq!(header.get("lon"), Some(3));
        assert_eq!(header.get("hMSL"), Some(4));
    }

    #[test]
    fn test_alias_does_not_shadow_real_column() {
        let mut header = TrackHeader::new(["millis", "timeMillis"]);
        header.add_alias("timeMillis", "millis");

        assert_eq!(header.get("millis"), Some(0));
    }

    #[test]
    fn test_alias_of_missing_column_is_ignored() {
        let mut header = TrackHeader::new(["lat"]);
        header.add_alias("timeMillis", "millis");

        assert!(!header.contains("millis"));
    }
}
