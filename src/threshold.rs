// Percentage threshold lookup tables (battery icons and colors)

/// Maps integer percentage thresholds to values.
///
/// Lookup picks the entry with the greatest key not exceeding the input,
/// or the entry with the smallest key when the input is below every key.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable<T> {
    entries: Vec<(u8, T)>,
}

impl<T> ThresholdTable<T> {
    pub fn new(entries: impl IntoIterator<Item = (u8, T)>) -> Self {
        let mut entries: Vec<(u8, T)> = entries.into_iter().collect();
        entries.sort_by_key(|(key, _)| *key);
        entries.dedup_by_key(|(key, _)| *key);
        ThresholdTable { entries }
    }

    pub fn pick(&self, percent: u8) -> Option<&T> {
        let idx = self.entries.partition_point(|(key, _)| *key <= percent);
        let entry = if idx == 0 {
            self.entries.first()
        } else {
            self.entries.get(idx - 1)
        };
        entry.map(|(_, value)| value)
    }
}
