use std::collections::VecDeque;
use std::sync::RwLock;

use super::donations_model::{DonationFeed, DonationRecord};
use super::donations_traits::DonationStoreTrait;
use crate::constants::MAX_RETAINED_DONATIONS;
use crate::errors::{Error, Result};

/// In-memory, insertion-ordered window over the most recent donations.
///
/// The buffer lives as long as the process. A restart empties it, and
/// clients holding a cursor from before the restart are resynced with the
/// whole new window.
pub struct DonationBuffer {
    capacity: usize,
    records: RwLock<VecDeque<DonationRecord>>,
}

impl DonationBuffer {
    pub fn new() -> Self {
        Self::with_capacity(MAX_RETAINED_DONATIONS)
    }

    /// Creates a buffer retaining at most `capacity` records (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: RwLock::new(VecDeque::with_capacity(
                capacity.min(MAX_RETAINED_DONATIONS) + 1,
            )),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy of the retained records, oldest first.
    pub fn snapshot(&self) -> Result<Vec<DonationRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        Ok(records.iter().cloned().collect())
    }

    fn select_since(records: &VecDeque<DonationRecord>, after_id: Option<&str>) -> DonationFeed {
        let Some(latest_known) = records.back().map(|r| r.id.clone()) else {
            return DonationFeed::empty();
        };

        let start = match after_id.filter(|cursor| !cursor.is_empty()) {
            None => 0,
            Some(cursor) => match records.iter().position(|r| r.id.matches_cursor(cursor)) {
                Some(index) => index + 1,
                None => {
                    log::info!(
                        "Cursor '{}' is not in the buffer, resending {} donations",
                        cursor,
                        records.len()
                    );
                    0
                }
            },
        };

        let donations: Vec<DonationRecord> = records.iter().skip(start).cloned().collect();
        // An empty page still reports the newest id so the client cursor never regresses.
        let latest_id = donations
            .last()
            .map(|r| r.id.clone())
            .unwrap_or(latest_known);
        DonationFeed::new(donations, Some(latest_id))
    }
}

impl Default for DonationBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DonationStoreTrait for DonationBuffer {
    fn append(&self, record: DonationRecord) -> Result<usize> {
        let mut records = self
            .records
            .write()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        records.push_back(record);

        let mut evicted = 0;
        while records.len() > self.capacity {
            if let Some(dropped) = records.pop_front() {
                log::debug!("Evicted donation {} from the buffer", dropped.id);
            }
            evicted += 1;
        }
        Ok(evicted)
    }

    fn read_since(&self, after_id: Option<&str>) -> Result<DonationFeed> {
        let records = self
            .records
            .read()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        Ok(Self::select_since(&records, after_id))
    }

    fn count(&self) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donations::DonationId;
    use serde_json::Number;

    fn record(id: &str) -> DonationRecord {
        DonationRecord {
            id: DonationId::from(id),
            donator_name: "Anonymous".to_string(),
            amount_raw: Number::from(1000),
            message: String::new(),
            timestamp: 0,
        }
    }

    fn buffer_with(ids: &[&str]) -> DonationBuffer {
        let buffer = DonationBuffer::new();
        for id in ids {
            buffer.append(record(id)).unwrap();
        }
        buffer
    }

    fn ids(feed: &DonationFeed) -> Vec<String> {
        feed.donations.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn empty_buffer_returns_nothing_and_null_latest_id() {
        let buffer = DonationBuffer::new();
        for cursor in [None, Some(""), Some("A"), Some("does-not-exist")] {
            let feed = buffer.read_since(cursor).unwrap();
            assert!(feed.success);
            assert!(feed.donations.is_empty());
            assert_eq!(feed.latest_id, None);
        }
    }

    #[test]
    fn no_cursor_returns_whole_buffer() {
        let buffer = buffer_with(&["A", "B", "C"]);

        let feed = buffer.read_since(None).unwrap();
        assert_eq!(ids(&feed), ["A", "B", "C"]);
        assert_eq!(feed.latest_id, Some(DonationId::from("C")));

        let feed = buffer.read_since(Some("")).unwrap();
        assert_eq!(ids(&feed), ["A", "B", "C"]);
    }

    #[test]
    fn mid_cursor_returns_suffix() {
        let buffer = buffer_with(&["A", "B", "C"]);

        let feed = buffer.read_since(Some("A")).unwrap();
        assert_eq!(ids(&feed), ["B", "C"]);
        assert_eq!(feed.latest_id, Some(DonationId::from("C")));

        let feed = buffer.read_since(Some("B")).unwrap();
        assert_eq!(ids(&feed), ["C"]);
    }

    #[test]
    fn caught_up_cursor_keeps_latest_id() {
        let buffer = buffer_with(&["A", "B", "C"]);

        let feed = buffer.read_since(Some("C")).unwrap();
        assert!(feed.donations.is_empty());
        assert_eq!(feed.latest_id, Some(DonationId::from("C")));
    }

    #[test]
    fn unknown_cursor_resyncs_whole_buffer() {
        let buffer = buffer_with(&["A", "B", "C"]);

        let feed = buffer.read_since(Some("does-not-exist")).unwrap();
        assert_eq!(ids(&feed), ["A", "B", "C"]);
        assert_eq!(feed.latest_id, Some(DonationId::from("C")));
    }

    #[test]
    fn duplicate_ids_resolve_to_first_occurrence() {
        let buffer = buffer_with(&["A", "B", "A", "C"]);

        let feed = buffer.read_since(Some("A")).unwrap();
        assert_eq!(ids(&feed), ["B", "A", "C"]);
    }

    #[test]
    fn numeric_ids_match_string_cursors() {
        let buffer = DonationBuffer::new();
        for id in [10, 20, 30] {
            let mut r = record("");
            r.id = DonationId::Number(Number::from(id));
            buffer.append(r).unwrap();
        }

        let feed = buffer.read_since(Some("20")).unwrap();
        assert_eq!(ids(&feed), ["30"]);
        assert_eq!(feed.latest_id, Some(DonationId::Number(Number::from(30))));
    }

    #[test]
    fn eviction_keeps_most_recent_records_in_order() {
        let buffer = DonationBuffer::with_capacity(3);
        let mut evicted = 0;
        for id in ["A", "B", "C", "D", "E"] {
            evicted += buffer.append(record(id)).unwrap();
        }

        assert_eq!(evicted, 2);
        assert_eq!(buffer.count().unwrap(), 3);
        let retained: Vec<String> = buffer
            .snapshot()
            .unwrap()
            .iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(retained, ["C", "D", "E"]);
    }

    #[test]
    fn evicted_cursor_triggers_resync() {
        let buffer = DonationBuffer::with_capacity(2);
        for id in ["A", "B", "C"] {
            buffer.append(record(id)).unwrap();
        }

        let feed = buffer.read_since(Some("A")).unwrap();
        assert_eq!(ids(&feed), ["B", "C"]);
    }

    #[test]
    fn default_capacity_is_one_hundred() {
        let buffer = DonationBuffer::default();
        assert_eq!(buffer.capacity(), 100);
        for i in 0..150 {
            buffer.append(record(&i.to_string())).unwrap();
        }
        assert_eq!(buffer.count().unwrap(), 100);
        assert_eq!(buffer.snapshot().unwrap()[0].id, DonationId::from("50"));
    }

    #[test]
    fn oversized_capacity_does_not_preallocate() {
        let buffer = DonationBuffer::with_capacity(usize::MAX);
        assert_eq!(buffer.capacity(), usize::MAX);
        buffer.append(record("A")).unwrap();
        assert_eq!(buffer.count().unwrap(), 1);

        let buffer = DonationBuffer::with_capacity(1 << 40);
        assert_eq!(buffer.read_since(None).unwrap().donations.len(), 0);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let buffer = DonationBuffer::with_capacity(0);
        assert_eq!(buffer.capacity(), 1);
        buffer.append(record("A")).unwrap();
        buffer.append(record("B")).unwrap();
        assert_eq!(buffer.count().unwrap(), 1);
    }
}
