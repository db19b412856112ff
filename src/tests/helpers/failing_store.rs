//! In-memory [`NoteStore`] that can be told to fail after N writes

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::{StoreError, StoreResult};
use crate::fingerprint::Fingerprint;
use crate::store::{IndexRecord, NoteStore};

#[derive(Debug, Default)]
pub struct FailingStore {
    pub records: BTreeMap<String, IndexRecord>,
    pub history: RefCell<Vec<(String, usize)>>,
    /// Writes allowed before every further write fails; `None` never fails
    pub writes_before_failure: Option<usize>,
    pub fail_reads: bool,
    writes: usize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(writes: usize) -> Self {
        Self {
            writes_before_failure: Some(writes),
            ..Self::default()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn with_record(mut self, record: IndexRecord) -> Self {
        self.records.insert(record.path.clone(), record);
        self
    }

    fn check_write(&mut self) -> StoreResult<()> {
        if let Some(limit) = self.writes_before_failure {
            if self.writes >= limit {
                return Err(StoreError::Schema("injected write failure".to_string()));
            }
        }
        self.writes += 1;
        Ok(())
    }

    fn check_read(&self) -> StoreResult<()> {
        if self.fail_reads {
            return Err(StoreError::Schema("injected read failure".to_string()));
        }
        Ok(())
    }
}

impl NoteStore for FailingStore {
    fn upsert(&mut self, record: &IndexRecord) -> StoreResult<()> {
        self.check_write()?;
        self.records.insert(record.path.clone(), record.clone());
        Ok(())
    }

    fn delete(&mut self, path: &str) -> StoreResult<()> {
        self.check_write()?;
        self.records.remove(path);
        Ok(())
    }

    fn list_fingerprints(&self) -> StoreResult<Vec<Fingerprint>> {
        self.check_read()?;
        Ok(self.records.values().map(IndexRecord::fingerprint).collect())
    }

    fn search_titles_ranked(&self, query: &str, limit: usize) -> StoreResult<Vec<String>> {
        self.check_read()?;
        let needle = query.to_lowercase();
        Ok(self
            .records
            .values()
            .filter(|r| r.title.to_lowercase().contains(&needle))
            .map(|r| r.title.clone())
            .take(limit)
            .collect())
    }

    fn recent_titles(&self, limit: usize) -> StoreResult<Vec<String>> {
        self.check_read()?;
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| b.modified_seconds.cmp(&a.modified_seconds));
        Ok(records
            .into_iter()
            .map(|r| r.title.clone())
            .take(limit)
            .collect())
    }

    fn search_history_by_prefix(&self, prefix: &str, limit: usize) -> StoreResult<Vec<String>> {
        self.check_read()?;
        Ok(self
            .history
            .borrow()
            .iter()
            .rev()
            .filter(|(text, _)| text.starts_with(prefix))
            .map(|(text, _)| text.clone())
            .take(limit)
            .collect())
    }

    fn recent_history(&self, limit: usize) -> StoreResult<Vec<String>> {
        self.check_read()?;
        Ok(self
            .history
            .borrow()
            .iter()
            .rev()
            .map(|(text, _)| text.clone())
            .take(limit)
            .collect())
    }

    fn count_matches(&self, query: &str) -> StoreResult<usize> {
        self.check_read()?;
        let needle = query.to_lowercase();
        Ok(self
            .records
            .values()
            .filter(|r| r.body.to_lowercase().contains(&needle))
            .count())
    }

    fn append_history(&self, text: &str, hit_count: usize) -> StoreResult<()> {
        self.check_read()?;
        self.history
            .borrow_mut()
            .push((text.to_string(), hit_count));
        Ok(())
    }
}
