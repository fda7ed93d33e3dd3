//! Ephemeral client-side state.

use cipherkeep_types::CipherRecord;

/// Last-fetched store snapshot plus the currently selected record.
///
/// The selection is an index into `snapshot`; it is never left pointing past
/// the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    snapshot: Vec<CipherRecord>,
    selected: Option<usize>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &[CipherRecord] {
        &self.snapshot
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&CipherRecord> {
        self.selected.and_then(|i| self.snapshot.get(i))
    }

    /// Selects the record at `index`. Returns false (and leaves the
    /// selection alone) if there is no such record.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.snapshot.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Selects the record carrying `label`, if present.
    pub fn select_label(&mut self, label: &str) -> bool {
        match self.snapshot.iter().position(|r| r.label == *label) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Replaces the snapshot. A selection follows its record by label and is
    /// cleared if that record is gone.
    pub fn refresh_snapshot(&mut self, records: Vec<CipherRecord>) {
        let selected_label = self.selected_record().map(|r| r.label.clone());
        self.snapshot = records;
        self.selected = selected_label
            .and_then(|label| self.snapshot.iter().position(|r| r.label == label));
    }
}
