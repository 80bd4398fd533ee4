//! Catalog access and the current selection.
//!
//! The catalog is a remote service: it answers with an ordered list of model
//! identifiers, and it answers empty until it has loaded. The selection keeps
//! retrying every frame until the first non-empty answer arrives, then never
//! asks again.

use log::warn;

/// External catalog service, specified only at its boundary.
pub trait CatalogProvider {
    /// Ordered model identifiers. Empty until the backing service responds.
    fn entries(&self) -> Vec<String>;
}

/// The cached catalog plus the cursor selecting what to spawn next.
#[derive(Debug, Default)]
pub struct CatalogSelection {
    entries: Vec<String>,
    current: usize,
}

impl CatalogSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot latch: cache the provider's entries on the first non-empty
    /// answer. Returns `true` exactly once, on the populating call.
    ///
    /// Identifiers double as spawned-instance names, so duplicates are
    /// dropped with a warning to keep the mapping back to catalog entries
    /// unambiguous.
    pub fn populate_once<C: CatalogProvider>(&mut self, provider: &C) -> bool {
        if !self.entries.is_empty() {
            return false;
        }
        for entry in provider.entries() {
            if self.entries.contains(&entry) {
                warn!("Catalog entry {:?} is duplicated; keeping the first occurrence.", entry);
                continue;
            }
            self.entries.push(entry);
        }
        if self.entries.is_empty() {
            return false;
        }
        self.current = 0;
        log::info!("Catalog populated with {} entries.", self.entries.len());
        true
    }

    pub fn is_populated(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Move the cursor. Out-of-range indices are rejected so the cursor stays
    /// valid whenever the catalog is non-empty.
    pub fn set_current_index(&mut self, index: usize) {
        if index < self.entries.len() {
            self.current = index;
        } else {
            warn!(
                "Selection index {} is out of range for {} catalog entries; keeping {}.",
                index,
                self.entries.len(),
                self.current
            );
        }
    }

    /// The identifier the next spawn should use, once the catalog is there.
    pub fn current_entry(&self) -> Option<&str> {
        self.entries.get(self.current).map(String::as_str)
    }
}
