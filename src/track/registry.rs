//! Process-wide invocation identity storage.
//!
//! [`InvocationRegistry`] maps task names to their stable
//! [`InvocationId`]s. The first caller for a name mints the id; every
//! later call returns the stored value unchanged. Shared across
//! trackers behind an `Arc`, so an embedding harness can hand one
//! registry to any number of suites.

use dashmap::DashMap;

use crate::track::ids::{IdScheme, InvocationId};

#[derive(Debug, Default)]
pub struct InvocationRegistry {
    entries: DashMap<String, InvocationId>,
}

impl InvocationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable id for `task_name`, minting on first use.
    ///
    /// Get-or-insert runs atomically on the map shard, so concurrent
    /// first calls for one name converge on a single winner.
    pub fn get_or_create(&self, task_name: &str, scheme: IdScheme) -> InvocationId {
        if let Some(existing) = self.entries.get(task_name) {
            return *existing;
        }
        *self
            .entries
            .entry(task_name.to_string())
            .or_insert_with(|| InvocationId::random(scheme))
    }

    /// Already-minted id for `task_name`, if any.
    #[must_use]
    pub fn get(&self, task_name: &str) -> Option<InvocationId> {
        self.entries.get(task_name).map(|entry| *entry)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn same_name_yields_same_id() {
        let registry = InvocationRegistry::new();
        let first = registry.get_or_create("checkout", IdScheme::Span64);
        let second = registry.get_or_create("checkout", IdScheme::Span64);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn different_names_yield_different_ids() {
        let registry = InvocationRegistry::new();
        let browse = registry.get_or_create("browse", IdScheme::Span64);
        let checkout = registry.get_or_create("checkout", IdScheme::Span64);
        assert_ne!(browse, checkout);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn get_does_not_mint() {
        let registry = InvocationRegistry::new();
        assert!(registry.get("browse").is_none());
        let minted = registry.get_or_create("browse", IdScheme::Hex128);
        assert_eq!(registry.get("browse"), Some(minted));
    }

    #[test]
    fn concurrent_first_use_converges_on_one_winner() {
        let registry = Arc::new(InvocationRegistry::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get_or_create("checkout", IdScheme::Span64))
            })
            .collect();

        let ids: Vec<InvocationId> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(registry.len(), 1);
    }
}
