//! In-memory registry of system selectors.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use gantry_id::SelectorId;
use tracing::info;

use crate::{Match, MatchProvider, SelectorError, SelectorResult, SystemSelector};

/// Holds system selectors and serves their rules to the scheduler.
///
/// Readers take a snapshot under a read lock, so scoring never observes a
/// half-applied update. Active rules come from enabled selectors ordered by
/// ascending priority, then by ID.
#[derive(Debug, Default)]
pub struct InMemorySelectorStore {
    selectors: RwLock<BTreeMap<SelectorId, SystemSelector>>,
}

impl InMemorySelectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new selector. Fails if the ID is taken.
    pub fn create(&self, selector: SystemSelector) -> SelectorResult<()> {
        validate(&selector)?;

        let mut selectors = self.write();
        if selectors.contains_key(&selector.id) {
            return Err(SelectorError::DuplicateSelector(selector.id));
        }

        info!(
            selector_id = %selector.id,
            enabled = selector.enabled,
            should = selector.should.len(),
            must = selector.must.len(),
            "System selector created"
        );
        selectors.insert(selector.id, stamped(selector));
        Ok(())
    }

    /// Insert or replace a selector.
    pub fn upsert(&self, selector: SystemSelector) -> SelectorResult<()> {
        validate(&selector)?;

        info!(selector_id = %selector.id, "System selector upserted");
        self.write().insert(selector.id, stamped(selector));
        Ok(())
    }

    pub fn remove(&self, id: SelectorId) -> SelectorResult<SystemSelector> {
        let removed = self
            .write()
            .remove(&id)
            .ok_or(SelectorError::NotFound(id))?;

        info!(selector_id = %id, "System selector removed");
        Ok(removed)
    }

    pub fn set_enabled(&self, id: SelectorId, enabled: bool) -> SelectorResult<()> {
        let mut selectors = self.write();
        let selector = selectors.get_mut(&id).ok_or(SelectorError::NotFound(id))?;
        selector.enabled = enabled;
        selector.updated_at = Utc::now();

        info!(selector_id = %id, enabled, "System selector toggled");
        Ok(())
    }

    pub fn get(&self, id: SelectorId) -> Option<SystemSelector> {
        self.read().get(&id).cloned()
    }

    /// All selectors, enabled or not, in evaluation order.
    pub fn list(&self) -> Vec<SystemSelector> {
        let mut selectors: Vec<SystemSelector> = self.read().values().cloned().collect();
        selectors.sort_by_key(|s| (s.priority, s.id));
        selectors
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// `should` rules of enabled selectors, in evaluation order.
    pub fn should_matches(&self) -> Vec<Match> {
        self.collect_rules(|s| &s.should)
    }

    /// `must` rules of enabled selectors, in evaluation order.
    pub fn must_matches(&self) -> Vec<Match> {
        self.collect_rules(|s| &s.must)
    }

    fn collect_rules<F>(&self, rules: F) -> Vec<Match>
    where
        F: Fn(&SystemSelector) -> &Vec<Match>,
    {
        let selectors = self.read();
        let mut enabled: Vec<&SystemSelector> = selectors.values().filter(|s| s.enabled).collect();
        enabled.sort_by_key(|s| (s.priority, s.id));
        enabled
            .into_iter()
            .flat_map(|s| rules(s).iter().cloned())
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<SelectorId, SystemSelector>> {
        self.selectors.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<SelectorId, SystemSelector>> {
        self.selectors.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MatchProvider for InMemorySelectorStore {
    fn active_rules(&self) -> Vec<Match> {
        self.should_matches()
    }

    fn must_rules(&self) -> Vec<Match> {
        self.must_matches()
    }
}

fn validate(selector: &SystemSelector) -> SelectorResult<()> {
    match selector.validation_error() {
        Some(reason) => Err(SelectorError::InvalidSelector {
            id: selector.id,
            reason,
        }),
        None => Ok(()),
    }
}

fn stamped(mut selector: SystemSelector) -> SystemSelector {
    selector.updated_at = Utc::now();
    selector
}
