use crate::config::DEFAULT_QUICK_ACTION_LIMIT;
use crate::naming::sort_key;
use crate::scheduler::DiscoveryEvent;
use dockyard_protocol::models::{ApplicationDescriptor, CacheStatsDto};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

pub type Observer = Arc<dyn Fn() + Send + Sync>;

type ObserverList = Mutex<Vec<(u64, Observer)>>;

#[derive(Default)]
struct CacheState {
    latest_scan_id: Option<u64>,
    apps: Vec<ApplicationDescriptor>,
    index: HashMap<String, usize>,
}

impl CacheState {
    fn replace(&mut self, scan_id: u64, apps: Vec<ApplicationDescriptor>) -> bool {
        let merged = apps
            .into_iter()
            .map(|app| {
                if app.has_icon() {
                    return app;
                }
                let cached_icon = self
                    .index
                    .get(&app.path)
                    .and_then(|position| self.apps.get(*position))
                    .and_then(|cached| cached.icon.clone());
                app.with_icon(cached_icon)
            })
            .collect::<Vec<_>>();

        self.latest_scan_id = Some(scan_id);
        if merged == self.apps {
            return false;
        }
        self.index = merged
            .iter()
            .enumerate()
            .map(|(position, app)| (app.path.clone(), position))
            .collect();
        self.apps = merged;
        true
    }

    fn merge_icons(&mut self, members: &[ApplicationDescriptor]) -> bool {
        let mut dirty = false;
        for member in members.iter().filter(|member| member.has_icon()) {
            let Some(cached) = self
                .index
                .get(&member.path)
                .and_then(|position| self.apps.get_mut(*position))
            else {
                continue;
            };
            if cached.icon != member.icon {
                cached.icon = member.icon.clone();
                dirty = true;
            }
        }
        dirty
    }
}

/// Merged view of discovery events plus the observers watching it.
///
/// One writer (the event pump) and many readers. An icon, once cached, is never
/// replaced by an absent one.
pub struct DiscoveryCache {
    state: RwLock<CacheState>,
    observers: Arc<ObserverList>,
    next_observer_id: AtomicU64,
    quick_action_limit: usize,
}

impl Default for DiscoveryCache {
    fn default() -> Self {
        Self::new(DEFAULT_QUICK_ACTION_LIMIT)
    }
}

impl DiscoveryCache {
    pub fn new(quick_action_limit: usize) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            observers: Arc::new(Mutex::new(Vec::new())),
            next_observer_id: AtomicU64::new(1),
            quick_action_limit: quick_action_limit.max(1),
        }
    }

    /// Folds one event into the snapshot; returns whether observers were notified.
    pub fn apply(&self, event: &DiscoveryEvent) -> bool {
        let dirty = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            match event {
                DiscoveryEvent::FullList { scan_id, apps } => {
                    if state.latest_scan_id.is_some_and(|latest| *scan_id < latest) {
                        tracing::debug!(
                            event = "discovery_cache_stale_full_list",
                            scan_id = *scan_id,
                            latest_scan_id = state.latest_scan_id.unwrap_or_default()
                        );
                        false
                    } else {
                        state.replace(*scan_id, apps.clone())
                    }
                }
                DiscoveryEvent::IconBatch { apps, .. } => state.merge_icons(apps),
            }
        };

        if dirty {
            self.notify_observers();
        }
        dirty
    }

    pub fn current_snapshot(&self) -> Vec<ApplicationDescriptor> {
        self.read_state().apps.clone()
    }

    pub fn latest_scan_id(&self) -> Option<u64> {
        self.read_state().latest_scan_id
    }

    /// Case-insensitive substring match on names. A blank term lists the first few apps.
    pub fn search(&self, term: &str) -> Vec<ApplicationDescriptor> {
        let needle = term.trim().to_lowercase();
        let state = self.read_state();
        if needle.is_empty() {
            return state
                .apps
                .iter()
                .take(self.quick_action_limit)
                .cloned()
                .collect();
        }

        let mut matches = state
            .apps
            .iter()
            .filter(|app| app.name.to_lowercase().contains(&needle))
            .cloned()
            .collect::<Vec<_>>();
        matches.sort_by_cached_key(|app| sort_key(&app.name));
        matches
    }

    pub fn stats(&self) -> CacheStatsDto {
        let state = self.read_state();
        CacheStatsDto {
            total_apps: state.apps.len(),
            apps_with_icons: state.apps.iter().filter(|app| app.has_icon()).count(),
        }
    }

    pub fn subscribe(&self, observer: Observer) -> Subscription {
        let id = self.next_observer_id.fetch_add(1, Ordering::Relaxed);
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));
        Subscription {
            id,
            observers: Arc::downgrade(&self.observers),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify_observers(&self) {
        // Observers may subscribe or unsubscribe; call them without the list lock held.
        let observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect::<Vec<_>>();
        for observer in observers {
            observer();
        }
    }
}

/// Observer handle; dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes its observer"]
pub struct Subscription {
    id: u64,
    observers: Weak<ObserverList>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        self.detach();
    }

    fn detach(&self) {
        let Some(observers) = self.observers.upgrade() else {
            return;
        };
        observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(id, _)| *id != self.id);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
#[path = "../tests/cache/cache_tests.rs"]
mod tests;
