use dockyard_automation::{AutomationBridge, AutomationConfig};
use dockyard_kernel::run_blocking;
use dockyard_launcher::{
    BatchRunSummary, DiscoveryCache, DiscoveryConfig, DiscoveryEvent, IconBatchScheduler,
    IconResolver, IconSource, Observer, Subscription, scan_applications, scan_roots,
};
use dockyard_protocol::models::{
    ActionResultDto, ApplicationDescriptor, CacheStatsDto, MenuItemsDto, WindowListDto,
};
use dockyard_protocol::{AppError, AppResult};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub scan_id: u64,
    pub batches_emitted: usize,
    pub icons_resolved: usize,
    pub events_applied: usize,
    pub receiver_closed: bool,
}

/// Background half of a scan: the batch task plus the pump feeding the cache.
pub struct ScanCompletion {
    scan_id: u64,
    batches: JoinHandle<BatchRunSummary>,
    pump: JoinHandle<usize>,
}

impl ScanCompletion {
    pub async fn wait(self) -> AppResult<ScanSummary> {
        let batches = self.batches.await.map_err(|error| {
            AppError::new("scan_task_failed", "scan task failed")
                .with_context("task", "icon_batches")
                .with_context("scanId", self.scan_id.to_string())
                .with_cause(error.to_string())
        })?;
        let events_applied = self.pump.await.map_err(|error| {
            AppError::new("scan_task_failed", "scan task failed")
                .with_context("task", "event_pump")
                .with_context("scanId", self.scan_id.to_string())
                .with_cause(error.to_string())
        })?;
        Ok(ScanSummary {
            scan_id: self.scan_id,
            batches_emitted: batches.batches_emitted,
            icons_resolved: batches.icons_resolved,
            events_applied,
            receiver_closed: batches.receiver_closed,
        })
    }
}

pub struct ScanHandle {
    pub scan_id: u64,
    /// Every event, in emission order, after it has been applied to the cache.
    pub events: mpsc::UnboundedReceiver<DiscoveryEvent>,
    pub completion: ScanCompletion,
}

impl ScanHandle {
    pub async fn wait(self) -> AppResult<ScanSummary> {
        self.completion.wait().await
    }
}

/// Session-scoped facade over discovery, the application cache and OS automation.
pub struct Dockyard {
    discovery: DiscoveryConfig,
    cache: Arc<DiscoveryCache>,
    icons: Arc<dyn IconSource>,
    automation: AutomationBridge,
    next_scan_id: AtomicU64,
    scan_support: Option<bool>,
}

impl Dockyard {
    pub fn new(discovery: DiscoveryConfig, automation: AutomationConfig) -> Self {
        Self {
            cache: Arc::new(DiscoveryCache::new(discovery.quick_action_limit)),
            icons: Arc::new(IconResolver::system()),
            automation: AutomationBridge::new(automation),
            next_scan_id: AtomicU64::new(0),
            scan_support: None,
            discovery,
        }
    }

    pub fn from_env() -> Self {
        Self::new(DiscoveryConfig::from_env(), AutomationConfig::default())
    }

    pub fn with_icon_source(mut self, icons: Arc<dyn IconSource>) -> Self {
        self.icons = icons;
        self
    }

    pub fn with_automation(mut self, automation: AutomationBridge) -> Self {
        self.automation = automation;
        self
    }

    /// Overrides the platform check for bundle scanning.
    pub fn with_scan_support(mut self, supported: bool) -> Self {
        self.scan_support = Some(supported);
        self
    }

    /// Starts a scan. The full list is already queued on `events` when this returns;
    /// icon batches follow from the background.
    pub async fn scan_applications(&self) -> ScanHandle {
        let scan_id = self.next_scan_id.fetch_add(1, Ordering::Relaxed) + 1;
        let apps = match self.scan_support {
            Some(true) => scan_roots(self.discovery.roots.clone()).await,
            Some(false) => Vec::new(),
            None => scan_applications(&self.discovery).await,
        };
        tracing::info!(event = "app_scan_started", scan_id, total_apps = apps.len());

        let (sender, mut receiver) = mpsc::channel(self.discovery.channel_capacity.max(1));
        let (outward, events) = mpsc::unbounded_channel();
        let cache = self.cache.clone();
        let pump = tokio::spawn(async move {
            let mut applied = 0usize;
            while let Some(event) = receiver.recv().await {
                cache.apply(&event);
                applied += 1;
                // The consumer may stop listening; the cache keeps receiving regardless.
                let _ = outward.send(event);
            }
            applied
        });

        let scheduler = IconBatchScheduler::new(self.icons.clone(), &self.discovery);
        let batches = scheduler.run(scan_id, apps, sender).await;
        ScanHandle {
            scan_id,
            events,
            completion: ScanCompletion {
                scan_id,
                batches,
                pump,
            },
        }
    }

    pub fn subscribe(&self, observer: Observer) -> Subscription {
        self.cache.subscribe(observer)
    }

    pub fn search(&self, term: &str) -> Vec<ApplicationDescriptor> {
        self.cache.search(term)
    }

    pub fn cache_stats(&self) -> CacheStatsDto {
        self.cache.stats()
    }

    pub fn snapshot(&self) -> Vec<ApplicationDescriptor> {
        self.cache.current_snapshot()
    }

    pub async fn launch_application(&self, path: &str) -> bool {
        let path = path.to_string();
        run_blocking("launch_application", move || {
            Ok(dockyard_launcher::launch_application(&path))
        })
        .await
        .unwrap_or(false)
    }

    pub async fn get_windows(&self) -> AppResult<WindowListDto> {
        self.automation.get_windows().await
    }

    pub async fn resize_window(&self, action: &str) -> AppResult<ActionResultDto> {
        self.automation.resize_window(action).await
    }

    pub async fn minimize_window(&self, title: &str) -> AppResult<ActionResultDto> {
        self.automation.minimize_window(title).await
    }

    pub async fn focus_window(&self, title: &str) -> AppResult<ActionResultDto> {
        self.automation.focus_window(title).await
    }

    pub async fn get_menu_items(&self) -> AppResult<MenuItemsDto> {
        self.automation.get_menu_items().await
    }

    pub async fn execute_menu_item(&self, path: &str) -> AppResult<ActionResultDto> {
        self.automation.execute_menu_item(path).await
    }
}

#[cfg(test)]
#[path = "../tests/service/service_tests.rs"]
mod tests;
