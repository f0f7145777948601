use crate::config::DiscoveryConfig;
use crate::icon::IconResolver;
use dockyard_kernel::run_blocking;
use dockyard_protocol::models::ApplicationDescriptor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// Whole scan result, icons absent. Sent once per scan, before any batch.
    FullList {
        scan_id: u64,
        apps: Vec<ApplicationDescriptor>,
    },
    /// Only the members of one batch, icons resolved where possible.
    IconBatch {
        scan_id: u64,
        apps: Vec<ApplicationDescriptor>,
    },
}

impl DiscoveryEvent {
    pub fn scan_id(&self) -> u64 {
        match self {
            Self::FullList { scan_id, .. } | Self::IconBatch { scan_id, .. } => *scan_id,
        }
    }

    pub fn apps(&self) -> &[ApplicationDescriptor] {
        match self {
            Self::FullList { apps, .. } | Self::IconBatch { apps, .. } => apps.as_slice(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::FullList { .. } => "full_list",
            Self::IconBatch { .. } => "icon_batch",
        }
    }
}

/// Blocking icon lookup for one bundle path.
pub trait IconSource: Send + Sync + 'static {
    fn resolve_icon(&self, app_path: &Path) -> Option<String>;
}

impl IconSource for IconResolver {
    fn resolve_icon(&self, app_path: &Path) -> Option<String> {
        self.resolve(app_path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchRunSummary {
    pub scan_id: u64,
    pub batches_emitted: usize,
    pub icons_resolved: usize,
    pub receiver_closed: bool,
}

#[derive(Clone)]
pub struct IconBatchScheduler {
    icons: Arc<dyn IconSource>,
    batch_size: usize,
    initial_delay: Duration,
    batch_delay: Duration,
}

impl IconBatchScheduler {
    pub fn new(icons: Arc<dyn IconSource>, config: &DiscoveryConfig) -> Self {
        Self {
            icons,
            batch_size: config.batch_size.max(1),
            initial_delay: config.initial_delay,
            batch_delay: config.batch_delay,
        }
    }

    /// Sends the full list, then streams icon batches from a background task.
    ///
    /// The returned handle resolves once the last batch is sent or the receiver is gone.
    pub async fn run(
        &self,
        scan_id: u64,
        apps: Vec<ApplicationDescriptor>,
        sender: mpsc::Sender<DiscoveryEvent>,
    ) -> JoinHandle<BatchRunSummary> {
        let full_list = DiscoveryEvent::FullList {
            scan_id,
            apps: apps.clone(),
        };
        if sender.send(full_list).await.is_err() {
            tracing::warn!(event = "discovery_receiver_closed", scan_id, stage = "full_list");
            return tokio::spawn(async move {
                BatchRunSummary {
                    scan_id,
                    receiver_closed: true,
                    ..BatchRunSummary::default()
                }
            });
        }

        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.stream_batches(scan_id, apps, sender).await })
    }

    async fn stream_batches(
        self,
        scan_id: u64,
        apps: Vec<ApplicationDescriptor>,
        sender: mpsc::Sender<DiscoveryEvent>,
    ) -> BatchRunSummary {
        let mut summary = BatchRunSummary {
            scan_id,
            ..BatchRunSummary::default()
        };
        if apps.is_empty() {
            return summary;
        }
        if !self.initial_delay.is_zero() {
            tokio::time::sleep(self.initial_delay).await;
        }

        let batches = apps
            .chunks(self.batch_size)
            .map(<[ApplicationDescriptor]>::to_vec)
            .collect::<Vec<_>>();
        let total_batches = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            let members = resolve_batch(self.icons.clone(), batch).await;
            let resolved = members.iter().filter(|member| member.has_icon()).count();
            summary.icons_resolved += resolved;

            let event = DiscoveryEvent::IconBatch {
                scan_id,
                apps: members,
            };
            if sender.send(event).await.is_err() {
                tracing::warn!(
                    event = "discovery_receiver_closed",
                    scan_id,
                    stage = "icon_batch",
                    batch_index = index
                );
                summary.receiver_closed = true;
                break;
            }
            summary.batches_emitted += 1;
            tracing::debug!(
                event = "icon_batch_emitted",
                scan_id,
                batch_index = index,
                total_batches,
                icons_resolved = resolved
            );

            if index + 1 < total_batches && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        tracing::info!(
            event = "icon_batches_completed",
            scan_id,
            batches_emitted = summary.batches_emitted,
            icons_resolved = summary.icons_resolved,
            receiver_closed = summary.receiver_closed
        );
        summary
    }
}

/// Resolves every member concurrently; a failed member keeps an absent icon.
async fn resolve_batch(
    icons: Arc<dyn IconSource>,
    batch: Vec<ApplicationDescriptor>,
) -> Vec<ApplicationDescriptor> {
    let handles = batch
        .iter()
        .map(|member| {
            let icons = icons.clone();
            let path = member.path.clone();
            tokio::spawn(run_blocking("resolve_app_icon", move || {
                Ok(icons.resolve_icon(Path::new(&path)))
            }))
        })
        .collect::<Vec<_>>();

    let mut members = Vec::with_capacity(batch.len());
    for (member, handle) in batch.into_iter().zip(handles) {
        let icon = match handle.await {
            Ok(Ok(icon)) => icon,
            Ok(Err(error)) => {
                tracing::debug!(
                    event = "app_icon_resolve_failed",
                    app_path = member.path.as_str(),
                    error_code = error.code.as_str()
                );
                None
            }
            Err(error) => {
                tracing::debug!(
                    event = "app_icon_resolve_join_failed",
                    app_path = member.path.as_str(),
                    error_detail = error.to_string()
                );
                None
            }
        };
        members.push(member.with_icon(icon));
    }
    members
}

#[cfg(test)]
#[path = "../tests/scheduler/scheduler_tests.rs"]
mod tests;
