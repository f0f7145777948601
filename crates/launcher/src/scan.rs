use crate::config::DiscoveryConfig;
use crate::naming::{display_name_from_bundle, sort_key};
use dockyard_kernel::run_blocking;
use dockyard_protocol::models::ApplicationDescriptor;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const SCAN_WARNING_SAMPLE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanWarningKind {
    ReadDir,
    ReadDirEntry,
    FileType,
}

#[derive(Debug, Default, Clone)]
struct ScanWarningAggregator {
    read_dir_failed: u64,
    read_dir_entry_failed: u64,
    file_type_failed: u64,
    samples: Vec<String>,
}

impl ScanWarningAggregator {
    fn record(&mut self, kind: ScanWarningKind, path: &Path) {
        match kind {
            ScanWarningKind::ReadDir => {
                self.read_dir_failed = self.read_dir_failed.saturating_add(1)
            }
            ScanWarningKind::ReadDirEntry => {
                self.read_dir_entry_failed = self.read_dir_entry_failed.saturating_add(1)
            }
            ScanWarningKind::FileType => {
                self.file_type_failed = self.file_type_failed.saturating_add(1)
            }
        }
        if self.samples.len() < SCAN_WARNING_SAMPLE_LIMIT {
            self.samples.push(path.to_string_lossy().to_string());
        }
    }

    fn total_warnings(&self) -> u64 {
        self.read_dir_failed
            .saturating_add(self.read_dir_entry_failed)
            .saturating_add(self.file_type_failed)
    }

    fn log_summary(&self, root: &Path) {
        let total_warnings = self.total_warnings();
        if total_warnings == 0 {
            return;
        }

        tracing::info!(
            event = "bundle_scan_warning_summary",
            root = %root.to_string_lossy(),
            total_warnings,
            read_dir_failed = self.read_dir_failed,
            read_dir_entry_failed = self.read_dir_entry_failed,
            file_type_failed = self.file_type_failed,
            samples = self.samples.join(" | "),
        );
    }
}

/// Installed applications from the configured roots; empty off macOS.
pub async fn scan_applications(config: &DiscoveryConfig) -> Vec<ApplicationDescriptor> {
    if !dockyard_kernel::platform::automation_supported() {
        tracing::debug!(
            event = "bundle_scan_skipped",
            platform = std::env::consts::OS
        );
        return Vec::new();
    }
    scan_roots(config.roots.clone()).await
}

/// Scans every root concurrently, then merges in root order.
pub async fn scan_roots(roots: Vec<PathBuf>) -> Vec<ApplicationDescriptor> {
    let handles = roots
        .into_iter()
        .map(|root| {
            tokio::spawn(run_blocking("scan_bundle_root", move || {
                Ok(list_bundles(&root))
            }))
        })
        .collect::<Vec<_>>();

    let mut per_root = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(Ok(entries)) => per_root.push(entries),
            Ok(Err(error)) => {
                tracing::warn!(
                    event = "bundle_scan_root_failed",
                    error_code = error.code.as_str(),
                    error_detail = error.to_string()
                );
            }
            Err(error) => {
                tracing::warn!(
                    event = "bundle_scan_root_join_failed",
                    error_detail = error.to_string()
                );
            }
        }
    }

    let merged = merge_descriptors(per_root);
    tracing::debug!(event = "bundle_scan_completed", total_apps = merged.len());
    merged
}

/// Immediate `.app` children of `root`; a missing or unreadable root yields nothing.
pub(crate) fn list_bundles(root: &Path) -> Vec<ApplicationDescriptor> {
    if !root.exists() {
        return Vec::new();
    }

    let mut warnings = ScanWarningAggregator::default();
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_error) => {
            warnings.record(ScanWarningKind::ReadDir, root);
            warnings.log_summary(root);
            return Vec::new();
        }
    };

    let mut bundles = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_error) => {
                warnings.record(ScanWarningKind::ReadDirEntry, root);
                continue;
            }
        };
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') || !has_bundle_extension(&path) {
            continue;
        }

        let is_dir = match entry.file_type() {
            Ok(file_type) if file_type.is_symlink() => path.is_dir(),
            Ok(file_type) => file_type.is_dir(),
            Err(_error) => {
                warnings.record(ScanWarningKind::FileType, &path);
                continue;
            }
        };
        if !is_dir {
            continue;
        }

        bundles.push(ApplicationDescriptor::new(
            display_name_from_bundle(&file_name),
            path.to_string_lossy(),
        ));
    }

    warnings.log_summary(root);
    bundles
}

fn has_bundle_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|value| value.to_str())
        .is_some_and(|value| value.eq_ignore_ascii_case(crate::BUNDLE_EXTENSION))
}

/// First-seen path wins; result ordered by case-insensitive name, then path.
pub(crate) fn merge_descriptors(
    per_root: Vec<Vec<ApplicationDescriptor>>,
) -> Vec<ApplicationDescriptor> {
    let mut seen = HashSet::new();
    let mut merged = per_root
        .into_iter()
        .flatten()
        .filter(|descriptor| seen.insert(descriptor.path.clone()))
        .collect::<Vec<_>>();
    merged.sort_by_cached_key(|descriptor| (sort_key(&descriptor.name), descriptor.path.clone()));
    merged
}

#[cfg(test)]
#[path = "../tests/scan/scan_tests.rs"]
mod tests;
