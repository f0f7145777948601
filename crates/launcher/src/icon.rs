use crate::container::{PNG_DATA_URL_PREFIX, decode_icon_container};
use crate::plist;
use base64::Engine as _;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, UNIX_EPOCH};
use walkdir::WalkDir;

const THUMBNAIL_SIZE: &str = "256";
const THUMBNAIL_TIMEOUT: Duration = Duration::from_secs(5);

/// Generic OS-level icon for any path, used once the bundle's own container fails.
pub trait FileIconProvider: Send + Sync {
    fn file_icon(&self, path: &Path) -> Option<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoFileIconProvider;

impl FileIconProvider for NoFileIconProvider {
    fn file_icon(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// Quick Look thumbnails through `qlmanage`; yields nothing off macOS.
#[derive(Debug, Clone)]
pub struct SystemFileIconProvider {
    timeout: Duration,
}

impl Default for SystemFileIconProvider {
    fn default() -> Self {
        Self {
            timeout: THUMBNAIL_TIMEOUT,
        }
    }
}

impl FileIconProvider for SystemFileIconProvider {
    fn file_icon(&self, path: &Path) -> Option<String> {
        if !dockyard_kernel::platform::automation_supported() {
            return None;
        }
        let output_dir = thumbnail_output_dir();
        let rendered = self.render_thumbnail(path, &output_dir);
        let _ = fs::remove_dir_all(&output_dir);
        rendered
    }
}

impl SystemFileIconProvider {
    fn render_thumbnail(&self, path: &Path, output_dir: &Path) -> Option<String> {
        fs::create_dir_all(output_dir).ok()?;
        let mut command = tokio::process::Command::new("qlmanage");
        command
            .arg("-t")
            .arg("-s")
            .arg(THUMBNAIL_SIZE)
            .arg("-o")
            .arg(output_dir)
            .arg(path);
        let output = match dockyard_kernel::run_with_timeout_blocking(command, self.timeout, "qlmanage") {
            Ok(output) => output,
            Err(error) => {
                tracing::debug!(
                    event = "file_icon_thumbnail_failed",
                    path = %path.to_string_lossy(),
                    error_code = error.code.as_str()
                );
                return None;
            }
        };
        if !output.status.success() {
            tracing::debug!(
                event = "file_icon_thumbnail_failed",
                path = %path.to_string_lossy(),
                status = format!("{}", output.status)
            );
            return None;
        }

        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let bytes = fs::read(output_dir.join(format!("{file_name}.png"))).ok()?;
        if bytes.is_empty() {
            return None;
        }
        Some(format!(
            "{PNG_DATA_URL_PREFIX}{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        ))
    }
}

fn thumbnail_output_dir() -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let sequence = NEXT.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "dockyard-thumbnail-{}-{sequence}",
        std::process::id()
    ))
}

/// Per-application icon fallback chain. Never errors: a miss is `None`.
pub struct IconResolver {
    file_icons: Arc<dyn FileIconProvider>,
    memo: Mutex<HashMap<String, String>>,
}

impl IconResolver {
    pub fn new(file_icons: Arc<dyn FileIconProvider>) -> Self {
        Self {
            file_icons,
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemFileIconProvider::default()))
    }

    pub fn memoized_len(&self) -> usize {
        self.memo.lock().map(|memo| memo.len()).unwrap_or(0)
    }

    /// Blocking: reads the descriptor, the container and may spawn `qlmanage`.
    pub fn resolve(&self, app_path: &Path) -> Option<String> {
        if !is_bundle(app_path) {
            return None;
        }

        if let Some(container) = locate_bundle_container(app_path) {
            if let Some(icon) = self.decode_memoized(&container) {
                return Some(icon);
            }
        } else {
            tracing::debug!(
                event = "icon_container_missing",
                app_path = %app_path.to_string_lossy()
            );
        }

        self.file_icons
            .file_icon(app_path)
            .filter(|icon| !icon.is_empty())
    }

    fn decode_memoized(&self, container: &Path) -> Option<String> {
        let signature = container_signature(container);
        if let Ok(memo) = self.memo.lock()
            && let Some(hit) = memo.get(&signature)
        {
            return Some(hit.clone());
        }

        let decoded = fs::read(container)
            .map_err(dockyard_protocol::AppError::from)
            .and_then(|bytes| decode_icon_container(&bytes));
        match decoded {
            Ok(icon) => {
                if let Ok(mut memo) = self.memo.lock() {
                    memo.insert(signature, icon.clone());
                }
                Some(icon)
            }
            Err(error) => {
                tracing::debug!(
                    event = "icon_container_decode_failed",
                    container = %container.to_string_lossy(),
                    error_code = error.code.as_str(),
                    reason = error.context_value("reason").unwrap_or_default()
                );
                None
            }
        }
    }
}

fn is_bundle(path: &Path) -> bool {
    path.exists()
        && path
            .extension()
            .and_then(|value| value.to_str())
            .is_some_and(|value| value.eq_ignore_ascii_case(crate::BUNDLE_EXTENSION))
}

/// Descriptor reference, else `<bundle base name>.icns`, resolved inside `Contents/Resources`.
pub(crate) fn locate_bundle_container(app_path: &Path) -> Option<PathBuf> {
    let resources = app_path.join("Contents").join("Resources");
    if !resources.is_dir() {
        return None;
    }

    let referenced = plist::read_bundle_descriptor(app_path)
        .ok()
        .and_then(|descriptor| plist::icon_file_name(&descriptor));
    let wanted = referenced.or_else(|| {
        app_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(plist::normalize_container_name)
    })?;
    locate_container(&resources, &wanted)
}

fn locate_container(resources: &Path, wanted: &str) -> Option<PathBuf> {
    let exact = resources.join(wanted);
    if exact.is_file() {
        return Some(exact);
    }

    let candidates = collect_containers(resources);
    candidates
        .iter()
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.eq_ignore_ascii_case(wanted))
        })
        .or_else(|| candidates.first())
        .cloned()
}

fn collect_containers(resources: &Path) -> Vec<PathBuf> {
    let mut files = WalkDir::new(resources)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|value| value.to_str())
                .is_some_and(|value| value.eq_ignore_ascii_case(crate::CONTAINER_EXTENSION))
        })
        .collect::<Vec<_>>();
    files.sort_by_cached_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    files
}

fn container_signature(path: &Path) -> String {
    match fs::metadata(path) {
        Ok(meta) => {
            let modified_nanos = meta
                .modified()
                .ok()
                .and_then(|value| value.duration_since(UNIX_EPOCH).ok())
                .map(|duration| duration.as_nanos())
                .unwrap_or(0);
            format!("{}|{}|{modified_nanos}", path.to_string_lossy(), meta.len())
        }
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
#[path = "../tests/icon/icon_tests.rs"]
mod tests;
