//! Directory watching and re-segmentation on file change
//!
//! A notify watcher feeds raw filesystem events into a channel; a debounce
//! loop batches them and re-segments qualifying files. Files whose content
//! hash is unchanged since the last run are skipped, so editors that fire
//! several events per save cost one segmentation at most. A parse failure
//! in one file is logged and never aborts the watch loop.

use crate::config::WatchConfig;
use crate::error::{SegmenterError, WatchError};
use crate::segmenter::{Segmentation, Segmenter};
use ignore::WalkBuilder;
use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

pub struct FileWatcher {
    config: WatchConfig,
    /// Content hash of each file as of its last successful segmentation
    hashes: HashMap<PathBuf, String>,
    segmenter: Segmenter,
}

impl FileWatcher {
    pub fn new(config: WatchConfig) -> Result<Self, SegmenterError> {
        Ok(Self {
            config,
            hashes: HashMap::new(),
            segmenter: Segmenter::new()?,
        })
    }

    /// Watch the configured root until the surrounding task is cancelled
    ///
    /// Performs one full scan of existing files first, then re-segments on
    /// every debounced create/modify event for a qualifying file.
    pub async fn run(mut self) -> Result<(), SegmenterError> {
        if !self.config.root.is_dir() {
            return Err(
                WatchError::RootNotFound(self.config.root.display().to_string()).into(),
            );
        }

        self.scan_existing();

        let (event_tx, mut event_rx) = mpsc::channel::<notify::Result<Event>>(1024);
        let mut watcher = RecommendedWatcher::new(
            move |result| {
                let _ = event_tx.blocking_send(result);
            },
            NotifyConfig::default(),
        )
        .map_err(|e| WatchError::InitFailed(e.to_string()))?;

        watcher
            .watch(&self.config.root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::WatchFailed {
                path: self.config.root.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!("Monitoring started on: {}", self.config.root.display());

        let debounce = Duration::from_millis(self.config.debounce_ms);
        let mut pending: HashSet<PathBuf> = HashSet::new();
        let mut deadline: Option<Instant> = None;

        loop {
            let next_deadline = deadline;

            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        return Err(WatchError::ChannelClosed.into());
                    };
                    match event {
                        Ok(event) => {
                            if !is_qualifying_event(&event.kind) {
                                continue;
                            }
                            for path in event.paths {
                                if has_watched_extension(&path, &self.config.extensions) {
                                    pending.insert(path);
                                    deadline = Some(Instant::now() + debounce);
                                }
                            }
                        }
                        Err(e) => tracing::warn!("Watcher error: {}", e),
                    }
                }
                () = async {
                    if let Some(at) = next_deadline {
                        time::sleep_until(at).await;
                    }
                }, if next_deadline.is_some() => {
                    deadline = None;
                    let mut paths: Vec<PathBuf> = pending.drain().collect();
                    paths.sort();
                    for path in paths {
                        tracing::info!("File detected: {}", path.display());
                        self.process(&path);
                    }
                }
            }
        }
    }

    /// Segment every qualifying file already under the root, priming the
    /// hash state so unchanged files are not re-segmented on first event
    fn scan_existing(&mut self) {
        let walker = WalkBuilder::new(&self.config.root)
            .standard_filters(true)
            .hidden(false)
            .require_git(false)
            .build();

        let mut count = 0;
        for entry in walker {
            let Ok(entry) = entry else {
                continue;
            };
            let path = entry.path();
            if path.is_dir() || !has_watched_extension(path, &self.config.extensions) {
                continue;
            }
            self.process(path);
            count += 1;
        }

        tracing::info!("Initial scan processed {} files", count);
    }

    fn process(&mut self, path: &Path) {
        match self.segment_changed(path) {
            Ok(Some(segmentation)) => {
                tracing::info!(
                    "Segmented {} into {} chunks",
                    path.display(),
                    segmentation.chunks.len()
                );
                for diagnostic in &segmentation.diagnostics {
                    tracing::warn!("{}: {}", path.display(), diagnostic);
                }
            }
            Ok(None) => tracing::debug!("Skipping unchanged file: {}", path.display()),
            Err(e) => tracing::warn!("Failed to segment {}: {}", path.display(), e),
        }
    }

    /// Re-segment a file, returning None when its content hash matches the
    /// last successful run
    fn segment_changed(&mut self, path: &Path) -> Result<Option<Segmentation>, SegmenterError> {
        let metadata = std::fs::metadata(path)?;
        if metadata.len() > self.config.max_file_size as u64 {
            return Err(SegmenterError::other(format!(
                "File size exceeds maximum: {} > {}",
                metadata.len(),
                self.config.max_file_size
            )));
        }

        let source = std::fs::read_to_string(path)?;
        let hash = content_hash(&source);
        if self.hashes.get(path).is_some_and(|previous| previous == &hash) {
            return Ok(None);
        }

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown");
        let segmentation = self.segmenter.segment(&source, file_name)?;

        self.hashes.insert(path.to_path_buf(), hash);
        Ok(Some(segmentation))
    }
}

fn is_qualifying_event(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

fn has_watched_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|watched| watched.eq_ignore_ascii_case(ext))
        })
}

fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    fn py_extensions() -> Vec<String> {
        vec!["py".to_string()]
    }

    #[test]
    fn test_has_watched_extension() {
        let extensions = py_extensions();
        assert!(has_watched_extension(Path::new("src/app.py"), &extensions));
        assert!(has_watched_extension(Path::new("src/APP.PY"), &extensions));
        assert!(!has_watched_extension(Path::new("src/app.rs"), &extensions));
        assert!(!has_watched_extension(Path::new("src/app"), &extensions));
        assert!(!has_watched_extension(Path::new("py"), &extensions));
    }

    #[test]
    fn test_is_qualifying_event() {
        assert!(is_qualifying_event(&EventKind::Create(CreateKind::File)));
        assert!(is_qualifying_event(&EventKind::Modify(ModifyKind::Any)));
        assert!(!is_qualifying_event(&EventKind::Remove(RemoveKind::File)));
        assert!(!is_qualifying_event(&EventKind::Any));
    }

    #[test]
    fn test_content_hash_is_stable() {
        assert_eq!(content_hash("x = 1\n"), content_hash("x = 1\n"));
        assert_ne!(content_hash("x = 1\n"), content_hash("x = 2\n"));
    }

    #[test]
    fn test_segment_changed_deduplicates_by_hash() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.py");
        std::fs::write(&path, "def f():\n    return 1\n").unwrap();

        let mut watcher = FileWatcher::new(WatchConfig::default()).unwrap();

        let first = watcher.segment_changed(&path).unwrap();
        assert!(first.is_some());

        // Same content again: skipped
        let second = watcher.segment_changed(&path).unwrap();
        assert!(second.is_none());

        // Changed content: re-segmented
        std::fs::write(&path, "def g():\n    return 2\n").unwrap();
        let third = watcher.segment_changed(&path).unwrap();
        assert_eq!(third.unwrap().chunks[0].name, "g");
    }

    #[test]
    fn test_segment_changed_rejects_oversized_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("big.py");
        std::fs::write(&path, "x = 1\n".repeat(100)).unwrap();

        let mut config = WatchConfig::default();
        config.max_file_size = 16;
        let mut watcher = FileWatcher::new(config).unwrap();

        assert!(watcher.segment_changed(&path).is_err());
    }

    #[test]
    fn test_parse_failure_does_not_poison_hash_state() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.py");
        std::fs::write(&path, "def broken(:\n").unwrap();

        let mut watcher = FileWatcher::new(WatchConfig::default()).unwrap();
        assert!(watcher.segment_changed(&path).is_err());

        // After the file is fixed it segments normally
        std::fs::write(&path, "def fixed():\n    return 1\n").unwrap();
        let result = watcher.segment_changed(&path).unwrap();
        assert_eq!(result.unwrap().chunks[0].name, "fixed");
    }
}
