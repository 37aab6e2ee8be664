//! Scan Orchestrator: one full scan from discovery to notification.
//!
//! A scan never fails as a whole. Fetch and storage problems for a single
//! game are collected as error lines in the returned [`ScanSummary`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use gogshelf_core::config::ShelfConfig;
use gogshelf_core::constants::NOTIFY_ERROR_LINES;
use gogshelf_core::errors::FlowError;
use gogshelf_core::events::types::{
    GamesAddedEvent, GamesRemovedEvent, ScanErrorsEvent, ScanFinishedEvent, ScanStartedEvent,
};
use gogshelf_core::traits::{FetchedMetadata, MetadataFetcher, MetadataRequest};
use gogshelf_core::EventDispatcher;
use gogshelf_remote::{DiscordNotifier, GogClient, GogClientConfig};
use gogshelf_scanner::archive::ArchiveLister;
use gogshelf_scanner::{diff_keys, ArtifactEntry, Discoverer, DiscoveryOptions};
use gogshelf_storage::{MetadataLayout, Override, OverrideStore, SnapshotStore};
use serde::Serialize;
use tracing::{info, warn};

/// Result of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub added: usize,
    pub removed: usize,
    /// Always 0: same-key content changes are not tracked.
    pub changed: usize,
    pub total: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

pub struct ScanFlow {
    installer_root: PathBuf,
    layout: MetadataLayout,
    discoverer: Discoverer,
    fetcher: Arc<dyn MetadataFetcher>,
    events: EventDispatcher,
    fetch_delay: Duration,
}

impl ScanFlow {
    pub fn new(
        installer_root: impl Into<PathBuf>,
        layout: MetadataLayout,
        discoverer: Discoverer,
        fetcher: Arc<dyn MetadataFetcher>,
        events: EventDispatcher,
    ) -> Self {
        Self {
            installer_root: installer_root.into(),
            layout,
            discoverer,
            fetcher,
            events,
            fetch_delay: Duration::ZERO,
        }
    }

    /// Pause between two metadata fetches of the same scan.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Wire up the GOG client, the archive backend and, when a webhook is
    /// configured, Discord notifications.
    pub fn from_config(config: &ShelfConfig) -> Result<Self, FlowError> {
        let installer_root = config.require_installer_root()?;
        let layout = MetadataLayout::new(config.require_metadata_root()?);

        let discoverer = Discoverer::new(
            DiscoveryOptions::from_config(&config.scan),
            ArchiveLister::detect(),
        );

        let client = GogClient::new(GogClientConfig::from_remote(&config.remote))?;

        let mut events = EventDispatcher::new();
        if let Some(notifier) = DiscordNotifier::from_config(&config.notify) {
            events.register(Arc::new(notifier));
        }

        Ok(Self::new(installer_root, layout, discoverer, Arc::new(client), events)
            .with_fetch_delay(config.remote.effective_fetch_delay()))
    }

    pub fn installer_root(&self) -> &Path {
        &self.installer_root
    }

    pub fn layout(&self) -> &MetadataLayout {
        &self.layout
    }

    pub fn discoverer(&self) -> &Discoverer {
        &self.discoverer
    }

    fn overrides(&self) -> OverrideStore {
        OverrideStore::new(self.layout.clone())
    }

    /// Run one full scan.
    pub fn run(&self) -> ScanSummary {
        let start = Instant::now();
        self.events.emit_scan_started(&ScanStartedEvent {
            installer_root: self.installer_root.clone(),
        });

        let mut errors: Vec<String> = Vec::new();
        if let Err(e) = std::fs::create_dir_all(self.layout.root()) {
            warn!(root = %self.layout.root().display(), error = %e, "cannot create metadata root");
        }

        let snapshots = SnapshotStore::new(&self.layout);
        let previous = snapshots.load();

        let artifacts = self.discoverer.discover(&self.installer_root);
        let current = artifacts.keys();
        let diff = diff_keys(&current, &previous.known_keys);

        let overrides = self.overrides();
        let mut new_titles: Vec<String> = Vec::new();

        for (i, key) in diff.added.iter().enumerate() {
            let Some(entry) = artifacts.get(key) else {
                continue;
            };
            if i > 0 && !self.fetch_delay.is_zero() {
                std::thread::sleep(self.fetch_delay);
            }

            let search_name = overrides.search_name(key, &entry.display_name);
            match self.fetch_one(&overrides, entry, &search_name) {
                Ok(Some(meta)) => {
                    new_titles.push(
                        meta.title
                            .filter(|t| !t.trim().is_empty())
                            .unwrap_or_else(|| entry.display_name.clone()),
                    );
                }
                Ok(None) => errors.push(format!("No GOG match: {key} ({search_name})")),
                Err(e) => {
                    warn!(key = %key, error = %e, "metadata fetch failed");
                    errors.push(format!("{key}: {e}"));
                }
            }

            let saved = overrides.update(key, |record| {
                record.gog_search_name = Some(search_name.clone());
                record.record_installer(entry);
            });
            if let Err(e) = saved {
                errors.push(format!("{key}: {e}"));
            }
        }

        for entry in artifacts.iter() {
            let saved = overrides.update(&entry.key, |record| refresh_installer(record, entry));
            if let Err(e) = saved {
                warn!(key = %entry.key, error = %e, "cannot update override record");
                errors.push(format!("{}: {e}", entry.key));
            }
        }

        if let Err(e) = snapshots.save(&current, Utc::now()) {
            warn!(error = %e, "cannot save scan snapshot");
            errors.push(format!("snapshot: {e}"));
        }

        if !new_titles.is_empty() {
            self.events.emit_games_added(&GamesAddedEvent { titles: new_titles });
        }
        if !diff.removed.is_empty() {
            self.events.emit_games_removed(&GamesRemovedEvent {
                keys: diff.removed.iter().cloned().collect(),
            });
        }
        if !errors.is_empty() {
            self.events.emit_scan_errors(&ScanErrorsEvent {
                message: "Scan had errors".to_string(),
                details: errors.iter().take(NOTIFY_ERROR_LINES).cloned().collect(),
                total: errors.len(),
            });
        }

        let summary = ScanSummary {
            added: diff.added.len(),
            removed: diff.removed.len(),
            changed: 0,
            total: current.len(),
            errors,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        self.events.emit_scan_finished(&ScanFinishedEvent {
            added: summary.added,
            removed: summary.removed,
            changed: summary.changed,
            total: summary.total,
            duration_ms: summary.duration_ms,
        });

        info!(
            added = summary.added,
            removed = summary.removed,
            total = summary.total,
            errors = summary.errors.len(),
            duration_ms = summary.duration_ms,
            "scan finished"
        );
        summary
    }

    fn fetch_one(
        &self,
        overrides: &OverrideStore,
        entry: &ArtifactEntry,
        search_name: &str,
    ) -> Result<Option<FetchedMetadata>, gogshelf_core::errors::RemoteError> {
        let target_dir = overrides.game_dir(&entry.key);
        self.fetcher.fetch(&MetadataRequest {
            key: &entry.key,
            search_name,
            product_id: overrides.product_id(&entry.key),
            target_dir: &target_dir,
        })
    }

    /// Re-fetch metadata for one key using its stored overrides.
    pub fn refresh(&self, key: &str) -> Result<FetchedMetadata, FlowError> {
        refresh_metadata(&self.layout, self.fetcher.as_ref(), key)
    }
}

/// Fetch metadata for a catalogued key again. The search uses the stored
/// override name, falling back to the cached display name; a stored
/// product id skips the search.
pub fn refresh_metadata(
    layout: &MetadataLayout,
    fetcher: &dyn MetadataFetcher,
    key: &str,
) -> Result<FetchedMetadata, FlowError> {
    let overrides = OverrideStore::new(layout.clone());
    let record = overrides.load(key).unwrap_or_default();
    let search_name = record
        .search_name()
        .or(record.display_name.as_deref())
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if search_name.is_empty() && record.product_id.is_none() {
        return Err(FlowError::InvalidArgument(format!(
            "{key}: no search name or product id stored"
        )));
    }

    let target_dir = overrides.game_dir(key);
    let fetched = fetcher.fetch(&MetadataRequest {
        key,
        search_name: &search_name,
        product_id: record.product_id,
        target_dir: &target_dir,
    })?;
    fetched.ok_or_else(|| FlowError::NotFound(format!("No GOG match: {key} ({search_name})")))
}

/// Store a search name and/or product id override. A blank name clears
/// the stored name; `None` leaves a field as it is.
pub fn set_override(
    layout: &MetadataLayout,
    key: &str,
    search_name: Option<String>,
    product_id: Option<u64>,
) -> Result<Override, FlowError> {
    let record = OverrideStore::new(layout.clone()).update(key, |record| {
        if let Some(name) = search_name {
            let name = name.trim();
            record.gog_search_name = (!name.is_empty()).then(|| name.to_string());
        }
        if product_id.is_some() {
            record.product_id = product_id;
        }
    })?;
    Ok(record)
}

fn refresh_installer(record: &mut Override, entry: &ArtifactEntry) {
    record.record_installer(entry);
    if record.search_name().is_none() {
        record.gog_search_name = Some(entry.display_name.clone());
    }
}

impl std::fmt::Debug for ScanFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanFlow")
            .field("installer_root", &self.installer_root)
            .field("layout", &self.layout)
            .field("discoverer", &self.discoverer)
            .field("events", &self.events)
            .field("fetch_delay", &self.fetch_delay)
            .finish_non_exhaustive()
    }
}
