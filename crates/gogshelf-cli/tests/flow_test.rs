//! Scan flow against a scripted fetcher and a recording event handler.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use gogshelf_cli::flow::{refresh_metadata, set_override};
use gogshelf_cli::ScanFlow;
use gogshelf_core::errors::{FlowError, RemoteError};
use gogshelf_core::events::types::{
    GamesAddedEvent, GamesRemovedEvent, ScanErrorsEvent, ScanFinishedEvent, ScanStartedEvent,
};
use gogshelf_core::traits::{FetchedMetadata, MetadataFetcher, MetadataRequest};
use gogshelf_core::{EventDispatcher, ShelfEventHandler};
use gogshelf_scanner::archive::ArchiveLister;
use gogshelf_scanner::{Discoverer, DiscoveryOptions};
use gogshelf_storage::{MetadataLayout, Override, OverrideStore, SnapshotStore};

#[derive(Debug, Clone, PartialEq)]
struct Call {
    key: String,
    search_name: String,
    product_id: Option<u64>,
}

/// Matches searches by name: `Some(title)` resolves, `None` finds nothing,
/// and any name starting with "FAIL" errors.
struct ScriptedFetcher {
    titles: Vec<(&'static str, Option<&'static str>)>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedFetcher {
    fn new(titles: Vec<(&'static str, Option<&'static str>)>) -> Arc<Self> {
        Arc::new(Self {
            titles,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl MetadataFetcher for ScriptedFetcher {
    fn fetch(&self, request: &MetadataRequest<'_>) -> Result<Option<FetchedMetadata>, RemoteError> {
        self.calls.lock().unwrap().push(Call {
            key: request.key.to_string(),
            search_name: request.search_name.to_string(),
            product_id: request.product_id,
        });
        if request.search_name.starts_with("FAIL") {
            return Err(RemoteError::Status {
                url: "https://api.gog.com/products/1".to_string(),
                status: 503,
            });
        }
        if let Some(id) = request.product_id {
            return Ok(Some(FetchedMetadata {
                product_id: id,
                title: Some(format!("Product {id}")),
            }));
        }
        let hit = self
            .titles
            .iter()
            .find(|(name, _)| *name == request.search_name)
            .map(|(_, title)| FetchedMetadata {
                product_id: 1,
                title: title.map(str::to_string),
            });
        Ok(hit)
    }
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
    added: Mutex<Vec<String>>,
    removed: Mutex<Vec<String>>,
    errors: Mutex<Vec<(Vec<String>, usize)>>,
    finished: Mutex<Option<ScanFinishedEvent>>,
}

impl ShelfEventHandler for Recorder {
    fn on_scan_started(&self, _event: &ScanStartedEvent) {
        self.events.lock().unwrap().push("started".into());
    }
    fn on_scan_finished(&self, event: &ScanFinishedEvent) {
        self.events.lock().unwrap().push("finished".into());
        *self.finished.lock().unwrap() = Some(event.clone());
    }
    fn on_games_added(&self, event: &GamesAddedEvent) {
        self.events.lock().unwrap().push("added".into());
        self.added.lock().unwrap().extend(event.titles.iter().cloned());
    }
    fn on_games_removed(&self, event: &GamesRemovedEvent) {
        self.events.lock().unwrap().push("removed".into());
        self.removed.lock().unwrap().extend(event.keys.iter().cloned());
    }
    fn on_scan_errors(&self, event: &ScanErrorsEvent) {
        self.events.lock().unwrap().push("errors".into());
        self.errors
            .lock()
            .unwrap()
            .push((event.details.clone(), event.total));
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    installers: std::path::PathBuf,
    layout: MetadataLayout,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let installers = dir.path().join("installers");
        fs::create_dir_all(&installers).unwrap();
        let layout = MetadataLayout::new(dir.path().join("metadata"));
        Self {
            _dir: dir,
            installers,
            layout,
        }
    }

    fn add_installer(&self, rel: &str) {
        let path = self.installers.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"MZ").unwrap();
    }

    fn remove_installer(&self, rel: &str) {
        fs::remove_file(self.installers.join(rel)).unwrap();
    }

    fn flow(&self, fetcher: Arc<ScriptedFetcher>, recorder: &Arc<Recorder>) -> ScanFlow {
        let mut events = EventDispatcher::new();
        events.register(recorder.clone());
        let discoverer = Discoverer::new(DiscoveryOptions::default(), ArchiveLister::unavailable());
        ScanFlow::new(&self.installers, self.layout.clone(), discoverer, fetcher, events)
    }

    fn overrides(&self) -> OverrideStore {
        OverrideStore::new(self.layout.clone())
    }

    fn snapshot_keys(&self) -> Vec<String> {
        SnapshotStore::new(&self.layout)
            .load()
            .known_keys
            .into_iter()
            .collect()
    }
}

fn write_override(layout: &MetadataLayout, key: &str, record: &Override) {
    OverrideStore::new(layout.clone()).save(key, record).unwrap();
}

#[test]
fn first_scan_fetches_every_new_game() {
    let fx = Fixture::new();
    fx.add_installer("Alpha/setup_alpha.exe");
    fx.add_installer("Beta/setup_beta.exe");
    let fetcher = ScriptedFetcher::new(vec![("Alpha", Some("Alpha Remastered"))]);
    let recorder = Arc::new(Recorder::default());

    let summary = fx.flow(fetcher.clone(), &recorder).run();

    assert_eq!(summary.added, 2);
    assert_eq!(summary.removed, 0);
    assert_eq!(summary.changed, 0);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.errors, vec!["No GOG match: Beta_setup_beta.exe (Beta)".to_string()]);

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].key, "Alpha_setup_alpha.exe");
    assert_eq!(calls[0].search_name, "Alpha");
    assert_eq!(calls[1].key, "Beta_setup_beta.exe");

    assert_eq!(
        fx.snapshot_keys(),
        vec!["Alpha_setup_alpha.exe".to_string(), "Beta_setup_beta.exe".to_string()]
    );

    let beta = fx.overrides().load("Beta_setup_beta.exe").unwrap();
    assert_eq!(beta.gog_search_name.as_deref(), Some("Beta"));
    assert_eq!(beta.path_type.as_deref(), Some("file"));
    assert_eq!(beta.display_name.as_deref(), Some("Beta"));
    assert!(beta.internal_path.is_none());
    assert!(beta
        .installer_path
        .as_deref()
        .unwrap()
        .ends_with("setup_beta.exe"));

    assert_eq!(*recorder.added.lock().unwrap(), vec!["Alpha Remastered".to_string()]);
    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec!["started", "added", "errors", "finished"]
    );
    let finished = recorder.finished.lock().unwrap().clone().unwrap();
    assert_eq!((finished.added, finished.removed, finished.total), (2, 0, 2));
}

#[test]
fn unchanged_tree_fetches_nothing() {
    let fx = Fixture::new();
    fx.add_installer("Alpha/setup_alpha.exe");
    let fetcher = ScriptedFetcher::new(vec![("Alpha", Some("Alpha"))]);
    let recorder = Arc::new(Recorder::default());
    let flow = fx.flow(fetcher.clone(), &recorder);

    flow.run();
    let second = flow.run();

    assert_eq!(second.added, 0);
    assert_eq!(second.removed, 0);
    assert_eq!(second.total, 1);
    assert!(second.errors.is_empty());
    assert_eq!(fetcher.calls().len(), 1);
}

#[test]
fn removed_installer_is_reported() {
    let fx = Fixture::new();
    fx.add_installer("Alpha/setup_alpha.exe");
    fx.add_installer("Beta/setup_beta.exe");
    let fetcher = ScriptedFetcher::new(vec![("Alpha", Some("Alpha")), ("Beta", Some("Beta"))]);
    let recorder = Arc::new(Recorder::default());
    let flow = fx.flow(fetcher, &recorder);
    flow.run();

    fx.remove_installer("Beta/setup_beta.exe");
    let summary = flow.run();

    assert_eq!(summary.added, 0);
    assert_eq!(summary.removed, 1);
    assert_eq!(summary.total, 1);
    assert_eq!(*recorder.removed.lock().unwrap(), vec!["Beta_setup_beta.exe".to_string()]);
    assert_eq!(fx.snapshot_keys(), vec!["Alpha_setup_alpha.exe".to_string()]);
}

#[test]
fn failed_fetch_still_saves_snapshot_and_override() {
    let fx = Fixture::new();
    fx.add_installer("FAIL Game/setup_fail.exe");
    let fetcher = ScriptedFetcher::new(vec![]);
    let recorder = Arc::new(Recorder::default());

    let summary = fx.flow(fetcher, &recorder).run();

    assert_eq!(summary.added, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(
        summary.errors[0],
        "FAIL_Game_setup_fail.exe: HTTP 503 from https://api.gog.com/products/1"
    );
    assert_eq!(fx.snapshot_keys(), vec!["FAIL_Game_setup_fail.exe".to_string()]);

    let record = fx.overrides().load("FAIL_Game_setup_fail.exe").unwrap();
    assert_eq!(record.gog_search_name.as_deref(), Some("FAIL Game"));

    let errors = recorder.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].1, 1);
    assert!(recorder.added.lock().unwrap().is_empty());
}

#[test]
fn stored_overrides_drive_the_fetch_and_survive() {
    let fx = Fixture::new();
    fx.add_installer("witcher3/setup_witcher3.exe");
    let key = "witcher3_setup_witcher3.exe";
    let mut stored = Override {
        gog_search_name: Some("The Witcher 3".to_string()),
        product_id: Some(1207664643),
        ..Override::default()
    };
    stored
        .extra
        .insert("note".to_string(), serde_json::json!("keep me"));
    write_override(&fx.layout, key, &stored);

    let fetcher = ScriptedFetcher::new(vec![]);
    let recorder = Arc::new(Recorder::default());
    let summary = fx.flow(fetcher.clone(), &recorder).run();

    assert!(summary.errors.is_empty());
    assert_eq!(
        fetcher.calls(),
        vec![Call {
            key: key.to_string(),
            search_name: "The Witcher 3".to_string(),
            product_id: Some(1207664643),
        }]
    );
    assert_eq!(
        *recorder.added.lock().unwrap(),
        vec!["Product 1207664643".to_string()]
    );

    let record = fx.overrides().load(key).unwrap();
    assert_eq!(record.product_id, Some(1207664643));
    assert_eq!(record.gog_search_name.as_deref(), Some("The Witcher 3"));
    assert_eq!(record.display_name.as_deref(), Some("witcher3"));
    assert_eq!(record.extra.get("note"), Some(&serde_json::json!("keep me")));
}

#[test]
fn blank_title_falls_back_to_display_name() {
    let fx = Fixture::new();
    fx.add_installer("Gamma/setup_gamma.exe");
    let fetcher = ScriptedFetcher::new(vec![("Gamma", None)]);
    let recorder = Arc::new(Recorder::default());

    fx.flow(fetcher, &recorder).run();

    assert_eq!(*recorder.added.lock().unwrap(), vec!["Gamma".to_string()]);
}

#[test]
fn missing_installer_root_gives_empty_scan() {
    let fx = Fixture::new();
    fx.add_installer("Alpha/setup_alpha.exe");
    let fetcher = ScriptedFetcher::new(vec![("Alpha", Some("Alpha"))]);
    let recorder = Arc::new(Recorder::default());
    fx.flow(fetcher.clone(), &recorder).run();

    fs::remove_dir_all(&fx.installers).unwrap();
    let summary = fx.flow(fetcher, &recorder).run();

    assert_eq!(summary.total, 0);
    assert_eq!(summary.removed, 1);
    assert!(fx.snapshot_keys().is_empty());
}

#[test]
fn refresh_uses_stored_record() {
    let fx = Fixture::new();
    let fetcher = ScriptedFetcher::new(vec![("Delta", Some("Delta Deluxe"))]);

    let err = refresh_metadata(&fx.layout, fetcher.as_ref(), "nothing_here").unwrap_err();
    assert!(matches!(err, FlowError::InvalidArgument(_)));

    write_override(
        &fx.layout,
        "delta",
        &Override {
            display_name: Some("Delta".to_string()),
            ..Override::default()
        },
    );
    let fetched = refresh_metadata(&fx.layout, fetcher.as_ref(), "delta").unwrap();
    assert_eq!(fetched.title.as_deref(), Some("Delta Deluxe"));

    set_override(&fx.layout, "delta", Some("Unknown Thing".to_string()), None).unwrap();
    let err = refresh_metadata(&fx.layout, fetcher.as_ref(), "delta").unwrap_err();
    assert!(matches!(err, FlowError::NotFound(_)));
}

#[test]
fn set_override_merges_fields() {
    let fx = Fixture::new();
    set_override(&fx.layout, "k", Some("  Name  ".to_string()), Some(7)).unwrap();
    let record = set_override(&fx.layout, "k", None, None).unwrap();
    assert_eq!(record.gog_search_name.as_deref(), Some("Name"));
    assert_eq!(record.product_id, Some(7));

    let record = set_override(&fx.layout, "k", Some("   ".to_string()), None).unwrap();
    assert!(record.gog_search_name.is_none());
    assert_eq!(record.product_id, Some(7));
    assert!(Path::new(&fx.layout.override_path("k")).is_file());
}
