//! Reconciliation scenarios against an in-memory provider

use async_trait::async_trait;
use modsync::artifact::{ArtifactStore, DesiredSet, Filename, Identifier};
use modsync::cache::{Cache, CacheStore};
use modsync::reconcile::{ReconcileOptions, Reconciler, Report, Stage};
use modsync::resolver::{Resolved, Resolver};
use modsync::{ModsyncError, ModsyncResult};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Provider whose answers can be changed between runs
#[derive(Default)]
struct FakeProvider {
    latest: Mutex<HashMap<String, String>>,
    unreachable: Mutex<HashSet<String>>,
    broken_downloads: Mutex<HashSet<String>>,
    resolve_delays: Mutex<HashMap<String, Duration>>,
    download_delays: Mutex<HashMap<String, Duration>>,
    fetches: AtomicUsize,
}

impl FakeProvider {
    fn with(latest: &[(&str, &str)]) -> Self {
        let provider = Self::default();
        for (id, file) in latest {
            provider.publish(id, file);
        }
        provider
    }

    fn publish(&self, id: &str, file: &str) {
        self.latest
            .lock()
            .unwrap()
            .insert(id.to_string(), file.to_string());
    }

    fn take_down(&self, id: &str) {
        self.unreachable.lock().unwrap().insert(id.to_string());
    }

    fn break_download(&self, id: &str) {
        self.broken_downloads.lock().unwrap().insert(id.to_string());
    }

    fn slow_answer(&self, id: &str, delay: Duration) {
        self.resolve_delays
            .lock()
            .unwrap()
            .insert(id.to_string(), delay);
    }

    fn slow_download(&self, id: &str, delay: Duration) {
        self.download_delays
            .lock()
            .unwrap()
            .insert(id.to_string(), delay);
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resolver for FakeProvider {
    async fn resolve(&self, id: &Identifier) -> ModsyncResult<Resolved> {
        let delay = self.resolve_delays.lock().unwrap().get(id.as_str()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.unreachable.lock().unwrap().contains(id.as_str()) {
            return Err(ModsyncError::resolution(id.as_str(), "connection refused"));
        }
        let file = self
            .latest
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| ModsyncError::resolution(id.as_str(), "project not found"))?;

        Ok(Resolved {
            identifier: id.clone(),
            filename: Filename::new(file.clone())?,
            location: format!("fake://{}", file),
        })
    }

    async fn fetch(&self, resolved: &Resolved) -> ModsyncResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = self
            .download_delays
            .lock()
            .unwrap()
            .get(resolved.identifier.as_str())
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self
            .broken_downloads
            .lock()
            .unwrap()
            .contains(resolved.identifier.as_str())
        {
            return Err(ModsyncError::resolution(
                resolved.identifier.as_str(),
                "connection reset",
            ));
        }
        Ok(format!("content of {}", resolved.filename).into_bytes())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn id(s: &str) -> Identifier {
    Identifier::new(s).unwrap()
}

fn name(s: &str) -> Filename {
    Filename::new(s).unwrap()
}

fn desired(ids: &[&str]) -> DesiredSet {
    DesiredSet::new(ids.iter().map(|s| id(s)))
}

fn cache(entries: &[(&str, &str)]) -> Cache {
    entries.iter().map(|(i, f)| (id(i), name(f))).collect()
}

fn touch(dir: &Path, file: &str) {
    std::fs::write(dir.join(file), format!("old {}", file)).unwrap();
}

async fn sync(provider: &FakeProvider, desired: &DesiredSet, cache: &Cache, dir: &Path) -> Report {
    let store = ArtifactStore::new(dir, "jar");
    Reconciler::new(provider)
        .run(desired, cache, &store)
        .await
        .unwrap()
}

async fn sync_with(
    provider: &FakeProvider,
    options: ReconcileOptions,
    desired: &DesiredSet,
    cache: &Cache,
    dir: &Path,
) -> Report {
    let store = ArtifactStore::new(dir, "jar");
    Reconciler::new(provider)
        .with_options(options)
        .run(desired, cache, &store)
        .await
        .unwrap()
}

fn short_timeout() -> ReconcileOptions {
    ReconcileOptions {
        concurrency: 2,
        timeout: Duration::from_millis(100),
    }
}

#[tokio::test]
async fn fresh_folder_gets_every_mod() {
    let temp = TempDir::new().unwrap();
    let provider = FakeProvider::with(&[("jei", "jei-4.15.jar"), ("mantle", "mantle-1.3.jar")]);

    let report = sync(&provider, &desired(&["jei", "mantle"]), &Cache::new(), temp.path()).await;

    assert!(report.is_complete());
    assert_eq!(report.written(), 2);
    assert_eq!(
        report.cache,
        cache(&[("jei", "jei-4.15.jar"), ("mantle", "mantle-1.3.jar")])
    );
    assert_eq!(
        std::fs::read_to_string(temp.path().join("jei-4.15.jar")).unwrap(),
        "content of jei-4.15.jar"
    );
    assert!(temp.path().join("mantle-1.3.jar").exists());
}

#[tokio::test]
async fn second_run_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let provider = FakeProvider::with(&[("jei", "jei-4.15.jar"), ("mantle", "mantle-1.3.jar")]);
    let wanted = desired(&["jei", "mantle"]);

    let first = sync(&provider, &wanted, &Cache::new(), temp.path()).await;
    let fetches = provider.fetches();
    let second = sync(&provider, &wanted, &first.cache, temp.path()).await;

    assert_eq!(second.written(), 0);
    assert_eq!(second.deleted(), 0);
    assert_eq!(provider.fetches(), fetches);
    assert_eq!(second.cache, first.cache);
    assert!(second.outcomes.iter().all(|o| o.label() == "up to date"));
}

#[tokio::test]
async fn renamed_upstream_file_replaces_stale_one() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "modA-1.0.jar");
    let provider = FakeProvider::with(&[("modA", "modA-2.0.jar")]);

    let report = sync(
        &provider,
        &desired(&["modA"]),
        &cache(&[("modA", "modA-1.0.jar")]),
        temp.path(),
    )
    .await;

    assert!(!temp.path().join("modA-1.0.jar").exists());
    assert!(temp.path().join("modA-2.0.jar").exists());
    assert_eq!(report.cache, cache(&[("modA", "modA-2.0.jar")]));
    assert_eq!(report.outcomes[0].label(), "updated");
    assert!(report.outcomes[0].fetched && report.outcomes[0].deleted);
}

#[tokio::test]
async fn current_file_is_not_downloaded_again() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "modA-2.0.jar");
    let provider = FakeProvider::with(&[("modA", "modA-2.0.jar")]);

    let report = sync(
        &provider,
        &desired(&["modA"]),
        &cache(&[("modA", "modA-2.0.jar")]),
        temp.path(),
    )
    .await;

    assert_eq!(provider.fetches(), 0);
    assert_eq!(report.written(), 0);
    assert_eq!(report.deleted(), 0);
    assert_eq!(
        std::fs::read_to_string(temp.path().join("modA-2.0.jar")).unwrap(),
        "old modA-2.0.jar"
    );
}

#[tokio::test]
async fn existing_file_is_adopted_without_download() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "jei-4.15.jar");
    let provider = FakeProvider::with(&[("jei", "jei-4.15.jar")]);

    let report = sync(&provider, &desired(&["jei"]), &Cache::new(), temp.path()).await;

    assert_eq!(provider.fetches(), 0);
    assert_eq!(report.outcomes[0].label(), "adopted");
    assert_eq!(report.cache, cache(&[("jei", "jei-4.15.jar")]));
}

#[tokio::test]
async fn unlisted_mod_is_pruned_and_its_file_kept() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "jei-4.15.jar");
    touch(temp.path(), "old-1.0.jar");
    let provider = FakeProvider::with(&[("jei", "jei-4.15.jar")]);

    let report = sync(
        &provider,
        &desired(&["jei"]),
        &cache(&[("jei", "jei-4.15.jar"), ("old", "old-1.0.jar")]),
        temp.path(),
    )
    .await;

    assert_eq!(report.cache, cache(&[("jei", "jei-4.15.jar")]));
    assert_eq!(report.pruned.len(), 1);
    assert_eq!(report.pruned[0].identifier, id("old"));
    assert!(temp.path().join("old-1.0.jar").exists());
}

#[tokio::test]
async fn one_unreachable_mod_does_not_stop_the_others() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "modB-1.0.jar");
    let provider = FakeProvider::with(&[("modA", "modA-1.0.jar"), ("modB", "modB-2.0.jar")]);
    provider.take_down("modB");

    let report = sync(
        &provider,
        &desired(&["modA", "modB"]),
        &cache(&[("modB", "modB-1.0.jar")]),
        temp.path(),
    )
    .await;

    assert!(!report.is_complete());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].identifier, id("modB"));
    assert_eq!(report.failures[0].stage, Stage::Resolve);
    assert!(temp.path().join("modA-1.0.jar").exists());
    assert!(temp.path().join("modB-1.0.jar").exists());
    assert_eq!(
        report.cache,
        cache(&[("modA", "modA-1.0.jar"), ("modB", "modB-1.0.jar")])
    );
}

#[tokio::test]
async fn failed_download_keeps_stale_file_and_entry() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "modA-1.0.jar");
    let provider = FakeProvider::with(&[("modA", "modA-2.0.jar")]);
    provider.break_download("modA");

    let report = sync(
        &provider,
        &desired(&["modA"]),
        &cache(&[("modA", "modA-1.0.jar")]),
        temp.path(),
    )
    .await;

    assert_eq!(report.failures[0].stage, Stage::Fetch);
    assert!(temp.path().join("modA-1.0.jar").exists());
    assert!(!temp.path().join("modA-2.0.jar").exists());
    assert_eq!(report.cache, cache(&[("modA", "modA-1.0.jar")]));
}

#[tokio::test]
async fn failed_write_keeps_stale_file_and_entry() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "modA-1.0.jar");
    // A directory squatting on the new name makes the final rename fail
    std::fs::create_dir(temp.path().join("modA-2.0.jar")).unwrap();
    let provider = FakeProvider::with(&[("modA", "modA-2.0.jar")]);

    let report = sync(
        &provider,
        &desired(&["modA"]),
        &cache(&[("modA", "modA-1.0.jar")]),
        temp.path(),
    )
    .await;

    assert_eq!(report.failures[0].stage, Stage::Write);
    assert!(matches!(
        report.failures[0].error,
        ModsyncError::ArtifactWrite { .. }
    ));
    assert!(temp.path().join("modA-1.0.jar").exists());
    assert_eq!(report.cache, cache(&[("modA", "modA-1.0.jar")]));
}

#[tokio::test]
async fn stale_file_now_used_by_another_mod_is_kept() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "bundle-1.0.jar");
    let provider = FakeProvider::with(&[("modA", "modA-2.0.jar"), ("modB", "bundle-1.0.jar")]);

    let report = sync(
        &provider,
        &desired(&["modA", "modB"]),
        &cache(&[("modA", "bundle-1.0.jar")]),
        temp.path(),
    )
    .await;

    assert!(report.is_complete());
    assert!(temp.path().join("bundle-1.0.jar").exists());
    assert_eq!(
        report.cache,
        cache(&[("modA", "modA-2.0.jar"), ("modB", "bundle-1.0.jar")])
    );
}

#[tokio::test]
async fn stale_file_already_gone_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    let provider = FakeProvider::with(&[("modA", "modA-2.0.jar")]);

    let report = sync(
        &provider,
        &desired(&["modA"]),
        &cache(&[("modA", "modA-1.0.jar")]),
        temp.path(),
    )
    .await;

    assert!(report.is_complete());
    assert!(!report.outcomes[0].deleted);
    assert_eq!(report.cache, cache(&[("modA", "modA-2.0.jar")]));
}

#[tokio::test]
async fn cache_survives_a_full_run_on_disk() {
    let temp = TempDir::new().unwrap();
    let store = CacheStore::new(temp.path().join(".cache.json"));
    let provider = FakeProvider::with(&[("jei", "jei-4.15.jar")]);
    let wanted = desired(&["jei"]);

    let report = sync(&provider, &wanted, &store.load().await.unwrap(), temp.path()).await;
    store.save(&report.cache).await.unwrap();

    provider.publish("jei", "jei-4.16.jar");
    let report = sync(&provider, &wanted, &store.load().await.unwrap(), temp.path()).await;
    store.save(&report.cache).await.unwrap();

    assert_eq!(store.load().await.unwrap(), cache(&[("jei", "jei-4.16.jar")]));
    assert!(!temp.path().join("jei-4.15.jar").exists());
    assert!(temp.path().join("jei-4.16.jar").exists());
}

#[tokio::test]
async fn slow_answer_times_out_for_that_mod_only() {
    let temp = TempDir::new().unwrap();
    let provider = FakeProvider::with(&[("jei", "jei-2.jar"), ("mantle", "mantle-1.3.jar")]);
    provider.slow_answer("jei", Duration::from_secs(5));

    let report = sync_with(
        &provider,
        short_timeout(),
        &desired(&["jei", "mantle"]),
        &cache(&[("jei", "jei-1.jar")]),
        temp.path(),
    )
    .await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].identifier, id("jei"));
    assert_eq!(report.failures[0].stage, Stage::Resolve);
    assert!(report.failures[0]
        .error
        .to_string()
        .contains("no answer within 100ms"));

    assert!(temp.path().join("mantle-1.3.jar").exists());
    assert!(!temp.path().join("jei-2.jar").exists());
    assert_eq!(
        report.cache,
        cache(&[("jei", "jei-1.jar"), ("mantle", "mantle-1.3.jar")])
    );
}

#[tokio::test]
async fn slow_download_times_out_and_keeps_stale_file() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "jei-1.jar");
    let provider = FakeProvider::with(&[("jei", "jei-2.jar"), ("mantle", "mantle-1.3.jar")]);
    provider.slow_download("jei", Duration::from_secs(5));

    let report = sync_with(
        &provider,
        short_timeout(),
        &desired(&["jei", "mantle"]),
        &cache(&[("jei", "jei-1.jar")]),
        temp.path(),
    )
    .await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, Stage::Fetch);
    assert!(temp.path().join("jei-1.jar").exists());
    assert!(!temp.path().join("jei-2.jar").exists());
    assert!(temp.path().join("mantle-1.3.jar").exists());
    assert_eq!(report.cache.get(&id("jei")), Some(&name("jei-1.jar")));
}

#[tokio::test]
async fn parallel_answers_keep_list_order() {
    let temp = TempDir::new().unwrap();
    let ids = ["e", "d", "c", "b", "a"];
    let provider = FakeProvider::default();
    for (i, mod_id) in ids.iter().enumerate() {
        provider.publish(mod_id, &format!("{}-1.jar", mod_id));
        // Earlier entries answer last
        provider.slow_answer(mod_id, Duration::from_millis(50 - 10 * i as u64));
    }

    let report = sync_with(
        &provider,
        ReconcileOptions {
            concurrency: 5,
            timeout: Duration::from_secs(5),
        },
        &desired(&ids),
        &Cache::new(),
        temp.path(),
    )
    .await;

    assert!(report.is_complete());
    let order: Vec<&str> = report
        .outcomes
        .iter()
        .map(|o| o.identifier.as_str())
        .collect();
    assert_eq!(order, ids);
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_current_jar_is_left_alone() {
    let temp = TempDir::new().unwrap();
    let library = TempDir::new().unwrap();
    std::fs::write(library.path().join("jei-2.jar"), b"shared jar").unwrap();
    std::os::unix::fs::symlink(library.path().join("jei-2.jar"), temp.path().join("jei-2.jar"))
        .unwrap();
    let provider = FakeProvider::with(&[("jei", "jei-2.jar")]);

    let report = sync(&provider, &desired(&["jei"]), &Cache::new(), temp.path()).await;

    assert!(report.is_complete());
    assert_eq!(provider.fetches(), 0);
    let link = std::fs::symlink_metadata(temp.path().join("jei-2.jar")).unwrap();
    assert!(link.file_type().is_symlink());
    assert_eq!(report.cache, cache(&[("jei", "jei-2.jar")]));
}
