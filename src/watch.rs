//! File system watcher for incremental route compilation.
//!
//! Monitors every page layer and the config file, batches events with a
//! debouncer and feeds them to the [`RouteCompiler`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Event Loop (tokio)                      │
//! │                                                              │
//! │  ┌──────────┐    ┌──────────┐    ┌────────────────────────┐  │
//! │  │ notify   │───▶│ Debouncer│───▶│    handle_changes()    │  │
//! │  │ events   │    │ (300ms)  │    │                        │  │
//! │  └──────────┘    └──────────┘    │  config  → reload      │  │
//! │                                  │  dirs    → full compile│  │
//! │                                  │  pages   → add/remove/ │  │
//! │                                  │            change      │  │
//! │                                  └────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::{
    cli::Cli,
    codegen::RouteTable,
    compiler::{RouteCompiler, Update},
    config::RouterConfig,
    log,
};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

// =============================================================================
// Constants
// =============================================================================

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Format path as relative to root for log display.
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

// =============================================================================
// Change Classification
// =============================================================================

/// What a changed path asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    /// The config file changed; reload it and recompile.
    Config,
    /// A directory appeared or vanished; rescan everything.
    Rescan,
    /// A single page file.
    Page(PathBuf),
}

fn classify(path: &Path, config: &RouterConfig) -> Option<Change> {
    if path == config.config_path {
        return Some(Change::Config);
    }
    if !config.layers().iter().any(|layer| path.starts_with(&layer.dir)) {
        return None;
    }
    if config.pages.is_page_file(path) {
        return Some(Change::Page(path.to_path_buf()));
    }
    // A removed directory is reported once, without its files.
    if path.is_dir() || !path.exists() {
        return Some(Change::Rescan);
    }
    None
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    /// Events arriving during the cooldown stay queued until it ends.
    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && !self.in_cooldown()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        let mut paths: Vec<_> = self.pending.drain().collect();
        paths.sort();
        paths
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else if let Some(t) = self.last_rebuild
            && self.in_cooldown()
        {
            Duration::from_millis(REBUILD_COOLDOWN_MS).saturating_sub(t.elapsed())
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Handler
// =============================================================================

fn write_table(table: &RouteTable, config: &RouterConfig) {
    let output = config.output_dir();
    match table.write_to(&output) {
        Ok(()) => log!("watch"; "wrote {} routes to {}", table.routes.len(), output.display()),
        Err(e) => log!("watch"; "failed to write output: {e:#}"),
    }
}

/// Recompile from scratch, logging errors on failure.
/// Returns true if successful (for cooldown tracking).
async fn try_full_compile(compiler: &Arc<RouteCompiler>, reason: &str) -> bool {
    log!("watch"; "{reason}");
    match Arc::clone(compiler).compile_async().await {
        Ok(Some(table)) => {
            write_table(&table, compiler.config());
            true
        }
        Ok(None) => false,
        Err(e) => {
            log!("watch"; "compile failed");
            log!("watch"; "{e:#}");
            false
        }
    }
}

/// Apply page-level updates on the blocking pool.
async fn apply_updates(compiler: &Arc<RouteCompiler>, pages: Vec<PathBuf>) -> Result<Option<Arc<RouteTable>>> {
    let compiler = Arc::clone(compiler);
    tokio::task::spawn_blocking(move || {
        let mut latest = None;
        for path in &pages {
            let update = if path.exists() {
                compiler.change_file(path)?
            } else {
                compiler.remove_file(path)?
            };
            if let Update::Regenerated(table) = update {
                latest = Some(table);
            }
        }
        Ok::<_, anyhow::Error>(latest)
    })
    .await
    .context("route update task failed")?
}

/// Process file changes. Returns true if a full compile succeeded (for cooldown).
async fn handle_changes(paths: &[PathBuf], compiler: &mut Arc<RouteCompiler>, cli: &Cli) -> bool {
    let root = compiler.config().get_root().to_path_buf();

    let mut config_changed = false;
    let mut rescan: Option<&PathBuf> = None;
    let mut pages = Vec::new();

    for path in paths {
        match classify(path, compiler.config()) {
            Some(Change::Config) => config_changed = true,
            Some(Change::Rescan) => rescan = rescan.or(Some(path)),
            Some(Change::Page(page)) => pages.push(page),
            None => {}
        }
    }

    if config_changed {
        match RouterConfig::load(cli) {
            Ok(config) => {
                *compiler = Arc::new(RouteCompiler::new(config));
                return try_full_compile(compiler, "config changed, recompiling...").await;
            }
            Err(e) => {
                log!("watch"; "config reload failed, keeping previous config");
                log!("watch"; "{e:#}");
                return false;
            }
        }
    }

    if let Some(trigger) = rescan {
        let reason = format!("{} changed, recompiling...", rel_path(trigger, &root));
        return try_full_compile(compiler, &reason).await;
    }

    if pages.is_empty() {
        return false;
    }
    let trigger = pages
        .iter()
        .map(|p| rel_path(p, &root))
        .collect::<Vec<_>>()
        .join(", ");
    match apply_updates(compiler, pages).await {
        Ok(Some(table)) => write_table(&table, compiler.config()),
        Ok(None) => log!("watch"; "{trigger}: routes unchanged"),
        Err(e) => {
            log!("watch"; "update failed ({trigger})");
            log!("watch"; "{e:#}");
        }
    }
    eprintln!(); // Blank line to separate update sessions

    false
}

// =============================================================================
// Watcher Setup
// =============================================================================

/// Format absolute path as relative to root, with trailing slash for directories.
fn format_rel(path: &Path, root: &Path, is_dir: bool) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let suffix = if is_dir { "/" } else { "" };
    format!("{}{}", rel.display(), suffix)
}

fn setup_watchers(watcher: &mut impl Watcher, config: &RouterConfig) -> Result<()> {
    let root = config.get_root();
    let mut watched = Vec::new();

    for layer in config.layers() {
        if layer.dir.is_dir() {
            watcher
                .watch(&layer.dir, RecursiveMode::Recursive)
                .with_context(|| format!("Failed to watch layer: {}", layer.dir.display()))?;
            watched.push(format_rel(&layer.dir, root, true));
        }
    }
    if config.config_path.is_file() {
        watcher
            .watch(&config.config_path, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config: {}", config.config_path.display()))?;
        watched.push(format_rel(&config.config_path, root, false));
    }

    if !watched.is_empty() {
        log!("watch"; "watching: {}", watched.join(", "));
    }
    eprintln!(); // Blank line to separate init logs from change events
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

// =============================================================================
// Public API
// =============================================================================

/// Watch page layers and recompile incrementally until the watcher closes.
///
/// `compiler` should already hold a published table; the layers and
/// config file it was built from are what gets watched.
pub async fn watch_for_changes(mut compiler: Arc<RouteCompiler>, cli: &Cli) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })
    .context("Failed to create file watcher")?;
    setup_watchers(&mut watcher, compiler.config())?;

    let mut debouncer = Debouncer::new();

    loop {
        match tokio::time::timeout(debouncer.timeout(), rx.recv()).await {
            Ok(Some(Ok(event))) if is_relevant(&event) => {
                debouncer.add(event);
            }
            Ok(Some(Err(e))) => log!("watch"; "error: {e}"),
            Ok(None) => break,
            Err(_) if debouncer.ready() => {
                if handle_changes(&debouncer.take(), &mut compiler, cli).await {
                    debouncer.mark_rebuild();
                }
            }
            // Other cases: irrelevant events, timeout without ready, etc.
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> RouterConfig {
        let mut config = RouterConfig::default();
        config.set_root(dir);
        config.config_path = dir.join("pagesmith.toml");
        config
    }

    #[test]
    fn test_is_temp_file() {
        assert!(is_temp_file(Path::new("pages/index.vue~")));
        assert!(is_temp_file(Path::new("pages/.index.vue.swp")));
        assert!(is_temp_file(Path::new("pages/index.bak")));
        assert!(!is_temp_file(Path::new("pages/index.vue")));
    }

    #[test]
    fn test_classify() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        fs::create_dir_all(dir.path().join("pages/blog")).unwrap();
        let page = dir.path().join("pages/blog/post.vue");

        assert_eq!(classify(&config.config_path, &config), Some(Change::Config));
        assert_eq!(classify(&page, &config), Some(Change::Page(page.clone())));
        assert_eq!(classify(&dir.path().join("pages/blog"), &config), Some(Change::Rescan));
        assert_eq!(classify(&dir.path().join("pages/gone"), &config), Some(Change::Rescan));
        assert_eq!(classify(&dir.path().join("src/main.ts"), &config), None);
    }

    #[test]
    fn test_classify_ignores_non_page_files() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let notes = dir.path().join("pages/notes.md");
        fs::create_dir_all(notes.parent().unwrap()).unwrap();
        fs::write(&notes, "").unwrap();

        assert_eq!(classify(&notes, &config), None);
    }

    #[test]
    fn test_debouncer_batches_paths() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_secs(60));

        let event = Event::new(EventKind::Create(notify::event::CreateKind::File))
            .add_path(PathBuf::from("/p/b.vue"))
            .add_path(PathBuf::from("/p/a.vue"))
            .add_path(PathBuf::from("/p/a.vue~"));
        debouncer.add(event);
        assert_eq!(debouncer.timeout(), Duration::from_millis(DEBOUNCE_MS));

        debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS));
        assert!(debouncer.ready());
        assert_eq!(debouncer.take(), [PathBuf::from("/p/a.vue"), PathBuf::from("/p/b.vue")]);
        assert!(!debouncer.ready());

        debouncer.mark_rebuild();
        assert!(debouncer.in_cooldown());
    }

    #[test]
    fn test_debouncer_queues_events_during_cooldown() {
        let mut debouncer = Debouncer::new();
        debouncer.mark_rebuild();

        let event = Event::new(EventKind::Remove(notify::event::RemoveKind::File))
            .add_path(PathBuf::from("/p/a.vue"));
        debouncer.add(event);
        debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS));
        assert!(!debouncer.ready());
        assert!(debouncer.timeout() <= Duration::from_millis(REBUILD_COOLDOWN_MS));

        debouncer.last_rebuild =
            Some(Instant::now() - Duration::from_millis(REBUILD_COOLDOWN_MS));
        assert!(debouncer.ready());
        assert_eq!(debouncer.take(), [PathBuf::from("/p/a.vue")]);
    }

    #[test]
    fn test_apply_updates() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/index.vue"), "").unwrap();
        let compiler = Arc::new(RouteCompiler::new(config_in(dir.path())));
        compiler.compile().unwrap();

        let about = dir.path().join("pages/about.vue");
        fs::write(&about, "").unwrap();
        let runtime = tokio::runtime::Builder::new_multi_thread().build().unwrap();

        let table = runtime
            .block_on(apply_updates(&compiler, vec![about.clone()]))
            .unwrap()
            .unwrap();
        assert_eq!(table.routes.len(), 2);

        fs::remove_file(&about).unwrap();
        let table = runtime
            .block_on(apply_updates(&compiler, vec![about]))
            .unwrap()
            .unwrap();
        assert_eq!(table.routes.len(), 1);
    }
}
