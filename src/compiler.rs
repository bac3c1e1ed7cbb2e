//! Route compilation pipeline.
//!
//! # Flow
//!
//! ```text
//! scan ──▶ build_tree ──▶ extract (rayon, cached) ──▶ resolve ──▶ publish (ArcSwap)
//!                                                        │
//!                           before_augment ─▶ augment ─▶ after_resolve ─▶ codegen
//! ```
//!
//! A [`RouteCompiler`] keeps the scanned files, the base tree and one
//! extraction snapshot per page, so incremental updates only touch the
//! file that changed. Every mutation takes a ticket from a generation
//! counter; a full compile whose ticket is no longer the latest when it
//! finishes is discarded.

use crate::codegen::{RouteTable, build_table};
use crate::config::RouterConfig;
use crate::error::{RouteError, Warning, report};
use crate::hooks::Hooks;
use crate::log;
use crate::meta::{Extraction, Extractor, LiteralScanner, MacroScanner, MetaCache, augment_routes};
use crate::pages::{
    Layer, PageNode, Removal, ScannedFile, build_tree, compile_path, duplicate_names, insert_page,
    may_adopt, remove_page, scan_layers, scanned_file_for, sort_scanned,
};
use crate::vfs::VirtualFs;
use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, Default)]
struct CompileState {
    scanned: Vec<ScannedFile>,
    /// Route tree before hooks and metadata.
    base: Vec<PageNode>,
    /// Collision warnings of the current base tree.
    collisions: Vec<Warning>,
    snapshots: FxHashMap<PathBuf, Extraction>,
}

/// Outcome of an incremental update.
#[derive(Debug, Clone)]
pub enum Update {
    /// The route table was regenerated and published.
    Regenerated(Arc<RouteTable>),
    /// Nothing observable changed.
    Unchanged,
    /// The path is not a page of any layer.
    Ignored,
}

impl Update {
    pub fn table(&self) -> Option<&Arc<RouteTable>> {
        match self {
            Self::Regenerated(table) => Some(table),
            _ => None,
        }
    }
}

// ============================================================================
// Compiler
// ============================================================================

/// Owns the extraction cache, the virtual file overlay and the latest
/// published route table.
pub struct RouteCompiler {
    config: RouterConfig,
    layers: Vec<Layer>,
    vfs: VirtualFs,
    cache: MetaCache,
    scanner: Box<dyn MacroScanner>,
    hooks: Hooks,
    state: Mutex<CompileState>,
    table: ArcSwap<RouteTable>,
    generation: AtomicU64,
}

impl RouteCompiler {
    pub fn new(config: RouterConfig) -> Self {
        let layers = config.layers();
        Self {
            config,
            layers,
            vfs: VirtualFs::new(),
            cache: MetaCache::new(),
            scanner: Box::new(LiteralScanner),
            hooks: Hooks::default(),
            state: Mutex::new(CompileState::default()),
            table: ArcSwap::from_pointee(RouteTable::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Replace the macro scanner.
    pub fn with_scanner(mut self, scanner: impl MacroScanner + 'static) -> Self {
        self.scanner = Box::new(scanner);
        self
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// In-memory overlay consulted before disk.
    pub fn vfs(&self) -> &VirtualFs {
        &self.vfs
    }

    pub fn cache(&self) -> &MetaCache {
        &self.cache
    }

    /// Latest published route table.
    pub fn table(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn server_pages(&self) -> bool {
        self.config.codegen.server_pages
    }

    // ------------------------------------------------------------------------
    // Full compile
    // ------------------------------------------------------------------------

    /// Scan every layer, rebuild the tree and extract all pages.
    ///
    /// Returns the produced table. When a newer compile or update started
    /// meanwhile, the result is dropped and the latest published table is
    /// returned instead.
    pub fn compile(&self) -> Result<Arc<RouteTable>> {
        let ticket = self.next_ticket();
        Ok(self
            .full_compile(ticket)?
            .unwrap_or_else(|| self.table()))
    }

    /// Run [`compile`](Self::compile) on the blocking pool.
    ///
    /// Resolves to `None` when the compile was superseded.
    pub async fn compile_async(self: Arc<Self>) -> Result<Option<Arc<RouteTable>>> {
        let ticket = self.next_ticket();
        tokio::task::spawn_blocking(move || self.full_compile(ticket))
            .await
            .context("route compile task failed")?
    }

    fn full_compile(&self, ticket: u64) -> Result<Option<Arc<RouteTable>>> {
        for layer in &self.layers {
            if !layer.dir.is_dir() {
                log!("routes"; "layer `{}` not found, skipping", layer.dir.display());
            }
        }

        let scanned = scan_layers(&self.layers, &self.config.pages.extensions);
        let mut build = build_tree(&scanned, self.server_pages())?;
        build.warnings.retain(is_collision);

        let mut next = CompileState {
            scanned,
            base: build.routes,
            collisions: build.warnings,
            snapshots: FxHashMap::default(),
        };
        self.extract_missing(&mut next)?;
        let table = self.resolve(&next)?;

        let mut state = self.state.lock();
        if self.generation.load(Ordering::SeqCst) != ticket {
            log!("routes"; "discarding superseded compile");
            return Ok(None);
        }
        let pages = next.scanned.len();
        *state = next;
        self.publish(&table);
        log!("routes"; "compiled {pages} pages into {} routes", table.routes.len());
        Ok(Some(table))
    }

    // ------------------------------------------------------------------------
    // Incremental updates
    // ------------------------------------------------------------------------

    /// A page file was created.
    pub fn add_file(&self, path: &Path) -> Result<Update> {
        let Some(file) = scanned_file_for(path, &self.layers, &self.config.pages.extensions) else {
            return Ok(Update::Ignored);
        };

        let mut state = self.state.lock();
        if state.scanned.iter().any(|f| f.absolute_path == path) {
            drop(state);
            return self.change_file(path);
        }
        self.next_ticket();

        let server_pages = self.server_pages();
        let compiled = compile_path(&file.relative_path, server_pages)
            .map_err(|err| err.in_file(path))?;

        let mut next = state.clone();
        next.scanned.push(file.clone());
        sort_scanned(&mut next.scanned);

        if may_adopt(&next.scanned, &file, server_pages) {
            self.rebuild_base(&mut next)?;
        } else if let Some(collision) =
            insert_page(&mut next.base, &file, &compiled).map_err(|err| err.in_file(path))?
        {
            next.collisions.push(collision);
        }
        self.extract_missing(&mut next)?;

        let table = self.resolve(&next)?;
        *state = next;
        self.publish(&table);
        log!("routes"; "added {}", file.relative_path);
        Ok(Update::Regenerated(table))
    }

    /// A page file was deleted.
    pub fn remove_file(&self, path: &Path) -> Result<Update> {
        let mut state = self.state.lock();
        if !state.scanned.iter().any(|f| f.absolute_path == path) {
            return Ok(Update::Ignored);
        }
        self.next_ticket();

        let mut next = state.clone();
        next.scanned.retain(|f| f.absolute_path != path);
        next.snapshots.remove(path);
        self.cache.invalidate(path);

        let was_winner = next
            .collisions
            .iter()
            .any(|w| matches!(w, Warning::Collision { kept, .. } if kept == path));
        next.collisions
            .retain(|w| !matches!(w, Warning::Collision { dropped, .. } if dropped == path));

        if was_winner || remove_page(&mut next.base, path) == Removal::HasChildren {
            self.rebuild_base(&mut next)?;
            self.extract_missing(&mut next)?;
        }

        let table = self.resolve(&next)?;
        *state = next;
        self.publish(&table);
        log!("routes"; "removed {}", path.display());
        Ok(Update::Regenerated(table))
    }

    /// A page file's contents changed on disk or in the overlay.
    ///
    /// Regenerates only when the extracted metadata differs from the
    /// previous snapshot.
    pub fn change_file(&self, path: &Path) -> Result<Update> {
        let state = self.state.lock();
        if !state.scanned.iter().any(|f| f.absolute_path == path) {
            drop(state);
            return self.add_file(path);
        }
        // Collision losers are not in the tree and carry no snapshot.
        if !self.config.extract.enabled || !state.snapshots.contains_key(path) {
            return Ok(Update::Unchanged);
        }

        self.cache.invalidate(path);
        let fresh = self.extract_file(path)?;
        if state.snapshots.get(path) == Some(&fresh) {
            return Ok(Update::Unchanged);
        }
        self.next_ticket();

        let mut state = state;
        let mut next = state.clone();
        next.snapshots.insert(path.to_path_buf(), fresh);
        let table = self.resolve(&next)?;
        *state = next;
        self.publish(&table);
        log!("routes"; "updated {}", path.display());
        Ok(Update::Regenerated(table))
    }

    /// Regenerate from the in-memory tree and snapshots without touching
    /// the filesystem.
    pub fn emit(&self) -> Result<Arc<RouteTable>> {
        let state = self.state.lock();
        self.next_ticket();
        let table = self.resolve(&state)?;
        self.publish(&table);
        Ok(table)
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn rebuild_base(&self, state: &mut CompileState) -> Result<(), RouteError> {
        let mut build = build_tree(&state.scanned, self.server_pages())?;
        build.warnings.retain(is_collision);
        state.base = build.routes;
        state.collisions = build.warnings;
        Ok(())
    }

    /// Extract every tree page without a snapshot, in parallel, and drop
    /// snapshots of pages no longer in the tree.
    fn extract_missing(&self, state: &mut CompileState) -> Result<(), RouteError> {
        if !self.config.extract.enabled {
            return Ok(());
        }
        let mut in_tree = FxHashSet::default();
        for route in &state.base {
            route.walk("", &mut |node, _| {
                if let Some(file) = &node.file {
                    in_tree.insert(file.clone());
                }
            });
        }
        state.snapshots.retain(|file, _| in_tree.contains(file));

        let mut missing: Vec<PathBuf> = in_tree
            .into_iter()
            .filter(|file| !state.snapshots.contains_key(file))
            .collect();
        missing.sort();

        let extracted = missing
            .into_par_iter()
            .map(|file| self.extract_file(&file).map(|e| (file, e)))
            .collect::<Result<Vec<_>, _>>()?;
        state.snapshots.extend(extracted);
        Ok(())
    }

    fn extract_file(&self, path: &Path) -> Result<Extraction, RouteError> {
        let content = self.vfs.read(path)?;
        let extractor = Extractor::new(&self.config.extract, self.scanner.as_ref());
        Ok(self
            .cache
            .get_or_extract(path, &content, || extractor.extract(path, &content)))
    }

    /// Hooks, augmentation and code generation over a copy of the base tree.
    fn resolve(&self, state: &CompileState) -> Result<Arc<RouteTable>, RouteError> {
        let mut routes = state.base.clone();
        self.hooks.run_before_augment(&mut routes)?;
        augment_routes(&mut routes, &state.snapshots);
        self.hooks.run_after_resolve(&mut routes)?;

        let mut warnings = state.collisions.clone();
        for file in &state.scanned {
            if let Some(snapshot) = state.snapshots.get(&file.absolute_path) {
                warnings.extend(snapshot.warnings.iter().cloned());
            }
        }
        warnings.extend(duplicate_names(&routes));

        Ok(Arc::new(build_table(routes, warnings, &self.config.codegen)))
    }

    fn publish(&self, table: &Arc<RouteTable>) {
        for warning in &table.warnings {
            report(warning);
        }
        self.table.store(Arc::clone(table));
    }
}

fn is_collision(warning: &Warning) -> bool {
    matches!(warning, Warning::Collision { .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayerConfig;
    use crate::pages::PageKey;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new(files: &[(&str, &str)]) -> Self {
            let dir = TempDir::new().unwrap();
            let fixture = Self { dir };
            for (rel, content) in files {
                fixture.write(rel, content);
            }
            fixture
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.dir.path().join(rel)
        }

        fn write(&self, rel: &str, content: &str) -> PathBuf {
            let path = self.path(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            path
        }

        fn config(&self) -> RouterConfig {
            let mut config = RouterConfig::default();
            config.set_root(self.dir.path());
            config
        }

        fn compiler(&self) -> RouteCompiler {
            RouteCompiler::new(self.config())
        }
    }

    fn top_level(table: &RouteTable) -> Vec<(Option<&str>, &str)> {
        table
            .routes
            .iter()
            .map(|r| (r.name.as_deref(), r.path.as_str()))
            .collect()
    }

    #[test]
    fn test_nested_parent_scenario() {
        let fx = Fixture::new(&[
            ("pages/parent.vue", ""),
            ("pages/parent/child.vue", ""),
            ("pages/parent/index.vue", ""),
        ]);
        let table = fx.compiler().compile().unwrap();

        assert_eq!(top_level(&table), [(None, "/parent")]);
        let children = &table.routes[0].children;
        assert_eq!(children[0].name.as_deref(), Some("parent-child"));
        assert_eq!(children[0].path, "child");
        assert_eq!(children[1].name.as_deref(), Some("parent"));
        assert_eq!(children[1].path, "");
        assert!(table.code.contains("export default ["));
    }

    #[test]
    fn test_index_files_without_parents_stay_flat() {
        let fx = Fixture::new(&[
            ("pages/index.vue", ""),
            ("pages/parent/index.vue", ""),
            ("pages/parent/child/index.vue", ""),
        ]);
        let table = fx.compiler().compile().unwrap();

        assert_eq!(
            top_level(&table),
            [
                (Some("index"), "/"),
                (Some("parent"), "/parent"),
                (Some("parent-child"), "/parent/child"),
            ]
        );
        assert!(table.routes.iter().all(|r| r.children.is_empty()));
    }

    #[test]
    fn test_empty_param_aborts_compile() {
        let fx = Fixture::new(&[("pages/index.vue", ""), ("pages/[].vue", "")]);
        let compiler = fx.compiler();
        let err = compiler.compile().unwrap_err();

        let route_err = err.downcast_ref::<RouteError>().unwrap();
        assert!(route_err.is_syntax());
        assert!(err.to_string().starts_with("Empty param"));
        assert!(err.to_string().contains("[].vue"));
        assert!(compiler.table().routes.is_empty());
        assert!(compiler.table().code.is_empty());
    }

    #[test]
    fn test_unterminated_escape_does_not_abort_compile() {
        let fx = Fixture::new(&[
            ("pages/about.ts", "definePageMeta({ name: 'about-us' })\nconst s = \"\\u{"),
            ("pages/contact.vue", "<script setup>const s = '\\u{\u{e9}'</script>"),
        ]);
        let compiler = fx.compiler();
        let table = compiler.compile().unwrap();
        assert_eq!(table.routes[0].name.as_deref(), Some("about-us"));
        assert_eq!(table.routes.len(), 2);

        let about = fx.path("pages/about.ts");
        compiler.vfs().set(&about, "const s = \"\\u{");
        let table = compiler.change_file(&about).unwrap().table().unwrap().clone();
        assert_eq!(table.routes[0].name.as_deref(), Some("about"));
    }

    #[test]
    fn test_missing_layer_is_skipped() {
        let fx = Fixture::new(&[("pages/about.vue", "")]);
        let mut config = fx.config();
        config.pages.layers.push(LayerConfig { dir: "missing/pages".into(), priority: 1 });
        let table = RouteCompiler::new(config).compile().unwrap();
        assert_eq!(top_level(&table), [(Some("about"), "/about")]);
    }

    #[test]
    fn test_catch_all_and_wildcards() {
        let fx = Fixture::new(&[
            ("pages/index.vue", ""),
            ("pages/[...slug].vue", ""),
            ("pages/stories/[id].vue", ""),
        ]);
        let table = fx.compiler().compile().unwrap();

        assert_eq!(
            top_level(&table),
            [
                (Some("index"), "/"),
                (Some("slug"), "/:slug(.*)*"),
                (Some("stories-id"), "/stories/:id()"),
            ]
        );
        assert_eq!(table.prerender["/"].as_deref(), Some("/"));
        assert_eq!(table.prerender["/stories/:id()"].as_deref(), Some("/stories/**"));
    }

    #[test]
    fn test_dynamic_redirect_scenario() {
        let fx = Fixture::new(&[(
            "pages/old.vue",
            "<script setup>\ndefinePageMeta({ name: 'legacy', redirect: () => '/new' })\n</script>",
        )]);
        let table = fx.compiler().compile().unwrap();

        let route = &table.routes[0];
        assert_eq!(route.name.as_deref(), Some("legacy"));
        assert!(route.is_dynamic(PageKey::Redirect));
        assert_eq!(route.redirect, None);
        assert!(table.code.contains("Meta?.redirect,"));
        assert!(
            table
                .warnings
                .iter()
                .any(|w| matches!(w, Warning::Extraction { key: PageKey::Redirect, .. }))
        );
    }

    #[test]
    fn test_layer_priority_scenario() {
        let fx = Fixture::new(&[
            ("pages/about.vue", ""),
            ("base/pages/about.vue", ""),
            ("base/pages/contact.vue", ""),
        ]);
        let mut config = fx.config();
        config.pages.layers = vec![
            LayerConfig { dir: "base/pages".into(), priority: 1 },
            LayerConfig { dir: "pages".into(), priority: 0 },
        ];
        let table = RouteCompiler::new(config).compile().unwrap();

        let about = table.routes.iter().find(|r| r.path == "/about").unwrap();
        assert_eq!(about.file.as_deref(), Some(fx.path("pages/about.vue").as_path()));
        assert!(table.routes.iter().any(|r| r.path == "/contact"));
        assert!(table.warnings.iter().any(is_collision));
    }

    #[test]
    fn test_syntax_error_publishes_nothing() {
        let fx = Fixture::new(&[("pages/[slug.vue", "")]);
        let compiler = fx.compiler();
        let err = compiler.compile().unwrap_err();

        let route_err = err.downcast_ref::<RouteError>().unwrap();
        assert!(route_err.is_syntax());
        assert!(err.to_string().contains("Unfinished param \"slug\""));
        assert!(compiler.table().routes.is_empty());
    }

    #[test]
    fn test_compile_is_idempotent() {
        let fx = Fixture::new(&[
            ("pages/index.vue", "<script setup>definePageMeta({ alias: '/home' })</script>"),
            ("pages/blog/[slug].vue", ""),
        ]);
        let compiler = fx.compiler();
        let first = compiler.compile().unwrap();
        let second = compiler.compile().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_incremental_add_matches_full_compile() {
        let fx = Fixture::new(&[("pages/parent.vue", ""), ("pages/parent/child.vue", "")]);
        let compiler = fx.compiler();
        compiler.compile().unwrap();

        let added = fx.write("pages/parent/index.vue", "");
        let update = compiler.add_file(&added).unwrap();
        let incremental = update.table().unwrap().clone();

        let full = fx.compiler().compile().unwrap();
        assert_eq!(incremental.routes, full.routes);
        assert_eq!(incremental.code, full.code);
    }

    #[test]
    fn test_add_parent_rebuilds_tree() {
        let fx = Fixture::new(&[("pages/docs/intro.vue", "")]);
        let compiler = fx.compiler();
        compiler.compile().unwrap();

        let parent = fx.write("pages/docs.vue", "");
        let table = compiler.add_file(&parent).unwrap().table().unwrap().clone();
        assert_eq!(top_level(&table), [(Some("docs"), "/docs")]);
        assert_eq!(table.routes[0].children[0].path, "intro");
    }

    #[test]
    fn test_remove_file() {
        let fx = Fixture::new(&[("pages/parent.vue", ""), ("pages/parent/index.vue", "")]);
        let compiler = fx.compiler();
        compiler.compile().unwrap();

        let index = fx.path("pages/parent/index.vue");
        fs::remove_file(&index).unwrap();
        let table = compiler.remove_file(&index).unwrap().table().unwrap().clone();
        assert_eq!(top_level(&table), [(Some("parent"), "/parent")]);
        assert!(table.routes[0].children.is_empty());

        assert!(matches!(compiler.remove_file(&index).unwrap(), Update::Ignored));
    }

    #[test]
    fn test_remove_collision_winner_restores_loser() {
        let fx = Fixture::new(&[("pages/about.vue", ""), ("base/about.vue", "")]);
        let mut config = fx.config();
        config.pages.layers = vec![
            LayerConfig { dir: "pages".into(), priority: 0 },
            LayerConfig { dir: "base".into(), priority: 1 },
        ];
        let compiler = RouteCompiler::new(config);
        compiler.compile().unwrap();

        let winner = fx.path("pages/about.vue");
        fs::remove_file(&winner).unwrap();
        let table = compiler.remove_file(&winner).unwrap().table().unwrap().clone();
        assert_eq!(table.routes.len(), 1);
        assert_eq!(table.routes[0].file.as_deref(), Some(fx.path("base/about.vue").as_path()));
        assert!(!table.warnings.iter().any(is_collision));
    }

    #[test]
    fn test_change_file_regenerates_only_on_meta_change() {
        let fx = Fixture::new(&[("pages/about.vue", "<script setup>definePageMeta({ name: 'a' })</script>")]);
        let compiler = fx.compiler();
        compiler.compile().unwrap();
        let path = fx.path("pages/about.vue");

        fx.write("pages/about.vue", "<script setup>\n// comment\ndefinePageMeta({ name: 'a' })</script>");
        assert!(matches!(compiler.change_file(&path).unwrap(), Update::Unchanged));

        compiler
            .vfs()
            .set(&path, "<script setup>definePageMeta({ name: 'b' })</script>");
        let table = compiler.change_file(&path).unwrap().table().unwrap().clone();
        assert_eq!(table.routes[0].name.as_deref(), Some("b"));
    }

    #[test]
    fn test_emit_is_warm() {
        let fx = Fixture::new(&[("pages/about.vue", "<script setup>definePageMeta({ name: 'x' })</script>")]);
        let compiler = fx.compiler();
        let cold = compiler.compile().unwrap();

        fs::remove_dir_all(fx.path("pages")).unwrap();
        let warm = compiler.emit().unwrap();
        assert_eq!(cold.code, warm.code);
    }

    #[test]
    fn test_hooks_extend_and_resolve() {
        let fx = Fixture::new(&[("pages/about.vue", "")]);
        let hooks = Hooks::new()
            .before_augment(|routes| {
                routes.push(PageNode::new("/virtual").with_name("virtual"));
                Ok(())
            })
            .after_resolve(|routes| {
                for route in routes.iter_mut() {
                    route.meta.insert("seen".into(), json!(true));
                }
                Ok(())
            });
        let table = fx.compiler().with_hooks(hooks).compile().unwrap();

        assert_eq!(table.routes.len(), 2);
        assert!(table.routes.iter().all(|r| r.meta["seen"] == json!(true)));
        assert!(table.code.contains("name: \"virtual\""));
    }

    #[test]
    fn test_superseded_compile_is_discarded() {
        let fx = Fixture::new(&[("pages/about.vue", "")]);
        let compiler = fx.compiler();

        let stale = compiler.next_ticket();
        compiler.next_ticket();
        assert!(compiler.full_compile(stale).unwrap().is_none());
        assert!(compiler.table().routes.is_empty());
    }

    #[test]
    fn test_compile_async() {
        let fx = Fixture::new(&[("pages/about.vue", "")]);
        let compiler = Arc::new(fx.compiler());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let table = runtime
            .block_on(Arc::clone(&compiler).compile_async())
            .unwrap()
            .unwrap();
        assert_eq!(table.routes[0].path, "/about");
        assert_eq!(compiler.table(), table);
    }

    #[test]
    fn test_route_rules_collected() {
        let fx = Fixture::new(&[(
            "pages/blog/[slug].vue",
            "<script setup>defineRouteRules({ swr: 60 })</script>",
        )]);
        let table = fx.compiler().compile().unwrap();
        assert_eq!(table.route_rules["/blog/**"]["swr"], json!(60));
    }
}
