//! Host extension points around route resolution.
//!
//! ```text
//! base tree ──▶ before_augment ──▶ augment(extracted meta) ──▶ after_resolve ──▶ codegen
//! ```

use crate::error::RouteError;
use crate::pages::PageNode;

type HookFn = Box<dyn Fn(&mut Vec<PageNode>) -> anyhow::Result<()> + Send + Sync>;

/// Callbacks that may edit the route tree in place.
#[derive(Default)]
pub struct Hooks {
    before_augment: Vec<HookFn>,
    after_resolve: Vec<HookFn>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs on a fresh copy of the base tree, before extracted metadata
    /// is applied. Routes pushed here are augmented like scanned ones.
    pub fn before_augment(
        mut self,
        hook: impl Fn(&mut Vec<PageNode>) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.before_augment.push(Box::new(hook));
        self
    }

    /// Runs on the fully resolved tree, right before code generation.
    pub fn after_resolve(
        mut self,
        hook: impl Fn(&mut Vec<PageNode>) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.after_resolve.push(Box::new(hook));
        self
    }

    pub(crate) fn run_before_augment(&self, routes: &mut Vec<PageNode>) -> Result<(), RouteError> {
        run(&self.before_augment, "before_augment", routes)
    }

    pub(crate) fn run_after_resolve(&self, routes: &mut Vec<PageNode>) -> Result<(), RouteError> {
        run(&self.after_resolve, "after_resolve", routes)
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("before_augment", &self.before_augment.len())
            .field("after_resolve", &self.after_resolve.len())
            .finish()
    }
}

fn run(hooks: &[HookFn], name: &'static str, routes: &mut Vec<PageNode>) -> Result<(), RouteError> {
    for hook in hooks {
        hook(routes).map_err(|source| RouteError::Hook { hook: name, source })?;
    }
    Ok(())
}
