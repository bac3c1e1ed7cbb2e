//! Pagesmith - a file-based route compiler.
//!
//! Turns one or more layered `pages/` directories into a router
//! definition module, enriched with metadata read statically from each
//! page's `definePageMeta(...)` call.
//!
//! ```no_run
//! use pagesmith::{RouteCompiler, RouterConfig};
//!
//! let mut config = RouterConfig::default();
//! config.set_root(std::path::Path::new("site"));
//! let table = RouteCompiler::new(config).compile()?;
//! println!("{}", table.code);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod error;
pub mod hooks;
pub mod logger;
pub mod meta;
pub mod pages;
pub mod vfs;
pub mod watch;

pub use codegen::RouteTable;
pub use compiler::{RouteCompiler, Update};
pub use config::RouterConfig;
pub use error::{RouteError, Warning};
pub use hooks::Hooks;
