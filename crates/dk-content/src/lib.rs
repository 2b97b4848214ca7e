//! Content loading for Dachkammer.
//!
//! Content goes through two stages. A [`Loader`] reads [`RawContent`] from
//! disk: plain serde data with string ids. [`link`] then checks every
//! reference against a condition/effect [`Registry`](dk_engine::Registry)
//! and produces a [`LoadedWorld`] with typed content, rules and the
//! initial state.

/// Problems found while linking.
pub mod diagnostics;
/// Error types for content loading.
pub mod error;
/// Raw content to typed world.
pub mod linker;
/// Reading content from disk.
pub mod loader;
/// Serialized content types.
pub mod raw;

use std::path::Path;

use dk_engine::Registry;

pub use diagnostics::{Diagnostic, Severity};
pub use error::{LoadError, LoadResult};
pub use linker::{LoadedWorld, link};
pub use loader::{JsonDirLoader, JsonFileLoader, Loader, loader_for};
pub use raw::RawContent;

/// Read and link a world in one step.
pub fn load(loader: &dyn Loader, registry: &Registry) -> LoadResult<LoadedWorld> {
    let raw = loader.load()?;
    link(raw, registry)
}

/// Read and link the world at `path`, a directory or a bundled JSON file.
pub fn load_path(path: &Path, registry: &Registry) -> LoadResult<LoadedWorld> {
    load(loader_for(path).as_ref(), registry)
}
