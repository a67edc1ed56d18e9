//! Plugin chain builder.
//!
//! The builder owns the ordered list of plugins that will form a backend's
//! chain. Plugins are added one at a time; each addition resolves virtual
//! plugin names and moves the new plugin in front of the first plugin its
//! ordering info names. [`BackendBuilder::resolve_needs`] then completes the
//! chain until every need and every required metadata is satisfied.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chain_core::{BackendBuilder, BackendBuilderInit};
//! use chain_meta::{MemoryPluginDatabase, PluginManifest, PluginSpec};
//!
//! let database = MemoryPluginDatabase::new()
//!     .with(PluginManifest::new("dump").with_provides(&["storage"]).with_needs(&["resolver"]))
//!     .with(PluginManifest::new("resolver"));
//!
//! let mut builder = BackendBuilder::new(&BackendBuilderInit::new(Arc::new(database)));
//! builder.add_plugin(PluginSpec::new("storage").unwrap()).unwrap();
//! let missing = builder.resolve_needs(true).unwrap();
//!
//! let chain: Vec<String> = builder.iter().map(PluginSpec::full_name).collect();
//! assert_eq!(chain, vec!["dump#storage", "resolver#resolver"]);
//! assert!(missing.is_empty());
//! ```
//!
//! Ordering is a single relocation per insertion, not a topological sort:
//! a constraint is honoured when the newer plugin names an older one. A
//! constraint declared by an older plugin against a newer one, or a cycle, is
//! neither detected nor repaired.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use chain_meta::{InfoKey, PluginDatabase, PluginSpec, PluginStatus, parse_arguments};
use tracing::{debug, warn};

use crate::backend::{BackendFactory, BackendInterface, DefaultBackendFactory};
use crate::constants::DEFAULT_ITERATION_LIMIT;
use crate::error::{Error, Result};
use crate::metadata::normalize_metadata;

/// Everything a builder is constructed from.
#[derive(Clone)]
pub struct BackendBuilderInit {
    database: Arc<dyn PluginDatabase>,
    factory: Arc<dyn BackendFactory>,
    iteration_limit: usize,
}

impl BackendBuilderInit {
    /// Use `database` with the [`DefaultBackendFactory`] over the same database.
    pub fn new(database: Arc<dyn PluginDatabase>) -> Self {
        Self {
            factory: Arc::new(DefaultBackendFactory::new(Arc::clone(&database))),
            database,
            iteration_limit: DEFAULT_ITERATION_LIMIT,
        }
    }

    /// Create backends with `factory` instead of the default one.
    pub fn with_factory(mut self, factory: Arc<dyn BackendFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Abort [`BackendBuilder::resolve_needs`] after `limit` resolution steps.
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = limit;
        self
    }

    pub fn database(&self) -> &Arc<dyn PluginDatabase> {
        &self.database
    }

    pub fn factory(&self) -> &Arc<dyn BackendFactory> {
        &self.factory
    }

    pub fn iteration_limit(&self) -> usize {
        self.iteration_limit
    }
}

impl fmt::Debug for BackendBuilderInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendBuilderInit")
            .field("iteration_limit", &self.iteration_limit)
            .finish_non_exhaustive()
    }
}

/// Builds an ordered, complete plugin chain.
///
/// A builder is mutated by `add_plugin`/`need_plugin`/`recommend_plugin`
/// calls, completed by one [`resolve_needs`](Self::resolve_needs) call and
/// afterwards only read.
pub struct BackendBuilder {
    database: Arc<dyn PluginDatabase>,
    factory: Arc<dyn BackendFactory>,
    iteration_limit: usize,

    to_add: Vec<PluginSpec>,
    needed_plugins: VecDeque<String>,
    recommended_plugins: VecDeque<String>,
    metadata: BTreeSet<String>,
}

impl BackendBuilder {
    pub fn new(init: &BackendBuilderInit) -> Self {
        Self {
            database: Arc::clone(&init.database),
            factory: Arc::clone(&init.factory),
            iteration_limit: init.iteration_limit,
            to_add: Vec::new(),
            needed_plugins: VecDeque::new(),
            recommended_plugins: VecDeque::new(),
            metadata: BTreeSet::new(),
        }
    }

    pub fn database(&self) -> &Arc<dyn PluginDatabase> {
        &self.database
    }

    pub fn factory(&self) -> &Arc<dyn BackendFactory> {
        &self.factory
    }

    /// The chain in its current order.
    pub fn plugins(&self) -> &[PluginSpec] {
        &self.to_add
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PluginSpec> {
        self.to_add.iter()
    }

    pub fn len(&self) -> usize {
        self.to_add.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty()
    }

    /// Add a plugin to the chain.
    ///
    /// Virtual plugin names are replaced by their provider: the spec takes
    /// the provider's name, keeps its reference name and gains the
    /// provider's default configuration for keys it does not set itself.
    /// The plugin is then appended and placed by [`sort`](Self::sort).
    ///
    /// Plugins named in the "plugins" info are only added by
    /// [`resolve_needs`](Self::resolve_needs).
    ///
    /// # Errors
    ///
    /// [`Error::DuplicatePlugin`] if the chain already holds a plugin with the
    /// same full name, before or after provider resolution. The chain is not
    /// modified on any error.
    pub fn add_plugin(&mut self, plugin: PluginSpec) -> Result<()> {
        self.ensure_unique(&plugin)?;

        let mut plugin = plugin;
        let provider = self.database.lookup_provides(plugin.name())?;
        if provider.name() != plugin.name() {
            debug!(
                "Resolved virtual plugin '{}' to provider '{}'",
                plugin.name(),
                provider.name()
            );
            plugin.set_name(provider.name())?;
            plugin.append_config(provider.config());
            self.ensure_unique(&plugin)?;
        }

        self.to_add.push(plugin);
        if let Err(e) = self.sort() {
            self.to_add.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove every plugin with the same full name as `plugin`.
    pub fn remove_plugin(&mut self, plugin: &PluginSpec) {
        self.to_add.retain(|p| !p.same_slot(plugin));
    }

    /// Queue whitespace separated plugin names as hard needs.
    pub fn need_plugin(&mut self, names: &str) {
        self.needed_plugins
            .extend(names.split_whitespace().map(str::to_string));
    }

    /// Queue whitespace separated plugin names as recommendations.
    pub fn recommend_plugin(&mut self, names: &str) {
        self.recommended_plugins
            .extend(names.split_whitespace().map(str::to_string));
    }

    /// Require plugins handling the whitespace separated metadata identifiers.
    pub fn need_metadata(&mut self, metadata: &str) {
        self.metadata
            .extend(metadata.split_whitespace().map(str::to_string));
    }

    /// Move the last plugin in front of the first plugin it must precede.
    ///
    /// Expects every plugin but the last to be in order already. At most one
    /// relocation is performed.
    pub fn sort(&mut self) -> Result<()> {
        let Some((last, earlier)) = self.to_add.split_last() else {
            return Ok(());
        };
        if let Some(index) = self.ordered_position(last, earlier)? {
            debug!(
                "Placing '{}' before '{}' to satisfy ordering",
                last, earlier[index]
            );
            self.to_add[index..].rotate_right(1);
        }
        Ok(())
    }

    /// Complete the chain.
    ///
    /// First the "plugins" info of every plugin already in the chain is
    /// added. Then, until nothing is outstanding, one item is resolved per
    /// round: the first unsatisfied need, else the smallest required
    /// metadata, else (with `add_recommends`) the first recommendation.
    /// Recommendations that are not installed are skipped and returned.
    ///
    /// Must only be called once, after all plugins were added.
    ///
    /// # Errors
    ///
    /// Errors of [`add_plugin`](Self::add_plugin) propagate unchanged, so an
    /// unresolvable need fails exactly like adding it directly would.
    /// [`Error::ResolutionDiverged`] if the configured iteration limit is
    /// exceeded.
    pub fn resolve_needs(&mut self, add_recommends: bool) -> Result<Vec<String>> {
        self.add_declared_plugins()?;

        let mut missing_recommends: Vec<String> = Vec::new();
        let mut iterations = 0;

        loop {
            self.collect_requirements(add_recommends)?;
            self.remove_provided(&missing_recommends)?;

            let outstanding = !self.needed_plugins.is_empty()
                || !self.metadata.is_empty()
                || (add_recommends && !self.recommended_plugins.is_empty());
            if !outstanding {
                break;
            }

            iterations += 1;
            if iterations > self.iteration_limit {
                return Err(Error::ResolutionDiverged {
                    iterations: self.iteration_limit,
                });
            }

            if let Some(need) = self.needed_plugins.front().cloned() {
                debug!("Adding needed plugin '{}'", need);
                self.add_plugin(PluginSpec::new(need)?)?;
                self.needed_plugins.pop_front();
            } else if let Some(metadata) = self.metadata.first().cloned() {
                let normalized = normalize_metadata(&metadata);
                let provider = self.database.lookup_metadata(&normalized)?;
                debug!("Adding '{}' to handle metadata '{}'", provider, metadata);
                self.add_plugin(provider)?;
                self.metadata.remove(&metadata);
            } else if let Some(recommend) = self.recommended_plugins.pop_front() {
                let plugin = PluginSpec::new(recommend.as_str())?;
                if self.database.status(&plugin) != PluginStatus::Missing {
                    debug!("Adding recommended plugin '{}'", recommend);
                    self.add_plugin(plugin)?;
                } else {
                    warn!("Recommended plugin '{}' is not installed", recommend);
                    missing_recommends.push(recommend);
                }
            }
        }

        Ok(missing_recommends)
    }

    /// Hand every plugin, in chain order, to `backend`.
    pub fn fill_plugins<B>(&self, backend: &mut B) -> Result<()>
    where
        B: BackendInterface + ?Sized,
    {
        for plugin in &self.to_add {
            backend.add_plugin(plugin)?;
        }
        Ok(())
    }

    fn ensure_unique(&self, plugin: &PluginSpec) -> Result<()> {
        if self.to_add.iter().any(|p| p.same_slot(plugin)) {
            return Err(Error::DuplicatePlugin {
                full_name: plugin.full_name(),
            });
        }
        Ok(())
    }

    /// Index of the first plugin in `earlier` that `inserted` must precede.
    fn ordered_position(
        &self,
        inserted: &PluginSpec,
        earlier: &[PluginSpec],
    ) -> Result<Option<usize>> {
        let ordering = self.database.lookup_tokens(inserted, InfoKey::Ordering)?;
        if ordering.is_empty() {
            return Ok(None);
        }

        for (index, other) in earlier.iter().enumerate() {
            if ordering.iter().any(|o| o == other.name()) {
                return Ok(Some(index));
            }
            let provides = self.database.lookup_tokens(other, InfoKey::Provides)?;
            if ordering.iter().any(|o| provides.contains(o)) {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Add the "plugins" info of the current chain. Plugins added here are
    /// not expanded again.
    fn add_declared_plugins(&mut self) -> Result<()> {
        let current: Vec<PluginSpec> = self.to_add.clone();
        for plugin in &current {
            let arguments = self.database.lookup_info(plugin, InfoKey::Plugins)?;
            for dependency in parse_arguments(&arguments)? {
                debug!("Adding '{}' declared by '{}'", dependency, plugin);
                self.add_plugin(dependency)?;
            }
        }
        Ok(())
    }

    fn collect_requirements(&mut self, add_recommends: bool) -> Result<()> {
        for plugin in &self.to_add {
            self.needed_plugins
                .extend(self.database.lookup_tokens(plugin, InfoKey::Needs)?);
            if add_recommends {
                self.recommended_plugins
                    .extend(self.database.lookup_tokens(plugin, InfoKey::Recommends)?);
            }
        }
        Ok(())
    }

    /// Drop everything the chain already satisfies from the queues.
    fn remove_provided(&mut self, missing_recommends: &[String]) -> Result<()> {
        let mut provided: HashSet<String> = HashSet::new();
        let mut handled_metadata: HashSet<String> = HashSet::new();

        for plugin in &self.to_add {
            provided.insert(plugin.name().to_string());
            provided.extend(self.database.lookup_tokens(plugin, InfoKey::Provides)?);
            handled_metadata.extend(
                self.database
                    .lookup_tokens(plugin, InfoKey::Metadata)?
                    .iter()
                    .map(|m| normalize_metadata(m)),
            );
        }

        // queued names keep their first position only
        let mut seen: HashSet<String> = HashSet::new();
        self.needed_plugins
            .retain(|n| !provided.contains(n) && seen.insert(n.clone()));
        seen.clear();
        self.recommended_plugins.retain(|r| {
            !provided.contains(r) && !missing_recommends.contains(r) && seen.insert(r.clone())
        });
        self.metadata
            .retain(|m| !handled_metadata.contains(&normalize_metadata(m)));
        Ok(())
    }
}

impl fmt::Debug for BackendBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendBuilder")
            .field("to_add", &self.to_add)
            .field("needed_plugins", &self.needed_plugins)
            .field("recommended_plugins", &self.recommended_plugins)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl<'a> IntoIterator for &'a BackendBuilder {
    type Item = &'a PluginSpec;
    type IntoIter = std::slice::Iter<'a, PluginSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.to_add.iter()
    }
}
