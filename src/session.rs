//! Map session: directory, filter, index and the most recent viewport.
//!
//! A [`MapSession`] is the single owner of everything the map screen needs.
//! Replacing the directory or the filter rebuilds the index and drops the
//! last query result, so markers rendered from an older index can no longer
//! be activated.

use crate::builder::IndexBuilder;
use crate::config::Config;
use crate::error::Result;
use crate::filter::DirectoryFilter;
use crate::index::{ClusterId, ClusterIndex, QueryResult};
use crate::interaction::{self, MapView};
use crate::markers::{self, MarkerInstruction};
use mapa_types::bbox::LngLatBounds;
use mapa_types::point::UserPoint;
use rustc_hash::FxHashMap;

/// Storage for small pieces of per-session state.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// A [`KeyValueStore`] that lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

const INTRO_SEEN_KEY: &str = "heroSeen";

/// Per-session flags backed by a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct SessionState<S = MemoryStore> {
    store: S,
}

impl<S: KeyValueStore> SessionState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Whether the intro banner was dismissed in this session.
    pub fn intro_dismissed(&self) -> bool {
        self.store.get(INTRO_SEEN_KEY).as_deref() == Some("true")
    }

    pub fn dismiss_intro(&mut self) {
        self.store.set(INTRO_SEEN_KEY, "true");
    }

    pub fn reset_intro(&mut self) {
        self.store.remove(INTRO_SEEN_KEY);
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// State behind one map screen.
///
/// ```
/// use mapa::config::Config;
/// use mapa::session::MapSession;
/// use mapa::{Point, UserPoint};
///
/// let mut session = MapSession::new(Config::default())?;
/// session.apply_directory(vec![
///     UserPoint::new("a", "Ana", Point::new(-58.3816, -34.6037)),
///     UserPoint::new("b", "Beto", Point::new(-58.3817, -34.6038)),
/// ])?;
///
/// let result = session.query(None, 5.0);
/// assert_eq!(result.len(), 1);
/// assert_eq!(session.markers().len(), 1);
/// # Ok::<(), mapa::MapaError>(())
/// ```
#[derive(Debug)]
pub struct MapSession<S = MemoryStore> {
    config: Config,
    directory: Vec<UserPoint>,
    filter: DirectoryFilter,
    index: ClusterIndex,
    last_query: Option<QueryResult>,
    state: SessionState<S>,
}

impl MapSession<MemoryStore> {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_store(config, MemoryStore::new())
    }
}

impl<S: KeyValueStore> MapSession<S> {
    /// Create a session keeping its flags in `store`.
    pub fn with_store(config: Config, store: S) -> Result<Self> {
        config.check()?;
        let index = IndexBuilder::new()
            .options(config.cluster.clone())
            .build(Vec::new())?;

        Ok(Self {
            config,
            directory: Vec::new(),
            filter: DirectoryFilter::all(),
            index,
            last_query: None,
            state: SessionState::new(store),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn directory(&self) -> &[UserPoint] {
        &self.directory
    }

    pub fn filter(&self) -> &DirectoryFilter {
        &self.filter
    }

    pub fn index(&self) -> &ClusterIndex {
        &self.index
    }

    pub fn last_query(&self) -> Option<&QueryResult> {
        self.last_query.as_ref()
    }

    pub fn state(&self) -> &SessionState<S> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState<S> {
        &mut self.state
    }

    /// Replace the directory with a freshly fetched one.
    pub fn apply_directory(&mut self, users: Vec<UserPoint>) -> Result<()> {
        self.directory = users;
        self.rebuild()
    }

    pub fn set_filter(&mut self, filter: DirectoryFilter) -> Result<()> {
        if filter == self.filter {
            return Ok(());
        }
        self.filter = filter;
        self.rebuild()
    }

    pub fn clear_filter(&mut self) -> Result<()> {
        self.set_filter(DirectoryFilter::all())
    }

    fn rebuild(&mut self) -> Result<()> {
        let visible = self.filter.apply(&self.directory).cloned();
        let index = IndexBuilder::new()
            .options(self.config.cluster.clone())
            .build(visible)?;

        log::debug!(
            "Rebuilt map index: {} of {} users visible",
            index.len(),
            self.directory.len()
        );
        self.index = index;
        self.last_query = None;
        Ok(())
    }

    /// Query the current index for a viewport and remember the result.
    ///
    /// The zoom is first held within the configured view limits.
    pub fn query(&mut self, bounds: Option<&LngLatBounds>, zoom: f64) -> &QueryResult {
        let zoom = self.config.view.clamp(zoom);
        self.last_query.insert(self.index.query(bounds, zoom))
    }

    /// Markers for the most recent query, empty when there is none.
    pub fn markers(&self) -> Vec<MarkerInstruction> {
        match &self.last_query {
            Some(result) => markers::render_markers(&self.index, result, &self.config.markers),
            None => Vec::new(),
        }
    }

    pub fn on_cluster_activate<V: MapView + ?Sized>(&self, id: ClusterId, view: &mut V) -> bool {
        match &self.last_query {
            Some(result) => interaction::on_cluster_activate(&self.index, result, id, view),
            None => false,
        }
    }

    pub fn on_leaf_activate<V: MapView + ?Sized>(&self, user_id: &str, view: &mut V) -> bool {
        match &self.last_query {
            Some(result) => interaction::on_leaf_activate(&self.index, result, user_id, view),
            None => false,
        }
    }
}
