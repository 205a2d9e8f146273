//! Oracle reuse keyed by graph identity.

use std::path::PathBuf;
use std::sync::Arc;

use fnv::FnvHashMap;
use tracing::{info, warn};

use super::DistanceOracle;
use crate::error::Result;
use crate::models::Graph;

/// Hands out one shared [`DistanceOracle`] per graph fingerprint.
///
/// With a directory attached, a miss first tries
/// `<dir>/<fingerprint>.json` and a fresh build is written there.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_facility::models::{GraphBuilder, Node};
/// use u_facility::distance::OracleCache;
///
/// let graph = GraphBuilder::new()
///     .node(Node::new(0, 45.0, 7.0).unwrap())
///     .node(Node::new(1, 45.0, 8.0).unwrap())
///     .edge(0, 1, None)
///     .build()
///     .unwrap();
///
/// let mut cache = OracleCache::new();
/// let a = cache.get_or_build(&graph).unwrap();
/// let b = cache.get_or_build(&graph).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(cache.builds(), 1);
/// ```
#[derive(Debug, Default)]
pub struct OracleCache {
    entries: FnvHashMap<u64, Arc<DistanceOracle>>,
    directory: Option<PathBuf>,
    builds: usize,
}

impl OracleCache {
    /// Creates an in-memory cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists oracles as JSON files under `directory`.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Returns the oracle for `graph`, loading or building it on first use.
    pub fn get_or_build(&mut self, graph: &Graph) -> Result<Arc<DistanceOracle>> {
        let key = graph.fingerprint();
        if let Some(oracle) = self.entries.get(&key) {
            return Ok(Arc::clone(oracle));
        }

        let file = self.file_for(key);
        if let Some(path) = file.as_ref().filter(|p| p.exists()) {
            match DistanceOracle::load(path, graph) {
                Ok(oracle) => {
                    info!(path = %path.display(), "distance cache hit on disk");
                    return Ok(self.insert(key, oracle));
                }
                Err(e) => warn!(path = %path.display(), error = %e, "ignoring unusable distance cache"),
            }
        }

        let oracle = DistanceOracle::build(graph)?;
        self.builds += 1;
        if let Some(path) = file {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            oracle.save(&path)?;
        }
        Ok(self.insert(key, oracle))
    }

    /// Number of oracles computed (not loaded) by this cache.
    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: u64, oracle: DistanceOracle) -> Arc<DistanceOracle> {
        let oracle = Arc::new(oracle);
        self.entries.insert(key, Arc::clone(&oracle));
        oracle
    }

    fn file_for(&self, key: u64) -> Option<PathBuf> {
        self.directory
            .as_ref()
            .map(|d| d.join(format!("{key:016x}.json")))
    }
}
