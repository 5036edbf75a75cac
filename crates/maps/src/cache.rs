//! Map cache
//!
//! Keeps finished maps in memory so revisiting a map does not re-parse its
//! file. Maps are immutable once loaded and are shared as `Arc<Map>`.

use crate::loader::MapLoader;
use crate::map::Map;
use crate::Result;
use dashmap::DashMap;
use mapdef_config::LoaderConfig;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of maps to keep in cache
    pub max_maps: usize,

    /// Entries older than this are reloaded (`None` = no expiration)
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_maps: 32,
            ttl: None,
        }
    }
}

impl From<&LoaderConfig> for CacheConfig {
    fn from(config: &LoaderConfig) -> Self {
        Self {
            max_maps: config.cache_max_maps.max(1),
            ttl: (config.cache_ttl_secs > 0).then(|| Duration::from_secs(config.cache_ttl_secs)),
        }
    }
}

/// Cache entry with metadata
#[derive(Debug)]
struct CacheEntry {
    map: Arc<Map>,

    /// Access sequence number; higher is more recent
    last_accessed: u64,

    loaded_at: Instant,

    /// Approximate size in bytes
    size_bytes: usize,
}

/// Map cache with LRU eviction
pub struct MapCache {
    /// Cached maps indexed by file name relative to `maps_dir`
    cache: DashMap<String, CacheEntry>,

    maps_dir: PathBuf,

    loader: MapLoader,

    config: CacheConfig,

    access_counter: AtomicU64,

    memory_usage: AtomicUsize,
}

impl MapCache {
    pub fn new<P: AsRef<Path>>(maps_dir: P, loader: MapLoader, config: CacheConfig) -> Self {
        Self {
            cache: DashMap::new(),
            maps_dir: maps_dir.as_ref().to_path_buf(),
            loader,
            config,
            access_counter: AtomicU64::new(0),
            memory_usage: AtomicUsize::new(0),
        }
    }

    /// Create a new map cache with the default loader and config
    pub fn with_defaults<P: AsRef<Path>>(maps_dir: P) -> Self {
        Self::new(maps_dir, MapLoader::default(), CacheConfig::default())
    }

    /// Get a map from cache or load it
    pub fn get(&self, name: &str) -> Result<Arc<Map>> {
        let tick = self.next_tick();
        if let Some(mut entry) = self.cache.get_mut(name) {
            if !self.is_expired(&entry) {
                entry.last_accessed = tick;
                return Ok(Arc::clone(&entry.map));
            }
        }

        self.load_map(name)
    }

    /// Load a map from disk and cache it
    fn load_map(&self, name: &str) -> Result<Arc<Map>> {
        let loaded = self.loader.load_file(self.maps_dir.join(name))?;
        let map = Arc::new(loaded.map);
        let size_bytes = Self::estimate_size(&map);

        self.remove(name);
        self.cleanup_if_needed();

        let entry = CacheEntry {
            map: Arc::clone(&map),
            last_accessed: self.next_tick(),
            loaded_at: Instant::now(),
            size_bytes,
        };
        self.cache.insert(name.to_string(), entry);
        self.memory_usage.fetch_add(size_bytes, Ordering::Relaxed);

        Ok(map)
    }

    /// Reload a map from disk (refresh cache)
    pub fn reload(&self, name: &str) -> Result<Arc<Map>> {
        self.remove(name);
        self.load_map(name)
    }

    /// Remove a map from cache
    pub fn remove(&self, name: &str) {
        if let Some((_, entry)) = self.cache.remove(name) {
            self.memory_usage.fetch_sub(entry.size_bytes, Ordering::Relaxed);
        }
    }

    /// Clear all cached maps
    pub fn clear(&self) {
        self.cache.clear();
        self.memory_usage.store(0, Ordering::Relaxed);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            num_maps: self.cache.len(),
            total_memory_bytes: self.memory_usage.load(Ordering::Relaxed),
        }
    }

    /// Load several maps ahead of time
    pub fn preload(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.get(name)?;
        }
        Ok(())
    }

    /// Evict least recently used maps until there is room for one more
    fn cleanup_if_needed(&self) {
        while self.cache.len() >= self.config.max_maps {
            let oldest = self
                .cache
                .iter()
                .min_by_key(|entry| entry.last_accessed)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(name) => {
                    tracing::debug!("Evicting map '{}' from cache", name);
                    self.remove(&name);
                }
                None => break,
            }
        }
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.config
            .ttl
            .is_some_and(|ttl| entry.loaded_at.elapsed() > ttl)
    }

    fn next_tick(&self) -> u64 {
        self.access_counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Estimate memory size of a map
    fn estimate_size(map: &Map) -> usize {
        let mut size = std::mem::size_of::<Map>();

        for layer in &map.layers {
            size += layer.data().len() * std::mem::size_of::<u16>();
        }

        size += map.enemy_groups.len() * std::mem::size_of::<crate::enemy::EnemyGroup>();
        size += map.npcs.len() * std::mem::size_of::<crate::npc::Npc>();
        size += map.events.len() * std::mem::size_of::<crate::event::Event>();
        size += map.statblocks.len() * std::mem::size_of::<crate::statblock::StatBlock>();

        size
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub num_maps: usize,

    /// Approximate memory held by cached maps
    pub total_memory_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapError;
    use tempfile::TempDir;

    const MAP_DATA: &str = "[header]\nwidth=2\nheight=1\n[layer]\ntype=background\ndata=\n1,2,\n";

    fn write_maps(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), MAP_DATA).unwrap();
        }
    }

    #[test]
    fn test_cache_miss() {
        let temp_dir = TempDir::new().unwrap();
        write_maps(temp_dir.path(), &["test.txt"]);

        let cache = MapCache::with_defaults(temp_dir.path());
        let map = cache.get("test.txt").unwrap();

        assert_eq!(map.filename, temp_dir.path().join("test.txt"));
        assert_eq!(map.layers.len(), 2);
        assert!(cache.contains("test.txt"));
    }

    #[test]
    fn test_cache_hit() {
        let temp_dir = TempDir::new().unwrap();
        write_maps(temp_dir.path(), &["test.txt"]);

        let cache = MapCache::with_defaults(temp_dir.path());
        let map1 = cache.get("test.txt").unwrap();
        let map2 = cache.get("test.txt").unwrap();

        assert!(Arc::ptr_eq(&map1, &map2));
    }

    #[test]
    fn test_cache_reload() {
        let temp_dir = TempDir::new().unwrap();
        write_maps(temp_dir.path(), &["test.txt"]);

        let cache = MapCache::with_defaults(temp_dir.path());
        let map1 = cache.get("test.txt").unwrap();
        let map2 = cache.reload("test.txt").unwrap();

        assert!(!Arc::ptr_eq(&map1, &map2));
        assert_eq!(*map1, *map2);
        assert_eq!(cache.stats().num_maps, 1);
    }

    #[test]
    fn test_cache_eviction() {
        let temp_dir = TempDir::new().unwrap();
        write_maps(temp_dir.path(), &["a.txt", "b.txt", "c.txt"]);

        let config = CacheConfig {
            max_maps: 2,
            ..Default::default()
        };
        let cache = MapCache::new(temp_dir.path(), MapLoader::default(), config);

        cache.get("a.txt").unwrap();
        cache.get("b.txt").unwrap();
        // Touch "a" so "b" is the least recently used
        cache.get("a.txt").unwrap();
        cache.get("c.txt").unwrap();

        assert_eq!(cache.stats().num_maps, 2);
        assert!(cache.contains("a.txt"));
        assert!(!cache.contains("b.txt"));
        assert!(cache.contains("c.txt"));
    }

    #[test]
    fn test_cache_stats_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        write_maps(temp_dir.path(), &["a.txt", "b.txt"]);

        let cache = MapCache::with_defaults(temp_dir.path());
        cache.preload(&["a.txt", "b.txt"]).unwrap();

        let stats = cache.stats();
        assert_eq!(stats.num_maps, 2);
        assert!(stats.total_memory_bytes > 0);

        cache.clear();
        assert_eq!(cache.stats(), CacheStats { num_maps: 0, total_memory_bytes: 0 });
    }

    #[test]
    fn test_missing_map_is_not_cached() {
        let temp_dir = TempDir::new().unwrap();
        let cache = MapCache::with_defaults(temp_dir.path());

        let err = cache.get("missing.txt").unwrap_err();
        assert!(matches!(err, MapError::NotFound(_)));
        assert_eq!(cache.stats().num_maps, 0);
    }

    #[test]
    fn test_config_from_loader_config() {
        let loader_config = LoaderConfig {
            cache_max_maps: 3,
            cache_ttl_secs: 60,
            ..Default::default()
        };
        let config = CacheConfig::from(&loader_config);
        assert_eq!(config.max_maps, 3);
        assert_eq!(config.ttl, Some(Duration::from_secs(60)));
    }
}
