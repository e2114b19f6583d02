//! Local snapshot caching
//!
//! Caches chain snapshots on disk to reduce API calls and enable offline
//! re-pricing.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::provider::{fetch_snapshot, ChainProvider, SpotProvider};
use crate::core::{ChainResult, ChainSnapshot};

const SNAPSHOT_SUFFIX: &str = "_snapshot.json";

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory
    pub cache_dir: PathBuf,
    /// Maximum age before refresh (in hours)
    pub max_age_hours: i64,
    /// Whether to use cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./data/cache"),
            max_age_hours: 24,
            enabled: true,
        }
    }
}

/// Snapshot cache manager
pub struct SnapshotCache {
    config: CacheConfig,
}

impl SnapshotCache {
    pub fn new(config: CacheConfig) -> ChainResult<Self> {
        if config.enabled && !config.cache_dir.exists() {
            fs::create_dir_all(&config.cache_dir)?;
        }

        Ok(Self { config })
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.config.cache_dir.join(format!("{}{}", symbol, SNAPSHOT_SUFFIX))
    }

    /// Check if cache is valid (exists and not expired)
    pub fn is_valid(&self, symbol: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        let modified = fs::metadata(self.path_for(symbol)).and_then(|m| m.modified());
        match modified {
            Ok(modified) => {
                let modified: DateTime<Utc> = modified.into();
                // Beyond the representable range the entry never goes stale
                match Duration::try_hours(self.config.max_age_hours) {
                    Some(max_age) => Utc::now() - modified < max_age,
                    None => true,
                }
            }
            Err(_) => false,
        }
    }

    /// Save snapshot to cache
    pub fn save(&self, snapshot: &ChainSnapshot) -> ChainResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let path = self.path_for(&snapshot.underlying);
        snapshot.save_json(&path)?;

        tracing::info!("Cached snapshot for {} at {:?}", snapshot.underlying, path);
        Ok(())
    }

    /// Load snapshot from cache if present and fresh
    pub fn load(&self, symbol: &str) -> ChainResult<Option<ChainSnapshot>> {
        if !self.is_valid(symbol) {
            return Ok(None);
        }

        let snapshot = ChainSnapshot::load_json(self.path_for(symbol))?;
        tracing::info!("Loaded snapshot for {} from cache", symbol);
        Ok(Some(snapshot))
    }

    /// Clear cache for a symbol
    pub fn clear(&self, symbol: &str) -> ChainResult<()> {
        let path = self.path_for(symbol);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// List cached symbols
    pub fn list_cached(&self) -> ChainResult<Vec<String>> {
        let mut symbols = Vec::new();

        if !self.config.cache_dir.exists() {
            return Ok(symbols);
        }

        for entry in fs::read_dir(&self.config.cache_dir)? {
            let file_name = entry?.file_name().to_string_lossy().to_string();
            if let Some(symbol) = file_name.strip_suffix(SNAPSHOT_SUFFIX) {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

/// Cached fetcher - combines cache with live providers
pub struct CachedFetcher {
    cache: SnapshotCache,
}

impl CachedFetcher {
    pub fn new(config: CacheConfig) -> ChainResult<Self> {
        Ok(Self {
            cache: SnapshotCache::new(config)?,
        })
    }

    /// Get snapshot (from cache or fetch).
    ///
    /// The full chain is cached and `max_expiries` is applied on the way
    /// out, so a narrow request never hides expiries from a later one. A
    /// cached snapshot taken against a different `as_of` is refetched.
    pub fn get_snapshot<S, C>(
        &self,
        spot: &S,
        chains: &C,
        symbol: &str,
        as_of: NaiveDate,
        max_expiries: Option<usize>,
    ) -> ChainResult<ChainSnapshot>
    where
        S: SpotProvider + ?Sized,
        C: ChainProvider + ?Sized,
    {
        let limit = |snapshot: ChainSnapshot| match max_expiries {
            Some(n) => snapshot.with_max_expiries(n),
            None => snapshot,
        };

        if let Some(snapshot) = self.cache.load(symbol)? {
            if snapshot.as_of == as_of {
                return Ok(limit(snapshot));
            }
            tracing::info!("Cached snapshot for {} is from {}, refetching", symbol, snapshot.as_of);
        }

        tracing::info!("Fetching fresh data for {}", symbol);
        let snapshot = fetch_snapshot(spot, chains, symbol, as_of, None)?;
        self.cache.save(&snapshot)?;

        Ok(limit(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExpiryChain, OptionContract, OptionType};
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config(dir: &std::path::Path) -> CacheConfig {
        CacheConfig {
            cache_dir: dir.to_path_buf(),
            max_age_hours: 24,
            enabled: true,
        }
    }

    fn source(as_of: NaiveDate) -> ChainSnapshot {
        let mut snapshot = ChainSnapshot::new("TEST", 100.0, as_of);
        let expiry = date(2025, 4, 17);
        let mut chain = ExpiryChain::new(expiry);
        chain.push(OptionContract::new("T100C", OptionType::Call, 100.0, expiry).with_implied_vol(0.3));
        snapshot.add_chain(chain);
        snapshot
    }

    #[test]
    fn test_cache_operations() {
        let temp_dir = tempdir().unwrap();
        let cache = SnapshotCache::new(config(temp_dir.path())).unwrap();

        let snapshot = source(date(2025, 3, 1));
        cache.save(&snapshot).unwrap();

        assert!(cache.is_valid("TEST"));
        assert_eq!(cache.list_cached().unwrap(), vec!["TEST".to_string()]);

        let loaded = cache.load("TEST").unwrap();
        assert_eq!(loaded, Some(snapshot));

        cache.clear("TEST").unwrap();
        assert!(!cache.is_valid("TEST"));
        assert!(cache.load("TEST").unwrap().is_none());
    }

    #[test]
    fn test_disabled_cache() {
        let temp_dir = tempdir().unwrap();
        let cache = SnapshotCache::new(CacheConfig {
            enabled: false,
            ..config(temp_dir.path())
        })
        .unwrap();

        cache.save(&source(date(2025, 3, 1))).unwrap();
        assert!(!cache.is_valid("TEST"));
        assert!(cache.list_cached().unwrap().is_empty());
    }

    #[test]
    fn test_expired_entry() {
        let temp_dir = tempdir().unwrap();
        let cache = SnapshotCache::new(CacheConfig {
            max_age_hours: 0,
            ..config(temp_dir.path())
        })
        .unwrap();

        cache.save(&source(date(2025, 3, 1))).unwrap();
        assert!(!cache.is_valid("TEST"));
    }

    #[test]
    fn test_fetcher_refetches_on_new_as_of() {
        let temp_dir = tempdir().unwrap();
        let fetcher = CachedFetcher::new(config(temp_dir.path())).unwrap();

        let day1 = source(date(2025, 3, 1));
        let first = fetcher.get_snapshot(&day1, &day1, "TEST", date(2025, 3, 1), None).unwrap();
        assert_eq!(first.as_of, date(2025, 3, 1));

        // Served from cache even though the provider changed
        let day1_moved = ChainSnapshot { spot: 101.0, ..day1.clone() };
        let cached = fetcher.get_snapshot(&day1_moved, &day1_moved, "TEST", date(2025, 3, 1), None).unwrap();
        assert_eq!(cached.spot, 100.0);

        let day2 = ChainSnapshot { spot: 102.0, ..source(date(2025, 3, 2)) };
        let fresh = fetcher.get_snapshot(&day2, &day2, "TEST", date(2025, 3, 2), None).unwrap();
        assert_eq!(fresh.spot, 102.0);
        assert_eq!(fresh.as_of, date(2025, 3, 2));
    }

    #[test]
    fn test_huge_max_age_never_stale() {
        let temp_dir = tempdir().unwrap();
        let cache = SnapshotCache::new(CacheConfig {
            max_age_hours: i64::MAX,
            ..config(temp_dir.path())
        })
        .unwrap();

        assert!(!cache.is_valid("TEST"));
        cache.save(&source(date(2025, 3, 1))).unwrap();
        assert!(cache.is_valid("TEST"));
    }

    #[test]
    fn test_narrow_request_does_not_truncate_cache() {
        let temp_dir = tempdir().unwrap();
        let fetcher = CachedFetcher::new(config(temp_dir.path())).unwrap();

        let mut src = source(date(2025, 3, 1));
        for expiry in [date(2025, 3, 21), date(2025, 5, 16)] {
            let mut chain = ExpiryChain::new(expiry);
            chain.push(OptionContract::new("T100P", OptionType::Put, 100.0, expiry).with_implied_vol(0.3));
            src.add_chain(chain);
        }

        let narrow = fetcher.get_snapshot(&src, &src, "TEST", date(2025, 3, 1), Some(1)).unwrap();
        assert_eq!(narrow.expiries.len(), 1);
        assert_eq!(narrow.expiries[0].expiry, date(2025, 3, 21));

        let full = fetcher.get_snapshot(&src, &src, "TEST", date(2025, 3, 1), None).unwrap();
        assert_eq!(full.expiries.len(), 3);

        let two = fetcher.get_snapshot(&src, &src, "TEST", date(2025, 3, 1), Some(2)).unwrap();
        assert_eq!(two.expiries.len(), 2);
    }
}
