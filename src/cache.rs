use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;

/// Cache for README contents, keyed by repository full name
pub struct ReadmeCache {
    db: Db,
    ttl_hours: u32,
}

impl ReadmeCache {
    /// Create or open a cache in `cache_dir`
    pub fn new(cache_dir: &Path, ttl_hours: u32) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)?;

        let db_path = cache_dir.join("readmes.sled");
        let db = sled::open(db_path)?;

        Ok(Self { db, ttl_hours })
    }

    /// Cache key for a repository
    pub fn key(full_name: &str) -> String {
        format!("readme:{}", full_name)
    }

    /// Get a README from cache if it exists and is not expired
    pub fn get(&self, full_name: &str) -> Result<Option<String>> {
        let key = Self::key(full_name);
        if let Some(data) = self.db.get(&key)? {
            let cached: CachedReadme = serde_json::from_slice(&data)?;

            if self.is_expired(&cached.cached_at) {
                self.db.remove(&key)?;
                return Ok(None);
            }

            Ok(Some(cached.content))
        } else {
            Ok(None)
        }
    }

    /// Store a README in cache
    pub fn set(&self, full_name: &str, content: &str) -> Result<()> {
        let cached = CachedReadme {
            content: content.to_string(),
            cached_at: Utc::now(),
        };

        let data = serde_json::to_vec(&cached)?;
        self.db.insert(Self::key(full_name), data)?;
        self.db.flush()?;

        Ok(())
    }

    fn is_expired(&self, cached_at: &DateTime<Utc>) -> bool {
        let now = Utc::now();
        let ttl = Duration::hours(self.ttl_hours as i64);
        now - *cached_at > ttl
    }

    /// Clear all cache entries
    pub fn clear(&self) -> Result<()> {
        self.db.clear()?;
        self.db.flush()?;
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.db.len(),
            db_size_bytes: self.db.size_on_disk().unwrap_or(0),
        }
    }

    /// Remove expired entries
    pub fn cleanup_expired(&self) -> Result<usize> {
        let mut removed = 0;

        for item in self.db.iter() {
            let (key, value) = item?;

            if let Ok(cached) = serde_json::from_slice::<CachedReadme>(&value) {
                if self.is_expired(&cached.cached_at) {
                    self.db.remove(key)?;
                    removed += 1;
                }
            }
        }

        self.db.flush()?;
        Ok(removed)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedReadme {
    content: String,
    cached_at: DateTime<Utc>,
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub db_size_bytes: u64,
}

impl CacheStats {
    /// Format size in human-readable format
    pub fn format_size(&self) -> String {
        let bytes = self.db_size_bytes;
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.2} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cache_creation() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ReadmeCache::new(temp_dir.path(), 24).unwrap();
        assert_eq!(cache.ttl_hours, 24);
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(ReadmeCache::key("octo/widget"), "readme:octo/widget");
        assert_ne!(ReadmeCache::key("octo/widget"), ReadmeCache::key("octo/gadget"));
    }

    #[test]
    fn test_cache_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ReadmeCache::new(temp_dir.path(), 24).unwrap();

        cache.set("octo/widget", "# Widget").unwrap();

        assert_eq!(
            cache.get("octo/widget").unwrap().as_deref(),
            Some("# Widget")
        );
        assert!(cache.get("octo/other").unwrap().is_none());
    }

    #[test]
    fn test_cache_expiration() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ReadmeCache::new(temp_dir.path(), 0).unwrap();

        cache.set("octo/widget", "# Widget").unwrap();

        // 0 hour TTL expires as soon as any time has passed
        std::thread::sleep(std::time::Duration::from_millis(100));
        assert!(cache.get("octo/widget").unwrap().is_none());
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[test]
    fn test_cleanup_expired() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ReadmeCache::new(temp_dir.path(), 0).unwrap();

        cache.set("o/a", "a").unwrap();
        cache.set("o/b", "b").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(100));

        assert_eq!(cache.cleanup_expired().unwrap(), 2);
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[test]
    fn test_cache_clear() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ReadmeCache::new(temp_dir.path(), 24).unwrap();

        cache.set("o/a", "a").unwrap();
        cache.set("o/b", "b").unwrap();
        assert_eq!(cache.stats().total_entries, 2);

        cache.clear().unwrap();
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[test]
    fn test_format_size() {
        let stats = CacheStats {
            total_entries: 0,
            db_size_bytes: 512,
        };
        assert_eq!(stats.format_size(), "512 B");

        let stats = CacheStats {
            total_entries: 0,
            db_size_bytes: 2048,
        };
        assert_eq!(stats.format_size(), "2.00 KB");
    }
}
