//! File Cache Module
//!
//! Directory-backed TTL cache for enriched recommendation results. Entries
//! survive process restarts; validity is decided solely by the cache file's
//! modification time at read time. All I/O failures are swallowed — caching
//! is best-effort and never fails a request.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

/// Canonical representation of a normalized suggest request, hashed to name
/// the cache file. Field order matters: it fixes the serialized key layout.
#[derive(Serialize)]
struct CanonicalKey<'a> {
    ings: &'a [String],
    number: Option<i64>,
    prefetch: i64,
}

// == File Cache ==
/// TTL-based JSON cache keyed by a hash of the normalized request parameters.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    ttl_secs: u64,
}

impl FileCache {
    /// Creates a new FileCache rooted at `dir` with the given TTL.
    ///
    /// The directory is created lazily on first write, not here.
    pub fn new(dir: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            dir: dir.into(),
            ttl_secs,
        }
    }

    /// Derives the cache fingerprint for a normalized request.
    ///
    /// `ingredients` must already be lower-cased and sorted; the canonical
    /// compact JSON of (ingredients, number, prefetch) is hashed so that any
    /// permutation of the same request maps to the same file.
    pub fn fingerprint(ingredients: &[String], number: Option<i64>, prefetch: i64) -> String {
        let key = CanonicalKey {
            ings: ingredients,
            number,
            prefetch,
        };
        // Serializing a struct with known field types cannot fail
        let canonical = serde_json::to_string(&key).unwrap_or_default();
        hex::encode(Sha256::digest(canonical.as_bytes()))
    }

    /// Path of the cache file for a fingerprint.
    fn cache_path(&self, fingerprint: &str) -> PathBuf {
        self.dir.join(format!("recipes_{fingerprint}.json"))
    }

    /// Reads the cached payload for `fingerprint`.
    ///
    /// Returns `Some` only if the file exists, is younger than the TTL, parses
    /// as JSON, and passes the structural sanity check. Corrupt or stale files
    /// are treated as misses so the caller recomputes.
    pub fn read(&self, fingerprint: &str) -> Option<Value> {
        let path = self.cache_path(fingerprint);
        if !is_fresh(&path, self.ttl_secs) {
            return None;
        }

        let content = fs::read_to_string(&path).ok()?;
        let payload: Value = match serde_json::from_str(&content) {
            Ok(v) => v,
            Err(err) => {
                warn!(path = %path.display(), %err, "discarding unparseable cache file");
                return None;
            }
        };

        if !payload_looks_valid(&payload) {
            debug!(path = %path.display(), "cached payload failed structural check");
            return None;
        }

        debug!(path = %path.display(), "file cache hit");
        Some(payload)
    }

    /// Writes `payload` for `fingerprint` via a temporary file renamed over
    /// the target path. Failures are logged and otherwise ignored.
    pub fn write(&self, fingerprint: &str, payload: &Value) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            warn!(dir = %self.dir.display(), %err, "cannot create cache directory");
            return;
        }

        let path = self.cache_path(fingerprint);
        let tmp_path = self.dir.join(format!("recipes_{fingerprint}.json.tmp"));

        let bytes = match serde_json::to_vec(payload) {
            Ok(b) => b,
            Err(err) => {
                warn!(%err, "cannot serialize cache payload");
                return;
            }
        };

        if let Err(err) = fs::write(&tmp_path, bytes) {
            warn!(path = %tmp_path.display(), %err, "cache write failed");
            return;
        }
        if let Err(err) = fs::rename(&tmp_path, &path) {
            warn!(path = %path.display(), %err, "cache rename failed");
            let _ = fs::remove_file(&tmp_path);
        }
    }
}

/// True if the file exists and its mtime is within the TTL window.
fn is_fresh(path: &Path, ttl_secs: u64) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    match SystemTime::now().duration_since(modified) {
        Ok(age) => age.as_secs() < ttl_secs,
        // mtime in the future: treat as fresh rather than thrashing
        Err(_) => true,
    }
}

/// Structural sanity check for a cached payload: it must be an array where at
/// least one element is an object whose `ingredients` field is itself an
/// array. This is deliberately weak — it guards against truncated or foreign
/// files, not against partially malformed records.
fn payload_looks_valid(payload: &Value) -> bool {
    match payload.as_array() {
        Some(items) => items
            .iter()
            .any(|item| item.get("ingredients").map_or(false, Value::is_array)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_cache(ttl_secs: u64) -> (FileCache, TempDir) {
        let temp_dir = TempDir::new().expect("temp dir");
        let cache = FileCache::new(temp_dir.path(), ttl_secs);
        (cache, temp_dir)
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let ings = vec!["chicken".to_string(), "rice".to_string()];
        let a = FileCache::fingerprint(&ings, Some(5), 5);
        let b = FileCache::fingerprint(&ings, Some(5), 5);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64); // sha-256 hex
    }

    #[test]
    fn test_fingerprint_varies_with_parameters() {
        let ings = vec!["chicken".to_string(), "rice".to_string()];
        let base = FileCache::fingerprint(&ings, Some(5), 5);
        assert_ne!(base, FileCache::fingerprint(&ings, Some(10), 5));
        assert_ne!(base, FileCache::fingerprint(&ings, Some(5), 0));
        assert_ne!(base, FileCache::fingerprint(&ings, None, 5));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let (cache, _dir) = create_test_cache(3600);
        let payload = json!([{"id": 1, "ingredients": [{"name": "rice"}]}]);

        cache.write("abc", &payload);
        assert_eq!(cache.read("abc"), Some(payload));
    }

    #[test]
    fn test_read_missing_entry_is_none() {
        let (cache, _dir) = create_test_cache(3600);
        assert!(cache.read("missing").is_none());
    }

    #[test]
    fn test_zero_ttl_always_misses() {
        let (cache, _dir) = create_test_cache(0);
        let payload = json!([{"ingredients": []}]);

        cache.write("abc", &payload);
        assert!(cache.read("abc").is_none());
    }

    #[test]
    fn test_write_leaves_no_tmp_file() {
        let (cache, dir) = create_test_cache(3600);
        cache.write("abc", &json!([{"ingredients": []}]));

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_non_list_ingredients_field_is_invalid() {
        let (cache, dir) = create_test_cache(3600);
        let path = dir.path().join("recipes_abc.json");
        fs::write(&path, r#"[{"ingredients": "not-a-list"}]"#).unwrap();

        assert!(cache.read("abc").is_none());
    }

    #[test]
    fn test_empty_ingredients_list_is_valid() {
        let (cache, dir) = create_test_cache(3600);
        let path = dir.path().join("recipes_abc.json");
        fs::write(&path, r#"[{"ingredients": []}]"#).unwrap();

        assert_eq!(cache.read("abc"), Some(json!([{"ingredients": []}])));
    }

    #[test]
    fn test_one_valid_record_validates_the_array() {
        // The structural check is a heuristic: a single well-formed record
        // is enough to accept the whole array.
        let (cache, dir) = create_test_cache(3600);
        let path = dir.path().join("recipes_abc.json");
        fs::write(&path, r#"[{"broken": true}, {"ingredients": []}]"#).unwrap();

        assert!(cache.read("abc").is_some());
    }

    #[test]
    fn test_non_array_payload_is_invalid() {
        let (cache, dir) = create_test_cache(3600);
        let path = dir.path().join("recipes_abc.json");
        fs::write(&path, r#"{"ingredients": []}"#).unwrap();

        assert!(cache.read("abc").is_none());
    }

    #[test]
    fn test_unparseable_file_is_a_miss() {
        let (cache, dir) = create_test_cache(3600);
        let path = dir.path().join("recipes_abc.json");
        fs::write(&path, "{{{{ not json").unwrap();

        assert!(cache.read("abc").is_none());
    }
}
