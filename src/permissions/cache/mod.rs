/*!
 * Pattern Cache
 * Compiled permission-name patterns keyed by the stored name
 *
 * A compiled form depends only on the name it was built from, so entries never
 * go stale when the store changes; eviction and `clear` only reclaim memory.
 */

use crate::core::limits::{DEFAULT_PATTERN_CACHE_SIZE, PATTERN_SIZE_LIMIT};
use crate::core::InlineString;
use ahash::RandomState;
use dashmap::DashMap;
use regex::{Regex, RegexBuilder};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// How a stored permission name is matched
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    /// No regex metacharacters; plain string equality
    Literal,
    /// Anchored regular expression
    Regex(Regex),
    /// Failed to compile; never matches
    Invalid,
}

impl CompiledPattern {
    /// Compile `name` anchored at both ends
    ///
    /// The name is wrapped in a non-capturing group so alternations such as
    /// `a|b` are anchored as a whole.
    pub fn compile(name: &str) -> Self {
        if regex::escape(name) == name {
            return CompiledPattern::Literal;
        }

        match RegexBuilder::new(&format!("^(?:{})$", name))
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
        {
            Ok(re) => CompiledPattern::Regex(re),
            Err(e) => {
                warn!(pattern = name, error = %e, "ignoring malformed permission pattern");
                CompiledPattern::Invalid
            }
        }
    }

    #[inline]
    pub fn is_match(&self, name: &str, candidate: &str) -> bool {
        match self {
            CompiledPattern::Literal => name == candidate,
            CompiledPattern::Regex(re) => re.is_match(candidate),
            CompiledPattern::Invalid => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, CompiledPattern::Invalid)
    }
}

/// Bounded concurrent cache of compiled patterns
///
/// # Performance
/// - Cache-line aligned so the hit/miss counters bumped on every request do not
///   share a line with neighbouring data
#[repr(C, align(64))]
pub struct PatternCache {
    cache: DashMap<InlineString, CompiledPattern, RandomState>,
    max_size: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    invalid: AtomicU64,
}

impl PatternCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: DashMap::with_capacity_and_hasher(max_size.min(1024), RandomState::new()),
            max_size: max_size.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalid: AtomicU64::new(0),
        }
    }

    /// Test `candidate` against the stored permission `name`
    ///
    /// Compiles and caches on first use. Malformed names count as a miss for
    /// this entry only and are remembered so they are not recompiled.
    pub fn matches(&self, name: &str, candidate: &str) -> bool {
        if let Some(entry) = self.cache.get(name) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return entry.is_match(name, candidate);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let compiled = CompiledPattern::compile(name);
        if !compiled.is_valid() {
            self.invalid.fetch_add(1, Ordering::Relaxed);
        }
        let matched = compiled.is_match(name, candidate);
        self.put(name, compiled);
        matched
    }

    fn put(&self, name: &str, compiled: CompiledPattern) {
        // Remove an arbitrary entry if full. The iterator holds a shard read
        // lock, so it must be gone before `remove` takes the write lock.
        if self.cache.len() >= self.max_size {
            let victim = self.cache.iter().next().map(|entry| entry.key().clone());
            if let Some(key) = victim {
                self.cache.remove(&key);
            }
        }
        self.cache.insert(name.into(), compiled);
    }

    /// Whether `name` is cached, and whether it compiled
    pub fn lookup(&self, name: &str) -> Option<bool> {
        self.cache.get(name).map(|entry| entry.is_valid())
    }

    pub fn invalidate(&self, name: &str) {
        self.cache.remove(name);
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            size: self.cache.len(),
            max_size: self.max_size,
            hits,
            misses,
            invalid: self.invalid.load(Ordering::Relaxed),
            hit_rate,
        }
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN_CACHE_SIZE)
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    /// Names that failed to compile
    pub invalid: u64,
    pub hit_rate: f64,
}
