//! Type-erased per-identity widget state.
//!
//! [`WidgetStateCache`] maps an identity key to whatever state the widget of
//! that kind needs (a text field's buffer and cursor, a slider's fraction).
//! The caller never names or allocates that state: the first call for a key
//! builds it with the widget's factory, later calls hand back the same value.
//!
//! # Design Invariants
//!
//! 1. **Idempotent creation**: the factory runs at most once per key for the
//!    life of the entry.
//! 2. **Shape stability**: an entry keeps the concrete type it was created
//!    with. Asking for a different type is a programming error.
//! 3. **Own clock**: generations advance only through
//!    [`begin_frame`](WidgetStateCache::begin_frame), so a cache that is not
//!    being rendered (a closed window) never ages its entries.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Shape mismatch | Same key, different state type | [`get_or_create`](WidgetStateCache::get_or_create) panics; `try_` variant returns [`CacheError`] |
//! | Identity collision | Key touched twice in one frame | Entry shared, collision recorded and logged at `warn` |
//! | Idle entry | Not touched for `n` frames under `MaxIdleFrames(n)` | Evicted at the next `begin_frame` |

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use imkit_core::geometry::Rect;

/// Errors from typed cache access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The entry under `key` holds a `stored`, not a `requested`.
    ShapeMismatch {
        key: String,
        stored: &'static str,
        requested: &'static str,
    },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                key,
                stored,
                requested,
            } => write!(
                f,
                "widget state for key {key:?} is a {stored}, requested {requested}"
            ),
        }
    }
}

impl std::error::Error for CacheError {}

/// How long untouched entries survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheRetention {
    /// Entries live as long as the cache.
    #[default]
    KeepAll,
    /// Entries untouched for more than `n` of this cache's frames are dropped.
    MaxIdleFrames(u64),
}

/// A key touched more than once within a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityCollision {
    pub key: String,
    pub frame: u64,
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    /// Entries built by a factory since the cache was created.
    pub created: u64,
    pub evicted: u64,
    /// Collisions recorded in the current frame.
    pub collisions: usize,
}

struct Slot {
    value: Box<dyn Any>,
    type_name: &'static str,
    last_seen: u64,
    rect: Option<Rect>,
}

/// Heterogeneous widget state keyed by identity.
#[derive(Default)]
pub struct WidgetStateCache {
    slots: HashMap<String, Slot>,
    generation: u64,
    retention: CacheRetention,
    collisions: Vec<IdentityCollision>,
    created: u64,
    evicted: u64,
}

impl WidgetStateCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_retention(mut self, retention: CacheRetention) -> Self {
        self.retention = retention;
        self
    }

    #[must_use]
    pub fn retention(&self) -> CacheRetention {
        self.retention
    }

    pub fn set_retention(&mut self, retention: CacheRetention) {
        self.retention = retention;
    }

    /// Current frame generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a frame: advance the generation, forget last frame's
    /// collisions, and apply the retention policy.
    pub fn begin_frame(&mut self) {
        self.generation += 1;
        self.collisions.clear();
        self.evict_stale();
    }

    /// Drop entries idle for longer than the retention policy allows.
    /// Returns how many were dropped.
    pub fn evict_stale(&mut self) -> usize {
        let CacheRetention::MaxIdleFrames(max_idle) = self.retention else {
            return 0;
        };
        let generation = self.generation;
        let before = self.slots.len();
        self.slots
            .retain(|_, slot| generation.saturating_sub(slot.last_seen) <= max_idle);
        let dropped = before - self.slots.len();
        if dropped > 0 {
            self.evicted += dropped as u64;
            imkit_core::debug!(dropped, generation, "evicted idle widget state");
        }
        dropped
    }

    /// Fetch the state under `key`, building it with `factory` if absent.
    ///
    /// # Panics
    ///
    /// Panics if the entry exists with a different type. Two widget kinds
    /// resolving to the same key cannot be reconciled at runtime.
    pub fn get_or_create<T, F>(&mut self, key: &str, factory: F) -> &mut T
    where
        T: Any,
        F: FnOnce() -> T,
    {
        match self.try_get_or_create(key, factory) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`get_or_create`](Self::get_or_create) but reports a shape
    /// mismatch instead of panicking.
    pub fn try_get_or_create<T, F>(&mut self, key: &str, factory: F) -> Result<&mut T, CacheError>
    where
        T: Any,
        F: FnOnce() -> T,
    {
        let generation = self.generation;
        let slot = match self.slots.entry(key.to_owned()) {
            Entry::Occupied(entry) => {
                let slot = entry.into_mut();
                if slot.last_seen == generation {
                    imkit_core::warn!(key, frame = generation, "identity collision: key reused within a frame");
                    self.collisions.push(IdentityCollision {
                        key: key.to_owned(),
                        frame: generation,
                    });
                }
                slot
            }
            Entry::Vacant(entry) => {
                self.created += 1;
                entry.insert(Slot {
                    value: Box::new(factory()),
                    type_name: type_name::<T>(),
                    last_seen: generation,
                    rect: None,
                })
            }
        };
        slot.last_seen = generation;
        let stored = slot.type_name;
        slot.value
            .downcast_mut::<T>()
            .ok_or_else(|| CacheError::ShapeMismatch {
                key: key.to_owned(),
                stored,
                requested: type_name::<T>(),
            })
    }

    /// Borrow an existing entry without touching it.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.slots.get(key)?.value.downcast_ref::<T>()
    }

    /// Mutably borrow an existing entry without touching it.
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.slots.get_mut(key)?.value.downcast_mut::<T>()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Record where the entry's widget was laid out this frame.
    pub fn set_rect(&mut self, key: &str, rect: Rect) {
        if let Some(slot) = self.slots.get_mut(key) {
            slot.rect = Some(rect);
        }
    }

    /// Where the entry's widget was last laid out.
    #[must_use]
    pub fn rect(&self, key: &str) -> Option<Rect> {
        self.slots.get(key)?.rect
    }

    /// Remove an entry, returning whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.slots.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.collisions.clear();
    }

    /// Collisions recorded since the last `begin_frame`.
    #[must_use]
    pub fn collisions(&self) -> &[IdentityCollision] {
        &self.collisions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.slots.len(),
            created: self.created,
            evicted: self.evicted,
            collisions: self.collisions.len(),
        }
    }
}

impl fmt::Debug for WidgetStateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetStateCache")
            .field("entries", &self.slots.len())
            .field("generation", &self.generation)
            .field("retention", &self.retention)
            .field("collisions", &self.collisions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Counter(u32);

    #[test]
    fn factory_runs_once() {
        let mut cache = WidgetStateCache::new();
        let mut calls = 0;
        cache.begin_frame();
        cache.get_or_create("k", || {
            calls += 1;
            Counter(1)
        })
        .0 += 1;
        cache.begin_frame();
        let value = cache.get_or_create("k", || {
            calls += 1;
            Counter(100)
        });
        assert_eq!(*value, Counter(2));
        assert_eq!(calls, 1);
        assert_eq!(cache.stats().created, 1);
    }

    #[test]
    fn try_reports_shape_mismatch() {
        let mut cache = WidgetStateCache::new();
        cache.get_or_create("k", || Counter(0));
        let err = cache.try_get_or_create("k", String::new).unwrap_err();
        match err {
            CacheError::ShapeMismatch {
                key,
                stored,
                requested,
            } => {
                assert_eq!(key, "k");
                assert!(stored.ends_with("Counter"));
                assert!(requested.contains("String"));
            }
        }
    }

    #[test]
    #[should_panic(expected = "widget state for key")]
    fn get_or_create_panics_on_mismatch() {
        let mut cache = WidgetStateCache::new();
        cache.get_or_create("k", || Counter(0));
        let _ = cache.get_or_create("k", || 0.5f64);
    }

    #[test]
    fn second_touch_in_one_frame_is_a_collision() {
        let mut cache = WidgetStateCache::new();
        cache.begin_frame();
        cache.get_or_create("dup", || Counter(0));
        cache.get_or_create("dup", || Counter(0));
        assert_eq!(
            cache.collisions(),
            &[IdentityCollision {
                key: "dup".into(),
                frame: 1
            }]
        );
        cache.begin_frame();
        cache.get_or_create("dup", || Counter(0));
        assert!(cache.collisions().is_empty());
    }

    #[tracing_test::traced_test]
    #[test]
    fn collision_is_logged_not_fatal() {
        let mut cache = WidgetStateCache::new();
        cache.begin_frame();
        *cache.get_or_create("dup", || Counter(0)) = Counter(5);
        let shared = cache.get_or_create("dup", || Counter(0));
        assert_eq!(*shared, Counter(5));
        assert!(logs_contain("identity collision"));
    }

    #[test]
    fn max_idle_frames_evicts_only_idle_entries() {
        let mut cache = WidgetStateCache::new().with_retention(CacheRetention::MaxIdleFrames(2));
        cache.begin_frame();
        cache.get_or_create("idle", || Counter(0));
        cache.get_or_create("busy", || Counter(0));
        for _ in 0..3 {
            cache.begin_frame();
            cache.get_or_create("busy", || Counter(0));
        }
        assert!(cache.contains("busy"));
        assert!(!cache.contains("idle"));
        assert_eq!(cache.stats().evicted, 1);
    }

    #[test]
    fn keep_all_never_evicts() {
        let mut cache = WidgetStateCache::new();
        cache.get_or_create("k", || Counter(0));
        for _ in 0..100 {
            cache.begin_frame();
        }
        assert!(cache.contains("k"));
    }

    #[test]
    fn rect_is_stored_per_entry() {
        let mut cache = WidgetStateCache::new();
        cache.set_rect("missing", Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(cache.rect("missing"), None);
        cache.get_or_create("k", || Counter(0));
        cache.set_rect("k", Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(cache.rect("k"), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(cache.get::<Counter>("k"), Some(&Counter(0)));
    }
}
