//! Conversion chains and the write-target memo.

use dashmap::DashMap;
use datastore_types::TypeKey;

/// The at most two hops taken from an application type to a native type.
///
/// `first_step_target` is the simple type produced by a custom converter;
/// `second_step_target` is the native type produced by an internal converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeTargets {
    first_step_target: Option<TypeKey>,
    second_step_target: Option<TypeKey>,
}

impl TypeTargets {
    pub fn new(first_step_target: Option<TypeKey>, second_step_target: Option<TypeKey>) -> Self {
        Self {
            first_step_target,
            second_step_target,
        }
    }

    pub fn first_step_target(&self) -> Option<TypeKey> {
        self.first_step_target
    }

    pub fn second_step_target(&self) -> Option<TypeKey> {
        self.second_step_target
    }

    /// No conversion is needed.
    pub fn is_empty(&self) -> bool {
        self.first_step_target.is_none() && self.second_step_target.is_none()
    }
}

/// Concurrent memo of native-compatible types, keyed by source type.
///
/// Lookups compute at most once per key. The compute function runs under the
/// shard lock for its key and must not touch the same cache.
#[derive(Debug, Default)]
pub struct WriteTargetCache {
    entries: DashMap<TypeKey, Option<TypeKey>>,
}

impl WriteTargetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(&self, source: TypeKey, compute: F) -> Option<TypeKey>
    where
        F: FnOnce(TypeKey) -> Option<TypeKey>,
    {
        if let Some(cached) = self.entries.get(&source) {
            return *cached;
        }
        *self.entries.entry(source).or_insert_with(|| {
            let target = compute(source);
            match target {
                Some(target) => {
                    tracing::debug!("Datastore compatible type for {} is {}", source, target)
                }
                None => tracing::debug!("No Datastore compatible type for {}", source),
            }
            target
        })
    }

    pub fn get(&self, source: TypeKey) -> Option<Option<TypeKey>> {
        self.entries.get(&source).map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
