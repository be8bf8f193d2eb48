// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Type-keyed ownership of every resource cache.

use super::{ResourceCache, ResourceLoader};
use kiln_core::asset::Asset;
use kiln_core::renderer::InitError;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

/// A cache shared between the registry and the loaders that depend on it.
pub type SharedCache<T, L> = Rc<RefCell<ResourceCache<T, L>>>;

trait ErasedCache {
    fn collect_garbage(&self) -> usize;
    fn reload(&self) -> usize;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Asset, L: ResourceLoader<T> + 'static> ErasedCache for SharedCache<T, L> {
    fn collect_garbage(&self) -> usize {
        self.borrow_mut().collect_garbage()
    }

    fn reload(&self) -> usize {
        self.borrow_mut().reload()
    }

    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct RegisteredCache {
    resource: TypeId,
    type_name: &'static str,
    cache: Box<dyn ErasedCache>,
}

/// Owns one cache per resource type.
///
/// Caches are reloaded in registration order and collected in reverse
/// order, so registering dependencies before their dependents (shaders
/// before programs before materials) lets one pass release a whole chain.
#[derive(Default)]
pub struct CacheRegistry {
    caches: Vec<RegisteredCache>,
}

impl CacheRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `cache` and returns a shared reference to it.
    ///
    /// # Errors
    /// [`InitError::DuplicateCache`] if a cache for `T` is already registered.
    pub fn register<T: Asset, L: ResourceLoader<T> + 'static>(
        &mut self,
        cache: ResourceCache<T, L>,
    ) -> Result<SharedCache<T, L>, InitError> {
        let type_name = std::any::type_name::<T>();
        if self.position::<T>().is_some() {
            log::error!("CacheRegistry: a cache for '{type_name}' is already registered");
            return Err(InitError::DuplicateCache { type_name });
        }

        let shared = Rc::new(RefCell::new(cache));
        self.caches.push(RegisteredCache {
            resource: TypeId::of::<T>(),
            type_name,
            cache: Box::new(shared.clone()),
        });
        log::debug!("CacheRegistry: registered cache for '{type_name}'");
        Ok(shared)
    }

    fn position<T: Asset>(&self) -> Option<usize> {
        self.caches
            .iter()
            .position(|entry| entry.resource == TypeId::of::<T>())
    }

    /// The cache for `T`, if one was registered with loader `L`.
    pub fn get<T: Asset, L: ResourceLoader<T> + 'static>(&self) -> Option<SharedCache<T, L>> {
        let index = self.position::<T>()?;
        self.caches[index]
            .cache
            .as_any()
            .downcast_ref::<SharedCache<T, L>>()
            .cloned()
    }

    /// Unregisters the cache for `T` and hands it back.
    pub fn remove<T: Asset, L: ResourceLoader<T> + 'static>(&mut self) -> Option<SharedCache<T, L>> {
        let shared = self.get::<T, L>()?;
        let index = self.position::<T>()?;
        self.caches.remove(index);
        Some(shared)
    }

    /// Whether a cache for `T` is registered.
    pub fn contains<T: Asset>(&self) -> bool {
        self.position::<T>().is_some()
    }

    /// Runs garbage collection on every cache, most dependent first.
    pub fn collect_garbage_all(&self) -> usize {
        let released: usize = self
            .caches
            .iter()
            .rev()
            .map(|entry| entry.cache.collect_garbage())
            .sum();
        if released > 0 {
            log::info!("CacheRegistry: released {released} resource(s)");
        }
        released
    }

    /// Hot-reloads every cache, dependencies first.
    pub fn reload_all(&self) -> usize {
        self.caches.iter().map(|entry| entry.cache.reload()).sum()
    }

    /// Total number of cached resources.
    pub fn resource_count(&self) -> usize {
        self.caches.iter().map(|entry| entry.cache.len()).sum()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.caches.iter().map(|entry| entry.type_name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::time::SystemTime;

    struct Word(String);
    impl Asset for Word {}

    struct Number(usize);
    impl Asset for Number {}

    struct Echo;
    impl ResourceLoader<Word> for Echo {
        type Error = Infallible;
        fn load(&self, id: &str) -> Result<Word, Infallible> {
            Ok(Word(id.to_string()))
        }
        fn modified(&self, _id: &str) -> Option<SystemTime> {
            None
        }
    }

    struct Length;
    impl ResourceLoader<Number> for Length {
        type Error = Infallible;
        fn load(&self, id: &str) -> Result<Number, Infallible> {
            Ok(Number(id.len()))
        }
        fn modified(&self, _id: &str) -> Option<SystemTime> {
            None
        }
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = CacheRegistry::new();
        registry.register(ResourceCache::new(Echo)).unwrap();

        let result = registry.register(ResourceCache::new(Echo));

        assert!(matches!(result, Err(InitError::DuplicateCache { .. })));
    }

    #[test]
    fn test_typed_access_shares_the_registered_cache() {
        let mut registry = CacheRegistry::new();
        let words = registry.register(ResourceCache::new(Echo)).unwrap();
        registry.register(ResourceCache::new(Length)).unwrap();

        let held = words.borrow_mut().get("kiln");
        let numbers = registry.get::<Number, Length>().unwrap();
        assert_eq!(numbers.borrow_mut().get("four").borrow().0, 4);

        let again = registry.get::<Word, Echo>().unwrap();
        assert!(again.borrow_mut().get("kiln").ptr_eq(&held));
        assert_eq!(registry.resource_count(), 2);
    }

    #[test]
    fn test_collect_garbage_all_visits_every_cache() {
        let mut registry = CacheRegistry::new();
        let words = registry.register(ResourceCache::new(Echo)).unwrap();
        let numbers = registry.register(ResourceCache::new(Length)).unwrap();
        let _kept = words.borrow_mut().get("kept");
        drop(words.borrow_mut().get("dropped"));
        drop(numbers.borrow_mut().get("dropped"));

        assert_eq!(registry.collect_garbage_all(), 2);
        assert_eq!(registry.resource_count(), 1);
    }

    #[test]
    fn test_remove_unregisters() {
        let mut registry = CacheRegistry::new();
        registry.register(ResourceCache::new(Echo)).unwrap();

        assert!(registry.remove::<Word, Echo>().is_some());
        assert!(!registry.contains::<Word>());
        assert!(registry.register(ResourceCache::new(Echo)).is_ok());
    }
}
