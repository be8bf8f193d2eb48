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

//! Lazily populated, reference-counted resource caches with hot reload.
//!
//! A [`ResourceCache`] maps identifiers to shared [`AssetHandle`]s. Entries are
//! created on first request, evicted by [`ResourceCache::collect_garbage`] once
//! the cache holds the last reference, and refreshed in place by
//! [`ResourceCache::reload`] when their source file changes.

mod registry;

pub use registry::{CacheRegistry, SharedCache};

use kiln_core::asset::{Asset, AssetHandle};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::time::SystemTime;

/// Knows how to produce a `T` from an identifier.
pub trait ResourceLoader<T: Asset> {
    /// Why a load failed. Loaders that degrade to a placeholder internally
    /// use [`Infallible`].
    type Error: fmt::Display;

    /// Builds a fresh resource for `id`.
    fn load(&self, id: &str) -> Result<T, Self::Error>;

    /// Modification time of the source of `id`, `None` if unknown.
    fn modified(&self, id: &str) -> Option<SystemTime>;

    /// What to swap in when a reload of `id` fails.
    ///
    /// With `None`, the cached resource keeps its previous contents.
    fn placeholder(&self, _id: &str) -> Option<T> {
        None
    }

    /// Carries state from `previous` into `next` right before a reload
    /// swaps `next` in. Placeholders go through here too.
    fn reloaded(&self, _previous: &T, _next: &mut T) {}
}

#[derive(Debug)]
struct CacheEntry<T: Asset> {
    handle: AssetHandle<T>,
    modified: Option<SystemTime>,
}

/// Cache of shared resources of type `T` produced by the loader `L`.
pub struct ResourceCache<T: Asset, L: ResourceLoader<T>> {
    loader: L,
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T: Asset, L: ResourceLoader<T>> ResourceCache<T, L> {
    /// An empty cache.
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            entries: HashMap::new(),
        }
    }

    /// The loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Returns the cached handle for `id`, loading it on first use.
    ///
    /// # Errors
    /// The loader error. Nothing is cached in that case, so the next call
    /// retries.
    pub fn try_get(&mut self, id: &str) -> Result<AssetHandle<T>, L::Error> {
        if let Some(entry) = self.entries.get(id) {
            return Ok(entry.handle.clone());
        }

        let modified = self.loader.modified(id);
        let resource = self.loader.load(id)?;
        let handle = AssetHandle::new(resource);
        self.entries.insert(
            id.to_string(),
            CacheEntry {
                handle: handle.clone(),
                modified,
            },
        );
        log::debug!("ResourceCache: loaded '{id}'");
        Ok(handle)
    }

    /// Removes every entry nobody outside the cache refers to.
    ///
    /// Returns how many entries were dropped.
    pub fn collect_garbage(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, entry| {
            let keep = entry.handle.strong_count() > 1;
            if !keep {
                log::debug!("ResourceCache: releasing '{id}'");
            }
            keep
        });
        before - self.entries.len()
    }

    /// Reloads every entry whose source changed since it was loaded.
    ///
    /// The new value is swapped into the existing handle, so every holder
    /// observes it. Returns how many entries changed contents.
    pub fn reload(&mut self) -> usize {
        let mut reloaded = 0;
        for (id, entry) in &mut self.entries {
            let current = self.loader.modified(id);
            let changed = match (current, entry.modified) {
                (Some(current), Some(recorded)) => current > recorded,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if !changed {
                continue;
            }

            entry.modified = current;
            match self.loader.load(id) {
                Ok(mut resource) => {
                    self.loader.reloaded(&entry.handle.borrow(), &mut resource);
                    drop(entry.handle.replace(resource));
                    reloaded += 1;
                    log::info!("ResourceCache: reloaded '{id}'");
                }
                Err(e) => match self.loader.placeholder(id) {
                    Some(mut placeholder) => {
                        log::warn!("ResourceCache: reload of '{id}' failed, using placeholder: {e}");
                        self.loader.reloaded(&entry.handle.borrow(), &mut placeholder);
                        drop(entry.handle.replace(placeholder));
                        reloaded += 1;
                    }
                    None => {
                        log::warn!("ResourceCache: reload of '{id}' failed, keeping previous: {e}");
                    }
                },
            }
        }
        reloaded
    }

    /// Whether `id` is cached.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The cached identifiers, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Visits every cached resource.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&str, &mut T)) {
        for (id, entry) in &self.entries {
            f(id, &mut entry.handle.borrow_mut());
        }
    }
}

impl<T: Asset, L: ResourceLoader<T, Error = Infallible>> ResourceCache<T, L> {
    /// Returns the cached handle for `id`, loading it on first use.
    pub fn get(&mut self, id: &str) -> AssetHandle<T> {
        match self.try_get(id) {
            Ok(handle) => handle,
            Err(never) => match never {},
        }
    }
}

impl<T: Asset, L: ResourceLoader<T>> fmt::Debug for ResourceCache<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("resource", &std::any::type_name::<T>())
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    struct Blob(String);
    impl Asset for Blob {}

    /// Serves blobs from an in-memory table with controllable timestamps.
    #[derive(Default)]
    struct TableLoader {
        files: RefCell<HashMap<String, (String, u64)>>,
        loads: Cell<usize>,
        with_placeholder: bool,
        carry_over: bool,
    }

    impl TableLoader {
        fn write(&self, id: &str, contents: &str, time: u64) {
            self.files
                .borrow_mut()
                .insert(id.to_string(), (contents.to_string(), time));
        }
    }

    impl ResourceLoader<Blob> for TableLoader {
        type Error = String;

        fn load(&self, id: &str) -> Result<Blob, String> {
            self.loads.set(self.loads.get() + 1);
            match self.files.borrow().get(id) {
                Some((contents, _)) if contents != "corrupt" => Ok(Blob(contents.clone())),
                Some(_) => Err(format!("'{id}' is corrupt")),
                None => Err(format!("'{id}' not found")),
            }
        }

        fn modified(&self, id: &str) -> Option<SystemTime> {
            self.files
                .borrow()
                .get(id)
                .map(|(_, time)| SystemTime::UNIX_EPOCH + Duration::from_secs(*time))
        }

        fn placeholder(&self, _id: &str) -> Option<Blob> {
            self.with_placeholder.then(|| Blob("placeholder".to_string()))
        }

        fn reloaded(&self, previous: &Blob, next: &mut Blob) {
            if self.carry_over {
                next.0 = format!("{} after {}", next.0, previous.0);
            }
        }
    }

    fn cache_with(files: &[(&str, &str)]) -> ResourceCache<Blob, TableLoader> {
        let loader = TableLoader::default();
        for (id, contents) in files {
            loader.write(id, contents, 1);
        }
        ResourceCache::new(loader)
    }

    #[test]
    fn test_repeated_get_returns_same_handle_without_reloading() {
        let mut cache = cache_with(&[("a", "alpha")]);

        let first = cache.try_get("a").unwrap();
        let second = cache.try_get("a").unwrap();

        assert!(first.ptr_eq(&second));
        assert_eq!(cache.loader().loads.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let mut cache = cache_with(&[]);

        assert!(cache.try_get("missing").is_err());
        assert!(!cache.contains("missing"));

        cache.loader().write("missing", "now here", 1);
        assert_eq!(cache.try_get("missing").unwrap().borrow().0, "now here");
    }

    #[test]
    fn test_gc_only_releases_unreferenced_entries() {
        let mut cache = cache_with(&[("held", "1"), ("dropped", "2")]);
        let held = cache.try_get("held").unwrap();
        drop(cache.try_get("dropped").unwrap());

        assert_eq!(cache.collect_garbage(), 1);
        assert!(cache.contains("held"));
        assert!(!cache.contains("dropped"));

        // A subsequent get hands back the very same resource.
        assert!(cache.try_get("held").unwrap().ptr_eq(&held));
    }

    #[test]
    fn test_reload_without_changes_does_nothing() {
        let mut cache = cache_with(&[("a", "alpha")]);
        let _handle = cache.try_get("a").unwrap();

        assert_eq!(cache.reload(), 0);
        assert_eq!(cache.loader().loads.get(), 1);
    }

    #[test]
    fn test_reload_updates_existing_handle() {
        let mut cache = cache_with(&[("a", "alpha")]);
        let handle = cache.try_get("a").unwrap();

        cache.loader().write("a", "beta", 2);
        assert_eq!(cache.reload(), 1);

        assert_eq!(handle.borrow().0, "beta");
        assert!(cache.try_get("a").unwrap().ptr_eq(&handle));
    }

    #[test]
    fn test_failed_reload_keeps_previous_contents() {
        let mut cache = cache_with(&[("a", "alpha")]);
        let handle = cache.try_get("a").unwrap();

        cache.loader().write("a", "corrupt", 2);
        assert_eq!(cache.reload(), 0);
        assert_eq!(handle.borrow().0, "alpha");

        // The new timestamp is recorded, so the broken file is not retried.
        assert_eq!(cache.reload(), 0);
        assert_eq!(cache.loader().loads.get(), 2);
    }

    #[test]
    fn test_failed_reload_uses_placeholder_when_available() {
        let loader = TableLoader {
            with_placeholder: true,
            ..Default::default()
        };
        loader.write("a", "alpha", 1);
        let mut cache = ResourceCache::new(loader);
        let handle = cache.try_get("a").unwrap();

        cache.loader().write("a", "corrupt", 2);
        assert_eq!(cache.reload(), 1);
        assert_eq!(handle.borrow().0, "placeholder");
    }

    struct Constant;

    impl ResourceLoader<Blob> for Constant {
        type Error = Infallible;

        fn load(&self, id: &str) -> Result<Blob, Infallible> {
            Ok(Blob(id.to_uppercase()))
        }

        fn modified(&self, _id: &str) -> Option<SystemTime> {
            None
        }
    }

    #[test]
    fn test_infallible_get() {
        let mut cache = ResourceCache::new(Constant);
        assert_eq!(cache.get("abc").borrow().0, "ABC");
        assert_eq!(cache.ids().collect::<Vec<_>>(), vec!["abc"]);
    }

    #[test]
    fn test_reload_carries_state_into_new_value() {
        let loader = TableLoader {
            with_placeholder: true,
            carry_over: true,
            ..Default::default()
        };
        loader.write("a", "alpha", 1);
        let mut cache = ResourceCache::new(loader);
        let handle = cache.try_get("a").unwrap();

        cache.loader().write("a", "beta", 2);
        cache.reload();
        assert_eq!(handle.borrow().0, "beta after alpha");

        cache.loader().write("a", "corrupt", 3);
        cache.reload();
        assert_eq!(handle.borrow().0, "placeholder after beta after alpha");
    }
}
