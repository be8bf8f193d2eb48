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

use super::Asset;
use std::{
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::Rc,
};

/// A reference-counted handle to a loaded asset.
///
/// Cloning a handle is cheap: it only increments the reference count.
/// Every clone points at the same slot, so when a cache reloads an asset in
/// place all holders observe the new contents without re-fetching.
///
/// The asset data is dropped, and its GPU handles released, when the last
/// handle goes away.
pub struct AssetHandle<T: Asset>(Rc<RefCell<T>>);

impl<T: Asset> AssetHandle<T> {
    /// Creates a new `AssetHandle` that takes ownership of the asset data.
    pub fn new(asset: T) -> Self {
        Self(Rc::new(RefCell::new(asset)))
    }

    /// Immutably borrows the asset.
    ///
    /// # Panics
    /// Panics if the asset is currently being replaced by [`AssetHandle::replace`].
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutably borrows the asset.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Swaps new contents into the shared slot and returns the previous value.
    ///
    /// The identity of the handle is unchanged.
    pub fn replace(&self, asset: T) -> T {
        self.0.replace(asset)
    }

    /// Number of live handles, the caller included.
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Returns `true` if both handles refer to the same asset slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// A stable address usable as an identity key for the lifetime of the slot.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T: Asset> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Asset + fmt::Debug> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(asset) => f.debug_tuple("AssetHandle").field(&*asset).finish(),
            Err(_) => f.write_str("AssetHandle(<borrowed>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Blob(u32);
    impl Asset for Blob {}

    #[test]
    fn test_clone_shares_slot() {
        let a = AssetHandle::new(Blob(1));
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.strong_count(), 2);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_replace_is_visible_to_all_holders() {
        let a = AssetHandle::new(Blob(1));
        let b = a.clone();
        let old = a.replace(Blob(7));
        assert_eq!(old, Blob(1));
        assert_eq!(*b.borrow(), Blob(7));
    }
}
