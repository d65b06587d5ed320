//! Arc-based storage shared between a tensor and all of its views.

use std::sync::Arc;

/// Reference-counted, immutable element buffer.
///
/// Clones only bump the reference count, so views created by slicing, selecting or
/// lazily negating a tensor never copy its elements. Writes always go to a freshly
/// allocated storage.
pub struct TensorStorage<T> {
    inner: Arc<Vec<T>>,
}

impl<T> TensorStorage<T> {
    /// Creates a storage owning `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            inner: Arc::new(data),
        }
    }

    /// Returns the whole buffer as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }

    /// Number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns true if no other tensor references this buffer.
    #[inline]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }

    /// Returns true if both storages point at the same buffer.
    #[inline]
    pub fn shares_memory(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> TensorStorage<T> {
    /// Consumes the storage, returning the buffer. Copies if it is still shared.
    pub fn into_vec(self) -> Vec<T> {
        Arc::try_unwrap(self.inner).unwrap_or_else(|shared| shared.as_ref().clone())
    }
}

impl<T> Clone for TensorStorage<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for TensorStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TensorStorage")
            .field("len", &self.inner.len())
            .field("refs", &Arc::strong_count(&self.inner))
            .finish()
    }
}
