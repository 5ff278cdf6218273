use crate::{
  config::DEFAULT_CHUNK_LIST_GROWTH,
  error::{ArenaError, Result},
};

/// Growable ordered sequence with a caller-chosen growth factor.
///
/// Growth goes through `try_reserve_exact`, so running out of memory is
/// reported as [`ArenaError::OutOfMemory`] instead of aborting.
#[derive(Debug)]
pub struct Sequence<T> {
  items: Vec<T>,
  growth: f64,
}

impl<T> Sequence<T> {
  pub fn with_capacity(
    capacity_hint: usize,
    growth: f64,
  ) -> Result<Self> {
    let mut items = Vec::new();
    items
      .try_reserve_exact(capacity_hint)
      .map_err(|_| ArenaError::OutOfMemory {
        requested: capacity_hint.saturating_mul(size_of::<T>()),
      })?;

    Ok(Self { items, growth })
  }

  /// Appends `item`. On failure the item is handed back with the error so
  /// the caller can release whatever it owns.
  pub fn push(
    &mut self,
    item: T,
  ) -> std::result::Result<(), (T, ArenaError)> {
    if self.items.len() == self.items.capacity() {
      let additional = self.next_capacity() - self.items.len();
      if additional == 0 || self.items.try_reserve_exact(additional).is_err() {
        let requested = additional.max(1) * size_of::<T>();
        return Err((item, ArenaError::OutOfMemory { requested }));
      }
    }

    self.items.push(item);
    Ok(())
  }

  /// Largest element count whose storage still fits in `isize::MAX` bytes.
  fn max_len() -> usize {
    isize::MAX as usize / size_of::<T>().max(1)
  }

  /// Capacity after one growth step, clamped to [`Self::max_len`].
  fn next_capacity(&self) -> usize {
    let capacity = self.items.capacity();
    let max_len = Self::max_len();
    let grown = (capacity as f64 * self.growth).ceil();

    if grown >= max_len as f64 {
      return max_len.max(capacity);
    }

    (grown as usize).max(capacity + 1).min(max_len.max(capacity))
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn capacity(&self) -> usize {
    self.items.capacity()
  }

  pub fn get(
    &self,
    index: usize,
  ) -> Option<&T> {
    self.items.get(index)
  }

  pub fn get_mut(
    &mut self,
    index: usize,
  ) -> Option<&mut T> {
    self.items.get_mut(index)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, T> {
    self.items.iter()
  }

  pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
    self.items.iter_mut()
  }

  /// Releases the backing storage, handing every element to `cleanup` in
  /// order first when one is given.
  pub fn destroy<F>(
    self,
    cleanup: Option<F>,
  ) where
    F: FnMut(T),
  {
    match cleanup {
      Some(cleanup) => self.items.into_iter().for_each(cleanup),
      None => drop(self.items),
    }
  }
}

impl<T> Default for Sequence<T> {
  fn default() -> Self {
    Self {
      items: Vec::new(),
      growth: DEFAULT_CHUNK_LIST_GROWTH,
    }
  }
}
