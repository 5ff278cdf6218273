use std::{fmt, mem, ptr::NonNull};

use crate::{
  chunk::Chunk,
  config::ArenaConfig,
  error::{ArenaError, Result},
  sequence::Sequence,
  source::{ChunkSource, Malloc},
};

/// Arena handing out fixed-size elements from chunks of `elements_per_chunk`
/// elements each.
///
/// Pointers returned by [`allocate`](Self::allocate) stay valid until the
/// next [`reset`](Self::reset) or until the arena is destroyed or dropped.
/// Their contents start out uninitialized.
pub struct ArenaAllocator<S: ChunkSource = Malloc> {
  chunks: Sequence<Chunk>,
  current: usize,
  element_size: usize,
  elements_per_chunk: usize,
  chunk_capacity: usize,
  source: S,
}

impl ArenaAllocator<Malloc> {
  pub fn new(
    elements_per_chunk: usize,
    element_size: usize,
  ) -> Result<Self> {
    Self::with_config(ArenaConfig::new(elements_per_chunk, element_size))
  }

  pub fn with_config(config: ArenaConfig) -> Result<Self> {
    Self::with_source(config, Malloc)
  }
}

impl<S: ChunkSource> ArenaAllocator<S> {
  /// Creates an arena whose chunk buffers come from `source`.
  ///
  /// No chunk is allocated until the first call to `allocate`.
  pub fn with_source(
    config: ArenaConfig,
    source: S,
  ) -> Result<Self> {
    let chunk_capacity = config.validate().inspect_err(|err| {
      log::warn!("Rejected arena configuration: {}", err);
    })?;

    let chunks = Sequence::with_capacity(config.chunk_list_capacity, config.chunk_list_growth)?;

    Ok(Self {
      chunks,
      current: 0,
      element_size: config.element_size,
      elements_per_chunk: config.elements_per_chunk,
      chunk_capacity,
      source,
    })
  }

  /// Returns a pointer to `element_size` fresh bytes.
  ///
  /// Only the active chunk is ever checked, so this is O(1). A new chunk is
  /// created when the active one is full and no later chunk is left over
  /// from before a reset.
  pub fn allocate(&mut self) -> Result<NonNull<u8>> {
    let size = self.element_size;

    self
      .active_chunk()?
      .bump(size)
      .ok_or(ArenaError::OutOfMemory { requested: size })
  }

  /// The chunk the next element comes from, advancing or growing first when
  /// the current one is full.
  fn active_chunk(&mut self) -> Result<&mut Chunk> {
    let size = self.element_size;

    if !self.chunks.get(self.current).is_some_and(|chunk| chunk.has_room(size)) {
      self.advance()?;
    }

    // A chunk we just advanced to is empty and holds at least one element.
    self
      .chunks
      .get_mut(self.current)
      .ok_or(ArenaError::OutOfMemory { requested: size })
  }

  /// Moves `value` into a fresh element and returns a typed pointer to it.
  ///
  /// The arena never runs `T`'s destructor.
  pub fn allocate_value<T>(
    &mut self,
    value: T,
  ) -> Result<NonNull<T>> {
    let size = mem::size_of::<T>();
    let align = mem::align_of::<T>();
    let mismatch = ArenaError::LayoutMismatch {
      size,
      align,
      element_size: self.element_size,
    };

    if size > self.element_size || self.element_size % align != 0 {
      return Err(mismatch);
    }

    let element_size = self.element_size;
    let chunk = self.active_chunk()?;

    // Slots are element_size apart, so only the chunk base can be misaligned.
    if chunk.memory().as_ptr() as usize % align != 0 {
      return Err(mismatch);
    }

    let ptr = chunk
      .bump(element_size)
      .ok_or(ArenaError::OutOfMemory { requested: element_size })?
      .cast::<T>();
    unsafe { ptr.as_ptr().write(value) };

    Ok(ptr)
  }

  fn advance(&mut self) -> Result<()> {
    let next = if self.chunks.is_empty() { 0 } else { self.current + 1 };

    if next < self.chunks.len() {
      self.current = next;
      return Ok(());
    }

    self.grow()?;
    self.current = self.chunks.len() - 1;

    Ok(())
  }

  fn grow(&mut self) -> Result<()> {
    let capacity = self.chunk_capacity;

    let Some(memory) = self.source.acquire(capacity) else {
      log::warn!("Chunk source exhausted, could not obtain {} bytes", capacity);
      return Err(ArenaError::OutOfMemory { requested: capacity });
    };

    if let Err((chunk, err)) = self.chunks.push(Chunk::new(memory, capacity)) {
      log::warn!("Chunk list could not grow past {} chunks", self.chunks.len());
      unsafe { self.source.release(chunk.memory(), chunk.capacity()) };
      return Err(err);
    }

    log::debug!(
      "Allocated chunk #{}: {} bytes ({} x {}), address = {:?}",
      self.chunks.len(),
      capacity,
      self.elements_per_chunk,
      self.element_size,
      memory
    );

    Ok(())
  }

  /// Rewinds every chunk so its memory is handed out again, oldest chunk
  /// first. Nothing is released or cleared.
  pub fn reset(&mut self) {
    for chunk in self.chunks.iter_mut() {
      chunk.reset();
    }
    self.current = 0;

    log::trace!("Reset arena with {} chunks", self.chunks.len());
  }

  /// Releases every chunk. Dropping the arena does the same.
  pub fn destroy(self) {
    drop(self);
  }

  pub fn element_size(&self) -> usize {
    self.element_size
  }

  pub fn elements_per_chunk(&self) -> usize {
    self.elements_per_chunk
  }

  /// Byte size of one chunk.
  pub fn chunk_capacity(&self) -> usize {
    self.chunk_capacity
  }

  pub fn chunk_count(&self) -> usize {
    self.chunks.len()
  }

  /// Bytes reserved from the chunk source.
  pub fn committed_bytes(&self) -> usize {
    self.chunks.len() * self.chunk_capacity
  }

  /// Bytes handed out since creation or the last reset.
  pub fn used_bytes(&self) -> usize {
    self.chunks.iter().map(Chunk::used).sum()
  }

  /// Elements handed out since creation or the last reset.
  pub fn allocated_count(&self) -> usize {
    self.used_bytes() / self.element_size
  }

  /// Whether `ptr` points into an element handed out since the last reset.
  pub fn contains<T>(
    &self,
    ptr: NonNull<T>,
  ) -> bool {
    let ptr = ptr.cast::<u8>().as_ptr() as *const u8;
    self.chunks.iter().any(|chunk| chunk.contains(ptr))
  }
}

impl<S: ChunkSource> Drop for ArenaAllocator<S> {
  fn drop(&mut self) {
    let chunks = mem::take(&mut self.chunks);
    let count = chunks.len();
    let source = &mut self.source;

    chunks.destroy(Some(|chunk: Chunk| unsafe {
      source.release(chunk.memory(), chunk.capacity());
    }));

    log::debug!(
      "Destroyed arena: released {} chunks ({} bytes)",
      count,
      count * self.chunk_capacity
    );
  }
}

impl<S: ChunkSource> fmt::Debug for ArenaAllocator<S> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("ArenaAllocator")
      .field("element_size", &self.element_size)
      .field("elements_per_chunk", &self.elements_per_chunk)
      .field("chunks", &self.chunks.len())
      .field("current", &self.current)
      .field("used_bytes", &self.used_bytes())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lazy_chunk_creation() {
    let arena = ArenaAllocator::new(8, 16).unwrap();

    assert_eq!(arena.chunk_count(), 0);
    assert_eq!(arena.committed_bytes(), 0);
    assert_eq!(arena.chunk_capacity(), 128);
  }

  #[test]
  fn test_alloc() {
    let mut arena = ArenaAllocator::new(4, 8).unwrap();

    unsafe {
      let first_addr = arena.allocate().unwrap().cast::<u64>().as_ptr();
      *first_addr = 3u64;

      let second_addr = arena.allocate().unwrap().cast::<u64>().as_ptr();
      *second_addr = 7u64;

      assert_eq!(*first_addr, 3);
      assert_eq!(*second_addr, 7);
      assert_eq!(second_addr as usize - first_addr as usize, 8);
    }

    assert_eq!(arena.chunk_count(), 1);
    assert_eq!(arena.allocated_count(), 2);
    assert_eq!(arena.used_bytes(), 16);
  }

  #[test]
  fn test_current_follows_last_chunk() {
    let mut arena = ArenaAllocator::new(2, 4).unwrap();

    for expected_chunks in [1, 1, 2, 2, 3] {
      arena.allocate().unwrap();
      assert_eq!(arena.chunk_count(), expected_chunks);
      assert_eq!(arena.current, expected_chunks - 1);
    }
  }

  #[test]
  fn test_reset_rewinds_to_oldest_chunk() {
    let mut arena = ArenaAllocator::new(2, 4).unwrap();

    let first = arena.allocate().unwrap();
    for _ in 0..5 {
      arena.allocate().unwrap();
    }
    assert_eq!(arena.chunk_count(), 3);

    arena.reset();
    assert_eq!(arena.current, 0);
    assert_eq!(arena.used_bytes(), 0);
    assert!(!arena.contains(first));

    assert_eq!(arena.allocate().unwrap(), first);

    // Refilling all three chunks must not create a fourth.
    for _ in 0..5 {
      arena.allocate().unwrap();
    }
    assert_eq!(arena.chunk_count(), 3);
    assert_eq!(arena.current, 2);

    arena.allocate().unwrap();
    assert_eq!(arena.chunk_count(), 4);
  }

  #[test]
  fn test_allocate_value() {
    let mut arena = ArenaAllocator::with_config(ArenaConfig::for_type::<u64>(4)).unwrap();

    let a = arena.allocate_value(11u64).unwrap();
    let b = arena.allocate_value(22u64).unwrap();

    unsafe {
      assert_eq!(*a.as_ptr(), 11);
      assert_eq!(*b.as_ptr(), 22);
    }
    assert!(arena.contains(a));
  }

  #[test]
  fn test_allocate_value_layout_mismatch() {
    let mut arena = ArenaAllocator::new(4, 4).unwrap();

    assert_eq!(
      arena.allocate_value(1u64),
      Err(ArenaError::LayoutMismatch {
        size: 8,
        align: 8,
        element_size: 4,
      })
    );

    let mut arena = ArenaAllocator::new(4, 6).unwrap();
    assert!(matches!(
      arena.allocate_value(1u32),
      Err(ArenaError::LayoutMismatch { .. })
    ));
    assert_eq!(arena.chunk_count(), 0);
  }

  /// Hands out buffers one byte past a `malloc` boundary.
  struct OffsetSource;

  unsafe impl ChunkSource for OffsetSource {
    fn acquire(
      &mut self,
      size: usize,
    ) -> Option<NonNull<u8>> {
      let memory = Malloc.acquire(size + 1)?;
      Some(unsafe { memory.add(1) })
    }

    unsafe fn release(
      &mut self,
      memory: NonNull<u8>,
      size: usize,
    ) {
      unsafe { Malloc.release(memory.sub(1), size + 1) };
    }
  }

  #[test]
  fn test_allocate_value_misaligned_chunk_keeps_slot() {
    let mut arena = ArenaAllocator::with_source(ArenaConfig::new(4, 8), OffsetSource).unwrap();

    assert_eq!(
      arena.allocate_value(5u64),
      Err(ArenaError::LayoutMismatch {
        size: 8,
        align: 8,
        element_size: 8,
      })
    );
    assert_eq!(arena.chunk_count(), 1);
    assert_eq!(arena.allocated_count(), 0);

    // The rejected call left the first slot for byte-aligned data.
    let slot = arena.allocate().unwrap();
    assert_eq!(slot.as_ptr() as usize % 8, 1);
    assert_eq!(arena.allocated_count(), 1);

    assert!(arena.allocate_value([1u8; 8]).is_ok());
    assert_eq!(arena.allocated_count(), 2);
  }

  #[test]
  fn test_debug_output() {
    let mut arena = ArenaAllocator::new(2, 2).unwrap();
    arena.allocate().unwrap();

    let debug = format!("{:?}", arena);
    assert!(debug.contains("element_size: 2"));
    assert!(debug.contains("chunks: 1"));
  }
}
