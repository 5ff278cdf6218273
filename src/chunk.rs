use std::ptr::NonNull;

/// One contiguous buffer the arena carves elements from.
///
/// ```text
///   memory                      memory + used           memory + capacity
///   ▼                           ▼                       ▼
///   ┌─────┬─────┬─────┬─────────┬───────────────────────┐
///   │ E0  │ E1  │ E2  │   ...   │      Free Space       │
///   └─────┴─────┴─────┴─────────┴───────────────────────┘
/// ```
///
/// The chunk never frees its own buffer: the allocator owns the source it
/// came from and hands the buffer back on destroy.
#[derive(Debug)]
pub struct Chunk {
  memory: NonNull<u8>,
  capacity: usize,
  used: usize,
}

impl Chunk {
  pub fn new(
    memory: NonNull<u8>,
    capacity: usize,
  ) -> Self {
    Self {
      memory,
      capacity,
      used: 0,
    }
  }

  pub fn memory(&self) -> NonNull<u8> {
    self.memory
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn used(&self) -> usize {
    self.used
  }

  pub fn has_room(
    &self,
    size: usize,
  ) -> bool {
    self.capacity - self.used >= size
  }

  /// Claims the next `size` bytes, or `None` when they don't fit.
  pub fn bump(
    &mut self,
    size: usize,
  ) -> Option<NonNull<u8>> {
    if !self.has_room(size) {
      return None;
    }

    // SAFETY: used + size <= capacity, so the offset stays inside the buffer.
    let ptr = unsafe { self.memory.add(self.used) };
    self.used += size;

    Some(ptr)
  }

  pub fn reset(&mut self) {
    self.used = 0;
  }

  /// Whether `ptr` points into the claimed part of this chunk.
  pub fn contains(
    &self,
    ptr: *const u8,
  ) -> bool {
    let start = self.memory.as_ptr() as usize;
    let addr = ptr as usize;

    addr >= start && addr < start + self.used
  }
}
