use std::ptr::NonNull;

use libc::{c_void, free, malloc};

/// Provider of chunk buffers.
///
/// # Safety
///
/// `acquire` must return either `None` or a pointer to `size` writable bytes
/// that no one else uses until the same pointer is passed back to `release`
/// with the same `size`.
pub unsafe trait ChunkSource {
  fn acquire(
    &mut self,
    size: usize,
  ) -> Option<NonNull<u8>>;

  /// # Safety
  ///
  /// `memory` must come from `acquire` on this source with the same `size`,
  /// and must not be released twice.
  unsafe fn release(
    &mut self,
    memory: NonNull<u8>,
    size: usize,
  );
}

/// Chunk buffers straight from the C allocator. Contents are not zeroed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Malloc;

unsafe impl ChunkSource for Malloc {
  fn acquire(
    &mut self,
    size: usize,
  ) -> Option<NonNull<u8>> {
    NonNull::new(unsafe { malloc(size) } as *mut u8)
  }

  unsafe fn release(
    &mut self,
    memory: NonNull<u8>,
    _size: usize,
  ) {
    unsafe { free(memory.as_ptr() as *mut c_void) };
  }
}
