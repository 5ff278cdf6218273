//! Handle-style surface over [`ArenaAllocator`].
//!
//! An [`ArenaHandle`] may be empty: every operation treats an empty handle as
//! a no-op (or a `None` result) instead of an error, and [`destroy`] empties
//! the handle so it cannot be used again.

use std::ptr::NonNull;

use crate::arena::ArenaAllocator;

pub type ArenaHandle = Option<ArenaAllocator>;

/// Creates an arena, or `None` when the configuration is rejected or memory
/// for the chunk list cannot be reserved.
pub fn create(
  elements_per_chunk: usize,
  element_size: usize,
) -> ArenaHandle {
  match ArenaAllocator::new(elements_per_chunk, element_size) {
    Ok(arena) => Some(arena),
    Err(err) => {
      log::error!("Arena creation failed: {}", err);
      None
    }
  }
}

/// Allocates one element, or `None` when the handle is empty or memory is
/// exhausted.
pub fn allocate(handle: &mut ArenaHandle) -> Option<NonNull<u8>> {
  let arena = handle.as_mut()?;

  match arena.allocate() {
    Ok(ptr) => Some(ptr),
    Err(err) => {
      log::error!("Arena allocation failed: {}", err);
      None
    }
  }
}

pub fn reset(handle: &mut ArenaHandle) {
  if let Some(arena) = handle.as_mut() {
    arena.reset();
  }
}

pub fn destroy(handle: &mut ArenaHandle) {
  if let Some(arena) = handle.take() {
    arena.destroy();
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;

  static RECORDS: Mutex<Vec<String>> = Mutex::new(Vec::new());

  struct CaptureLogger;

  impl log::Log for CaptureLogger {
    fn enabled(
      &self,
      _metadata: &log::Metadata<'_>,
    ) -> bool {
      true
    }

    fn log(
      &self,
      record: &log::Record<'_>,
    ) {
      if let Ok(mut records) = RECORDS.lock() {
        records.push(format!("{} {}", record.level(), record.args()));
      }
    }

    fn flush(&self) {}
  }

  static LOGGER: CaptureLogger = CaptureLogger;

  fn capture_logs() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Trace);
  }

  #[test]
  fn test_create_failure_is_logged() {
    capture_logs();

    assert!(create(0, 16).is_none());

    let records = RECORDS.lock().unwrap();
    assert!(
      records
        .iter()
        .any(|record| record.starts_with("ERROR Arena creation failed: zero-sized arena")),
      "records: {:?}",
      records
    );
  }

  #[test]
  fn test_create_rejects_zero() {
    assert!(create(0, 16).is_none());
    assert!(create(16, 0).is_none());
    assert!(create(16, 16).is_some());
  }

  #[test]
  fn test_empty_handle_is_noop() {
    let mut handle: ArenaHandle = None;

    assert!(allocate(&mut handle).is_none());
    reset(&mut handle);
    destroy(&mut handle);

    assert!(handle.is_none());
  }

  #[test]
  fn test_lifecycle() {
    let mut handle = create(2, 8);

    let first = allocate(&mut handle).unwrap();
    allocate(&mut handle).unwrap();
    allocate(&mut handle).unwrap();
    assert_eq!(handle.as_ref().map(ArenaAllocator::chunk_count), Some(2));

    reset(&mut handle);
    assert_eq!(allocate(&mut handle), Some(first));

    destroy(&mut handle);
    assert!(handle.is_none());
    assert!(allocate(&mut handle).is_none());

    destroy(&mut handle);
  }
}
