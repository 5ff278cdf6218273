use thiserror::Error;

/// Errors reported by the arena.
///
/// Only [`ArenaError::OutOfMemory`] can happen once an allocator exists; the
/// remaining variants reject a configuration at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArenaError {
  #[error("out of memory: could not obtain {requested} bytes")]
  OutOfMemory { requested: usize },

  #[error("zero-sized arena: {elements_per_chunk} elements of {element_size} bytes per chunk")]
  ZeroSized {
    elements_per_chunk: usize,
    element_size: usize,
  },

  #[error("chunk capacity overflows usize: {elements_per_chunk} elements of {element_size} bytes")]
  CapacityOverflow {
    elements_per_chunk: usize,
    element_size: usize,
  },

  #[error("chunk list growth factor must be finite and greater than 1.0, got {0}")]
  InvalidGrowthFactor(f64),

  #[error("value of {size} bytes (align {align}) does not fit a {element_size}-byte slot")]
  LayoutMismatch {
    size: usize,
    align: usize,
    element_size: usize,
  },
}

pub type Result<T> = std::result::Result<T, ArenaError>;
