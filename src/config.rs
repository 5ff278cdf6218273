use std::mem;

use crate::error::{ArenaError, Result};

/// Initial number of chunk slots reserved in the chunk list.
pub const DEFAULT_CHUNK_LIST_CAPACITY: usize = 30;

/// Factor the chunk list grows by once its reserved slots run out.
pub const DEFAULT_CHUNK_LIST_GROWTH: f64 = 1.5;

/// Shape of an arena: how big one element is and how many fit in a chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaConfig {
  pub elements_per_chunk: usize,
  pub element_size: usize,
  pub chunk_list_capacity: usize,
  pub chunk_list_growth: f64,
}

impl ArenaConfig {
  pub fn new(
    elements_per_chunk: usize,
    element_size: usize,
  ) -> Self {
    Self {
      elements_per_chunk,
      element_size,
      chunk_list_capacity: DEFAULT_CHUNK_LIST_CAPACITY,
      chunk_list_growth: DEFAULT_CHUNK_LIST_GROWTH,
    }
  }

  /// Sizes the element slot after `T`.
  pub fn for_type<T>(elements_per_chunk: usize) -> Self {
    Self::new(elements_per_chunk, mem::size_of::<T>())
  }

  pub fn with_chunk_list(
    mut self,
    capacity_hint: usize,
    growth_factor: f64,
  ) -> Self {
    self.chunk_list_capacity = capacity_hint;
    self.chunk_list_growth = growth_factor;
    self
  }

  /// Checks the configuration and returns the byte capacity of one chunk.
  pub fn validate(&self) -> Result<usize> {
    if self.elements_per_chunk == 0 || self.element_size == 0 {
      return Err(ArenaError::ZeroSized {
        elements_per_chunk: self.elements_per_chunk,
        element_size: self.element_size,
      });
    }

    if !self.chunk_list_growth.is_finite() || self.chunk_list_growth <= 1.0 {
      return Err(ArenaError::InvalidGrowthFactor(self.chunk_list_growth));
    }

    self
      .element_size
      .checked_mul(self.elements_per_chunk)
      .ok_or(ArenaError::CapacityOverflow {
        elements_per_chunk: self.elements_per_chunk,
        element_size: self.element_size,
      })
  }
}
