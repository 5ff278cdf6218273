//! # chunkarena - A Fixed-Size Arena Allocator
//!
//! This crate provides an **arena allocator** for many objects of the same
//! size that share one lifetime: parse-tree nodes, interpreter cells,
//! per-frame game objects. Elements are carved out of large chunks and are
//! never freed one by one; the whole arena is reset or destroyed at once.
//!
//! ## Overview
//!
//! ```text
//!   Arena Allocator (elements_per_chunk = 4):
//!
//!   chunks ──► ┌─────────────────────────────────────────────────────┐
//!              │ Chunk 0   ┌─────┬─────┬─────┬─────┐                 │
//!              │           │ E0  │ E1  │ E2  │ E3  │  used = 4 x E   │
//!              │           └─────┴─────┴─────┴─────┘                 │
//!              ├─────────────────────────────────────────────────────┤
//!              │ Chunk 1   ┌─────┬─────┬─────────────┐               │
//!              │           │ E4  │ E5  │ Free Space  │  used = 2 x E │
//!              │           └─────┴─────┴─────────────┘               │
//!              │                       ▲                             │
//!              │                       └── next allocation           │
//!              └─────────────────────────────────────────────────────┘
//!
//!   Each allocation bumps the active chunk's `used` offset by one element.
//!   A full chunk is never looked at again until the arena is reset.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   chunkarena
//!   ├── arena      - ArenaAllocator (allocate, reset, destroy)
//!   ├── chunk      - Chunk buffer bookkeeping (internal)
//!   ├── config     - ArenaConfig
//!   ├── error      - ArenaError
//!   ├── handle     - Option-based create/allocate/reset/destroy
//!   ├── sequence   - Growable chunk list
//!   └── source     - ChunkSource trait and the libc-backed Malloc
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use chunkarena::ArenaAllocator;
//!
//! let mut arena = ArenaAllocator::new(128, std::mem::size_of::<u64>()).unwrap();
//!
//! let ptr = arena.allocate().unwrap().cast::<u64>();
//! unsafe {
//!     ptr.as_ptr().write(42);
//!     assert_eq!(ptr.as_ptr().read(), 42);
//! }
//!
//! // Hand the same memory out again.
//! arena.reset();
//! assert_eq!(arena.allocate().unwrap().cast::<u64>(), ptr);
//!
//! // Release every chunk.
//! arena.destroy();
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//!   new ──► allocate ──► allocate ──► ... ──► reset ──► allocate ──► ...
//!    │                                                                  │
//!    │            no chunk until the first allocate                     │
//!    └──────────────────────────────────────────────────────► destroy ◄─┘
//! ```
//!
//! - **new**: validates the configuration and reserves the chunk list.
//! - **allocate**: pointer arithmetic, plus one `malloc` whenever a new
//!   chunk is needed.
//! - **reset**: rewinds every chunk; memory is kept, contents are not cleared.
//! - **destroy**: releases every chunk buffer. Dropping the arena does the
//!   same.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: the arena is neither `Send` nor `Sync`
//! - **One element size per arena**: every allocation is `element_size` bytes
//! - **No individual free**: memory comes back only on reset or destroy
//! - **Natural alignment only**: chunk buffers are as aligned as `malloc` makes them
//! - **Uninitialized memory**: allocations are not zeroed
//!
//! ## Safety
//!
//! Allocation itself is safe, but the returned pointers are raw: reading or
//! writing through them requires `unsafe`. They are handed out again after
//! `reset` and dangle once the arena is dropped.

pub mod arena;
mod chunk;
pub mod config;
pub mod error;
pub mod handle;
pub mod sequence;
pub mod source;

pub use arena::ArenaAllocator;
pub use config::ArenaConfig;
pub use error::{ArenaError, Result};
pub use handle::ArenaHandle;
pub use source::{ChunkSource, Malloc};
