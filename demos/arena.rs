use std::{io::Read, mem};

use chunkarena::{ArenaAllocator, ArenaConfig};

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap` or
/// `gdb` between the steps below.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn print_arena(
  label: &str,
  arena: &ArenaAllocator,
) {
  println!(
    "[{}] chunks = {}, committed = {} bytes, used = {} bytes, elements = {}",
    label,
    arena.chunk_count(),
    arena.committed_bytes(),
    arena.used_bytes(),
    arena.allocated_count(),
  );
}

/// A parse-tree node: the kind of object this arena is made for.
#[derive(Clone, Copy)]
struct Node {
  kind: u32,
  lhs: Option<u32>,
  rhs: Option<u32>,
}

fn main() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Debug)
    .init();

  // Four nodes per chunk so chunk growth is easy to follow.
  let mut arena = match ArenaAllocator::with_config(ArenaConfig::for_type::<Node>(4)) {
    Ok(arena) => arena,
    Err(err) => {
      eprintln!("Could not create arena: {}", err);
      return;
    }
  };

  println!(
    "Arena of {} x {} bytes per chunk ({} bytes)",
    arena.elements_per_chunk(),
    arena.element_size(),
    arena.chunk_capacity()
  );
  print_arena("start", &arena);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 1) Fill the first chunk. Only the first allocation touches malloc.
  // --------------------------------------------------------------------
  let mut nodes = Vec::new();
  for kind in 0..4 {
    let node = Node {
      kind,
      lhs: kind.checked_sub(1),
      rhs: None,
    };
    match arena.allocate_value(node) {
      Ok(ptr) => nodes.push(ptr),
      Err(err) => {
        eprintln!("Allocation failed: {}", err);
        return;
      }
    }
  }
  println!("\n[1] Allocated 4 nodes");
  for ptr in &nodes {
    let node = unsafe { ptr.as_ptr().read() };
    println!(
      "    {:?} -> kind = {}, lhs = {:?}, rhs = {:?}",
      ptr, node.kind, node.lhs, node.rhs
    );
  }
  print_arena("1", &arena);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) One more node does not fit and opens a second chunk.
  // --------------------------------------------------------------------
  let overflow = Node {
    kind: 4,
    lhs: Some(3),
    rhs: Some(2),
  };
  if let Ok(ptr) = arena.allocate_value(overflow) {
    println!("\n[2] Fifth node at {:?} (new chunk)", ptr);
    nodes.push(ptr);
  }
  print_arena("2", &arena);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) Reset: chunks stay, the first slot is handed out again.
  // --------------------------------------------------------------------
  arena.reset();
  print_arena("3 after reset", &arena);

  match arena.allocate() {
    Ok(ptr) => println!(
      "[3] First allocation after reset reused the first slot? {}",
      if ptr.cast::<Node>() == nodes[0] { "Yes" } else { "No" }
    ),
    Err(err) => eprintln!("Allocation failed: {}", err),
  }
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Destroy: every chunk goes back to malloc at once.
  // --------------------------------------------------------------------
  println!(
    "\n[4] Destroying arena holding {} bytes in {} nodes' worth of chunks",
    mem::size_of::<Node>() * arena.elements_per_chunk() * arena.chunk_count(),
    arena.elements_per_chunk() * arena.chunk_count(),
  );
  arena.destroy();
  println!("[4] End of example.");
}
