//! Shared store adapters.
//!
//! | Adapter       | Scope                | Use                                  |
//! |---------------|----------------------|--------------------------------------|
//! | `MemoryStore` | one process          | tests, several windows in one binary |
//! | `FileStore`   | one directory on disk | separate `screenlink` processes     |

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
