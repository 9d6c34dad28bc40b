pub mod file;
pub mod memory;
pub mod storage;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use storage::{Storage, Theme};
pub use traits::KeyValueStore;
