//! Repository 実装
//!
//! - `inmemory`: HashMap を使ったインメモリ実装（単一プロセス前提）

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
