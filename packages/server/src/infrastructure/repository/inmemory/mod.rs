//! InMemory Repository 実装

pub mod room_registry;

pub use room_registry::InMemoryRoomRegistry;
