//! Utilities shared by the Syncvia server and client.

pub mod logger;
pub mod time;
