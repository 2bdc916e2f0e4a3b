//! Core engine: the fetch → decide → apply → report loop.

pub mod outcome;
pub mod resolver;
pub mod scheduler;
pub mod watcher;
