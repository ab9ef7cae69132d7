//! Task Tracker API Library
//!
//! A small task-tracking HTTP service. Tasks live in an in-memory store that
//! is mirrored, in full, to a line-delimited JSON file after every mutation.

pub mod api;
pub mod domain;
pub mod infrastructure;
