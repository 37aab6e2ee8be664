//! Shared types used across gogshelf crates.

pub mod collections;
