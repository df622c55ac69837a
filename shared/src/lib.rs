//! Shared utilities for the storage client workspace

pub mod observability;
