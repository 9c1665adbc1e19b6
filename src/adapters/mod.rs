//! Infrastructure adapters. Implement outbound ports.
//!
//! MediaWiki API, filesystem, terminal UI. Map errors to DomainError.

pub mod mediawiki;
pub mod persistence;
pub mod ui;
