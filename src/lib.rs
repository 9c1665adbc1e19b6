//! talk-graph: Wikipedia Talk-page social graph scraper with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
