//! Application use cases. Orchestrate domain logic via ports.

pub mod scrape_service;

pub use scrape_service::{ScrapeReport, ScrapeService};
