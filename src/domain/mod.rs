//! Core domain layer. No external I/O dependencies.
//!
//! Entities, wikitext parsing and the page graph live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod graph;
pub mod parser;

pub use entities::{
    ArticlePage, CategoryMember, Namespace, PageClass, ScrapeInfo, TalkPageLinks, WikiPage,
    archive_prefix, article_title,
};
pub use errors::DomainError;
pub use graph::{EdgeKind, GraphSummary, PageGraph, PageNode};
