//! MediaWiki adapter. Implements WikiGateway against the Action API.

pub mod client;
pub mod mapper;

pub use client::MediaWikiClient;
