//! Persistence adapters. Graph output files and raw page archive.

pub mod graph_files;
pub mod page_archive;

pub use graph_files::GraphFiles;
pub use page_archive::PageArchive;
