//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by UI/adapter into the application
//! - Outbound: Called by application into infrastructure

pub mod inbound;
pub mod outbound;
pub mod progress;

pub use inbound::InputPort;
pub use outbound::{GraphRepoPort, PageArchivePort, WikiGateway};
pub use progress::{ProgressPort, ProgressStage};
