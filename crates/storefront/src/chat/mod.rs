//! The Core X shopping assistant.
//!
//! This module owns the conversational side of the storefront:
//!
//! - [`types`] - Message roles and the session log entry type
//! - [`intent`] - Pre-gateway interception of order/returns questions
//! - [`snapshot`] - Durable session persistence behind a repository trait
//! - [`gateway`] - The remote inference gateway contract and HTTP client
//! - [`session`] - The session state machine tying the above together

pub mod gateway;
pub mod intent;
pub mod session;
pub mod snapshot;
pub mod types;

pub use gateway::{AssistantGateway, GatewayError, HttpGateway};
pub use intent::Intent;
pub use session::{ChatSession, SubmitOutcome};
pub use snapshot::{FileSessionStore, MemorySessionStore, SessionStore, SnapshotError};
pub use types::{ChatMessage, Role};
