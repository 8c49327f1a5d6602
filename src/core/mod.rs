//! Core chat components
//!
//! Session bookkeeping and the exchange logic that drives the completion
//! service.

mod chat;
mod session;

pub use chat::{ChatEngine, ChatError};
pub use session::{SessionContext, SessionStore, SESSION_COOKIE};
