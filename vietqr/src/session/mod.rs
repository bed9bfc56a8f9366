//! Interactive session support
//!
//! Keeps the last-submitted encode fields between invocations. The payload
//! functions stay stateless; callers load a [`SessionState`], turn it into a
//! request and store what was submitted.

pub mod state;
pub mod storage;

pub use state::SessionState;
pub use storage::{SessionError, SessionStore};
