//! Per-session, hierarchically namespaced in-memory storage
//!
//! The store is a tree of mappings rooted at an opaque session key. Each
//! request handler addresses data as `session_id` followed by zero or more
//! namespace segments, e.g. `[sid, "oauth_sessions", "spotify"]`.
//!
//! The store performs no locking of its own; owners wrap it in whatever
//! lock suits their access pattern.

pub mod error;
pub mod namespaced;
pub mod session_id;

pub use error::{StoreError, StoreResult};
pub use namespaced::{Entry, Namespace, NamespacedStore};
pub use session_id::SessionId;
