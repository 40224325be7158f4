//! Fetch Module
//!
//! Read-through orchestration of the in-memory cache, the network and the
//! offline store.

mod clock;
mod orchestrator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use orchestrator::{resource_id, FetchCache};
