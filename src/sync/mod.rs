//! View-state synchronization core.
//!
//! - `lane` - the taggable async commit machine both fetch pipelines share
//! - `coordinator` - state ownership, mutators, and the commit/discard loop

mod coordinator;
mod lane;

pub use coordinator::{Coordinator, FetchEvent};
pub use lane::{Lane, Settled};
