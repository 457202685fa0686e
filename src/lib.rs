//! readpane: a terminal reading client for a syndicated-article service.
//!
//! The crate is organized around the view-state synchronization core in
//! [`sync`]: user intent (active filter, selected article) drives two
//! asynchronous remote queries through [`gateway`], and tagged commits keep
//! the list and detail panes consistent with the latest intent no matter
//! how the fetches interleave. The [`ui`] module is a thin consumer of
//! that state.

pub mod config;
pub mod gateway;
pub mod model;
pub mod sync;
pub mod ui;
pub mod util;
