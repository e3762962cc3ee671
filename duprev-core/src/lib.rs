//! Client-side logic for reviewing and cleaning duplicate files, free of
//! any terminal or rendering concern.
//!
//! The crate splits into four pieces: wire [`types`] shared with the
//! backend, a typed HTTP [`client`] over those types, the [`session`]
//! holding loaded groups plus keep/delete selections, and the [`poller`]
//! that paces scan-status requests. Session and poller are plain state
//! machines driven by the caller's clock and channel plumbing, which keeps
//! every timing and selection rule testable without a server.

pub mod client;
pub mod error;
pub mod poller;
pub mod session;
pub mod types;
