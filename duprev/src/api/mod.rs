//! Backend integration for duprev.
//!
//! The api module owns a background tokio task holding the `ApiClient` for
//! its lifetime. The main loop never awaits a request itself; it sends an
//! `ApiRequest` down a channel and the answer comes back through the event
//! bus as `AppEvent::Api`, keeping the UI responsive however slow the
//! backend is.
pub mod types;
pub mod worker;
