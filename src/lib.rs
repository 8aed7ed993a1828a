//! Multi-document viewer core.
//!
//! A [`SessionController`](app::SessionController) tracks the open documents,
//! which one is active, display settings and the last search, and emits
//! [`SessionEvent`](app::SessionEvent)s for the presentation layer.

pub mod app;
