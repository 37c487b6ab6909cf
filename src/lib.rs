//! Conversation list engine (convlist)
//!
//! Recency-ordered conversation list that materializes rows lazily around
//! the viewport, plus a terminal front end for browsing large lists.
//!
//! The engine (`view_state`) is a pure core: every event method takes the
//! current time and nothing blocks. The terminal shell (`view`) owns the
//! event loop and drives the engine's debounce timer.

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod view;
pub mod view_state;
