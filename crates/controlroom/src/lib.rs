//! Umbrella crate for the control room HUD.
//!
//! This crate is intentionally small: it re-exports the panel, protocol and
//! client crates so downstream code can depend on a single crate name
//! (`controlroom`).

pub use controlroom_client as client;
pub use controlroom_panel as panel;
pub use controlroom_protocol as protocol;
