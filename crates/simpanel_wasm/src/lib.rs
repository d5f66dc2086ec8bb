//! WASM bridge for the SimPanel core library.
//!
//! Each simulation page calls one exported entry point
//! ([`init_simulate_panel`] or [`init_animate_panel`]) on load. The bridge
//! builds the form model from `simpanel_core`, renders it into the page,
//! wires the page's controls, and owns the fetch boundary to the
//! simulation service.

pub mod panel;
pub mod presenter;
pub mod transport;

pub use panel::{init_animate_panel, init_simulate_panel};
