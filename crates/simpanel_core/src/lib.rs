//! The `simpanel_core` crate provides the DOM-free logic behind the SimPanel
//! browser frontend: everything needed to keep a dynamic set of parameter
//! fields consistent with a selected equation's schema and to turn operator
//! input into requests for the simulation service.
//!
//! Key components:
//! - **Registry**: the immutable equation → parameter-schema table.
//! - **Form**: `FormState`, the explicit value object behind the rendered
//!   field set, rebuilt on every schema switch.
//! - **Sweep**: varying-parameter sweep ranges and their derived defaults.
//! - **Payload**: pure assembly of `/simulate/` and `/animate/` request
//!   bodies, with typed validation failures.
//! - **Session**: submission generations and the media state machine.

pub mod error;
pub mod form;
pub mod payload;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod sweep;
