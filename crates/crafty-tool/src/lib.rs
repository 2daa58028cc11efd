#![forbid(unsafe_code)]

//! Tool driver: interaction modes and host event dispatch.
//!
//! # Role in Crafty
//! `crafty-tool` sits between the host application and a tool's modes. The
//! host calls into one [`Tool`]; the tool forwards each event to the current
//! [`Mode`] (or its chordset) and applies the [`Transition`] that comes back.
//!
//! # Primary responsibilities
//! - **Mode**: one step of a workflow, with lifecycle hooks and defaults.
//! - **Tool**: click/drag discrimination, key forwarding, status and
//!   measurement box sync, session start and end.
//! - **View**: the host UI surface modes draw and report through.
//! - **wrap_with_undo**: one host undo step per model change.
//!
//! # Feature flags
//! - `tracing-subscriber`: [`logging::init`] installs a fmt subscriber.
//! - `test-helpers`: [`testing::RecordingView`] for downstream tests.

#[cfg(feature = "tracing-subscriber")]
pub mod logging;
pub mod mode;
pub mod operation;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
pub mod tool;
pub mod view;

pub use mode::{Mode, ModeChordset, ToolContext, Transition, VcbState};
pub use operation::{OperationError, UndoHost, wrap_with_undo};
pub use tool::Tool;
pub use view::{CancelReason, Color, LineStyle, Primitive, Stipple, View, draw_outline};
