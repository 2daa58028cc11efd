#![forbid(unsafe_code)]

//! Core: key normalization, chord bindings, and the chordset state machine.
//!
//! # Role in Crafty
//! `crafty-core` is the input layer. It turns raw host key codes into
//! platform-neutral [`Key`]s, holds declarative [`Chord`] bindings, and
//! recognizes them with a [`Chordset`] whose state lives in the pure
//! [`ChordsetState`] machine.
//!
//! # Primary responsibilities
//! - **KeyNormalizer**: per-platform keycode tables built once per process.
//! - **Chord**: modifiers plus a click, drag, or key-sequence trigger.
//! - **Chordset**: live modifiers, sequence tracking, and handler dispatch.
//! - **InputConfig**: platform, click slop, and status layout.
//!
//! # How it fits in the system
//! The tool driver (`crafty-tool`) owns one chordset per interaction mode
//! and forwards host events into it. Nothing here talks to the host
//! directly, so everything is testable with plain values.

pub mod chord;
pub mod chordset;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod keys;
pub mod state;

pub use chord::{Chord, ChordBinding, MouseButton, Trigger, create_help_message};
pub use chordset::Chordset;
pub use config::InputConfig;
pub use error::{ChordError, ConfigError};
pub use event::{Activation, DragDirection, Enacted};
pub use geometry::{Bounds2, Extents, Plane, Point, Point3, Vector3};
pub use keys::{Key, KeyInput, KeyNormalizer, Modifiers, Platform};
pub use state::{ChordsetState, DownKeys};
