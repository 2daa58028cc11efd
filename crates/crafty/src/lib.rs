#![forbid(unsafe_code)]

//! Crafty public facade crate.
//!
//! Re-exports the chord recognizer, the tool driver, and (with the default
//! `panel` feature) the face-to-panel workflow, plus a prelude for host
//! integrations.

// --- Input re-exports ------------------------------------------------------

pub use crafty_core::{
    Activation, Bounds2, Chord, ChordBinding, ChordError, Chordset, ChordsetState, ConfigError,
    DragDirection, Enacted, Extents, InputConfig, Key, KeyInput, KeyNormalizer, Modifiers,
    MouseButton, Plane, Platform, Point, Point3, Trigger, Vector3, create_help_message,
};

// --- Tool re-exports -------------------------------------------------------

pub use crafty_tool::{
    CancelReason, Color, LineStyle, Mode, ModeChordset, OperationError, Primitive, Stipple, Tool,
    ToolContext, Transition, UndoHost, VcbState, View, draw_outline, wrap_with_undo,
};

// --- Panel re-exports ------------------------------------------------------

#[cfg(feature = "panel")]
pub use crafty_panel::{
    LengthParseError, LengthUnit, ModelingKernel, PanelSession, ProjectionError, ProjectionKernel,
    face_to_panel_tool, parse_length, project_to_plane_tool,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error for host integrations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Chord(#[from] ChordError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[cfg(feature = "panel")]
    #[error(transparent)]
    Length(#[from] LengthParseError),

    #[cfg(feature = "panel")]
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// Standard result type for Crafty APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Activation, Chord, Chordset, Enacted, Error, InputConfig, Key, Mode, ModeChordset,
        Modifiers, MouseButton, Platform, Result, Tool, ToolContext, Transition, VcbState, View,
    };

    #[cfg(feature = "panel")]
    pub use crate::{ModelingKernel, ProjectionKernel, face_to_panel_tool, project_to_plane_tool};

    pub use crate::{core, tool};
    #[cfg(feature = "panel")]
    pub use crate::panel;
}

pub use crafty_core as core;
#[cfg(feature = "panel")]
pub use crafty_panel as panel;
pub use crafty_tool as tool;
