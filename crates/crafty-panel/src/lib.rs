#![forbid(unsafe_code)]

//! Panel-construction tools.
//!
//! # Face to panel
//!
//! Turn a face of the model into a woodworking panel. The workflow has
//! three modes:
//!
//! ```text
//! Unselected ──click face──▶ Selected ──click/type thickness──▶ Targeting
//!     ▲   │                     │                                  │
//!     │   └─click empty: end    └─Escape──▶ Unselected             │
//!     └──────────────────click/Enter: panel created────────────────┘
//! ```
//!
//! Geometry comes from the host through [`ModelingKernel`]; the last
//! confirmed thickness and offset are remembered in the shared
//! [`PanelSession`].
//!
//! # Project to plane
//!
//! Flatten selected edges onto a plane taken from a face or picked point by
//! point. See [`project_to_plane`].

pub mod kernel;
pub mod length;
pub mod project_to_plane;
pub mod selected;
pub mod targeting;
pub mod tool;
pub mod unselected;

pub use kernel::{FaceInfo, ModelingKernel, PanelSession, Sticky};
pub use length::{LengthParseError, LengthUnit, format_inches, parse_length};
pub use project_to_plane::{
    DefinePlanePt1, DefinePlanePt2, ProjectionError, ProjectionKernel, ProjectionSession, SelectFace,
    project_to_plane_tool,
};
pub use selected::Selected;
pub use targeting::Targeting;
pub use tool::face_to_panel_tool;
pub use unselected::Unselected;
