#![forbid(unsafe_code)]

//! Tool construction.

use std::cell::RefCell;
use std::rc::Rc;

use crafty_core::config::InputConfig;
use crafty_tool::{Mode, Tool};

use crate::kernel::{ModelingKernel, PanelSession};
use crate::selected::Selected;
use crate::unselected::Unselected;

/// Build the face-to-panel tool.
///
/// The first session starts in [`Selected`] when `preselected` names a
/// face, skipping the pick step; every other session starts in
/// [`Unselected`]. Sticky thickness and offset persist across sessions of
/// the returned tool.
pub fn face_to_panel_tool<K>(kernel: Rc<RefCell<K>>, config: InputConfig, preselected: Option<K::Face>) -> Tool
where
    K: ModelingKernel + 'static,
{
    let session = PanelSession::new(kernel);
    let mut preselected = preselected;
    Tool::new(config, move |_ctx| -> Box<dyn Mode> {
        match preselected.take() {
            Some(face) => {
                let info = session.describe(face);
                Box::new(Selected::new(session.clone(), info))
            }
            None => Box::new(Unselected::new(session.clone())),
        }
    })
}
