use tracing::debug;

use crate::ui::WidgetId;

/// Arbitrates which widget receives input exclusively: at most one
/// mouse-focus holder and one keyboard-focus holder at any instant.
///
/// Widgets never talk to the dispatcher directly. They file requests
/// through [`EventCtx`](crate::ui::EventCtx) while their handler runs and
/// the ui applies them after the handler returns, so a handler always
/// runs to completion before any focus transition is observed.
#[derive(Default, Debug)]
pub struct FocusDispatcher {
    mouse_focus: Option<WidgetId>,
    keyboard_focus: Option<WidgetId>
}

/// Focus requests buffered during a single event handler.
#[derive(Default, Clone, Copy, Debug)]
pub(crate) struct FocusRequests {
    pub mouse: Option<WidgetId>,
    pub keyboard: Option<WidgetId>
}

impl FocusDispatcher {
    #[inline]
    pub fn mouse_focus(&self) -> Option<WidgetId> {
        self.mouse_focus
    }

    #[inline]
    pub fn keyboard_focus(&self) -> Option<WidgetId> {
        self.keyboard_focus
    }

    pub(crate) fn grant_mouse_focus(&mut self, id: WidgetId) {
        if self.mouse_focus != Some(id) {
            debug!("mouse focus -> {id:?}");
        }

        self.mouse_focus = Some(id);
    }

    pub(crate) fn release_mouse_focus(&mut self) -> Option<WidgetId> {
        self.mouse_focus.take()
    }

    /// Moves keyboard focus, returning the previous holder so the ui can
    /// deliver `FocusOut` before the new holder's `FocusIn`.
    pub(crate) fn grant_keyboard_focus(
        &mut self,
        id: WidgetId
    ) -> Option<WidgetId> {
        if self.keyboard_focus == Some(id) {
            return None;
        }

        debug!("keyboard focus -> {id:?}");

        self.keyboard_focus.replace(id)
    }
}

impl FocusRequests {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mouse.is_none() && self.keyboard.is_none()
    }
}
