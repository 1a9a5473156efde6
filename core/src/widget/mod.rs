pub mod search_field;
pub mod toggle;
pub mod timer;

pub use search_field::SearchField;
pub use toggle::Toggle;
pub use timer::Timer;

use std::any::Any;

use tracing::warn;

use crate::{
    draw::{Surface, TextInfo, TextMeasurer},
    event::{KeyboardEvent, MouseEvent, MouseEventKind},
    geometry::{Geometry, Size},
    ui::EventCtx
};

pub trait Widget {
    fn geometry(&self) -> &Geometry;
    fn geometry_mut(&mut self) -> &mut Geometry;

    /// Returns `true` if the event was consumed. A `false` return lets
    /// the ui keep propagating the event to widgets beneath.
    fn mouse(&mut self, _ctx: &mut EventCtx<'_>, _event: &MouseEvent) -> bool {
        false
    }

    fn keyboard(&mut self, _ctx: &mut EventCtx<'_>, _event: &KeyboardEvent) -> bool {
        false
    }

    /// Delivery point for ticks armed through [`Scheduler`](crate::task::Scheduler).
    fn tick(&mut self, _ctx: &mut EventCtx<'_>, _time_stamp: u64) { }

    fn draw(&self, surface: &mut dyn Surface);

    /// Concrete-type access for application-level mutators reached
    /// through [`Ui::get_mut`](crate::ui::Ui::get_mut).
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// The enum tracking whether the pointer is outside, hovering, or
/// pressing a widget. Transitions happen only in response to pointer
/// events on the owning widget.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum HitState {
    #[default]
    Idle,
    Hover,
    Down
}

impl HitState {
    /// The full transition table: enter -> hover, exit -> idle,
    /// down -> down. `Up` and `Click` are left to the widget, which
    /// layers its own semantics on top (flip, focus request).
    pub fn apply(&mut self, kind: MouseEventKind) -> bool {
        match kind {
            MouseEventKind::Enter => {
                *self = Self::Hover;
                true
            }
            MouseEventKind::Exit => {
                *self = Self::Idle;
                true
            }
            MouseEventKind::Down => {
                *self = Self::Down;
                true
            }
            MouseEventKind::Up | MouseEventKind::Click => false
        }
    }

    /// The hover-only subset used by widgets that never enter `Down`.
    pub fn apply_hover(&mut self, kind: MouseEventKind) -> bool {
        match kind {
            MouseEventKind::Enter => {
                *self = Self::Hover;
                true
            }
            MouseEventKind::Exit => {
                *self = Self::Idle;
                true
            }
            _ => false
        }
    }

    #[inline]
    pub fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}

/// Recomputes a text widget's minimal size: measured text plus padding
/// on each side, clamped to any explicitly supplied dimension. Empty
/// text measures as a single space so the widget never collapses.
///
/// Returns the measured text width for cursor placement. On measurement
/// failure the resize is abandoned, prior geometry stays intact and a
/// warning is logged.
pub(crate) fn resize_to_text(
    geometry: &mut Geometry,
    measurer: &mut dyn TextMeasurer,
    info: &TextInfo<'_>
) -> Option<f32> {
    let padded;
    let info = if info.text.is_empty() {
        padded = TextInfo {
            text: " ",
            ..info.clone()
        };
        &padded
    } else {
        info
    };

    match measurer.measure(info) {
        Ok(measured) => {
            geometry.resize(Size::new(
                measured.width + geometry.padding * 2f32,
                measured.height + geometry.padding * 2f32
            ));

            Some(measured.width)
        }
        Err(err) => {
            warn!("text measurement failed for {:?}: {err}", info.text);

            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use test_util::FixedMeasurer;

    #[test]
    fn hit_state_round_trip_ends_idle() {
        let mut state = HitState::default();

        assert!(state.apply(MouseEventKind::Enter));
        assert_eq!(state, HitState::Hover);

        assert!(state.apply(MouseEventKind::Down));
        assert_eq!(state, HitState::Down);

        // widgets move down -> hover themselves on `Up`
        state = HitState::Hover;

        assert!(state.apply(MouseEventKind::Exit));
        assert_eq!(state, HitState::Idle);
    }

    #[test]
    fn resize_uses_measured_size_plus_padding() {
        let mut geometry = Geometry::new(0f32, 0f32).with_padding(5f32);
        let mut measurer = FixedMeasurer::new();

        let width = resize_to_text(
            &mut geometry,
            &mut measurer,
            &TextInfo::new("abcd", 16f32)
        );

        assert_eq!(width, Some(32f32));
        assert_eq!(geometry.width, 42f32);
        assert_eq!(geometry.height, 26f32);
    }

    #[test]
    fn empty_text_measures_as_a_space() {
        let mut geometry = Geometry::new(0f32, 0f32).with_padding(5f32);
        let mut measurer = FixedMeasurer::new();

        let width = resize_to_text(
            &mut geometry,
            &mut measurer,
            &TextInfo::new("", 16f32)
        );

        assert_eq!(width, Some(8f32));
    }

    #[test]
    fn failed_measurement_keeps_geometry() {
        let mut geometry = Geometry::new(0f32, 0f32).with_padding(5f32);
        geometry.width = 77f32;
        geometry.height = 31f32;

        let mut measurer = FixedMeasurer::new();
        measurer.fail = true;

        let width = resize_to_text(
            &mut geometry,
            &mut measurer,
            &TextInfo::new("abcd", 16f32)
        );

        assert_eq!(width, None);
        assert_eq!(geometry.width, 77f32);
        assert_eq!(geometry.height, 31f32);
    }
}
