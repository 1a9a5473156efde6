use crate::ui::WidgetId;

/// A pointer event, already resolved against the widget it targets.
/// `Enter`/`Exit`/`Click` are synthesized by [`Ui`](crate::ui::Ui) from
/// raw pointer motion; widgets never see raw coordinates.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub time_stamp: u64
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MouseEventKind {
    Enter,
    Exit,
    Down,
    Up,
    Click
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct KeyboardEvent {
    pub kind: KeyboardEventKind,
    pub time_stamp: u64
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyboardEventKind {
    FocusIn,
    FocusOut,
    KeyDown(Key)
}

/// The keys the toolkit reacts to. Anything the platform cannot map to
/// one of these is dropped before dispatch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Enter,
    ArrowRight,
    Backspace,
    /// A single visible character.
    Char(char)
}

/// A higher-level event synthesized from raw input and delivered to
/// application listeners.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WidgetEvent {
    pub source: WidgetId,
    pub time_stamp: u64,
    pub kind: WidgetEventKind
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WidgetEventKind {
    TextChanged,
    ToggleOn,
    ToggleOff,
    TimerFinished
}

impl MouseEvent {
    #[inline]
    pub const fn new(kind: MouseEventKind, time_stamp: u64) -> Self {
        Self { kind, time_stamp }
    }
}

impl KeyboardEvent {
    #[inline]
    pub const fn new(kind: KeyboardEventKind, time_stamp: u64) -> Self {
        Self { kind, time_stamp }
    }
}
