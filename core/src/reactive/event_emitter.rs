use smallvec::SmallVec;

use crate::event::WidgetEvent;

type Listener = Box<dyn FnMut(&WidgetEvent)>;

/// Per-widget listener registry for semantic events.
///
/// `emit` returns `true` iff at least one listener ran. Widgets return
/// that value directly from their event handlers, so "handled" doubles
/// as a listener-presence signal: a field with no listeners reports
/// `TextChanged` as unhandled even though its state mutated.
#[derive(Default)]
pub struct EventEmitter {
    listeners: SmallVec<[Listener; 2]>
}

impl EventEmitter {
    #[inline]
    pub fn new() -> Self {
        Self {
            listeners: SmallVec::new()
        }
    }

    #[inline]
    pub fn subscribe(&mut self, listener: impl FnMut(&WidgetEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: &WidgetEvent) -> bool {
        for listener in self.listeners.iter_mut() {
            listener(event);
        }

        !self.listeners.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
