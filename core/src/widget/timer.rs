use std::time::Duration;

use crate::{
    color::Color,
    draw::{Quad, Surface, TextInfo, TextMeasurer},
    event::{WidgetEvent, WidgetEventKind},
    geometry::{Geometry, Rect},
    reactive::EventEmitter,
    task::{IntervalHandle, Scheduler},
    theme::{Font, Theme},
    ui::{EventCtx, WidgetId},
    widget::{resize_to_text, Widget}
};

/// Longest configurable countdown: 9 minutes 59 seconds.
pub const MAX_DURATION: u32 = 599;

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Align {
    Left,
    Centre,
    Right
}

/// Construction-time overrides, merged over the theme's named defaults.
#[derive(Clone, Debug)]
pub struct Config {
    pub geometry: Geometry,
    /// Countdown length in seconds, clamped to `0..=MAX_DURATION`.
    pub duration: u32,
    pub align: Align,
    pub fill: Option<Color>,
    pub border: Option<Color>,
    pub radius: f32,
    pub font: Option<Font>,
    pub font_size: Option<f32>,
    pub font_color: Option<Color>
}

/// A countdown label driven by a repeating scheduled callback.
///
/// Created idle; `start` arms a one-second interval and resets the
/// remaining time to `duration`; every tick decrements and reformats;
/// reaching zero auto-stops and emits `TimerFinished`. The interval
/// handle is held iff the timer is actively counting down.
pub struct Timer {
    id: WidgetId,
    geometry: Geometry,
    duration: u32,
    current_time: u32,
    /// Formatted `MM:SS` display string, derived from the countdown.
    time: String,
    text_width: f32,
    interval: Option<IntervalHandle>,
    scheduler: Scheduler,
    align: Align,
    fill: Option<Color>,
    border: Option<Color>,
    radius: f32,
    font: Font,
    font_size: f32,
    font_color: Color,
    emitter: EventEmitter
}

/// Formats whole seconds as `MM:SS`.
pub fn format_timer(time: u32) -> String {
    format!("{:02}:{:02}", time / 60, time % 60)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            duration: 0,
            align: Align::Centre,
            fill: None,
            border: None,
            radius: 0f32,
            font: None,
            font_size: None,
            font_color: None
        }
    }
}

impl Timer {
    pub fn new(id: WidgetId, config: Config, theme: &Theme, scheduler: Scheduler) -> Self {
        let mut geometry = config.geometry;
        geometry.padding = theme.text_padding;

        let duration = config.duration.min(MAX_DURATION);

        Self {
            id,
            geometry,
            duration,
            current_time: duration,
            time: format_timer(duration),
            text_width: 0f32,
            interval: None,
            scheduler,
            align: config.align,
            fill: config.fill,
            border: config.border,
            radius: config.radius,
            font: config.font.unwrap_or(theme.font),
            font_size: config.font_size.unwrap_or(theme.font_size),
            font_color: config.font_color.unwrap_or(theme.font_color),
            emitter: EventEmitter::new()
        }
    }

    #[inline]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Remaining seconds. Mutates only while the countdown is running.
    #[inline]
    pub fn current_time(&self) -> u32 {
        self.current_time
    }

    #[inline]
    pub fn time(&self) -> &str {
        &self.time
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    #[inline]
    pub fn subscribe(&mut self, listener: impl FnMut(&WidgetEvent) + 'static) {
        self.emitter.subscribe(listener);
    }

    /// Clamps to `0..=MAX_DURATION`. While the countdown is running the
    /// displayed time is left untouched; it reflects the new duration
    /// only once stopped.
    pub fn set_duration(&mut self, duration: i64, measurer: &mut dyn TextMeasurer) {
        self.duration = duration.clamp(0, i64::from(MAX_DURATION)) as u32;

        if self.interval.is_none() {
            self.set_time(format_timer(self.duration), measurer);
        }
    }

    /// Arms the countdown. A no-op while already running: the guard is
    /// the presence of the interval handle, so a second call can never
    /// create a concurrent countdown.
    pub fn start(&mut self) {
        if self.interval.is_some() {
            return;
        }

        self.current_time = self.duration;
        self.interval = Some(self.scheduler.repeat(self.id, TICK_PERIOD));
    }

    /// Disarms the countdown, releasing the scheduled callback exactly
    /// once, and emits `TimerFinished` iff a countdown was active.
    /// Safe to call any number of times.
    pub fn stop(&mut self, time_stamp: u64) {
        let Some(interval) = self.interval.take() else {
            return;
        };

        interval.cancel();

        self.emitter.emit(&WidgetEvent {
            source: self.id,
            time_stamp,
            kind: WidgetEventKind::TimerFinished
        });
    }

    /// Stops, then zeroes both the duration and the remaining time.
    /// The display string is left as-is.
    pub fn reset(&mut self, time_stamp: u64) {
        self.stop(time_stamp);

        self.duration = 0;
        self.current_time = 0;
    }

    pub fn set_font(&mut self, font: Font, measurer: &mut dyn TextMeasurer) {
        self.font = font;
        self.resize(measurer);
    }

    pub fn set_font_size(&mut self, size: f32, measurer: &mut dyn TextMeasurer) {
        self.font_size = size;
        self.resize(measurer);
    }

    fn set_time(&mut self, time: String, measurer: &mut dyn TextMeasurer) {
        self.time = time;
        self.resize(measurer);
    }

    fn resize(&mut self, measurer: &mut dyn TextMeasurer) {
        let info = TextInfo::new(&self.time, self.font_size)
            .with_font(self.font);

        if let Some(width) = resize_to_text(&mut self.geometry, measurer, &info) {
            self.text_width = width;
        }
    }
}

impl Widget for Timer {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    fn tick(&mut self, ctx: &mut EventCtx<'_>, time_stamp: u64) {
        // a tick queued before cancellation may still arrive
        if self.interval.is_none() {
            return;
        }

        if self.current_time > 0 {
            self.current_time -= 1;
            let time = format_timer(self.current_time);
            self.set_time(time, ctx.measurer);
        }

        if self.current_time == 0 {
            self.stop(time_stamp);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let rect = self.geometry.padding_box();
        let padding = self.geometry.padding;

        if self.fill.is_some() || self.border.is_some() {
            let mut quad = Quad::rounded(
                rect,
                self.fill.unwrap_or(Color::TRANSPARENT),
                self.radius
            );

            if let Some(border) = self.border {
                quad = quad.with_border(1f32, border);
            }

            surface.fill_quad(quad);
        }

        let info = TextInfo::new(&self.time, self.font_size)
            .with_font(self.font);
        let line = info.line_box(rect);

        let x = match self.align {
            Align::Left => rect.x + padding,
            Align::Centre => rect.x + (rect.width - self.text_width) / 2f32,
            Align::Right => rect.x + rect.width - padding - self.text_width
        };

        surface.fill_text(
            &info,
            Rect::new(x, line.y, self.text_width.max(rect.width), line.height),
            self.font_color
        );
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::{rc::Rc, cell::RefCell};

    use tokio::runtime;

    use super::*;
    use crate::widget::test_util::FixedMeasurer;

    fn timer(scheduler: Scheduler) -> Timer {
        Timer::new(
            WidgetId::default(),
            Config::default(),
            &Theme::light(),
            scheduler
        )
    }

    fn scheduler() -> Scheduler {
        Scheduler::new(runtime::Handle::current()).0
    }

    fn deliver_tick(timer: &mut Timer, time_stamp: u64) {
        let mut measurer = FixedMeasurer::new();
        let mut ctx = EventCtx::new(&mut measurer);

        timer.tick(&mut ctx, time_stamp);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_timer(65), "01:05");
        assert_eq!(format_timer(0), "00:00");
        assert_eq!(format_timer(599), "09:59");
        assert_eq!(format_timer(60), "01:00");
    }

    #[tokio::test]
    async fn counts_down_and_auto_stops() {
        let mut timer = timer(scheduler());
        let mut measurer = FixedMeasurer::new();
        timer.set_duration(5, &mut measurer);

        let events = Rc::new(RefCell::new(Vec::new()));
        let inner = Rc::clone(&events);
        timer.subscribe(move |event| inner.borrow_mut().push(*event));

        timer.start();
        assert!(timer.is_running());

        for n in 1..=5 {
            deliver_tick(&mut timer, n * 1000);
        }

        assert_eq!(timer.current_time(), 0);
        assert_eq!(timer.time(), "00:00");
        assert!(!timer.is_running());

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, WidgetEventKind::TimerFinished);
        // the terminal event carries the final tick's timestamp
        assert_eq!(events[0].time_stamp, 5000);
    }

    #[tokio::test]
    async fn start_while_running_is_a_no_op() {
        let mut timer = timer(scheduler());
        let mut measurer = FixedMeasurer::new();
        timer.set_duration(5, &mut measurer);

        timer.start();
        deliver_tick(&mut timer, 1000);
        assert_eq!(timer.current_time(), 4);

        timer.start();
        assert_eq!(timer.current_time(), 4);

        deliver_tick(&mut timer, 2000);
        assert_eq!(timer.current_time(), 3);
    }

    #[tokio::test]
    async fn duration_is_clamped() {
        let mut timer = timer(scheduler());
        let mut measurer = FixedMeasurer::new();

        timer.set_duration(700, &mut measurer);
        assert_eq!(timer.duration(), 599);
        assert_eq!(timer.time(), "09:59");

        timer.set_duration(-3, &mut measurer);
        assert_eq!(timer.duration(), 0);
        assert_eq!(timer.time(), "00:00");
    }

    #[tokio::test]
    async fn duration_change_while_running_leaves_display_alone() {
        let mut timer = timer(scheduler());
        let mut measurer = FixedMeasurer::new();
        timer.set_duration(5, &mut measurer);

        timer.start();
        deliver_tick(&mut timer, 1000);
        assert_eq!(timer.time(), "00:04");

        timer.set_duration(9, &mut measurer);
        assert_eq!(timer.duration(), 9);
        assert_eq!(timer.time(), "00:04");

        timer.stop(2000);
        timer.set_duration(3, &mut measurer);
        assert_eq!(timer.time(), "00:03");
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_emits_only_while_active() {
        let mut timer = timer(scheduler());
        let mut measurer = FixedMeasurer::new();
        timer.set_duration(5, &mut measurer);

        let count = Rc::new(RefCell::new(0u32));
        let inner = Rc::clone(&count);
        timer.subscribe(move |_| *inner.borrow_mut() += 1);

        timer.stop(100);
        assert_eq!(*count.borrow(), 0);

        timer.start();
        timer.stop(200);
        timer.stop(300);

        assert_eq!(*count.borrow(), 1);
        assert!(!timer.is_running());
    }

    #[tokio::test]
    async fn stale_tick_after_stop_is_ignored() {
        let mut timer = timer(scheduler());
        let mut measurer = FixedMeasurer::new();
        timer.set_duration(5, &mut measurer);

        timer.start();
        timer.stop(1000);

        deliver_tick(&mut timer, 2000);
        assert_eq!(timer.current_time(), 5);
        assert_eq!(timer.time(), "00:05");
    }

    #[tokio::test]
    async fn reset_zeroes_both_fields() {
        let mut timer = timer(scheduler());
        let mut measurer = FixedMeasurer::new();
        timer.set_duration(42, &mut measurer);

        timer.start();
        deliver_tick(&mut timer, 1000);
        timer.reset(2000);

        assert_eq!(timer.duration(), 0);
        assert_eq!(timer.current_time(), 0);
        assert!(!timer.is_running());
        // the display is not resynchronized by reset
        assert_eq!(timer.time(), "00:41");
    }
}
