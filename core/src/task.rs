use std::time::{Duration, Instant};

use tokio::{
    runtime,
    sync::mpsc::{unbounded_channel, UnboundedSender, UnboundedReceiver},
    task::JoinHandle,
    time::MissedTickBehavior
};

use crate::ui::WidgetId;

/// A tick produced by a repeating scheduled callback. `time_stamp` is in
/// milliseconds since the scheduler was created, matching the timestamps
/// the platform loop stamps onto input events.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tick {
    pub id: WidgetId,
    pub time_stamp: u64
}

/// Spawns repeating interval tasks on the runtime and funnels their
/// ticks back to the single-threaded ui loop through a channel.
#[derive(Clone, Debug)]
pub struct Scheduler {
    handle: runtime::Handle,
    sender: UnboundedSender<Tick>,
    epoch: Instant
}

/// Owning handle to an active interval task.
///
/// The scheduled callback resource is released exactly once: `cancel`
/// consumes the handle, and dropping it without cancelling aborts the
/// task as well. Ticks already queued when the task is aborted are
/// discarded by the receiving widget's own handle-presence guard.
#[must_use = "dropping the handle cancels the interval"]
#[derive(Debug)]
pub struct IntervalHandle {
    task: JoinHandle<()>
}

impl Scheduler {
    pub fn new(handle: runtime::Handle) -> (Self, UnboundedReceiver<Tick>) {
        let (sender, receiver) = unbounded_channel();

        let scheduler = Self {
            handle,
            sender,
            epoch: Instant::now()
        };

        (scheduler, receiver)
    }

    /// Arms a repeating callback firing every `period`. The first tick is
    /// delivered one full period after the call, not immediately.
    pub fn repeat(&self, id: WidgetId, period: Duration) -> IntervalHandle {
        let sender = self.sender.clone();
        let epoch = self.epoch;

        let task = self.handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // tokio delivers the first tick without waiting
            interval.tick().await;

            loop {
                interval.tick().await;

                let tick = Tick {
                    id,
                    time_stamp: epoch.elapsed().as_millis() as u64
                };

                if sender.send(tick).is_err() {
                    break;
                }
            }
        });

        IntervalHandle { task }
    }
}

impl IntervalHandle {
    #[inline]
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn interval_delivers_one_tick_per_period() {
        let (scheduler, mut receiver) = Scheduler::new(runtime::Handle::current());
        let handle = scheduler.repeat(WidgetId::default(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(3500)).await;

        let mut ticks = Vec::new();
        while let Ok(tick) = receiver.try_recv() {
            ticks.push(tick);
        }

        assert_eq!(ticks.len(), 3);
        handle.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_interval_stops_ticking() {
        let (scheduler, mut receiver) = Scheduler::new(runtime::Handle::current());
        let handle = scheduler.repeat(WidgetId::default(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        handle.cancel();
        while receiver.try_recv().is_ok() { }

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(receiver.try_recv().is_err());
    }
}
