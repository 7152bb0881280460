//! Pomodoro scheduler: drives `TimerState` from a one-second tick and
//! republishes a snapshot after every change

use std::{
    collections::VecDeque,
    ops::ControlFlow,
    sync::{Arc, Mutex, Weak},
    time::Duration,
};
use tokio::sync::watch;
use tracing::{debug, info};

use super::TickSource;
use crate::{
    state::{ObserverRegistry, PhaseDurations, PhaseKind, SubscriptionId, TimerSnapshot, TimerState},
    utils::lock_or_recover,
};

/// Wall-clock length of one tick
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

struct SchedulerCore {
    timer: TimerState,
    ticker: Option<TickSource>,
    /// Bumped whenever the ticker stops. A tick carrying an older epoch is stale.
    epoch: u64,
}

impl SchedulerCore {
    fn stop_ticker(&mut self) {
        self.epoch += 1;
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
            debug!("Tick source stopped");
        }
    }
}

enum Delivery {
    All(TimerSnapshot),
    One(SubscriptionId, TimerSnapshot),
}

#[derive(Default)]
struct Outbox {
    queue: VecDeque<Delivery>,
    draining: bool,
}

/// Delivers snapshots to observers in the order they were captured.
///
/// Snapshots are queued while the core lock is held, so queue order is state
/// order. Only one caller drains at a time and no lock is held while an
/// observer runs, so observers may call back into the scheduler. A caller that
/// finds a drain in progress leaves its snapshot to that drain.
struct Fanout {
    observers: ObserverRegistry<TimerSnapshot>,
    outbox: Mutex<Outbox>,
}

impl Fanout {
    fn new() -> Self {
        Self {
            observers: ObserverRegistry::new(),
            outbox: Mutex::new(Outbox::default()),
        }
    }

    /// Queue a delivery. Call with the core lock held.
    fn enqueue(&self, delivery: Delivery) {
        lock_or_recover(&self.outbox).queue.push_back(delivery);
    }

    /// Deliver everything queued, unless another caller already is
    fn drain(&self) {
        {
            let mut outbox = lock_or_recover(&self.outbox);
            if outbox.draining {
                return;
            }
            outbox.draining = true;
        }

        loop {
            let next = {
                let mut outbox = lock_or_recover(&self.outbox);
                match outbox.queue.pop_front() {
                    Some(delivery) => delivery,
                    None => {
                        outbox.draining = false;
                        return;
                    }
                }
            };

            match next {
                Delivery::All(snapshot) => self.observers.notify(&snapshot),
                Delivery::One(id, snapshot) => {
                    self.observers.notify_one(id, &snapshot);
                }
            }
        }
    }
}

/// Owns the timer state and its single tick source.
///
/// Clones share the same timer. Tick-driven mutation and publishing happen on
/// a spawned task, so the ticking commands need a tokio runtime.
#[derive(Clone)]
pub struct TimerScheduler {
    core: Arc<Mutex<SchedulerCore>>,
    fanout: Arc<Fanout>,
    updates: watch::Receiver<TimerSnapshot>,
}

impl TimerScheduler {
    /// Create a stopped scheduler at the start of a work phase
    pub fn new(durations: PhaseDurations) -> Self {
        let timer = TimerState::with_durations(durations);
        let (update_tx, updates) = watch::channel(TimerSnapshot::capture(&timer));

        let fanout = Arc::new(Fanout::new());
        fanout.observers.subscribe(move |snapshot: &TimerSnapshot| {
            update_tx.send_replace(snapshot.clone());
        });

        Self {
            core: Arc::new(Mutex::new(SchedulerCore {
                timer,
                ticker: None,
                epoch: 0,
            })),
            fanout,
            updates,
        }
    }

    /// Current view-state
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::capture(&lock_or_recover(&self.core).timer)
    }

    /// Register an observer. It is called once right away with the current
    /// snapshot, then on every publish.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&TimerSnapshot) + Send + Sync + 'static,
    {
        let id = self.fanout.observers.subscribe(observer);
        {
            let core = lock_or_recover(&self.core);
            self.fanout
                .enqueue(Delivery::One(id, TimerSnapshot::capture(&core.timer)));
        }
        self.fanout.drain();
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.fanout.observers.unsubscribe(id)
    }

    /// Receiver that always holds the most recently published snapshot
    pub fn updates(&self) -> watch::Receiver<TimerSnapshot> {
        self.updates.clone()
    }

    /// Send the current snapshot to every observer
    pub fn publish(&self) {
        {
            let core = lock_or_recover(&self.core);
            self.fanout
                .enqueue(Delivery::All(TimerSnapshot::capture(&core.timer)));
        }
        self.fanout.drain();
    }

    /// Start or pause the countdown
    pub fn toggle_timer(&self) {
        {
            let mut core = lock_or_recover(&self.core);
            core.timer.toggle_running();

            if core.timer.is_running() {
                self.start_ticker(&mut core);
                info!("Timer started in {} phase", core.timer.current_phase());
            } else {
                core.stop_ticker();
                info!("Timer paused");
            }
        }
        self.publish();
    }

    /// Stop, clear the cycle counter and return to a fresh work phase
    pub fn reset(&self) {
        {
            let mut core = lock_or_recover(&self.core);
            core.stop_ticker();
            core.timer.hard_reset();
        }
        info!("Timer reset");
        self.publish();
    }

    /// Pause and switch to `phase`
    pub fn set_mode(&self, phase: PhaseKind) {
        {
            let mut core = lock_or_recover(&self.core);
            core.stop_ticker();
            core.timer.set_phase(phase);
        }
        info!("Timer switched to {} phase", phase);
        self.publish();
    }

    /// Switch phase by wire name. An unknown name changes nothing but the
    /// current snapshot is still republished.
    pub fn set_mode_named(&self, name: &str) {
        match name.parse::<PhaseKind>() {
            Ok(phase) => self.set_mode(phase),
            Err(e) => {
                debug!("Ignoring mode switch: {}", e);
                self.publish();
            }
        }
    }

    /// Lengthen or shorten the current phase while stopped. Always republishes.
    pub fn adjust_time(&self, delta_minutes: i64) {
        {
            let mut core = lock_or_recover(&self.core);
            if !core.timer.is_running() {
                let phase = core.timer.current_phase();
                core.timer.adjust_duration(phase, delta_minutes);
            } else {
                debug!("Ignoring duration adjustment while running");
            }
        }
        self.publish();
    }

    /// Whether a tick source is currently active
    pub fn is_ticking(&self) -> bool {
        lock_or_recover(&self.core).ticker.is_some()
    }

    fn start_ticker(&self, core: &mut SchedulerCore) {
        // Never keep two sources alive
        core.stop_ticker();

        let epoch = core.epoch;
        let weak = Arc::downgrade(&self.core);
        let fanout = Arc::clone(&self.fanout);
        core.ticker = Some(TickSource::start(TICK_PERIOD, move || {
            on_tick(&weak, &fanout, epoch)
        }));
    }
}

fn on_tick(core: &Weak<Mutex<SchedulerCore>>, fanout: &Fanout, epoch: u64) -> ControlFlow<()> {
    let Some(core) = core.upgrade() else {
        return ControlFlow::Break(());
    };

    let finished = {
        let mut core = lock_or_recover(&core);
        if core.epoch != epoch {
            return ControlFlow::Break(());
        }

        let finished = core.timer.tick();
        if finished {
            // Drops this task's own source; nothing after this point awaits
            core.epoch += 1;
            core.ticker = None;
        }

        let snapshot = TimerSnapshot::capture(&core.timer);
        debug!("Tick: {}", snapshot.time_display);
        fanout.enqueue(Delivery::All(snapshot));
        finished
    };
    fanout.drain();

    if finished {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}
