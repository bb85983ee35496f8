//! # Schedule Module
//!
//! A single dispatch queue of timed tasks. The caller supplies the clock: every
//! method takes `now` as a [`Duration`] since an arbitrary epoch, so the queue
//! can be driven by the engine's frame clock or by a test.

use std::time::Duration;

/// Work the controller schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Create a new target.
    Spawn,
    /// Remove the oldest target.
    Expire,
    /// Send the pending Y coordinate.
    SendY,
}

#[derive(Debug, Clone)]
struct Slot {
    task: Task,
    deadline: Duration,
    period: Option<Duration>,
    armed_at: u64,
}

/// Timer table with at most one slot per [`Task`].
#[derive(Debug, Default, Clone)]
pub struct Scheduler {
    slots: Vec<Slot>,
    arm_counter: u64,
}

impl Scheduler {
    /// An empty timer table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `task` to fire every `period`, first at `now + period`.
    pub fn every(&mut self, task: Task, period: Duration, now: Duration) {
        self.arm(task, now + period, Some(period));
    }

    /// Arms `task` to fire once at `now + delay`, replacing any earlier arming.
    pub fn once(&mut self, task: Task, delay: Duration, now: Duration) {
        self.arm(task, now + delay, None);
    }

    /// Disarms `task`. Returns whether it was armed.
    pub fn cancel(&mut self, task: Task) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.task != task);
        before != self.slots.len()
    }

    /// Whether `task` is armed.
    pub fn is_armed(&self, task: Task) -> bool {
        self.slots.iter().any(|slot| slot.task == task)
    }

    /// Next deadline of `task`, if armed.
    pub fn deadline(&self, task: Task) -> Option<Duration> {
        self.slots
            .iter()
            .find(|slot| slot.task == task)
            .map(|slot| slot.deadline)
    }

    /// Pops every task due at `now`, earliest deadline first.
    ///
    /// One-shot tasks are disarmed. Periodic tasks fire once even when several
    /// periods have elapsed, then move to their next deadline after `now`.
    pub fn due(&mut self, now: Duration) -> Vec<Task> {
        let mut fired: Vec<(Duration, u64, Task)> = self
            .slots
            .iter()
            .filter(|slot| slot.deadline <= now)
            .map(|slot| (slot.deadline, slot.armed_at, slot.task))
            .collect();
        fired.sort_by_key(|(deadline, armed_at, _)| (*deadline, *armed_at));

        self.slots.retain(|slot| slot.deadline > now || slot.period.is_some());
        for slot in &mut self.slots {
            if let Some(period) = slot.period {
                while slot.deadline <= now && !period.is_zero() {
                    slot.deadline += period;
                }
            }
        }

        fired.into_iter().map(|(_, _, task)| task).collect()
    }

    fn arm(&mut self, task: Task, deadline: Duration, period: Option<Duration>) {
        self.cancel(task);
        self.arm_counter += 1;
        self.slots.push(Slot {
            task,
            deadline,
            period,
            armed_at: self.arm_counter,
        });
    }
}
