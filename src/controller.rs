//! # Controller Module
//!
//! Owns every piece of game state and dispatches clicks and timer tasks.
//! Callers feed it the current clock value; it never reads a clock itself.

use crate::config::GameConfig;
use crate::link::LinkWriter;
use crate::reporter::{ClickReporter, TimerRequest, Transmission};
use crate::schedule::{Scheduler, Task};
use crate::target::{Point, Target, TargetId, TargetRegistry, Spawner};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

/// Game state: live targets, spawner, reporter, link and the timer queue.
pub struct Controller<L> {
    registry: TargetRegistry,
    spawner: Spawner,
    reporter: ClickReporter,
    scheduler: Scheduler,
    link: L,
    rng: StdRng,
}

impl<L: LinkWriter> Controller<L> {
    /// Builds the controller and arms the expire and spawn timers at time zero.
    pub fn new(config: &GameConfig, link: L) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, link, rng)
    }

    /// Like [`Controller::new`] with an explicit RNG.
    pub fn with_rng(config: &GameConfig, link: L, rng: StdRng) -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.every(Task::Expire, config.expire_period(), Duration::ZERO);
        scheduler.every(Task::Spawn, config.spawn_period(), Duration::ZERO);
        Self {
            registry: TargetRegistry::new(),
            spawner: Spawner::new(config),
            reporter: ClickReporter::new(config.y_delay()),
            scheduler,
            link,
            rng,
        }
    }

    /// Handles a pointer press at `point`. Returns whether a redraw is needed.
    pub fn click(&mut self, point: Point, now: Duration) -> bool {
        let request = self.reporter.click(point, &mut self.link);
        self.apply(request, now);

        match self.registry.remove_hit(point) {
            Some(target) => {
                info!("[controller] Hit target {} at {point}", target.id);
                true
            }
            None => false,
        }
    }

    /// Runs every task due at `now`. Returns whether a redraw is needed.
    pub fn advance(&mut self, now: Duration) -> bool {
        let mut redraw = false;
        for task in self.scheduler.due(now) {
            redraw |= self.run(task, now);
        }
        redraw
    }

    fn run(&mut self, task: Task, now: Duration) -> bool {
        match task {
            Task::Spawn => {
                let target = self.spawner.spawn(&mut self.rng);
                self.registry.insert(target);
                true
            }
            Task::Expire => match self.registry.expire_oldest() {
                Some(target) => {
                    info!("[controller] Target {} expired", target.id);
                    true
                }
                None => false,
            },
            Task::SendY => {
                let request = self.reporter.send_y(&mut self.link);
                self.apply(request, now);
                false
            }
        }
    }

    fn apply(&mut self, request: TimerRequest, now: Duration) {
        match request {
            TimerRequest::Arm(delay) => self.scheduler.once(Task::SendY, delay, now),
            TimerRequest::Disarm => {
                self.scheduler.cancel(Task::SendY);
            }
        }
    }

    /// Live targets.
    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Live targets, oldest first.
    pub fn targets(&self) -> impl Iterator<Item = Target> + '_ {
        self.registry.iter()
    }

    /// Id the next spawn will receive.
    pub fn next_id(&self) -> TargetId {
        self.spawner.next_id()
    }

    /// Last captured click.
    pub fn pending_click(&self) -> Option<Point> {
        self.reporter.pending()
    }

    /// Current state of the X/Y handshake.
    pub fn transmission(&self) -> Transmission {
        self.reporter.state()
    }

    /// Timer queue.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Serial link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Adds an existing target, bypassing the spawner.
    #[cfg(test)]
    pub fn insert_target(&mut self, target: Target) {
        self.registry.insert(target);
    }
}
