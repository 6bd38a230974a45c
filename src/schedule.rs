// QuizWordz – A word game
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use super::game::{Deferred, DeferredAction};

pub const TICK_INTERVAL_MS: u32 = 1000;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Fired {
    Tick,
    Deferred(Deferred),
}

/// Something that can call back into the game later. The browser uses
/// the window’s timers and everything else uses a [`Schedule`].
pub trait Timers {
    fn queue_deferred(&mut self, deferred: Deferred, delay_ms: u32);
    fn start_ticking(&mut self);
    fn stop_ticking(&mut self);
    fn cancel_deferreds(&mut self);
}

/// A virtual clock measured in milliseconds. Nothing happens until the
/// owner steps it forward.
#[derive(Debug, Default)]
pub struct Schedule {
    now: u64,
    next_tick: Option<u64>,
    // Sorted by due time
    queue: Vec<(u64, Deferred)>,
}

impl Schedule {
    pub fn new() -> Schedule {
        Schedule::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn is_ticking(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn n_pending(&self) -> usize {
        self.queue.len()
    }

    /// Moves the clock to the next thing that is due at or before
    /// `limit` and returns it. Deferred work wins ties with the tick.
    /// When nothing is due the clock moves to `limit` and None is
    /// returned.
    pub fn step(&mut self, limit: u64) -> Option<Fired> {
        let next_deferred = self.queue.first()
            .map(|&(due, _)| due)
            .filter(|&due| due <= limit);
        let next_tick = self.next_tick.filter(|&due| due <= limit);

        match (next_deferred, next_tick) {
            (Some(deferred_due), tick_due)
                if tick_due.map_or(true, |tick_due| deferred_due <= tick_due) =>
            {
                let (due, deferred) = self.queue.remove(0);
                self.now = self.now.max(due);
                Some(Fired::Deferred(deferred))
            },
            (_, Some(tick_due)) => {
                self.now = self.now.max(tick_due);
                self.next_tick = Some(tick_due + TICK_INTERVAL_MS as u64);
                Some(Fired::Tick)
            },
            _ => {
                self.now = self.now.max(limit);
                None
            },
        }
    }

    pub fn has_pending(&self, action: DeferredAction) -> bool {
        self.queue.iter().any(|(_, deferred)| deferred.action == action)
    }
}

impl Timers for Schedule {
    fn queue_deferred(&mut self, deferred: Deferred, delay_ms: u32) {
        let due = self.now + delay_ms as u64;
        let pos = self.queue.partition_point(|&(d, _)| d <= due);
        self.queue.insert(pos, (due, deferred));
    }

    fn start_ticking(&mut self) {
        if self.next_tick.is_none() {
            self.next_tick = Some(self.now + TICK_INTERVAL_MS as u64);
        }
    }

    fn stop_ticking(&mut self) {
        self.next_tick = None;
    }

    fn cancel_deferreds(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn deferred(instance: u32) -> Deferred {
        Deferred { instance, action: DeferredAction::ClearSelection }
    }

    #[test]
    fn ticks() {
        let mut schedule = Schedule::new();

        assert_eq!(schedule.step(5000), None);
        assert_eq!(schedule.now(), 5000);

        schedule.start_ticking();
        assert!(schedule.is_ticking());

        assert_eq!(schedule.step(5999), None);
        assert_eq!(schedule.now(), 5999);
        assert_eq!(schedule.step(8500), Some(Fired::Tick));
        assert_eq!(schedule.now(), 6000);
        assert_eq!(schedule.step(8500), Some(Fired::Tick));
        assert_eq!(schedule.step(8500), Some(Fired::Tick));
        assert_eq!(schedule.now(), 8000);
        assert_eq!(schedule.step(8500), None);
        assert_eq!(schedule.now(), 8500);

        // Starting again doesn’t add a second tick source
        schedule.start_ticking();
        assert_eq!(schedule.step(9000), Some(Fired::Tick));
        assert_eq!(schedule.now(), 9000);
        assert_eq!(schedule.step(9999), None);

        schedule.stop_ticking();
        assert!(!schedule.is_ticking());
        assert_eq!(schedule.step(20000), None);
    }

    #[test]
    fn deferred_order() {
        let mut schedule = Schedule::new();

        schedule.queue_deferred(deferred(1), 1000);
        schedule.queue_deferred(deferred(2), 500);
        schedule.queue_deferred(deferred(3), 1000);
        schedule.start_ticking();

        assert_eq!(schedule.n_pending(), 3);
        assert_eq!(schedule.step(2000), Some(Fired::Deferred(deferred(2))));
        assert_eq!(schedule.now(), 500);
        assert_eq!(schedule.step(2000), Some(Fired::Deferred(deferred(1))));
        assert_eq!(schedule.step(2000), Some(Fired::Deferred(deferred(3))));
        assert_eq!(schedule.now(), 1000);
        assert_eq!(schedule.step(2000), Some(Fired::Tick));
        assert_eq!(schedule.step(2000), Some(Fired::Tick));
        assert_eq!(schedule.step(2000), None);
        assert_eq!(schedule.n_pending(), 0);
    }

    #[test]
    fn cancel() {
        let mut schedule = Schedule::new();

        schedule.queue_deferred(deferred(1), 1000);
        schedule.queue_deferred(
            Deferred { instance: 1, action: DeferredAction::ShowResult },
            1000,
        );
        schedule.start_ticking();

        assert!(schedule.has_pending(DeferredAction::ClearSelection));
        assert!(schedule.has_pending(DeferredAction::ShowResult));

        schedule.cancel_deferreds();

        assert_eq!(schedule.n_pending(), 0);
        assert!(!schedule.has_pending(DeferredAction::ShowResult));
        assert!(schedule.is_ticking());
        assert_eq!(schedule.step(1000), Some(Fired::Tick));
    }
}
