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

use super::catalog::Catalog;
use super::game::{ClickOutcome, Game, DEFERRED_DELAY_MS};
use super::schedule::{Fired, Timers};
use super::share;
use super::word_set::WordSet;
use rand::Rng;

/// What the result screen shows once a puzzle is complete.
#[derive(Debug, PartialEq, Eq)]
pub struct ResultSummary<'a> {
    pub theme: &'a str,
    pub solved_words: &'a [String],
    pub final_time: u32,
}

/// Owns the active game and applies every event to it. After each event
/// the game’s requests for deferred work and the state of the per-second
/// tick are passed on to the timers.
pub struct Session<R> {
    catalog: Catalog,
    rng: R,
    set_index: usize,
    next_instance: u32,
    game: Game,
    ticking: bool,
}

impl<R: Rng> Session<R> {
    pub fn new(catalog: Catalog, requested: Option<&str>, mut rng: R) -> Session<R> {
        let set_index = catalog.choose_initial(requested, &mut rng);
        let game = Game::new(0, catalog.all()[set_index].clone(), &mut rng);

        Session {
            catalog,
            rng,
            set_index,
            next_instance: 1,
            game,
            ticking: false,
        }
    }

    /// Arms the timers for the first game.
    pub fn start<T: Timers + ?Sized>(&mut self, timers: &mut T) {
        self.sync_timers(timers);
    }

    pub fn click<T: Timers + ?Sized>(
        &mut self,
        index: usize,
        timers: &mut T,
    ) -> ClickOutcome {
        let outcome = self.game.click(index);
        self.sync_timers(timers);
        outcome
    }

    pub fn toggle_pause<T: Timers + ?Sized>(&mut self, timers: &mut T) {
        self.game.toggle_pause();
        self.sync_timers(timers);
    }

    pub fn handle<T: Timers + ?Sized>(&mut self, fired: Fired, timers: &mut T) {
        match fired {
            Fired::Tick => self.game.tick(),
            Fired::Deferred(deferred) => {
                self.game.fire(deferred);
            },
        }

        self.sync_timers(timers);
    }

    /// Starts a fresh game with a different word set.
    pub fn play_again<T: Timers + ?Sized>(&mut self, timers: &mut T) {
        let set_index = self.catalog.choose_other(self.set_index, &mut self.rng);

        timers.cancel_deferreds();

        if self.ticking {
            timers.stop_ticking();
            self.ticking = false;
        }

        let instance = self.next_instance;
        self.next_instance = self.next_instance.wrapping_add(1);

        self.set_index = set_index;
        self.game = Game::new(
            instance,
            self.catalog.all()[set_index].clone(),
            &mut self.rng,
        );

        self.sync_timers(timers);
    }

    fn sync_timers<T: Timers + ?Sized>(&mut self, timers: &mut T) {
        for deferred in self.game.take_pending_deferreds() {
            timers.queue_deferred(deferred, DEFERRED_DELAY_MS);
        }

        let should_tick = self.game.is_ticking();

        if should_tick != self.ticking {
            if should_tick {
                timers.start_ticking();
            } else {
                timers.stop_ticking();
            }

            self.ticking = should_tick;
        }
    }

    pub fn result(&self) -> Option<ResultSummary<'_>> {
        self.game.result_visible().then(|| ResultSummary {
            theme: self.game.theme(),
            solved_words: self.game.solved_words(),
            final_time: self.final_time(),
        })
    }

    fn final_time(&self) -> u32 {
        self.game.final_time().unwrap_or(self.game.elapsed())
    }

    /// The message to copy to the clipboard. `base_url` is the address of
    /// the game page without any query string.
    pub fn share_text(&self, base_url: &str) -> String {
        share::share_text(
            self.game.theme(),
            self.final_time(),
            &share::share_url(base_url, self.word_set().id()),
        )
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn word_set(&self) -> &WordSet {
        self.game.word_set()
    }

    pub fn set_index(&self) -> usize {
        self.set_index
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
