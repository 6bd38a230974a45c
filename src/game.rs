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

use super::grid::Grid;
use super::shuffle;
use super::word_set::{WordSet, N_LETTERS, N_WORDS, WORD_LENGTH};
use rand::Rng;

/// How long a missed guess stays on screen and how long the last solve
/// animates before the result is revealed.
pub const DEFERRED_DELAY_MS: u32 = 1000;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum State {
    Active,
    Paused,
    Complete,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum DeferredAction {
    ClearSelection,
    ShowResult,
}

/// Work that the game wants done after a delay. It only applies to the
/// game instance that requested it.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Deferred {
    pub instance: u32,
    pub action: DeferredAction,
}

impl Deferred {
    pub fn to_bits(self) -> u64 {
        let action_bit = match self.action {
            DeferredAction::ClearSelection => 0,
            DeferredAction::ShowResult => 1,
        };

        ((self.instance as u64) << 1) | action_bit
    }

    pub fn from_bits(bits: u64) -> Option<Deferred> {
        let instance = u32::try_from(bits >> 1).ok()?;

        let action = if bits & 1 == 0 {
            DeferredAction::ClearSelection
        } else {
            DeferredAction::ShowResult
        };

        Some(Deferred { instance, action })
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum ClickOutcome {
    Ignored,
    Selected,
    Deselected,
    Solved(String),
    Missed,
}

pub struct Game {
    instance: u32,
    word_set: WordSet,
    grid: Grid,
    selected: Vec<usize>,
    solved_words: Vec<String>,
    is_error: bool,
    selection_locked: bool,
    paused: bool,
    elapsed: u32,
    final_time: Option<u32>,
    result_visible: bool,

    pending_deferreds: Vec<Deferred>,

    letters_dirty: bool,
    selection_dirty: bool,
    elapsed_dirty: bool,
    state_dirty: bool,
}

impl Game {
    pub fn new<R: Rng + ?Sized>(
        instance: u32,
        word_set: WordSet,
        rng: &mut R,
    ) -> Game {
        let grid = shuffle::shuffled_grid(&word_set, rng);

        Game::with_grid(instance, word_set, grid)
    }

    /// Starts a game with the letters already arranged. The grid must be
    /// a permutation of the word set’s letters.
    pub fn with_grid(instance: u32, word_set: WordSet, grid: Grid) -> Game {
        Game {
            instance,
            word_set,
            grid,
            selected: Vec::with_capacity(WORD_LENGTH),
            solved_words: Vec::with_capacity(N_WORDS),
            is_error: false,
            selection_locked: false,
            paused: false,
            elapsed: 0,
            final_time: None,
            result_visible: false,

            pending_deferreds: Vec::new(),

            letters_dirty: true,
            selection_dirty: true,
            elapsed_dirty: true,
            state_dirty: true,
        }
    }

    pub fn click(&mut self, index: usize) -> ClickOutcome {
        if index >= N_LETTERS ||
            self.is_solved(index) ||
            self.state() != State::Active
        {
            return ClickOutcome::Ignored;
        }

        if std::mem::replace(&mut self.is_error, false) {
            self.selection_dirty = true;
        }

        // A missed word stays selected until its clear fires
        if self.selection_locked {
            return ClickOutcome::Ignored;
        }

        if let Some(pos) = self.selected.iter().position(|&i| i == index) {
            self.selected.remove(pos);
            self.selection_dirty = true;
            return ClickOutcome::Deselected;
        }

        if self.selected.len() >= WORD_LENGTH {
            return ClickOutcome::Ignored;
        }

        self.selected.push(index);
        self.selection_dirty = true;

        if self.selected.len() < WORD_LENGTH {
            return ClickOutcome::Selected;
        }

        let word = self.selected.iter()
            .map(|&i| self.grid.letter(i))
            .collect::<String>();

        if self.word_set.contains(&word) && !self.solved_words.contains(&word) {
            self.score_word(word)
        } else {
            self.is_error = true;
            self.selection_locked = true;
            self.queue_deferred(DeferredAction::ClearSelection);
            ClickOutcome::Missed
        }
    }

    fn score_word(&mut self, word: String) -> ClickOutcome {
        shuffle::repack(&mut self.grid, self.solved_words.len(), &self.selected);
        self.letters_dirty = true;

        self.selected.clear();
        self.solved_words.push(word.clone());

        if self.solved_words.len() >= N_WORDS {
            self.final_time = Some(self.elapsed);
            self.queue_deferred(DeferredAction::ShowResult);
        }

        ClickOutcome::Solved(word)
    }

    fn queue_deferred(&mut self, action: DeferredAction) {
        self.pending_deferreds.push(Deferred {
            instance: self.instance,
            action,
        });
    }

    pub fn toggle_pause(&mut self) {
        if self.result_visible {
            return;
        }

        self.paused = !self.paused;
        self.state_dirty = true;
    }

    /// Advances the timer by one second if it is running.
    pub fn tick(&mut self) {
        if self.is_ticking() {
            self.elapsed += 1;
            self.elapsed_dirty = true;
        }
    }

    /// Applies deferred work. Returns false if it belonged to another
    /// game instance and was ignored.
    pub fn fire(&mut self, deferred: Deferred) -> bool {
        if deferred.instance != self.instance {
            return false;
        }

        match deferred.action {
            DeferredAction::ClearSelection => {
                self.selected.clear();
                self.is_error = false;
                self.selection_locked = false;
                self.selection_dirty = true;
            },
            DeferredAction::ShowResult => {
                if !self.result_visible {
                    self.result_visible = true;
                    self.state_dirty = true;
                }
            },
        }

        true
    }

    pub fn take_pending_deferreds(&mut self) -> Vec<Deferred> {
        std::mem::take(&mut self.pending_deferreds)
    }

    pub fn state(&self) -> State {
        if self.result_visible {
            State::Complete
        } else if self.paused {
            State::Paused
        } else {
            State::Active
        }
    }

    /// Whether the per-second tick should be running. The clock stops as
    /// soon as the last word is found, before the result is revealed.
    pub fn is_ticking(&self) -> bool {
        self.state() == State::Active && self.final_time.is_none()
    }

    pub fn instance(&self) -> u32 {
        self.instance
    }

    pub fn word_set(&self) -> &WordSet {
        &self.word_set
    }

    pub fn theme(&self) -> &str {
        self.word_set.theme()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn n_solved(&self) -> usize {
        self.solved_words.len()
    }

    /// Solved letters always form a block at the start of the grid.
    pub fn is_solved(&self, index: usize) -> bool {
        index < self.solved_words.len() * WORD_LENGTH
    }

    pub fn solved_words(&self) -> &[String] {
        &self.solved_words
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn final_time(&self) -> Option<u32> {
        self.final_time
    }

    pub fn result_visible(&self) -> bool {
        self.result_visible
    }

    pub fn changed_letters(&mut self) -> bool {
        std::mem::replace(&mut self.letters_dirty, false)
    }

    pub fn changed_selection(&mut self) -> bool {
        std::mem::replace(&mut self.selection_dirty, false)
    }

    pub fn changed_elapsed(&mut self) -> Option<u32> {
        if self.elapsed_dirty {
            self.elapsed_dirty = false;
            Some(self.elapsed)
        } else {
            None
        }
    }

    pub fn changed_state(&mut self) -> Option<State> {
        if self.state_dirty {
            self.state_dirty = false;
            Some(self.state())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn fruit() -> WordSet {
        "fruit,Fruit,APPLE,GRAPE,LEMON,MANGO,PEACH".parse().unwrap()
    }

    fn reversed_game() -> Game {
        let grid = Grid::new(
            "PEACH\n\
             MANGO\n\
             LEMON\n\
             GRAPE\n\
             APPLE"
        ).unwrap();

        Game::with_grid(1, fruit(), grid)
    }

    fn click_all(game: &mut Game, indices: &[usize]) -> Vec<ClickOutcome> {
        indices.iter().map(|&i| game.click(i)).collect()
    }

    fn solve_all(game: &mut Game) {
        // Each row after the solved block spells one of the words
        for _ in 0..N_WORDS {
            let start = game.n_solved() * WORD_LENGTH;
            let word = game.grid().letters()[start..start + WORD_LENGTH]
                .iter()
                .collect::<String>();
            let outcome = click_all(game, &[
                start,
                start + 1,
                start + 2,
                start + 3,
                start + 4,
            ]).pop().unwrap();
            assert_eq!(outcome, ClickOutcome::Solved(word));
        }
    }

    #[test]
    fn new_game() {
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let mut game = Game::new(3, fruit(), &mut rng);

        assert_eq!(game.instance(), 3);
        assert_eq!(game.theme(), "Fruit");
        assert_eq!(game.state(), State::Active);
        assert_eq!(game.elapsed(), 0);
        assert!(game.is_ticking());
        assert!(game.selected().is_empty());
        assert!(game.solved_words().is_empty());
        assert!(!game.is_error());
        assert!(!game.result_visible());

        let mut letters = game.grid().letters().to_vec();
        letters.sort_unstable();
        let mut expected = fruit().letters().collect::<Vec<_>>();
        expected.sort_unstable();
        assert_eq!(letters, expected);

        assert!(game.changed_letters());
        assert!(!game.changed_letters());
        assert_eq!(game.changed_state(), Some(State::Active));
        assert_eq!(game.changed_state(), None);
    }

    #[test]
    fn solve_word() {
        let mut game = reversed_game();

        assert_eq!(
            click_all(&mut game, &[20, 21, 22, 23]),
            vec![ClickOutcome::Selected; 4],
        );
        assert_eq!(game.selected(), &[20, 21, 22, 23]);
        assert!(game.is_selected(22));

        assert_eq!(game.click(24), ClickOutcome::Solved("APPLE".to_string()));

        assert_eq!(game.solved_words(), &["APPLE"]);
        assert_eq!(game.n_solved(), 1);
        assert!(game.selected().is_empty());
        assert!(!game.is_error());
        assert!((0..5).all(|i| game.is_solved(i)));
        assert!(!game.is_solved(5));
        assert_eq!(
            &game.grid().to_string(),
            "APPLE\n\
             PEACH\n\
             MANGO\n\
             LEMON\n\
             GRAPE",
        );
        assert!(game.pending_deferreds.is_empty());
    }

    #[test]
    fn selection_order_matters() {
        let mut game = reversed_game();

        let outcomes = click_all(&mut game, &[24, 23, 22, 21, 20]);

        assert_eq!(outcomes.last(), Some(&ClickOutcome::Missed));
        assert!(game.solved_words().is_empty());
    }

    #[test]
    fn toggle_off() {
        let mut game = reversed_game();

        game.click(3);
        game.click(7);
        assert_eq!(game.click(3), ClickOutcome::Deselected);
        assert_eq!(game.selected(), &[7]);
        assert_eq!(game.click(7), ClickOutcome::Deselected);
        assert!(game.selected().is_empty());
        assert_eq!(game.click(25), ClickOutcome::Ignored);
    }

    #[test]
    fn miss() {
        let mut game = reversed_game();

        let outcomes = click_all(&mut game, &[0, 1, 2, 3, 5]);

        assert_eq!(outcomes.last(), Some(&ClickOutcome::Missed));
        assert!(game.is_error());
        assert_eq!(game.selected(), &[0, 1, 2, 3, 5]);

        let pending = game.take_pending_deferreds();
        assert_eq!(
            pending,
            &[Deferred {
                instance: 1,
                action: DeferredAction::ClearSelection,
            }],
        );

        // Clicking resets the error flag but keeps the stale selection
        assert_eq!(game.click(6), ClickOutcome::Ignored);
        assert!(!game.is_error());
        assert_eq!(game.click(0), ClickOutcome::Ignored);
        assert_eq!(game.selected(), &[0, 1, 2, 3, 5]);

        assert!(game.fire(pending[0]));
        assert!(game.selected().is_empty());
        assert!(!game.is_error());
        assert!(game.solved_words().is_empty());
        assert_eq!(game.n_solved(), 0);

        // Firing again is harmless
        assert!(game.fire(pending[0]));
        assert!(game.selected().is_empty());

        assert_eq!(game.click(0), ClickOutcome::Selected);
    }

    #[test]
    fn already_solved_word_is_a_miss() {
        let grid = Grid::new(
            "APPLE\n\
             GRAPE\n\
             LEMON\n\
             MANGO\n\
             PEACH"
        ).unwrap();
        let mut game = Game::with_grid(0, fruit(), grid);

        click_all(&mut game, &[0, 1, 2, 3, 4]);
        assert_eq!(game.solved_words(), &["APPLE"]);

        // A, P, P, L, E can be spelled again from the remaining letters
        assert_eq!(
            click_all(&mut game, &[7, 8, 20, 10, 9]).last(),
            Some(&ClickOutcome::Missed),
        );
        assert_eq!(game.solved_words(), &["APPLE"]);
    }

    #[test]
    fn click_solved_letter() {
        let mut game = reversed_game();

        click_all(&mut game, &[20, 21, 22, 23, 24]);
        game.click(9);

        for i in 0..5 {
            assert_eq!(game.click(i), ClickOutcome::Ignored);
        }

        assert_eq!(game.selected(), &[9]);

        game.toggle_pause();

        assert_eq!(game.click(0), ClickOutcome::Ignored);
    }

    #[test]
    fn pause() {
        let mut game = reversed_game();

        game.tick();
        game.click(0);
        game.toggle_pause();

        assert_eq!(game.state(), State::Paused);
        assert!(game.is_paused());
        assert!(!game.is_ticking());

        game.tick();
        game.tick();
        assert_eq!(game.elapsed(), 1);

        assert_eq!(game.click(1), ClickOutcome::Ignored);
        assert_eq!(game.selected(), &[0]);

        game.toggle_pause();

        assert_eq!(game.state(), State::Active);
        assert!(game.is_ticking());
        game.tick();
        assert_eq!(game.elapsed(), 2);
        assert_eq!(game.click(1), ClickOutcome::Selected);
        assert_eq!(game.selected(), &[0, 1]);
    }

    #[test]
    fn complete() {
        let mut game = reversed_game();

        for _ in 0..3 {
            game.tick();
        }

        assert_eq!(game.changed_elapsed(), Some(3));
        assert_eq!(game.changed_elapsed(), None);

        solve_all(&mut game);

        assert_eq!(game.n_solved(), N_WORDS);
        assert_eq!(game.final_time(), Some(3));
        assert!(!game.is_ticking());
        assert!(!game.result_visible());
        assert_eq!(game.state(), State::Active);

        game.tick();
        assert_eq!(game.elapsed(), 3);

        let pending = game.take_pending_deferreds();
        assert_eq!(
            pending,
            &[Deferred {
                instance: 1,
                action: DeferredAction::ShowResult,
            }],
        );

        assert!(game.fire(pending[0]));

        assert!(game.result_visible());
        assert_eq!(game.state(), State::Complete);
        assert!((0..N_LETTERS).all(|i| game.is_solved(i)));

        game.toggle_pause();
        assert_eq!(game.state(), State::Complete);
    }

    #[test]
    fn stale_deferred() {
        let mut game = reversed_game();

        click_all(&mut game, &[0, 1, 2, 3, 5]);

        let stale = Deferred {
            instance: 0,
            action: DeferredAction::ClearSelection,
        };

        assert!(!game.fire(stale));
        assert!(game.is_error());
        assert_eq!(game.selected().len(), 5);

        assert!(!game.fire(Deferred {
            instance: 2,
            action: DeferredAction::ShowResult,
        }));
        assert!(!game.result_visible());
    }

    #[test]
    fn deferred_bits() {
        for instance in [0, 1, 12345, u32::MAX] {
            for action in [
                DeferredAction::ClearSelection,
                DeferredAction::ShowResult,
            ] {
                let deferred = Deferred { instance, action };
                assert_eq!(Deferred::from_bits(deferred.to_bits()), Some(deferred));
            }
        }

        assert_eq!(Deferred::from_bits(u64::MAX), None);
    }
}
