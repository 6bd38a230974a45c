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
use super::word_set::{WordSet, WORD_LENGTH};
use rand::Rng;

/// Fisher–Yates shuffle. Every permutation is equally likely provided
/// that the random source is uniform.
pub fn shuffle<T, R: Rng + ?Sized>(values: &mut [T], rng: &mut R) {
    for i in (1..values.len()).rev() {
        let j = rng.gen_range(0..=i);
        values.swap(i, j);
    }
}

pub fn shuffled_grid<R: Rng + ?Sized>(word_set: &WordSet, rng: &mut R) -> Grid {
    let mut grid = Grid::from(word_set);

    shuffle(grid.letters_mut(), rng);

    grid
}

/// Moves the letters at `selected` into the block just after the
/// `n_solved` words that are already packed at the start of the grid.
/// The newly solved letters keep the order they were selected in and the
/// unsolved letters keep their relative order after them.
pub fn repack(grid: &mut Grid, n_solved: usize, selected: &[usize]) {
    let start = n_solved * WORD_LENGTH;

    debug_assert_eq!(selected.len(), WORD_LENGTH);
    debug_assert!(selected.iter().all(|&i| i >= start));

    let letters = grid.letters();

    let mut packed = Vec::with_capacity(letters.len());

    packed.extend_from_slice(&letters[0..start]);
    packed.extend(selected.iter().map(|&i| letters[i]));
    packed.extend(
        letters.iter()
            .enumerate()
            .skip(start)
            .filter_map(|(i, &ch)| (!selected.contains(&i)).then_some(ch))
    );

    grid.letters_mut().copy_from_slice(&packed);
}
