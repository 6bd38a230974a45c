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

use super::word_set::{self, WordSet};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// The read-only list of puzzles to choose from.
#[derive(Debug, Clone)]
pub struct Catalog {
    word_sets: Vec<WordSet>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    WordSet(usize, word_set::Error),
    Empty,
    DuplicateId(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::WordSet(line, e) => write!(f, "line {}: {}", line, e),
            Error::Empty => write!(f, "no word sets"),
            Error::DuplicateId(id) => write!(f, "duplicate id “{}”", id),
        }
    }
}

impl Catalog {
    pub fn new(word_sets: Vec<WordSet>) -> Result<Catalog, Error> {
        if word_sets.is_empty() {
            return Err(Error::Empty);
        }

        for (i, word_set) in word_sets.iter().enumerate() {
            if word_sets[0..i].iter().any(|other| other.id() == word_set.id()) {
                return Err(Error::DuplicateId(word_set.id().to_string()));
            }
        }

        Ok(Catalog { word_sets })
    }

    pub fn all(&self) -> &[WordSet] {
        &self.word_sets
    }

    pub fn len(&self) -> usize {
        self.word_sets.len()
    }

    pub fn get(&self, index: usize) -> Option<&WordSet> {
        self.word_sets.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.word_sets.iter().position(|word_set| word_set.id() == id)
    }

    pub fn find(&self, id: &str) -> Option<&WordSet> {
        self.position(id).map(|index| &self.word_sets[index])
    }

    /// Picks the set to start with. A recognised id selects that set,
    /// anything else falls back to a random one.
    pub fn choose_initial<R: Rng + ?Sized>(
        &self,
        requested: Option<&str>,
        rng: &mut R,
    ) -> usize {
        requested
            .and_then(|id| self.position(id))
            .unwrap_or_else(|| rng.gen_range(0..self.word_sets.len()))
    }

    /// Picks a random set other than `current` unless there is no other
    /// choice.
    pub fn choose_other<R: Rng + ?Sized>(
        &self,
        current: usize,
        rng: &mut R,
    ) -> usize {
        if self.word_sets.len() <= 1 {
            return 0;
        }

        loop {
            let index = rng.gen_range(0..self.word_sets.len());

            if index != current {
                break index;
            }
        }
    }
}

impl FromStr for Catalog {
    type Err = Error;

    fn from_str(s: &str) -> Result<Catalog, Error> {
        let mut word_sets = Vec::new();

        for (line_num, line) in s.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.parse::<WordSet>() {
                Ok(word_set) => word_sets.push(word_set),
                Err(e) => return Err(Error::WordSet(line_num + 1, e)),
            }
        }

        Catalog::new(word_sets)
    }
}
