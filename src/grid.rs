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

use super::word_set::{WordSet, N_LETTERS, WORD_LENGTH};
use std::fmt;

pub const GRID_WIDTH: usize = WORD_LENGTH;
pub const GRID_HEIGHT: usize = N_LETTERS / GRID_WIDTH;

/// The 25 letters in play, indexed 0..24 in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    values: Box<[char]>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    EmptyGrid,
    WrongSize(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyGrid => write!(f, "empty grid"),
            Error::WrongSize(size) => write!(
                f,
                "grid has {} letters instead of {}",
                size,
                N_LETTERS,
            ),
        }
    }
}

impl Grid {
    /// Parses a grid written as rows of letters. Whitespace is ignored.
    pub fn new(s: &str) -> Result<Grid, Error> {
        let values = s.chars()
            .filter(|ch| !ch.is_whitespace())
            .collect::<Vec<char>>();

        Grid::from_letters(values)
    }

    pub fn from_letters(values: Vec<char>) -> Result<Grid, Error> {
        if values.is_empty() {
            return Err(Error::EmptyGrid);
        }

        if values.len() != N_LETTERS {
            return Err(Error::WrongSize(values.len()));
        }

        Ok(Grid { values: values.into_boxed_slice() })
    }

    pub fn width(&self) -> usize {
        GRID_WIDTH
    }

    pub fn height(&self) -> usize {
        GRID_HEIGHT
    }

    pub fn at(&self, x: usize, y: usize) -> char {
        assert!(x < GRID_WIDTH);

        self.values[y * GRID_WIDTH + x]
    }

    pub fn letter(&self, index: usize) -> char {
        self.values[index]
    }

    pub fn letters(&self) -> &[char] {
        &self.values
    }

    pub(crate) fn letters_mut(&mut self) -> &mut [char] {
        &mut self.values
    }
}

impl From<&WordSet> for Grid {
    /// The letters of the words in order, before any shuffling.
    fn from(word_set: &WordSet) -> Grid {
        Grid { values: word_set.letters().collect() }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (y, row) in self.values.chunks(GRID_WIDTH).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }

            for &ch in row {
                write!(f, "{}", ch)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_grid() {
        assert_eq!(Grid::new("").unwrap_err(), Error::EmptyGrid);
        assert_eq!(Grid::new("   ").unwrap_err(), Error::EmptyGrid);
        assert_eq!(Grid::new(" \n  ").unwrap_err(), Error::EmptyGrid);
        assert_eq!(&Grid::new("").unwrap_err().to_string(), "empty grid");
    }

    #[test]
    fn wrong_size() {
        assert_eq!(
            &Grid::new("ABCDE\nFGHIJ").unwrap_err().to_string(),
            "grid has 10 letters instead of 25",
        );
        assert_eq!(
            Grid::from_letters(vec!['A'; 26]).unwrap_err(),
            Error::WrongSize(26),
        );
    }

    #[test]
    fn positions() {
        let grid = Grid::new(
            "ABCDE\n\
             FGHIJ\n\
             KLMNO\n\
             PQRST\n\
             UVWXY"
        ).unwrap();

        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.at(0, 0), 'A');
        assert_eq!(grid.at(4, 0), 'E');
        assert_eq!(grid.at(1, 2), 'L');
        assert_eq!(grid.at(4, 4), 'Y');
        assert_eq!(grid.letter(7), 'H');
        assert_eq!(grid.letters().len(), 25);
    }

    #[test]
    fn from_word_set() {
        let word_set = "space,Outer space,ORBIT,COMET,EARTH,SOLAR,VENUS"
            .parse::<WordSet>()
            .unwrap();
        let grid = Grid::from(&word_set);

        assert_eq!(grid.at(0, 0), 'O');
        assert_eq!(grid.at(2, 1), 'M');
        assert_eq!(grid.at(4, 4), 'S');
        assert_eq!(
            &grid.to_string(),
            "ORBIT\nCOMET\nEARTH\nSOLAR\nVENUS",
        );
    }

    #[test]
    fn display() {
        let rows = "APPLE\nGRAPE\nLEMON\nMANGO\nPEACH";

        assert_eq!(&Grid::new(rows).unwrap().to_string(), rows);
        assert_eq!(
            &Grid::new("APPLE GRAPE LEMON MANGO PEACH").unwrap().to_string(),
            rows,
        );
    }
}
