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

use std::fmt;
use std::str::FromStr;

pub const N_WORDS: usize = 5;
pub const WORD_LENGTH: usize = 5;
pub const N_LETTERS: usize = N_WORDS * WORD_LENGTH;

/// A themed puzzle made of five distinct five-letter words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSet {
    id: String,
    theme: String,
    words: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    EmptyId,
    InvalidId(String),
    EmptyTheme,
    WrongWordCount(usize),
    WrongWordLength(String),
    InvalidLetter(String),
    DuplicateWord(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyId => write!(f, "empty id"),
            Error::InvalidId(id) => write!(f, "invalid id “{}”", id),
            Error::EmptyTheme => write!(f, "empty theme"),
            Error::WrongWordCount(count) => write!(
                f,
                "expected {} words but found {}",
                N_WORDS,
                count,
            ),
            Error::WrongWordLength(word) => write!(
                f,
                "“{}” is not {} letters long",
                word,
                WORD_LENGTH,
            ),
            Error::InvalidLetter(word) => write!(
                f,
                "“{}” contains a character that isn’t a letter",
                word,
            ),
            Error::DuplicateWord(word) => write!(
                f,
                "“{}” appears more than once",
                word,
            ),
        }
    }
}

fn is_valid_id_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

impl WordSet {
    pub fn new<I, S>(
        id: &str,
        theme: &str,
        words: I,
    ) -> Result<WordSet, Error>
        where I: IntoIterator<Item = S>,
              S: AsRef<str>
    {
        if id.is_empty() {
            return Err(Error::EmptyId);
        }

        if !id.chars().all(is_valid_id_char) {
            return Err(Error::InvalidId(id.to_string()));
        }

        let theme = theme.trim();

        if theme.is_empty() {
            return Err(Error::EmptyTheme);
        }

        let words = words.into_iter()
            .map(|word| word.as_ref().trim().to_ascii_uppercase())
            .collect::<Vec<String>>();

        if words.len() != N_WORDS {
            return Err(Error::WrongWordCount(words.len()));
        }

        for (i, word) in words.iter().enumerate() {
            if !word.chars().all(|ch| ch.is_ascii_uppercase()) {
                return Err(Error::InvalidLetter(word.clone()));
            }

            if word.len() != WORD_LENGTH {
                return Err(Error::WrongWordLength(word.clone()));
            }

            if words[0..i].contains(word) {
                return Err(Error::DuplicateWord(word.clone()));
            }
        }

        Ok(WordSet {
            id: id.to_string(),
            theme: theme.to_string(),
            words,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// All of the letters of the words concatenated in word order.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.words.iter().flat_map(|word| word.chars())
    }
}

impl FromStr for WordSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<WordSet, Error> {
        let mut parts = s.trim().split(',');

        let id = parts.next().unwrap_or("").trim();
        let theme = parts.next().unwrap_or("");

        WordSet::new(id, theme, parts)
    }
}

impl fmt::Display for WordSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.id, self.theme)?;

        for word in self.words.iter() {
            write!(f, ",{}", word)?;
        }

        Ok(())
    }
}
