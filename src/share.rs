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

use std::fmt::Write;

pub const GAME_NAME: &'static str = "QuizWordz 5x5";

/// The query parameter that selects a word set in a shared link.
pub const SET_PARAM: &'static str = "set";

/// Formats a number of seconds as M:SS.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Builds a link to the word set from the page address without its query
/// string.
pub fn share_url(base: &str, id: &str) -> String {
    let mut url = base.to_string();

    write!(&mut url, "?{}={}", SET_PARAM, id).unwrap();

    url
}

pub fn share_text(theme: &str, seconds: u32, url: &str) -> String {
    format!(
        "I completed “{}” in {} on {}!\n\
         \n\
         Can you beat my time? Try it here: {}",
        theme,
        format_time(seconds),
        GAME_NAME,
        url,
    )
}
