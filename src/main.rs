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

mod word_set;
mod catalog;
mod grid;
mod shuffle;
mod game;
mod schedule;
mod session;
mod share;

use std::{fs, process::ExitCode, ffi::OsString};
use std::io::BufRead;
use std::time::Instant;
use std::fmt::Write;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use catalog::Catalog;
use game::{ClickOutcome, Game, State};
use schedule::Schedule;
use session::Session;

#[derive(Parser)]
#[command(name = "QuizWordz")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "data/word-sets.txt",
    )]
    word_sets: OsString,
    #[arg(short, long, value_name = "ID")]
    set: Option<String>,
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    #[arg(short, long, value_name = "URL", default_value = "index.html")]
    base_url: String,
}

const HELP: &'static str =
    "Type cell numbers to pick letters, p to pause, n for a new puzzle, \
     s to share or q to quit.";

fn render_cell(game: &Game, index: usize) -> String {
    let letter = game.grid().letter(index);

    if game.is_solved(index) {
        format!("({})", letter)
    } else if game.is_selected(index) {
        if game.is_error() {
            format!("!{}!", letter)
        } else {
            format!("[{}]", letter)
        }
    } else {
        format!(" {} ", letter)
    }
}

fn render_game(game: &Game, set_index: usize, n_sets: usize) -> String {
    let mut text = format!(
        "{} – set {} of {}  {}",
        game.theme(),
        set_index + 1,
        n_sets,
        share::format_time(game.elapsed()),
    );

    if game.state() == State::Paused {
        text.push_str("\n\nGame paused");
        return text;
    }

    let grid = game.grid();

    for y in 0..grid.height() {
        write!(&mut text, "\n\n{:>2} ", y * grid.width()).unwrap();

        for x in 0..grid.width() {
            text.push_str(&render_cell(game, y * grid.width() + x));
        }
    }

    text
}

fn advance(
    session: &mut Session<ChaCha12Rng>,
    schedule: &mut Schedule,
    last_time: &mut Instant,
) {
    let now = Instant::now();
    let elapsed = now.duration_since(*last_time).as_millis() as u64;
    let limit = schedule.now() + elapsed;

    *last_time = now;

    while let Some(fired) = schedule.step(limit) {
        session.handle(fired, schedule);
    }
}

fn print_result(session: &Session<ChaCha12Rng>) {
    let Some(result) = session.result()
    else {
        return;
    };

    println!(
        "\nYou found all of the words about “{}” in {}!",
        result.theme,
        share::format_time(result.final_time),
    );

    for word in result.solved_words {
        println!("  {}", word);
    }

    println!("\nType n to play again or s to share.");
}

fn run_command(
    session: &mut Session<ChaCha12Rng>,
    schedule: &mut Schedule,
    cli: &Cli,
    command: &str,
) -> bool {
    match command {
        "q" => return false,
        "p" => session.toggle_pause(schedule),
        "n" => session.play_again(schedule),
        "s" => println!("{}", session.share_text(&cli.base_url)),
        "h" | "?" => println!("{}", HELP),
        _ => match command.parse::<usize>() {
            Ok(index) => match session.click(index, schedule) {
                ClickOutcome::Solved(word) => println!("Found {}!", word),
                ClickOutcome::Missed => println!("Not one of the words"),
                ClickOutcome::Ignored |
                ClickOutcome::Selected |
                ClickOutcome::Deselected => (),
            },
            Err(_) => eprintln!("unknown command: {}", command),
        },
    }

    true
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let catalog = match fs::read_to_string(&cli.word_sets) {
        Ok(source) => match source.parse::<Catalog>() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}: {}", cli.word_sets.to_string_lossy(), e);
                return ExitCode::FAILURE;
            },
        },
        Err(e) => {
            eprintln!("{}: {}", cli.word_sets.to_string_lossy(), e);
            return ExitCode::FAILURE;
        },
    };

    if let Some(id) = cli.set.as_deref() {
        if catalog.position(id).is_none() {
            eprintln!("unknown word set “{}”, picking one at random", id);
        }
    }

    let rng = match cli.seed {
        Some(seed) => ChaCha12Rng::seed_from_u64(seed),
        None => ChaCha12Rng::from_entropy(),
    };

    let mut session = Session::new(catalog, cli.set.as_deref(), rng);
    let mut schedule = Schedule::new();
    let mut last_time = Instant::now();

    session.start(&mut schedule);

    println!("{}\n", HELP);
    println!(
        "{}",
        render_game(session.game(), session.set_index(), session.catalog().len()),
    );

    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("stdin: {}", e);
                return ExitCode::FAILURE;
            },
        };

        let was_complete = session.game().state() == State::Complete;

        for command in line.split_whitespace() {
            advance(&mut session, &mut schedule, &mut last_time);

            if !run_command(&mut session, &mut schedule, &cli, command) {
                return ExitCode::SUCCESS;
            }
        }

        advance(&mut session, &mut schedule, &mut last_time);

        println!(
            "\n{}",
            render_game(
                session.game(),
                session.set_index(),
                session.catalog().len(),
            ),
        );

        if !was_complete {
            print_result(&session);
        }
    }

    ExitCode::SUCCESS
}
