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

use std::{fs, process::ExitCode, ffi::OsString};
use std::io::{BufWriter, Write};
use std::fs::File;
use clap::Parser;
use serde::Serialize;
use catalog::Catalog;

#[derive(Parser)]
#[command(name = "Build catalog")]
struct Cli {
    #[arg(required = true, value_name = "SOURCE")]
    sources: Vec<OsString>,
    #[arg(short, long, value_name = "FILE")]
    output: Option<OsString>,
    #[arg(short = 'H', long)]
    human_readable: bool,
}

#[derive(Serialize)]
struct WordSetEntry<'a> {
    id: &'a str,
    theme: &'a str,
    words: &'a [String],
}

fn write_json<W: Write>(
    mut output: W,
    catalog: &Catalog,
) -> Result<(), std::io::Error> {
    let entries = catalog.all().iter()
        .map(|word_set| WordSetEntry {
            id: word_set.id(),
            theme: word_set.theme(),
            words: word_set.words(),
        })
        .collect::<Vec<_>>();

    serde_json::to_writer(&mut output, &entries)?;
    writeln!(&mut output)?;

    output.flush()
}

fn write_human_readable<W: Write>(
    mut output: W,
    catalog: &Catalog,
) -> Result<(), std::io::Error> {
    for (num, word_set) in catalog.all().iter().enumerate() {
        writeln!(
            &mut output,
            "{:>3}. {} ({})",
            num + 1,
            word_set.theme(),
            word_set.id(),
        )?;
        writeln!(&mut output, "     {}", word_set.words().join(" "))?;
    }

    output.flush()
}

fn read_catalogs(filenames: &[OsString]) -> Result<Catalog, String> {
    let mut word_sets = Vec::new();

    for filename in filenames {
        let catalog = fs::read_to_string(filename)
            .map_err(|e| e.to_string())
            .and_then(|source| {
                source.parse::<Catalog>().map_err(|e| e.to_string())
            })
            .map_err(|e| format!("{}: {}", filename.to_string_lossy(), e))?;

        word_sets.extend(catalog.all().iter().cloned());
    }

    Catalog::new(word_sets).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let catalog = match read_catalogs(&cli.sources) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    let result = match cli.output.as_ref() {
        Some(filename) => {
            let file = match File::create(filename) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("{}: {}", filename.to_string_lossy(), e);
                    return ExitCode::FAILURE;
                },
            };

            let output = BufWriter::new(file);

            if cli.human_readable {
                write_human_readable(output, &catalog)
            } else {
                write_json(output, &catalog)
            }
        },
        None => {
            let output = std::io::stdout().lock();

            if cli.human_readable {
                write_human_readable(output, &catalog)
            } else {
                write_json(output, &catalog)
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
