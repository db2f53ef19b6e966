// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Convert JSON translation files to PO and back.
//!
//! If the input file ends in `.json`, it is converted to a PO file.
//! Any other input is read as a PO file and converted to JSON.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use json_po_helpers::{Conversion, Mode};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Format of the JSON files.
    #[arg(long, value_enum, default_value_t = Mode::default())]
    mode: Mode,
    /// Language of the translation, e.g. `zh_TW`.
    #[arg(short, long)]
    locale: String,
    #[arg(short, long, value_name = "input.json|input.po")]
    input: PathBuf,
    #[arg(short, long, value_name = "output.po|output.json")]
    output: PathBuf,
    /// Original-language file (rainbeam mode).
    #[arg(short, long, value_name = "source.json")]
    source: Option<PathBuf>,
    /// Translations in other languages, shown as translator comments (wei18n mode).
    #[arg(value_name = "reference.json")]
    references: Vec<PathBuf>,
}

impl From<Cli> for Conversion {
    fn from(cli: Cli) -> Self {
        Conversion {
            mode: cli.mode,
            locale: cli.locale,
            input: cli.input,
            output: cli.output,
            source: cli.source,
            references: cli.references,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        // `--help` and `--version` exit with 0.
        if !err.use_stderr() {
            err.exit()
        }
        #[allow(clippy::print_stderr)]
        {
            eprint!("{err}");
        }
        process::exit(1)
    });
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));

    Conversion::from(cli).run()
}
