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

//! Helpers for translating JSON message files with Gettext tools.
//!
//! WebExtension `messages.json` files and Rainbeam translation files
//! are converted to PO files, which can be edited with any PO editor
//! (Lokalize, Poedit, ...), and then converted back to JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

pub mod po;
pub mod rainbeam;
pub mod schema;
pub mod webext;

use po::PoDocument;

/// The JSON flavor being converted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Rainbeam files: `{name, version, data: {key: text}}`.
    Rainbeam,
    /// WebExtension `messages.json` files.
    #[default]
    #[value(name = "wei18n")]
    WebExt,
}

/// One conversion, as requested on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    pub mode: Mode,
    pub locale: String,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Original-language file, used in Rainbeam mode.
    pub source: Option<PathBuf>,
    /// Files in other languages, used in WebExtension mode.
    pub references: Vec<PathBuf>,
}

impl Conversion {
    /// Returns true if the input is JSON and the output PO.
    pub fn is_json_input(&self) -> bool {
        self.input.extension().is_some_and(|ext| ext == "json")
    }

    /// Read the input, convert it, and write the output.
    pub fn run(&self) -> anyhow::Result<()> {
        let output = if self.is_json_input() {
            info!("Converting {} to PO", self.input.display());
            self.json_to_po()?.to_string()
        } else {
            info!("Converting {} to JSON", self.input.display());
            self.po_to_json()?
        };
        fs::write(&self.output, output)
            .with_context(|| format!("Could not write {}", self.output.display()))?;
        Ok(())
    }

    /// Convert the JSON input to a PO document.
    pub fn json_to_po(&self) -> anyhow::Result<PoDocument> {
        let value = read_json(&self.input)?;
        match self.mode {
            Mode::WebExt => {
                if self.source.is_some() {
                    warn!("Ignoring source file, it is only used in rainbeam mode");
                }
                let messages = parse_webext(&value, &self.input)?;
                let references = self
                    .references
                    .iter()
                    .map(|path| parse_webext(&read_json(path)?, path))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok(webext::to_po(&messages, &self.locale, &references))
            }
            Mode::Rainbeam => {
                if !self.references.is_empty() {
                    warn!("Ignoring reference files, they are only used in wei18n mode");
                }
                let file = parse_rainbeam(&value, &self.input)?;
                let source = self
                    .source
                    .as_ref()
                    .map(|path| parse_rainbeam(&read_json(path)?, path))
                    .transpose()?;
                Ok(rainbeam::to_po(&file, &self.locale, source.as_ref()))
            }
        }
    }

    /// Convert the PO input to pretty-printed JSON.
    pub fn po_to_json(&self) -> anyhow::Result<String> {
        let content = fs::read_to_string(&self.input)
            .with_context(|| format!("Could not read {}", self.input.display()))?;
        let document = PoDocument::parse(&content)
            .with_context(|| format!("Could not parse {:?} as PO file", self.input))?;
        match self.mode {
            Mode::WebExt => to_json_string(&webext::to_json(&document)),
            Mode::Rainbeam => to_json_string(&rainbeam::to_json(&document)),
        }
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Could not parse {:?} as JSON", path))
}

fn parse_webext(value: &Value, path: &Path) -> anyhow::Result<webext::WebExtMessageMap> {
    webext::parse_messages(value)
        .with_context(|| format!("{:?} is not a valid messages.json file", path))
}

fn parse_rainbeam(value: &Value, path: &Path) -> anyhow::Result<rainbeam::RainbeamFile> {
    rainbeam::parse_file(value)
        .with_context(|| format!("{:?} is not a valid Rainbeam translation file", path))
}

fn to_json_string<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}
