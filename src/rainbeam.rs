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

//! Conversion between Rainbeam translation files and PO.
//!
//! Unlike WebExtension messages, the stable key of a Rainbeam string
//! is stored as `msgctxt`, and the `msgid` holds display text. When a
//! source file is given, its text becomes the `msgid` and the target
//! file only pre-fills the `msgstr`.

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::po::{PoDocument, PoEntry};
use crate::schema::{self, join_path};

/// Name written to every file produced from PO.
pub const OUTPUT_NAME: &str = "out";
/// Version written to every file produced from PO.
pub const OUTPUT_VERSION: &str = "0.0.0";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RainbeamFile {
    pub name: String,
    pub version: String,
    pub data: IndexMap<String, String>,
}

/// Validate a parsed Rainbeam translation file.
pub fn parse_file(value: &Value) -> schema::Result<RainbeamFile> {
    let object = schema::expect_object(value, "$")?;
    let data = match object.get("data") {
        Some(data) => schema::expect_object(data, "data")?
            .iter()
            .map(|(key, text)| {
                schema::expect_string(text, &join_path("data", key))
                    .map(|text| (key.clone(), text))
            })
            .collect::<schema::Result<IndexMap<_, _>>>()?,
        None => {
            return Err(schema::ValidationError::MissingField {
                path: String::from("$"),
                field: "data",
            })
        }
    };
    Ok(RainbeamFile {
        name: schema::required_string(object, "$", "name")?,
        version: schema::required_string(object, "$", "version")?,
        data,
    })
}

/// Convert `file` to a PO document for `locale`.
///
/// Without `source`, `file` is treated as source text: its strings
/// become the `msgid`s and every `msgstr` is left empty. With
/// `source`, the keys and `msgid`s come from `source` and the strings
/// of `file` become the `msgstr`s. Keys missing from `file` get an
/// empty translation.
pub fn to_po(file: &RainbeamFile, locale: &str, source: Option<&RainbeamFile>) -> PoDocument {
    let mut document = PoDocument::new(locale);
    match source {
        Some(source) => {
            for (key, source_text) in &source.data {
                let translation = match file.data.get(key) {
                    Some(text) => text.clone(),
                    None => {
                        warn!("No translation for {key:?}, leaving it empty");
                        String::new()
                    }
                };
                document.insert(PoEntry::new(
                    Some(key.clone()),
                    source_text.clone(),
                    vec![translation],
                ));
            }
        }
        None => {
            for (key, text) in &file.data {
                document.insert(PoEntry::new(Some(key.clone()), text.clone(), Vec::new()));
            }
        }
    }
    debug!(
        "Converted {} strings ({})",
        document.entries().count(),
        if source.is_some() { "with source" } else { "as source" }
    );
    document
}

/// Convert a PO document back to a Rainbeam file.
///
/// The original name and version cannot be recovered; the output
/// always uses [`OUTPUT_NAME`] and [`OUTPUT_VERSION`].
pub fn to_json(document: &PoDocument) -> RainbeamFile {
    let data = document
        .translations
        .iter()
        .flat_map(|(context, entries)| {
            entries
                .values()
                .filter(|entry| !entry.is_header() && !entry.obsolete)
                .map(move |entry| (context.clone(), entry.joined_msgstr()))
        })
        .collect();
    RainbeamFile {
        name: String::from(OUTPUT_NAME),
        version: String::from(OUTPUT_VERSION),
        data,
    }
}
