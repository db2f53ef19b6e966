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

//! Conversion between WebExtension `messages.json` files and PO.
//!
//! Every message key becomes a `msgid` under the default context and
//! the message text becomes the `msgstr`. Descriptions are kept as
//! extracted comments. Messages from reference files (the same
//! extension in other languages) are shown to translators as
//! translator comments.

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::po::{PoDocument, PoEntry};
use crate::schema::{self, join_path};

/// Separator between the texts of several reference files.
const REFERENCE_SEPARATOR: &str = "\n\n";

/// A placeholder of a WebExtension message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// A single entry of a `messages.json` file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WebExtMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Only kept on the JSON side, never written to PO.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholders: Option<IndexMap<String, Placeholder>>,
}

impl WebExtMessage {
    pub fn new(message: impl Into<String>) -> Self {
        WebExtMessage {
            message: message.into(),
            ..WebExtMessage::default()
        }
    }
}

/// Messages keyed by message name, in file order.
pub type WebExtMessageMap = IndexMap<String, WebExtMessage>;

fn parse_placeholder(value: &Value, path: &str) -> schema::Result<Placeholder> {
    let object = schema::expect_object(value, path)?;
    schema::deny_unknown_fields(object, path, &["content", "example"])?;
    Ok(Placeholder {
        content: schema::required_string(object, path, "content")?,
        example: schema::optional_string(object, path, "example")?,
    })
}

fn parse_message(value: &Value, path: &str) -> schema::Result<WebExtMessage> {
    let object = schema::expect_object(value, path)?;
    schema::deny_unknown_fields(object, path, &["message", "description", "placeholders"])?;
    let placeholders = match object.get("placeholders") {
        Some(value) => {
            let path = join_path(path, "placeholders");
            let placeholders = schema::expect_object(value, &path)?
                .iter()
                .map(|(name, value)| {
                    parse_placeholder(value, &join_path(&path, name))
                        .map(|placeholder| (name.clone(), placeholder))
                })
                .collect::<schema::Result<IndexMap<_, _>>>()?;
            Some(placeholders)
        }
        None => None,
    };
    Ok(WebExtMessage {
        message: schema::required_string(object, path, "message")?,
        description: schema::optional_string(object, path, "description")?,
        placeholders,
    })
}

/// Validate a parsed `messages.json` document.
pub fn parse_messages(value: &Value) -> schema::Result<WebExtMessageMap> {
    schema::expect_object(value, "$")?
        .iter()
        .map(|(key, value)| {
            parse_message(value, &join_path("$", key)).map(|message| (key.clone(), message))
        })
        .collect()
}

/// Convert `messages` to a PO document for `locale`.
///
/// For each message found in one of the `references`, the reference
/// text is added as a translator comment. Texts from several
/// references are separated by a blank line, in the order given.
pub fn to_po(
    messages: &WebExtMessageMap,
    locale: &str,
    references: &[WebExtMessageMap],
) -> PoDocument {
    let mut document = PoDocument::new(locale);
    for (key, message) in messages {
        let mut entry = PoEntry::new(None, key.clone(), vec![message.message.clone()]);
        entry.comments.extracted = message.description.clone();

        let reference_texts = references
            .iter()
            .filter_map(|reference| reference.get(key))
            .map(|reference| reference.message.as_str())
            .collect::<Vec<_>>();
        if !reference_texts.is_empty() {
            entry.comments.translator = Some(reference_texts.join(REFERENCE_SEPARATOR));
        }
        document.insert(entry);
    }
    debug!(
        "Converted {} messages with {} reference files",
        messages.len(),
        references.len()
    );
    document
}

/// Convert a PO document back to WebExtension messages.
///
/// Placeholders cannot be recovered from PO and are never emitted.
pub fn to_json(document: &PoDocument) -> WebExtMessageMap {
    for (context, entries) in &document.translations {
        if !context.is_empty() {
            warn!(
                "Skipping {} messages with context {context:?}",
                entries.len()
            );
        }
    }

    document
        .entries_in("")
        .filter(|entry| !entry.is_header() && !entry.obsolete)
        .map(|entry| {
            let message = WebExtMessage {
                message: entry.joined_msgstr(),
                description: entry.comments.extracted.clone(),
                placeholders: None,
            };
            (entry.msgid.clone(), message)
        })
        .collect()
}
