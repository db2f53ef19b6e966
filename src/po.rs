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

//! In-memory model of a Gettext PO document.
//!
//! Both JSON converters produce and consume a [`PoDocument`]. The
//! actual PO text is read and written by `rspolib`; this module only
//! maps between its types and the model used here.

use std::fmt;

use anyhow::anyhow;
use indexmap::IndexMap;
use rspolib::{FileOptions, POEntry, POFile};

/// Charset used for every document we write.
pub const CHARSET: &str = "utf-8";

/// Comments attached to a PO entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoComments {
    /// Free-form translator comments (`# `).
    pub translator: Option<String>,
    /// Source references (`#: `), whitespace separated.
    pub reference: Option<String>,
    /// Comments extracted from the source (`#. `).
    pub extracted: Option<String>,
    /// Flags such as `fuzzy` (`#, `), comma separated.
    pub flag: Option<String>,
    /// Previous msgid (`#| `).
    pub previous: Option<String>,
}

/// A single PO entry.
///
/// `msgstr` holds one element per plural form. Since every document
/// we write uses `nplurals=1`, it has at most one element unless the
/// entry was read from a file with plural messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoEntry {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: Vec<String>,
    pub comments: PoComments,
    pub obsolete: bool,
}

impl PoEntry {
    pub fn new(msgctxt: Option<String>, msgid: String, msgstr: Vec<String>) -> Self {
        PoEntry {
            msgctxt,
            msgid,
            msgstr,
            ..PoEntry::default()
        }
    }

    /// The context key this entry is stored under (`""` when absent).
    pub fn context(&self) -> &str {
        self.msgctxt.as_deref().unwrap_or_default()
    }

    /// All msgstr segments joined without separator.
    pub fn joined_msgstr(&self) -> String {
        self.msgstr.concat()
    }

    /// Returns true for the header pseudo-entry: empty msgid under the
    /// default context.
    pub fn is_header(&self) -> bool {
        self.context().is_empty() && self.msgid.is_empty()
    }

    fn from_po_entry(entry: POEntry) -> Self {
        let msgstr = if entry.msgid_plural.is_some() {
            entry.msgstr_plural
        } else {
            entry.msgstr.into_iter().collect()
        };
        let reference = (!entry.occurrences.is_empty()).then(|| {
            entry
                .occurrences
                .iter()
                .map(|(path, line)| match line.as_str() {
                    "" => path.clone(),
                    _ => format!("{path}:{line}"),
                })
                .collect::<Vec<_>>()
                .join(" ")
        });
        let flag = (!entry.flags.is_empty()).then(|| entry.flags.join(", "));
        PoEntry {
            msgctxt: entry.msgctxt,
            msgid: entry.msgid,
            msgid_plural: entry.msgid_plural,
            msgstr,
            comments: PoComments {
                translator: entry.tcomment.filter(|c| !c.is_empty()),
                reference,
                extracted: entry.comment.filter(|c| !c.is_empty()),
                flag,
                previous: entry.previous_msgid,
            },
            obsolete: entry.obsolete,
        }
    }
}

/// Escape `text` for use inside a quoted PO string.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Write `keyword` followed by `text` as a quoted string.
///
/// Text with several lines is split after each newline. Lines are
/// never wrapped or trimmed, so the text reads back byte for byte.
fn write_field(f: &mut fmt::Formatter, prefix: &str, keyword: &str, text: &str) -> fmt::Result {
    let lines = text.split_inclusive('\n').collect::<Vec<_>>();
    if lines.len() <= 1 {
        return writeln!(f, "{prefix}{keyword} \"{}\"", escape(text));
    }
    writeln!(f, "{prefix}{keyword} \"\"")?;
    for line in lines {
        writeln!(f, "{prefix}\"{}\"", escape(line))?;
    }
    Ok(())
}

fn write_comment(f: &mut fmt::Formatter, marker: &str, text: &str) -> fmt::Result {
    for line in text.split('\n') {
        match line {
            "" => writeln!(f, "{marker}")?,
            _ => writeln!(f, "{marker} {line}")?,
        }
    }
    Ok(())
}

fn write_entry(f: &mut fmt::Formatter, entry: &PoEntry) -> fmt::Result {
    let comments = &entry.comments;
    if let Some(translator) = &comments.translator {
        write_comment(f, "#", translator)?;
    }
    if let Some(extracted) = &comments.extracted {
        write_comment(f, "#.", extracted)?;
    }
    if let Some(reference) = &comments.reference {
        writeln!(f, "#: {reference}")?;
    }
    if let Some(flag) = &comments.flag {
        writeln!(f, "#, {flag}")?;
    }
    if let Some(previous) = &comments.previous {
        write_field(f, "#| ", "msgid", previous)?;
    }

    let prefix = if entry.obsolete { "#~ " } else { "" };
    if let Some(msgctxt) = &entry.msgctxt {
        write_field(f, prefix, "msgctxt", msgctxt)?;
    }
    write_field(f, prefix, "msgid", &entry.msgid)?;
    match &entry.msgid_plural {
        Some(msgid_plural) => {
            write_field(f, prefix, "msgid_plural", msgid_plural)?;
            for (index, msgstr) in entry.msgstr.iter().enumerate() {
                write_field(f, prefix, &format!("msgstr[{index}]"), msgstr)?;
            }
            Ok(())
        }
        None => write_field(f, prefix, "msgstr", &entry.joined_msgstr()),
    }
}

/// A PO document: headers plus entries grouped by context and msgid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoDocument {
    pub charset: String,
    pub headers: IndexMap<String, String>,
    pub translations: IndexMap<String, IndexMap<String, PoEntry>>,
}

impl PoDocument {
    /// Build an empty document carrying the fixed headers for `locale`.
    ///
    /// Every JSON to PO conversion starts from this skeleton.
    pub fn new(locale: &str) -> Self {
        let headers = [
            ("Project-Id-Version", "placeholder"),
            ("Language", locale),
            ("MIME-Version", "1.0"),
            ("Content-Type", "text/plain; charset=utf-8"),
            ("Content-Transfer-Encoding", "8bit"),
            ("Plural-Forms", "nplurals=1; plural=0"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
        PoDocument {
            charset: String::from(CHARSET),
            headers,
            translations: IndexMap::new(),
        }
    }

    /// Add `entry`, replacing any entry with the same context and msgid.
    pub fn insert(&mut self, entry: PoEntry) {
        self.translations
            .entry(entry.context().to_string())
            .or_default()
            .insert(entry.msgid.clone(), entry);
    }

    /// Entries stored under `context`, in insertion order.
    pub fn entries_in(&self, context: &str) -> impl Iterator<Item = &PoEntry> {
        self.translations
            .get(context)
            .into_iter()
            .flat_map(|entries| entries.values())
    }

    /// All entries, grouped by context, in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &PoEntry> {
        self.translations.values().flat_map(|entries| entries.values())
    }

    /// Parse PO text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let po_file = rspolib::pofile(content).map_err(|err| anyhow!("{err}"))?;
        Ok(Self::from_po_file(po_file))
    }

    pub fn from_po_file(po_file: POFile) -> Self {
        let charset = po_file
            .metadata
            .get("Content-Type")
            .and_then(|content_type| content_type.split_once("charset="))
            .map(|(_, charset)| charset.trim().to_string())
            .unwrap_or_else(|| String::from(CHARSET));
        let mut metadata = po_file.metadata.into_iter().collect::<Vec<_>>();
        // `rspolib` keeps headers in a hash map.
        metadata.sort();

        let mut document = PoDocument {
            charset,
            headers: metadata.into_iter().collect(),
            translations: IndexMap::new(),
        };
        for entry in po_file.entries {
            document.insert(PoEntry::from_po_entry(entry));
        }
        document
    }

    /// A `rspolib` file holding only the headers.
    fn header_po_file(&self) -> POFile {
        let mut po_file = POFile::new(FileOptions::default());
        for (key, value) in &self.headers {
            po_file.metadata.insert(key.clone(), value.clone());
        }
        po_file
    }
}

/// Headers are written by `rspolib`. Entries are written here since
/// `rspolib` wraps and trims message text.
impl fmt::Display for PoDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.header_po_file().to_string().trim_end())?;
        for entry in self.entries().filter(|entry| !entry.is_header()) {
            writeln!(f)?;
            write_entry(f, entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_entry(msgctxt: Option<&str>, msgid: &str, msgstr: &str) -> PoEntry {
        PoEntry::new(
            msgctxt.map(String::from),
            String::from(msgid),
            vec![String::from(msgstr)],
        )
    }

    #[test]
    fn test_new_document_headers() {
        let document = PoDocument::new("zh_TW");
        assert_eq!(document.charset, "utf-8");
        assert_eq!(
            document.headers.get("Language").map(String::as_str),
            Some("zh_TW")
        );
        assert_eq!(
            document.headers.get("Plural-Forms").map(String::as_str),
            Some("nplurals=1; plural=0")
        );
        assert_eq!(
            document.headers.get("Content-Transfer-Encoding").map(String::as_str),
            Some("8bit")
        );
        assert!(document.translations.is_empty());
    }

    #[test]
    fn test_insert_groups_by_context() {
        let mut document = PoDocument::new("en");
        document.insert(create_entry(None, "foo", "FOO"));
        document.insert(create_entry(Some("key1"), "foo", "FOO 1"));
        document.insert(create_entry(None, "bar", "BAR"));

        let default_context = document
            .entries_in("")
            .map(|entry| entry.msgid.as_str())
            .collect::<Vec<_>>();
        assert_eq!(default_context, vec!["foo", "bar"]);
        let key1 = document.entries_in("key1").collect::<Vec<_>>();
        assert_eq!(key1, vec![&create_entry(Some("key1"), "foo", "FOO 1")]);
        assert_eq!(document.entries_in("missing").count(), 0);
    }

    #[test]
    fn test_insert_replaces_same_msgid() {
        let mut document = PoDocument::new("en");
        document.insert(create_entry(None, "foo", "first"));
        document.insert(create_entry(None, "foo", "second"));
        let entries = document.entries().collect::<Vec<_>>();
        assert_eq!(entries, vec![&create_entry(None, "foo", "second")]);
    }

    #[test]
    fn test_joined_msgstr() {
        let entry = PoEntry::new(
            None,
            String::from("foo"),
            vec![String::from("Hello, "), String::from("world")],
        );
        assert_eq!(entry.joined_msgstr(), "Hello, world");
        assert_eq!(PoEntry::default().joined_msgstr(), "");
    }

    #[test]
    fn test_parse_comments() -> anyhow::Result<()> {
        let document = PoDocument::parse(
            "msgid \"\"\n\
             msgstr \"\"\n\
             \"Language: de\\n\"\n\
             \"Content-Type: text/plain; charset=utf-8\\n\"\n\
             \n\
             # Original text\n\
             #. Shown on the toolbar\n\
             #: src/popup.js:10\n\
             #, fuzzy\n\
             msgctxt \"toolbar\"\n\
             msgid \"Open\"\n\
             msgstr \"\"\n\
             \"Öff\"\n\
             \"nen\"\n",
        )?;

        assert_eq!(document.charset, "utf-8");
        assert_eq!(
            document.headers.get("Language").map(String::as_str),
            Some("de")
        );
        let entries = document.entries_in("toolbar").collect::<Vec<_>>();
        assert_eq!(entries.len(), 1);
        let entry = entries[0];
        assert_eq!(entry.msgid, "Open");
        assert_eq!(entry.joined_msgstr(), "Öffnen");
        assert_eq!(
            entry.comments.translator.as_deref(),
            Some("Original text")
        );
        assert_eq!(
            entry.comments.extracted.as_deref(),
            Some("Shown on the toolbar")
        );
        assert_eq!(entry.comments.reference.as_deref(), Some("src/popup.js:10"));
        assert_eq!(entry.comments.flag.as_deref(), Some("fuzzy"));
        Ok(())
    }

    #[test]
    fn test_parse_invalid() {
        assert!(PoDocument::parse("msgid \"foo\"\nmsgstr \"bar\"\nnot a keyword\n").is_err());
    }

    #[test]
    fn test_header_entry_is_not_written_twice() -> anyhow::Result<()> {
        let mut document = PoDocument::new("fr");
        document.insert(create_entry(None, "", "Language: fr\n"));
        document.insert(create_entry(None, "foo", "FOO"));

        let text = document.to_string();
        assert_eq!(text.matches("msgid \"\"").count(), 1);

        let parsed = PoDocument::parse(&text)?;
        let msgids = parsed
            .entries()
            .map(|entry| entry.msgid.as_str())
            .collect::<Vec<_>>();
        assert_eq!(msgids, vec!["foo"]);
        Ok(())
    }

    #[test]
    fn test_write_then_parse() -> anyhow::Result<()> {
        let mut document = PoDocument::new("ja");
        let mut entry = create_entry(Some("key1"), "Hello", "こんにちは");
        entry.comments.translator = Some(String::from("Greeting"));
        entry.comments.extracted = Some(String::from("Shown at startup"));
        document.insert(entry.clone());

        let parsed = PoDocument::parse(&document.to_string())?;
        assert_eq!(
            parsed.headers.get("Language").map(String::as_str),
            Some("ja")
        );
        assert_eq!(parsed.entries().collect::<Vec<_>>(), vec![&entry]);
        Ok(())
    }

    #[test]
    fn test_is_header() {
        assert!(create_entry(None, "", "Language: en\n").is_header());
        assert!(create_entry(Some(""), "", "").is_header());
        assert!(!create_entry(Some("key1"), "", "").is_header());
        assert!(!create_entry(None, "foo", "").is_header());
    }

    #[test]
    fn test_write_entry_fields() {
        let mut document = PoDocument::new("de");
        let mut entry = create_entry(Some("key1"), "Say \"hi\"\n", "first\nsecond ");
        entry.comments.translator = Some(String::from("Hallo\n\nSalut"));
        document.insert(entry);

        let text = document.to_string();
        assert!(text.ends_with(
            "\n# Hallo\n\
             #\n\
             # Salut\n\
             msgctxt \"key1\"\n\
             msgid \"Say \\\"hi\\\"\\n\"\n\
             msgstr \"\"\n\
             \"first\\n\"\n\
             \"second \"\n"
        ));
    }

    #[test]
    fn test_write_then_parse_keeps_whitespace() -> anyhow::Result<()> {
        let long_line = format!("{}   ", "word ".repeat(20));
        let mut document = PoDocument::new("de");
        for (msgid, msgstr) in [
            ("space", "trailing space "),
            ("newline", "line\n"),
            ("newlines", "\nleading newline\n\ntrailing\n"),
            ("long", long_line.as_str()),
            ("tab", "\tindented\t"),
        ] {
            document.insert(create_entry(None, msgid, msgstr));
        }

        let parsed = PoDocument::parse(&document.to_string())?;
        assert_eq!(
            parsed.entries().collect::<Vec<_>>(),
            document.entries().collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn test_to_string_is_deterministic() {
        let mut document = PoDocument::new("en");
        document.insert(create_entry(None, "b", "B"));
        document.insert(create_entry(None, "a", "A"));
        assert_eq!(document.to_string(), document.clone().to_string());
        let text = document.to_string();
        let b = text.find("msgid \"b\"").unwrap();
        let a = text.find("msgid \"a\"").unwrap();
        assert!(b < a);
    }
}
