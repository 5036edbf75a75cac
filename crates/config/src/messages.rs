//! Message catalog
//!
//! Translations are read from gettext `.po` files:
//! ```text
//! msgid "Goblin Warrens"
//! msgstr "Koboldbau"
//! ```
//! Multi-line strings continue with bare quoted lines. Entries with an
//! empty `msgstr` are untranslated and fall back to the `msgid`.

use crate::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    None,
    Id,
    Str,
}

impl MessageCatalog {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let catalog = Self::parse(&content);
        tracing::debug!(
            "Loaded {} messages from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    pub fn parse(content: &str) -> Self {
        let mut catalog = Self::default();
        let mut id = String::new();
        let mut text = String::new();
        let mut field = Field::None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix("msgid ") {
                catalog.insert(&id, &text);
                id = unquote(rest);
                text.clear();
                field = Field::Id;
            } else if let Some(rest) = line.strip_prefix("msgstr ") {
                text = unquote(rest);
                field = Field::Str;
            } else if line.starts_with('"') {
                match field {
                    Field::Id => id.push_str(&unquote(line)),
                    Field::Str => text.push_str(&unquote(line)),
                    Field::None => {}
                }
            }
        }
        catalog.insert(&id, &text);

        catalog
    }

    fn insert(&mut self, id: &str, text: &str) {
        if !id.is_empty() && !text.is_empty() {
            self.messages.insert(id.to_string(), text.to_string());
        }
    }

    /// Translate `id`, falling back to `id` itself
    pub fn get(&self, id: &str) -> String {
        self.messages
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    let inner = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let po = r#"
# German
msgid ""
msgstr "Content-Type: text/plain; charset=UTF-8\n"

msgid "Goblin Warrens"
msgstr "Koboldbau"

msgid "Untranslated"
msgstr ""

msgid "Long "
"title"
msgstr "Langer "
"Titel \"zwei\""
"#;
        let catalog = MessageCatalog::parse(po);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Goblin Warrens"), "Koboldbau");
        assert_eq!(catalog.get("Long title"), "Langer Titel \"zwei\"");
        assert_eq!(catalog.get("Untranslated"), "Untranslated");
        assert_eq!(catalog.get("Missing"), "Missing");
    }
}
