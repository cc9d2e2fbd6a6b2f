//! Open-tag stack.
//!
//! Records which allow-listed tags are open at the current position so a
//! chunk boundary can close them (innermost first) and the next chunk can
//! reopen them (outermost first, attributes included).

use crate::token::Token;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagEntry<'a> {
    /// Canonical lowercase name, used for the synthetic close.
    pub name: &'static str,
    /// The opening tag exactly as written, e.g. `<a href="https://e.x">`.
    pub open: &'a str,
}

impl TagEntry<'_> {
    /// Length of `</name>` in chars.
    #[inline]
    fn close_len(&self) -> usize {
        self.name.len() + 3
    }
}

/// Vector-backed tag stack with cached sequence lengths.
#[derive(Clone, Debug, Default)]
pub struct TagStack<'a> {
    entries: Vec<TagEntry<'a>>,
    closing_len: usize,
    opening_len: usize,
}

impl<'a> TagStack<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[TagEntry<'a>] {
        &self.entries
    }

    /// Innermost open tag.
    pub fn last(&self) -> Option<&TagEntry<'a>> {
        self.entries.last()
    }

    pub fn push(&mut self, name: &'static str, open: &'a str) {
        let entry = TagEntry { name, open };
        self.closing_len += entry.close_len();
        self.opening_len += open.chars().count();
        self.entries.push(entry);
    }

    /// Remove the most recent entry named `name`. Unmatched closes are ignored.
    pub fn pop(&mut self, name: &str) -> Option<TagEntry<'a>> {
        let idx = self.entries.iter().rposition(|e| e.name == name)?;
        let entry = self.entries.remove(idx);
        self.closing_len -= entry.close_len();
        self.opening_len -= entry.open.chars().count();
        Some(entry)
    }

    /// Apply the push/pop a token implies. Text, void and non-allowed tags
    /// leave the stack alone.
    pub fn apply(&mut self, token: &Token<'a>) {
        match *token {
            Token::Open { raw, .. } => {
                if let Some(name) = token.canonical() {
                    self.push(name, raw);
                }
            }
            Token::Close { .. } => {
                if let Some(name) = token.canonical() {
                    self.pop(name);
                }
            }
            Token::Void(_) | Token::Text(_) => {}
        }
    }

    /// `</x>` for every entry, innermost first.
    pub fn closing_sequence(&self) -> String {
        let mut out = String::with_capacity(self.closing_len);
        for entry in self.entries.iter().rev() {
            out.push_str("</");
            out.push_str(entry.name);
            out.push('>');
        }
        out
    }

    /// Every original opening tag, outermost first.
    pub fn opening_sequence(&self) -> String {
        self.entries.iter().map(|e| e.open).collect()
    }

    /// Char length of [`closing_sequence`](Self::closing_sequence).
    #[inline]
    pub fn closing_len(&self) -> usize {
        self.closing_len
    }

    /// Char length of [`opening_sequence`](Self::opening_sequence).
    #[inline]
    pub fn opening_len(&self) -> usize {
        self.opening_len
    }

    /// Closing-sequence length the stack would have after applying `token`.
    pub fn closing_len_after(&self, token: &Token<'_>) -> usize {
        let Some(name) = token.canonical() else {
            return self.closing_len;
        };
        match token {
            Token::Open { .. } => self.closing_len + name.len() + 3,
            Token::Close { .. } if self.entries.iter().any(|e| e.name == name) => {
                self.closing_len - (name.len() + 3)
            }
            _ => self.closing_len,
        }
    }
}
