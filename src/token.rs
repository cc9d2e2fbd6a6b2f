//! Markup tokenizer.
//!
//! Splits a string on `<...>` boundaries into tags and text runs. A `<` that
//! does not start a tag (no closing `>` ahead, or `<>`) stays inside the text
//! run. No nesting checks happen here; the token stream is a lossless
//! partition of the input, so concatenating every `raw()` gives the source
//! back.

use memchr::memchr;

use crate::tags::{canonical_name, find_tag_end, is_void, parse_tag_info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<name ...>`
    Open { raw: &'a str, name: &'a str },
    /// `</name>`
    Close { raw: &'a str, name: &'a str },
    /// `<br>`, `<x/>`, comments and other nameless tags.
    Void(&'a str),
    Text(&'a str),
}

impl<'a> Token<'a> {
    /// Exact slice of the input this token covers.
    pub fn raw(&self) -> &'a str {
        match *self {
            Token::Open { raw, .. } | Token::Close { raw, .. } => raw,
            Token::Void(raw) | Token::Text(raw) => raw,
        }
    }

    pub fn is_tag(&self) -> bool {
        !matches!(self, Token::Text(_))
    }

    /// Canonical allow-listed name, if this tag takes part in nesting.
    pub fn canonical(&self) -> Option<&'static str> {
        match *self {
            Token::Open { name, .. } | Token::Close { name, .. } => canonical_name(name),
            Token::Void(_) | Token::Text(_) => None,
        }
    }

    fn classify(raw: &'a str) -> Self {
        let info = parse_tag_info(raw);
        if info.is_end {
            Token::Close {
                raw,
                name: info.name,
            }
        } else if info.self_closing || info.name.is_empty() || is_void(info.name) {
            Token::Void(raw)
        } else {
            Token::Open {
                raw,
                name: info.name,
            }
        }
    }
}

/// Single-pass, allocation-free tokenizer over a markup string.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    // Set once a scan finds no '>' left in the input; every later '<' is text.
    exhausted: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            exhausted: false,
        }
    }

    /// Yield each token together with its byte offset in the source.
    pub fn with_offsets(self) -> WithOffsets<'a> {
        WithOffsets(self)
    }

    fn tag_at(&mut self, i: usize) -> Option<usize> {
        let bytes = self.src.as_bytes();
        if self.exhausted || bytes[i] != b'<' {
            return None;
        }
        let end = find_tag_end(bytes, i);
        if end.is_none() && bytes.get(i + 1) != Some(&b'>') {
            self.exhausted = true;
        }
        end
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let start = self.pos;
        let len = self.src.len();
        if start >= len {
            return None;
        }

        if let Some(end) = self.tag_at(start) {
            self.pos = end + 1;
            return Some(Token::classify(&self.src[start..=end]));
        }

        // Text run: up to the next '<' that really opens a tag.
        let bytes = self.src.as_bytes();
        let mut scan = start + 1;
        let end = loop {
            if self.exhausted || scan >= len {
                break len;
            }
            let Some(off) = memchr(b'<', &bytes[scan..]) else {
                break len;
            };
            let lt = scan + off;
            if self.tag_at(lt).is_some() {
                break lt;
            }
            scan = lt + 1;
        };
        self.pos = end;
        Some(Token::Text(&self.src[start..end]))
    }
}

/// Iterator returned by [`Tokenizer::with_offsets`].
#[derive(Clone, Debug)]
pub struct WithOffsets<'a>(Tokenizer<'a>);

impl<'a> Iterator for WithOffsets<'a> {
    type Item = (usize, Token<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.0.pos;
        self.0.next().map(|token| (offset, token))
    }
}
