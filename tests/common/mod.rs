//! Helpers shared by the integration tests.

#![allow(dead_code)]

use tagsplit::{normalize_markup, TagStack, Token, Tokenizer};

/// Text runs only, tags removed.
pub fn text_content(markup: &str) -> String {
    Tokenizer::new(markup)
        .filter_map(|t| match t {
            Token::Text(text) => Some(text),
            _ => None,
        })
        .collect()
}

/// Text with every whitespace char removed, for comparisons that must not
/// care about whitespace dropped at chunk boundaries.
pub fn dense_text(markup: &str) -> String {
    text_content(markup)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Every allow-listed tag opened in `chunk` is closed in it, in nesting order.
pub fn is_well_formed(chunk: &str) -> bool {
    let mut open: Vec<&'static str> = Vec::new();
    for token in Tokenizer::new(chunk) {
        match token {
            Token::Open { .. } => {
                if let Some(name) = token.canonical() {
                    open.push(name);
                }
            }
            Token::Close { .. } => {
                if let Some(name) = token.canonical() {
                    if open.pop() != Some(name) {
                        return false;
                    }
                }
            }
            _ => {}
        }
    }
    open.is_empty()
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Smallest unit that must survive a split: a tag as written, or one
/// non-whitespace char of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Atom<'a> {
    Tag(Token<'a>),
    Char(char),
}

impl Atom<'_> {
    fn matches(&self, other: &Atom<'_>) -> bool {
        match (self, other) {
            (Atom::Char(a), Atom::Char(b)) => a == b,
            // a synthetic close is spelled canonically, the source one may not be
            (Atom::Tag(a @ Token::Close { .. }), Atom::Tag(b @ Token::Close { .. }))
                if a.canonical().is_some() =>
            {
                a.canonical() == b.canonical()
            }
            (Atom::Tag(a), Atom::Tag(b)) => a.raw() == b.raw(),
            _ => false,
        }
    }
}

pub fn atoms(markup: &str) -> Vec<Atom<'_>> {
    let mut out = Vec::new();
    for token in Tokenizer::new(markup) {
        match token {
            Token::Text(text) => out.extend(
                text.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(Atom::Char),
            ),
            tag => out.push(Atom::Tag(tag)),
        }
    }
    out
}

/// Walk `chunks` against the normalized `source`. Each chunk must be the
/// reopened tags of the source position it starts at, then source atoms in
/// order, then the closes of the tags still open there. Returns how many
/// source atoms each chunk carries, or where the first mismatch is.
pub fn source_atoms_per_chunk(source: &str, chunks: &[String]) -> Result<Vec<usize>, String> {
    let normalized = normalize_markup(source);
    let src = atoms(&normalized);
    let mut pos = 0;
    let mut stack = TagStack::new();
    let mut counts = Vec::with_capacity(chunks.len());

    for (k, chunk) in chunks.iter().enumerate() {
        let out = atoms(chunk);
        let mut i = 0;

        for entry in stack.entries() {
            match out.get(i) {
                Some(Atom::Tag(t)) if t.raw() == entry.open => i += 1,
                other => {
                    return Err(format!(
                        "chunk {k} {chunk:?}: expected reopened {:?}, found {other:?}",
                        entry.open
                    ))
                }
            }
        }

        let mut taken = 0;
        while i < out.len() && pos < src.len() && out[i].matches(&src[pos]) {
            if let Atom::Tag(tag) = src[pos] {
                stack.apply(&tag);
            }
            i += 1;
            pos += 1;
            taken += 1;
        }

        let mut tail = String::new();
        for atom in &out[i..] {
            match atom {
                Atom::Tag(t) => tail.push_str(t.raw()),
                Atom::Char(c) => {
                    return Err(format!("chunk {k} {chunk:?}: unexpected text {c:?}"));
                }
            }
        }
        if tail != stack.closing_sequence() {
            return Err(format!(
                "chunk {k} {chunk:?}: ends with {tail:?}, expected {:?}",
                stack.closing_sequence()
            ));
        }
        counts.push(taken);
    }

    if pos != src.len() {
        return Err(format!("source atoms lost from {:?} on", &src[pos..]));
    }
    Ok(counts)
}
