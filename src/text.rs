//! Cut-point selection inside a text run.
//!
//! Priority: whole run, last newline, last whitespace, deferral of a long word
//! into the next chunk, hard cut. A cut never lands inside a character entity
//! (`&amp;`, `&#8212;`) or inside a UTF-8 sequence.

use memchr::{memchr, memrchr};

/// Longest entity body we recognise (`&CounterClockwiseContourIntegral;`).
const MAX_ENTITY_LEN: usize = 32;

/// What to do with a text run given the space left in the current chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cut {
    /// The run fits; take all of it.
    Whole,
    /// Take `text[..n]` (bytes), close the chunk, continue with the rest.
    At(usize),
    /// Take nothing; close the chunk and retry in a fresh one.
    Defer,
}

/// Choose where to cut `text` when `available` chars are left (may be ≤ 0).
///
/// `occupied` tells whether the current chunk holds anything beyond its
/// leading opening tags; only then may a long word be deferred. When it does not and
/// nothing fits at all, the first atomic unit (one char, or one whole entity)
/// is taken anyway so the caller always makes progress.
pub fn find_cut(text: &str, available: isize, min_chunk_size: usize, occupied: bool) -> Cut {
    let avail = available.max(0) as usize;
    let window_end = byte_offset(text, avail);
    if window_end == text.len() {
        return Cut::Whole;
    }
    let window = &text[..window_end];

    let soft = memrchr(b'\n', window.as_bytes())
        .map(|i| i + 1)
        .or_else(|| last_whitespace_end(window));
    if let Some(cut) = soft {
        let cut = protect_entity(text, cut);
        if cut > 0 {
            return Cut::At(cut);
        }
    }

    // one long word and only a sliver of room: move it whole
    if occupied && avail < min_chunk_size {
        return Cut::Defer;
    }

    match protect_entity(text, window_end) {
        0 if occupied => Cut::Defer,
        0 => Cut::At(atomic_prefix_end(text)),
        cut => Cut::At(cut),
    }
}

/// Drop the whitespace a cut leaves at the front of the next chunk's text.
#[inline]
pub fn trim_remainder(rest: &str) -> &str {
    rest.trim_start()
}

/// Byte offset of the `chars`-th char, or `text.len()` if there are fewer.
#[inline]
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| i)
}

fn last_whitespace_end(window: &str) -> Option<usize> {
    window
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
}

#[inline]
fn is_entity_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'#'
}

/// Move `cut` back to before an `&` if it would split `&name;`. Only a
/// complete reference counts; a bare `&` is text.
fn protect_entity(text: &str, cut: usize) -> usize {
    let Some(amp) = memrchr(b'&', &text.as_bytes()[..cut]) else {
        return cut;
    };
    let body = &text.as_bytes()[amp + 1..cut];
    if body.len() > MAX_ENTITY_LEN || !body.iter().copied().all(is_entity_byte) {
        return cut;
    }
    let tail = &text.as_bytes()[cut..];
    let more = tail.iter().take_while(|&&b| is_entity_byte(b)).count();
    if body.len() + more > 0 && body.len() + more <= MAX_ENTITY_LEN && tail.get(more) == Some(&b';')
    {
        amp
    } else {
        cut
    }
}

/// End of the smallest piece that may stand alone at the front of `text`.
fn atomic_prefix_end(text: &str) -> usize {
    let bytes = text.as_bytes();
    if bytes.first() == Some(&b'&') {
        let limit = bytes.len().min(MAX_ENTITY_LEN + 2);
        if let Some(semi) = memchr(b';', &bytes[1..limit]) {
            if semi > 0 && bytes[1..1 + semi].iter().copied().all(is_entity_byte) {
                return semi + 2;
            }
        }
    }
    text.chars().next().map_or(0, char::len_utf8)
}
