//! Chunk emitter.
//!
//! Consumes tokens in order and packs them into chunks. A chunk that is
//! closed early gets the closing sequence of the open tags appended, and the
//! next chunk starts with their opening sequence (the "skeleton").
//!
//! At every step `buffer_len + stack.closing_len() <= max_chars`, unless one
//! atomic token (a tag, an entity, a single char with no room at all) is
//! bigger than the limit by itself.
//!
//! Every source token ends up in exactly one chunk. Only the reopened tags
//! and the closes appended at a cut are synthetic; a chunk made of nothing
//! else is never emitted.

use tracing::{debug, trace};

use crate::config::SplitConfig;
use crate::stack::TagStack;
use crate::text::{find_cut, trim_remainder, Cut};
use crate::token::Token;

#[derive(Debug)]
pub(crate) struct SplitState<'a> {
    max_chars: usize,
    min_chunk_size: usize,
    buffer: String,
    /// `buffer` length in chars.
    buffer_len: usize,
    /// Length of the reopened tags the buffer was seeded with.
    reopened_len: usize,
    /// Length of the leading run of opening tags: the reopened ones plus any
    /// source opens pushed before anything else.
    skeleton_len: usize,
    /// Nothing has been pushed since the last cut.
    at_boundary: bool,
    stack: TagStack<'a>,
    chunks: Vec<String>,
}

impl<'a> SplitState<'a> {
    pub(crate) fn new(config: &SplitConfig) -> Self {
        Self {
            max_chars: config.max_chars,
            min_chunk_size: config.min_chunk_size,
            buffer: String::new(),
            buffer_len: 0,
            reopened_len: 0,
            skeleton_len: 0,
            at_boundary: false,
            stack: TagStack::new(),
            chunks: Vec::new(),
        }
    }

    pub(crate) fn feed(&mut self, token: Token<'a>) {
        match token {
            Token::Text(text) => self.feed_text(text),
            tag => self.feed_tag(tag),
        }
    }

    /// Close the last chunk and hand back everything emitted.
    pub(crate) fn finish(mut self) -> Vec<String> {
        self.finalize();
        self.chunks
    }

    fn feed_tag(&mut self, token: Token<'a>) {
        if self.elide_reopened(&token) {
            return;
        }

        let raw = token.raw();
        let raw_len = raw.chars().count();

        let predicted = self.buffer_len + raw_len + self.stack.closing_len_after(&token);
        if predicted > self.max_chars && self.beyond_skeleton() {
            trace!(predicted, max_chars = self.max_chars, tag = raw, "tag starts a new chunk");
            self.finalize();
        }

        let extends_skeleton = matches!(token, Token::Open { .. })
            && token.canonical().is_some()
            && !self.beyond_skeleton();

        self.push(raw);
        self.stack.apply(&token);
        if extends_skeleton {
            self.skeleton_len = self.buffer_len;
        }

        if self.buffer_len + self.stack.closing_len() > self.max_chars {
            debug!(
                len = self.buffer_len + self.stack.closing_len(),
                max_chars = self.max_chars,
                tag = raw,
                "tag does not fit in an empty chunk, emitting oversized"
            );
        }
    }

    /// A close that arrives right after a cut, for the innermost reopened
    /// tag, undoes that reopening instead of producing `<b></b>`. The
    /// previous chunk already closed the tag at the same point in the text.
    fn elide_reopened(&mut self, token: &Token<'a>) -> bool {
        if !matches!(token, Token::Close { .. }) || self.buffer_len != self.reopened_len {
            return false;
        }
        let (Some(name), Some(top)) = (token.canonical(), self.stack.last()) else {
            return false;
        };
        if top.name != name {
            return false;
        }

        let open = top.open;
        debug_assert!(self.buffer.ends_with(open));
        let open_len = open.chars().count();
        self.buffer.truncate(self.buffer.len() - open.len());
        self.buffer_len -= open_len;
        self.reopened_len -= open_len;
        self.skeleton_len -= open_len;
        self.stack.pop(name);
        trace!(tag = name, "reopened tag closed right away, elided");
        true
    }

    fn feed_text(&mut self, mut text: &'a str) {
        if self.at_boundary {
            text = trim_remainder(text);
        }
        while !text.is_empty() {
            let available = self.max_chars as isize
                - self.buffer_len as isize
                - self.stack.closing_len() as isize;

            match find_cut(text, available, self.min_chunk_size, self.beyond_skeleton()) {
                Cut::Whole => {
                    self.push(text);
                    return;
                }
                Cut::At(at) => {
                    let (head, rest) = text.split_at(at);
                    let taken = head.chars().count();
                    if available < taken as isize {
                        debug!(
                            taken,
                            available,
                            max_chars = self.max_chars,
                            "no room left, emitting oversized fragment"
                        );
                    }
                    self.push(head);
                    self.finalize();
                    text = trim_remainder(rest);
                }
                Cut::Defer => {
                    trace!(available, "deferring word to the next chunk");
                    self.finalize();
                    text = trim_remainder(text);
                }
            }
        }
    }

    /// Anything past the leading run of opening tags. Only then may the
    /// chunk be cut, since a cut before that point would just repeat it.
    #[inline]
    fn beyond_skeleton(&self) -> bool {
        self.buffer_len > self.skeleton_len
    }

    fn push(&mut self, s: &str) {
        self.buffer.push_str(s);
        self.buffer_len += s.chars().count();
        self.at_boundary = false;
    }

    /// Emit the current chunk if it holds any source token, then reseed the
    /// buffer with the skeleton of the still-open tags.
    fn finalize(&mut self) {
        if self.buffer_len > self.reopened_len {
            let mut chunk = std::mem::take(&mut self.buffer);
            chunk.push_str(&self.stack.closing_sequence());
            trace!(
                index = self.chunks.len(),
                len = self.buffer_len + self.stack.closing_len(),
                "chunk finalized"
            );
            self.chunks.push(chunk);
        } else if !self.buffer.is_empty() {
            trace!(skeleton = %self.buffer, "dropping reopened tags with nothing inside");
        }

        self.buffer = self.stack.opening_sequence();
        self.buffer_len = self.stack.opening_len();
        self.reopened_len = self.buffer_len;
        self.skeleton_len = self.buffer_len;
        self.at_boundary = true;
    }
}
