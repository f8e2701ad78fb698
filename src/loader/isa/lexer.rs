//! Line source and whitespace tokenizer for definition files.

use smallvec::SmallVec;

/// A logical line: trimmed text plus enough position data to point diagnostics at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based physical line number.
    pub number: usize,
    /// Characters of leading whitespace removed by trimming.
    pub indent: usize,
    pub text: String,
}

impl SourceLine {
    /// Trims `raw` and returns `None` for blank and `#` comment lines.
    pub fn classify(number: usize, raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            return None;
        }
        let indent = raw.len() - raw.trim_start().len();
        Some(Self {
            number,
            indent,
            text: text.to_owned(),
        })
    }

    /// 1-based column of a byte offset inside [`SourceLine::text`].
    pub fn column(&self, offset: usize) -> usize {
        self.indent + offset + 1
    }
}

/// Adapts any sequence of raw lines into numbered [`SourceLine`]s, skipping blanks and
/// comments.
pub struct SourceLines<I> {
    inner: I,
    number: usize,
}

impl<I> SourceLines<I> {
    pub fn new(inner: I) -> Self {
        Self { inner, number: 0 }
    }
}

impl<I, S> Iterator for SourceLines<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = SourceLine;

    fn next(&mut self) -> Option<SourceLine> {
        for raw in self.inner.by_ref() {
            self.number += 1;
            if let Some(line) = SourceLine::classify(self.number, raw.as_ref()) {
                return Some(line);
            }
        }
        None
    }
}

/// A whitespace-delimited word and its byte offset in the line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub offset: usize,
}

pub fn is_separator(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Splits `line` on runs of spaces and tabs.
pub fn split_tokens(line: &str) -> SmallVec<[Token<'_>; 4]> {
    let mut tokens = SmallVec::new();
    let mut start = None;
    for (offset, ch) in line.char_indices() {
        match (is_separator(ch), start) {
            (true, Some(begin)) => {
                tokens.push(Token {
                    text: &line[begin..offset],
                    offset: begin,
                });
                start = None;
            }
            (false, None) => start = Some(offset),
            _ => {}
        }
    }
    if let Some(begin) = start {
        tokens.push(Token {
            text: &line[begin..],
            offset: begin,
        });
    }
    tokens
}

/// Skips `count` tokens, each with the separator run that follows it, and returns whatever is
/// left with surrounding whitespace removed. Interior spacing is preserved.
pub fn remainder_after(line: &str, count: usize) -> Token<'_> {
    let mut offset = line.len() - line.trim_start_matches(is_separator).len();
    for _ in 0..count {
        let rest = &line[offset..];
        let word = rest.find(is_separator).unwrap_or(rest.len());
        offset += word;
        let rest = &line[offset..];
        offset += rest.len() - rest.trim_start_matches(is_separator).len();
    }
    Token {
        text: line[offset..].trim_end_matches(is_separator),
        offset,
    }
}
