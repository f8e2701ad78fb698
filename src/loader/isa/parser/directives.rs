use crate::loader::isa::lexer::{SourceLine, is_separator, remainder_after};

/// Leading keyword of a definition line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `ARCH <label>`; the label is everything after the keyword.
    Arch(&'a str),
    Operand,
    Instruction,
    Unknown(&'a str),
}

/// Classifies `line` by its first space/tab-delimited word. A keyword with nothing after it is
/// not a directive and comes back as [`Directive::Unknown`].
pub fn parse_directive(line: &SourceLine) -> Directive<'_> {
    let text = line.text.as_str();
    let keyword = text.split(is_separator).next().unwrap_or_default();
    if keyword.len() == text.len() {
        return Directive::Unknown(keyword);
    }
    match keyword {
        "ARCH" => Directive::Arch(remainder_after(text, 1).text),
        "OPERAND" => Directive::Operand,
        "INS" => Directive::Instruction,
        other => Directive::Unknown(other),
    }
}
