//! Placeholder table built from an instruction's match pattern and filled in while its bit
//! pattern is laid out.

use std::iter::Peekable;
use std::str::CharIndices;

use smallvec::SmallVec;

use crate::soc::isa::bits::MAX_ENCODING_BITS;
use crate::soc::isa::diagnostic::DiagnosticKind;
use crate::soc::isa::{GroupId, Immediate, InstructionOperand, InstructionSet};

use super::DirectiveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PlaceholderKind {
    Operand(GroupId),
    Immediate,
}

impl PlaceholderKind {
    fn namespace(self) -> Namespace {
        match self {
            PlaceholderKind::Operand(_) => Namespace::Operand,
            PlaceholderKind::Immediate => Namespace::Immediate,
        }
    }
}

/// Operand and immediate keys are looked up independently of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Namespace {
    Operand,
    Immediate,
}

impl Namespace {
    fn sigil(self) -> char {
        match self {
            Namespace::Operand => '@',
            Namespace::Immediate => '%',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Placeholder {
    pub kind: PlaceholderKind,
    pub key: char,
    pub width: u32,
    /// Unset until the bit pattern places the key.
    pub shift: Option<u32>,
    offset: usize,
}

/// Key -> kind/width map produced by the match-pattern scan, in declaration order.
#[derive(Debug, Default)]
pub(super) struct PlaceholderTable {
    entries: SmallVec<[Placeholder; 6]>,
}

pub(super) type Layout = (SmallVec<[InstructionOperand; 4]>, SmallVec<[Immediate; 2]>);

impl PlaceholderTable {
    /// Collects every `@<key><group>` and `%<key><width>` of `pattern`; other characters are
    /// literal text. Group widths are resolved here, so groups must already be defined.
    pub fn scan(pattern: &str, set: &InstructionSet) -> Result<Self, DirectiveError> {
        let mut table = Self::default();
        let mut chars = pattern.char_indices().peekable();
        while let Some((offset, ch)) = chars.next() {
            let (kind, key, width) = match ch {
                '@' => {
                    let key = expect_key(&mut chars, ch, offset)?;
                    let (name, name_offset) = expect_bracketed(&mut chars, pattern, key, offset)?;
                    let (group, width) = resolve_group(set, name, name_offset)?;
                    (PlaceholderKind::Operand(group), key, width)
                }
                '%' => {
                    let key = expect_key(&mut chars, ch, offset)?;
                    let (digits, digits_offset) =
                        expect_bracketed(&mut chars, pattern, key, offset)?;
                    let width = parse_immediate_width(digits, digits_offset)?;
                    (PlaceholderKind::Immediate, key, width)
                }
                _ => continue,
            };
            table.declare(Placeholder {
                kind,
                key,
                width,
                shift: None,
                offset,
            })?;
        }
        Ok(table)
    }

    fn declare(&mut self, placeholder: Placeholder) -> Result<(), DirectiveError> {
        let namespace = placeholder.kind.namespace();
        if self.find_mut(namespace, placeholder.key).is_some() {
            return Err(DirectiveError::new(
                DiagnosticKind::UnresolvedPlaceholder,
                "instruction.duplicate-key",
                format!(
                    "key '{}{}' is declared more than once in the match pattern",
                    namespace.sigil(),
                    placeholder.key
                ),
                placeholder.offset,
            ));
        }
        self.entries.push(placeholder);
        Ok(())
    }

    fn find_mut(&mut self, namespace: Namespace, key: char) -> Option<&mut Placeholder> {
        self.entries
            .iter_mut()
            .find(|entry| entry.key == key && entry.kind.namespace() == namespace)
    }

    /// Records that `key` starts at bit index `shift` and returns its width.
    pub fn place(
        &mut self,
        namespace: Namespace,
        key: char,
        shift: u32,
        offset: usize,
    ) -> Result<u32, DirectiveError> {
        let sigil = namespace.sigil();
        let Some(entry) = self.find_mut(namespace, key) else {
            let code = match namespace {
                Namespace::Operand => "instruction.unknown-operand-key",
                Namespace::Immediate => "instruction.unknown-immediate-key",
            };
            return Err(DirectiveError::new(
                DiagnosticKind::UnresolvedPlaceholder,
                code,
                format!(
                    "bit pattern references '{sigil}{key}' which the match pattern never declares"
                ),
                offset,
            ));
        };
        if entry.shift.is_some() {
            return Err(DirectiveError::new(
                DiagnosticKind::UnresolvedPlaceholder,
                "instruction.duplicate-placement",
                format!("'{sigil}{key}' appears more than once in the bit pattern"),
                offset,
            ));
        }
        entry.shift = Some(shift);
        Ok(entry.width)
    }

    /// Splits the table into operand and immediate layouts once every key has been placed.
    pub fn finish(self) -> Result<Layout, DirectiveError> {
        let mut operands = SmallVec::new();
        let mut immediates = SmallVec::new();
        for entry in self.entries {
            let Some(shift) = entry.shift else {
                return Err(DirectiveError::new(
                    DiagnosticKind::UnresolvedPlaceholder,
                    "instruction.unplaced-key",
                    format!(
                        "'{}{}' is declared in the match pattern but missing from the bit pattern",
                        entry.kind.namespace().sigil(),
                        entry.key
                    ),
                    entry.offset,
                ));
            };
            match entry.kind {
                PlaceholderKind::Operand(group) => operands.push(InstructionOperand {
                    key: entry.key,
                    group,
                    width: entry.width,
                    shift,
                }),
                PlaceholderKind::Immediate => immediates.push(Immediate {
                    key: entry.key,
                    width: entry.width,
                    shift,
                }),
            }
        }
        Ok((operands, immediates))
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[Placeholder] {
        &self.entries
    }
}

fn expect_key(
    chars: &mut Peekable<CharIndices<'_>>,
    sigil: char,
    offset: usize,
) -> Result<char, DirectiveError> {
    chars.next().map(|(_, key)| key).ok_or_else(|| {
        DirectiveError::malformed(
            "instruction.missing-key",
            format!("'{sigil}' must be followed by a one-character key"),
            offset,
        )
    })
}

/// Reads `<...>` right after a key and returns the enclosed text with its offset.
fn expect_bracketed<'a>(
    chars: &mut Peekable<CharIndices<'_>>,
    pattern: &'a str,
    key: char,
    offset: usize,
) -> Result<(&'a str, usize), DirectiveError> {
    if !matches!(chars.next(), Some((_, '<'))) {
        return Err(DirectiveError::malformed(
            "instruction.missing-bracket",
            format!("placeholder key '{key}' must be followed by '<'"),
            offset,
        ));
    }
    let start = chars.peek().map(|(index, _)| *index).unwrap_or(pattern.len());
    for (index, ch) in chars.by_ref() {
        if ch == '>' {
            let inner = &pattern[start..index];
            if inner.is_empty() {
                return Err(DirectiveError::malformed(
                    "instruction.empty-placeholder",
                    format!("placeholder '{key}' has nothing between '<' and '>'"),
                    start,
                ));
            }
            return Ok((inner, start));
        }
    }
    Err(DirectiveError::malformed(
        "instruction.unterminated-placeholder",
        format!("placeholder '{key}' is missing its closing '>'"),
        offset,
    ))
}

fn resolve_group(
    set: &InstructionSet,
    name: &str,
    offset: usize,
) -> Result<(GroupId, u32), DirectiveError> {
    let Some(id) = set.group_id(name) else {
        return Err(DirectiveError::new(
            DiagnosticKind::UnresolvedGroup,
            "instruction.unknown-group",
            format!("operand group '{name}' is not defined"),
            offset,
        ));
    };
    let Some(width) = set.group(id).width() else {
        return Err(DirectiveError::new(
            DiagnosticKind::UnresolvedGroup,
            "instruction.empty-group",
            format!("operand group '{name}' has no operands to take a width from"),
            offset,
        ));
    };
    Ok((id, width))
}

fn parse_immediate_width(digits: &str, offset: usize) -> Result<u32, DirectiveError> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DirectiveError::malformed(
            "instruction.immediate-width",
            format!("immediate width '{digits}' is not a positive decimal number"),
            offset,
        ));
    }
    match digits.parse::<u32>() {
        Ok(0) => Err(DirectiveError::malformed(
            "instruction.immediate-width",
            "immediate width must be at least 1",
            offset,
        )),
        Ok(width) if width <= MAX_ENCODING_BITS => Ok(width),
        // All digits, so a parse failure can only mean the value overflowed.
        _ => Err(DirectiveError::new(
            DiagnosticKind::WidthOverflow,
            "instruction.immediate-too-wide",
            format!("immediate width {digits} exceeds {MAX_ENCODING_BITS} bits"),
            offset,
        )),
    }
}
