//! `OPERAND <group> <mnemonic> <binary>` lines.

use crate::loader::isa::lexer::{SourceLine, split_tokens};
use crate::soc::isa::bits::MAX_ENCODING_BITS;
use crate::soc::isa::diagnostic::DiagnosticKind;
use crate::soc::isa::{InstructionSet, Operand};

use super::DirectiveError;

/// Appends one operand encoding to its group, creating the group on first use.
///
/// The group is created before the literal is checked, so a rejected literal leaves an empty
/// group behind unless `rollback_empty_group` is set.
pub fn parse_operand_line(
    line: &SourceLine,
    set: &mut InstructionSet,
    rollback_empty_group: bool,
) -> Result<(), DirectiveError> {
    let tokens = split_tokens(&line.text);
    if tokens.len() != 4 {
        return Err(DirectiveError::malformed(
            "operand.token-count",
            format!(
                "expected `OPERAND <group> <mnemonic> <binary>`, found {} token(s)",
                tokens.len()
            ),
            0,
        ));
    }
    let (group, mnemonic, literal) = (tokens[1], tokens[2], tokens[3]);

    let (id, created) = set.ensure_group(group.text);
    match parse_binary_literal(literal.text) {
        Ok((value, width)) => {
            set.push_operand(id, Operand::new(mnemonic.text, value, width));
            Ok(())
        }
        Err(err) => {
            if created && rollback_empty_group {
                set.discard_last_group(id);
            }
            Err(err.relative_to(literal.offset))
        }
    }
}

/// Parses a base-2 literal, returning its value and its width in digits.
pub fn parse_binary_literal(text: &str) -> Result<(u64, u32), DirectiveError> {
    if text.is_empty() {
        return Err(DirectiveError::new(
            DiagnosticKind::InvalidLiteral,
            "operand.empty-literal",
            "binary literal is empty",
            0,
        ));
    }
    if let Some((offset, ch)) = text.char_indices().find(|(_, ch)| !matches!(ch, '0' | '1')) {
        return Err(DirectiveError::new(
            DiagnosticKind::InvalidLiteral,
            "operand.invalid-literal",
            format!("'{ch}' is not a binary digit in literal '{text}'"),
            offset,
        ));
    }
    if text.len() > MAX_ENCODING_BITS as usize {
        return Err(DirectiveError::new(
            DiagnosticKind::InvalidLiteral,
            "operand.literal-too-wide",
            format!(
                "binary literal '{text}' has {} digits, limit is {MAX_ENCODING_BITS}",
                text.len()
            ),
            0,
        ));
    }
    let value = text.bytes().fold(0u64, |acc, digit| (acc << 1) | u64::from(digit - b'0'));
    Ok((value, text.len() as u32))
}
