//! `INS <match-pattern> <bit-pattern>` lines.
//!
//! The match pattern is scanned first to build a placeholder table; the bit pattern is then
//! walked left to right, accumulating literal bits low-to-high and assigning every placeholder
//! its starting bit index. The accumulator is realigned once the total width is known.

use crate::loader::isa::lexer::{SourceLine, remainder_after, split_tokens};
use crate::soc::isa::bits::{MAX_ENCODING_BITS, realign_msb_first};
use crate::soc::isa::diagnostic::DiagnosticKind;
use crate::soc::isa::{Instruction, InstructionSet};

use super::DirectiveError;
use super::placeholder::{Namespace, PlaceholderTable};

/// Parses one instruction definition and appends it to `set`. On error nothing is appended.
pub fn parse_instruction_line(
    line: &SourceLine,
    set: &mut InstructionSet,
) -> Result<(), DirectiveError> {
    let text = line.text.as_str();
    let tokens = split_tokens(text);
    if tokens.len() <= 2 {
        return Err(DirectiveError::malformed(
            "instruction.token-count",
            format!(
                "expected `INS <match-pattern> <bit-pattern>`, found {} token(s)",
                tokens.len()
            ),
            0,
        ));
    }
    let pattern = tokens[1];
    let mut table = PlaceholderTable::scan(pattern.text, set)
        .map_err(|err| err.relative_to(pattern.offset))?;

    let bits = remainder_after(text, 2);
    let (raw, width) =
        lay_out_bits(bits.text, &mut table).map_err(|err| err.relative_to(bits.offset))?;
    let (operands, immediates) = table.finish().map_err(|err| err.relative_to(pattern.offset))?;

    log::debug!(
        "instruction '{}' laid out as {width} bit(s) with {} operand(s) and {} immediate(s)",
        pattern.text,
        operands.len(),
        immediates.len()
    );
    set.push_instruction(Instruction::new(
        pattern.text,
        operands,
        immediates,
        realign_msb_first(raw, width),
        width,
    ));
    Ok(())
}

/// Walks the bit pattern, returning the raw low-to-high accumulator and the total width.
fn lay_out_bits(bits: &str, table: &mut PlaceholderTable) -> Result<(u64, u32), DirectiveError> {
    let mut raw = 0u64;
    let mut shift = 0u32;
    let mut chars = bits.char_indices();
    while let Some((offset, ch)) = chars.next() {
        let advance = match ch {
            ' ' | '\t' => continue,
            '1' | '0' => {
                if shift >= MAX_ENCODING_BITS {
                    return Err(too_wide(offset));
                }
                if ch == '1' {
                    raw |= 1u64 << shift;
                }
                1
            }
            '@' | '%' => {
                let Some((_, key)) = chars.next() else {
                    return Err(DirectiveError::malformed(
                        "instruction.missing-key",
                        format!("'{ch}' at the end of the bit pattern has no key"),
                        offset,
                    ));
                };
                let namespace = if ch == '@' {
                    Namespace::Operand
                } else {
                    Namespace::Immediate
                };
                table.place(namespace, key, shift, offset)?
            }
            other => {
                return Err(DirectiveError::new(
                    DiagnosticKind::InvalidLiteral,
                    "instruction.invalid-bit",
                    format!("'{other}' is not a bit, '@<key>' or '%<key>'"),
                    offset,
                ));
            }
        };
        shift += advance;
        if shift > MAX_ENCODING_BITS {
            return Err(too_wide(offset));
        }
    }
    Ok((raw, shift))
}

fn too_wide(offset: usize) -> DirectiveError {
    DirectiveError::new(
        DiagnosticKind::WidthOverflow,
        "instruction.too-wide",
        format!("encoding exceeds {MAX_ENCODING_BITS} bits"),
        offset,
    )
}
