//! Directive parsers that fold one definition line at a time into an
//! [`InstructionSet`](crate::soc::isa::InstructionSet).

mod directives;
mod instruction;
mod operand;
mod placeholder;

pub use directives::{Directive, parse_directive};
pub use instruction::parse_instruction_line;
pub use operand::{parse_binary_literal, parse_operand_line};

use crate::soc::isa::diagnostic::DiagnosticKind;

/// Why a single line was rejected. `offset` is a byte offset into the trimmed line text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveError {
    pub kind: DiagnosticKind,
    pub code: &'static str,
    pub message: String,
    pub offset: usize,
}

impl DirectiveError {
    pub fn new(
        kind: DiagnosticKind,
        code: &'static str,
        message: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn malformed(code: &'static str, message: impl Into<String>, offset: usize) -> Self {
        Self::new(DiagnosticKind::MalformedDirective, code, message, offset)
    }

    /// Shifts the offset when the error was produced against a slice of the line.
    pub(crate) fn relative_to(mut self, base: usize) -> Self {
        self.offset += base;
        self
    }
}
