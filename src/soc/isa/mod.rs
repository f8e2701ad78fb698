//! In-memory instruction set model.
//!
//! An [`InstructionSet`] owns operand groups (named register-like encodings) and instruction
//! templates whose fixed bits and placeholder layout are resolved at load time, ready for an
//! assembler or disassembler to consume.

pub mod bits;
pub mod diagnostic;
pub mod error;
pub mod instruction;
pub mod operand;
mod set;


pub use bits::{format_binary, reverse64};
pub use diagnostic::{DiagnosticKind, DiagnosticLevel, IsaDiagnostic, SourcePosition, SourceSpan};
pub use error::IsaError;
pub use instruction::{Immediate, Instruction, InstructionOperand};
pub use operand::{GroupId, Operand, OperandGroup};
pub use set::InstructionSet;
