//! Instruction templates: a match pattern plus the bit layout of its encoding.

use smallvec::SmallVec;

use super::bits::{bit_mask, field_mask};
use super::operand::GroupId;

/// Operand placeholder (`@<key><group>`) placed inside an instruction encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionOperand {
    pub key: char,
    /// Non-owning reference into the owning set's group table.
    pub group: GroupId,
    pub width: u32,
    /// Bit index at which the field starts, counted from the first character of the bit
    /// pattern. See [`InstructionOperand::lsb_offset`] for the position in the encoding.
    pub shift: u32,
}

impl InstructionOperand {
    /// Position of the field's least-significant bit in an encoding `encoding_width` bits wide.
    pub fn lsb_offset(&self, encoding_width: u32) -> u32 {
        lsb_offset(encoding_width, self.shift, self.width)
    }

    pub fn mask(&self, encoding_width: u32) -> u64 {
        field_mask(self.width, self.lsb_offset(encoding_width))
    }
}

/// Immediate placeholder (`%<key><width>`) placed inside an instruction encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Immediate {
    pub key: char,
    pub width: u32,
    pub shift: u32,
}

impl Immediate {
    pub fn lsb_offset(&self, encoding_width: u32) -> u32 {
        lsb_offset(encoding_width, self.shift, self.width)
    }

    pub fn mask(&self, encoding_width: u32) -> u64 {
        field_mask(self.width, self.lsb_offset(encoding_width))
    }
}

fn lsb_offset(encoding_width: u32, shift: u32, width: u32) -> u32 {
    encoding_width.saturating_sub(shift + width)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pattern: String,
    operands: SmallVec<[InstructionOperand; 4]>,
    immediates: SmallVec<[Immediate; 2]>,
    value: u64,
    width: u32,
}

impl Instruction {
    pub(crate) fn new(
        pattern: impl Into<String>,
        operands: SmallVec<[InstructionOperand; 4]>,
        immediates: SmallVec<[Immediate; 2]>,
        value: u64,
        width: u32,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            operands,
            immediates,
            value,
            width,
        }
    }

    /// The match pattern exactly as authored, placeholders included.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Operand placeholders in match-pattern order.
    pub fn operands(&self) -> &[InstructionOperand] {
        &self.operands
    }

    /// Immediate placeholders in match-pattern order.
    pub fn immediates(&self) -> &[Immediate] {
        &self.immediates
    }

    /// Fixed bits of the encoding; operand and immediate positions are zero.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Total encoding width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn find_operand(&self, key: char) -> Option<&InstructionOperand> {
        self.operands.iter().find(|operand| operand.key == key)
    }

    pub fn find_immediate(&self, key: char) -> Option<&Immediate> {
        self.immediates.iter().find(|imm| imm.key == key)
    }

    /// Bits owned by literal `0`/`1` characters of the bit pattern.
    pub fn fixed_mask(&self) -> u64 {
        let fields = self
            .operands
            .iter()
            .map(|operand| operand.mask(self.width))
            .chain(self.immediates.iter().map(|imm| imm.mask(self.width)))
            .fold(0, |acc, mask| acc | mask);
        bit_mask(self.width) & !fields
    }
}
