//! Operand groups: named sets of interchangeable encodings such as register names.

use std::fmt;

/// Dense handle to an [`OperandGroup`] owned by an
/// [`InstructionSet`](crate::soc::isa::InstructionSet).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u32);

impl GroupId {
    pub(crate) fn from_index(index: usize) -> Self {
        assert!(
            index < (u32::MAX as usize),
            "GroupId index exceeded u32::MAX range"
        );
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// One mnemonic-to-bits mapping inside a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub mnemonic: String,
    pub value: u64,
    /// Number of bits the encoding occupies; the length of the literal that defined it.
    pub width: u32,
}

impl Operand {
    pub fn new(mnemonic: impl Into<String>, value: u64, width: u32) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            value,
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandGroup {
    name: String,
    operands: Vec<Operand>,
}

impl OperandGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operands in definition order.
    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    pub fn len(&self) -> usize {
        self.operands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    /// Canonical width of the group: the width of its first operand.
    ///
    /// Later operands are trusted to share it; nothing checks that they do.
    pub fn width(&self) -> Option<u32> {
        self.operands.first().map(|operand| operand.width)
    }

    pub fn find_operand(&self, mnemonic: &str) -> Option<&Operand> {
        self.operands
            .iter()
            .find(|operand| operand.mnemonic == mnemonic)
    }

    pub(crate) fn push(&mut self, operand: Operand) {
        self.operands.push(operand);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_follows_first_operand() {
        let mut group = OperandGroup::new("R");
        assert_eq!(group.width(), None, "an empty group has no canonical width");
        group.push(Operand::new("r0", 0b00, 2));
        group.push(Operand::new("wide", 0b101, 3));
        assert_eq!(group.width(), Some(2));
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn operand_lookup_is_case_sensitive() {
        let mut group = OperandGroup::new("R");
        group.push(Operand::new("r1", 0b01, 2));
        assert_eq!(group.find_operand("r1").map(|op| op.value), Some(1));
        assert!(group.find_operand("R1").is_none());
    }

    #[test]
    fn group_id_round_trips_indices() {
        let id = GroupId::from_index(4);
        assert_eq!(id.index(), 4);
        assert_eq!(id.to_string(), "group#4");
    }
}
