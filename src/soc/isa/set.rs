//! Aggregate root owning every operand group and instruction of a loaded definition.

use ahash::AHashMap;

use super::instruction::Instruction;
use super::operand::{GroupId, Operand, OperandGroup};

/// A loaded instruction set. Read-only for consumers once the loader hands it out.
#[derive(Debug, Default)]
pub struct InstructionSet {
    arch: Option<String>,
    operand_groups: Vec<OperandGroup>,
    group_index: AHashMap<String, GroupId>,
    instructions: Vec<Instruction>,
}

impl InstructionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Architecture label from the last `ARCH` directive, if any.
    pub fn arch(&self) -> Option<&str> {
        self.arch.as_deref()
    }

    pub fn operand_groups(&self) -> &[OperandGroup] {
        &self.operand_groups
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Exact, case-sensitive lookup of a group by name.
    pub fn find_operand_group(&self, name: &str) -> Option<&OperandGroup> {
        self.group_id(name).map(|id| self.group(id))
    }

    pub fn group_id(&self, name: &str) -> Option<GroupId> {
        self.group_index.get(name).copied()
    }

    /// Resolves a handle produced by this set.
    pub fn group(&self, id: GroupId) -> &OperandGroup {
        &self.operand_groups[id.index()]
    }

    /// First instruction whose authored match pattern equals `pattern`.
    pub fn find_instruction(&self, pattern: &str) -> Option<&Instruction> {
        self.instructions
            .iter()
            .find(|instruction| instruction.pattern() == pattern)
    }

    /// Tears the set down, dropping every group, operand, instruction and the label at once.
    pub fn release(self) {
        drop(self);
    }

    pub(crate) fn set_arch(&mut self, label: impl Into<String>) {
        self.arch = Some(label.into());
    }

    /// Returns the group called `name`, appending an empty one when it does not exist yet.
    /// The flag reports whether the group was created by this call.
    pub(crate) fn ensure_group(&mut self, name: &str) -> (GroupId, bool) {
        if let Some(id) = self.group_id(name) {
            return (id, false);
        }
        let id = GroupId::from_index(self.operand_groups.len());
        self.operand_groups.push(OperandGroup::new(name));
        self.group_index.insert(name.to_owned(), id);
        (id, true)
    }

    /// Removes the most recently created group. Only valid while it is still empty and
    /// unreferenced, which holds for a group created by the line being rolled back.
    pub(crate) fn discard_last_group(&mut self, id: GroupId) {
        debug_assert_eq!(id.index() + 1, self.operand_groups.len());
        if let Some(group) = self.operand_groups.pop() {
            debug_assert!(group.is_empty());
            self.group_index.remove(group.name());
        }
    }

    pub(crate) fn push_operand(&mut self, id: GroupId, operand: Operand) {
        self.operand_groups[id.index()].push(operand);
    }

    pub(crate) fn push_instruction(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_created_once_and_found_by_name() {
        let mut set = InstructionSet::new();
        let (r, created) = set.ensure_group("R");
        assert!(created);
        set.push_operand(r, Operand::new("r0", 0, 2));
        set.push_operand(r, Operand::new("r1", 1, 2));
        let (again, created) = set.ensure_group("R");
        assert_eq!(again, r);
        assert!(!created, "an existing group must be reused");

        let group = set.find_operand_group("R").expect("group R");
        assert_eq!(group.len(), 2);
        assert!(group.operands().iter().all(|op| op.width == 2));
        assert!(set.find_operand_group("Q").is_none());
        assert!(set.find_operand_group("r").is_none(), "names are case-sensitive");
    }

    #[test]
    fn discarding_last_group_forgets_its_name() {
        let mut set = InstructionSet::new();
        set.ensure_group("A");
        let (b, _) = set.ensure_group("B");
        set.discard_last_group(b);
        assert_eq!(set.operand_groups().len(), 1);
        assert!(set.group_id("B").is_none());
        let (b, created) = set.ensure_group("B");
        assert!(created);
        assert_eq!(b.index(), 1, "handles stay dense after a rollback");
    }

    #[test]
    fn later_arch_label_overwrites_earlier() {
        let mut set = InstructionSet::new();
        assert_eq!(set.arch(), None);
        set.set_arch("first");
        set.set_arch("second");
        assert_eq!(set.arch(), Some("second"));
    }
}
