use std::io::Cursor;

use nanasm::soc::isa::{DiagnosticKind, format_binary};
use nanasm::{IsaLoader, LoadOptions};

const TOY8: &str = include_str!("../defs/toy8.isa");

#[test]
fn toy8_definition_loads_cleanly() {
    let loader = IsaLoader::with_options(LoadOptions::DENY_WARNINGS).source_name("toy8.isa");
    let set = loader
        .load_str(TOY8)
        .expect("toy8 loads")
        .into_result()
        .expect("no diagnostics");

    assert_eq!(set.arch(), Some("toy8"));
    assert_eq!(set.operand_groups().len(), 2);
    assert_eq!(set.len(), 7);

    let registers = set.find_operand_group("R").expect("R");
    assert_eq!(registers.width(), Some(2));
    assert_eq!(registers.find_operand("c").map(|op| op.value), Some(0b10));

    let halt = set.find_instruction("halt").expect("halt");
    assert_eq!((halt.width(), halt.value()), (8, 0xFF));
}

#[test]
fn toy8_layouts_match_the_bit_patterns() {
    let set = IsaLoader::new()
        .load_str(TOY8)
        .expect("load")
        .into_result()
        .expect("clean");

    let mov = set.find_instruction("mov@d<R>,@s<R>").expect("mov");
    assert_eq!(mov.width(), 10);
    assert_eq!(format_binary(mov.value(), mov.width()), "0001000000");
    let d = mov.find_operand('d').expect("d");
    let s = mov.find_operand('s').expect("s");
    assert_eq!((d.shift, s.shift), (4, 6));
    assert_eq!((d.lsb_offset(mov.width()), s.lsb_offset(mov.width())), (4, 2));

    let ldi = set.find_instruction("ldi@d<R>,%i<8>").expect("ldi");
    assert_eq!(ldi.width(), 16);
    assert_eq!(ldi.value(), 0b0011_0000_0000_0000);
    let i = ldi.find_immediate('i').expect("i");
    assert_eq!((i.width, i.shift, i.lsb_offset(ldi.width())), (8, 8, 0));
    assert_eq!(ldi.fixed_mask(), 0b1111_0011_0000_0000);

    let jr = set.find_instruction("jr@c<C>,%o<7>").expect("jr");
    assert_eq!(jr.width(), 16);
    assert_eq!(format_binary(jr.value(), jr.width()), "0100000000000000");
    assert_eq!(set.group(jr.operands()[0].group).name(), "C");
}

#[test]
fn reader_and_string_loads_agree() {
    let from_str = IsaLoader::new().load_str(TOY8).expect("str");
    let from_reader = IsaLoader::new().load_reader(Cursor::new(TOY8)).expect("reader");
    assert_eq!(from_str.set.instructions(), from_reader.set.instructions());
    assert_eq!(from_str.set.operand_groups(), from_reader.set.operand_groups());
}

#[test]
fn broken_line_is_skipped_and_next_line_loads() {
    let src = "OPERAND R r0 00\nINS bad@d<R> 10@x\nINS add@d<R> 101@d\n";
    let report = IsaLoader::new().load_str(src).expect("load");
    assert_eq!(report.set.len(), 1);
    assert_eq!(report.set.instructions()[0].pattern(), "add@d<R>");
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(
        report.diagnostics[0].kind,
        DiagnosticKind::UnresolvedPlaceholder
    );
    assert!(report.into_result().is_err());
}
