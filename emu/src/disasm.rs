//! W65C816 disassembler

use crate::cpu::{Mode, OPCODES};

/// Disassembles the instruction at `bank:pc`. `m8`/`x8` give the register
/// widths to assume for immediate operands. Returns the text and the
/// instruction length in bytes.
pub fn disassemble<R>(mut read: R, bank: u8, pc: u16, m8: bool, x8: bool) -> (String, u16)
where
    R: FnMut(u8, u16) -> u8,
{
    let opcode = read(bank, pc);
    let (op, mode, _) = OPCODES[opcode as usize];
    let len = mode.operand_len(m8, x8);
    let mut bytes = [0u8; 3];
    for (i, byte) in bytes.iter_mut().enumerate().take(len as usize) {
        *byte = read(bank, pc.wrapping_add(1 + i as u16));
    }
    let [b0, b1, b2] = bytes;
    let byte = b0;
    let word = u16::from_le_bytes([b0, b1]);
    let next = pc.wrapping_add(1 + len);

    let operand = match mode {
        Mode::Implied => String::new(),
        Mode::Accumulator => "A".to_string(),
        Mode::Immediate | Mode::ImmediateIndex if len == 2 => format!("#${word:04X}"),
        Mode::Immediate | Mode::ImmediateIndex | Mode::ImmediateByte => format!("#${byte:02X}"),
        Mode::ImmediateWord => format!("#${word:04X}"),
        Mode::Direct => format!("${byte:02X}"),
        Mode::DirectX => format!("${byte:02X},X"),
        Mode::DirectY => format!("${byte:02X},Y"),
        Mode::DirectIndirect => format!("(${byte:02X})"),
        Mode::DirectIndirectX => format!("(${byte:02X},X)"),
        Mode::DirectIndirectY => format!("(${byte:02X}),Y"),
        Mode::DirectIndirectLong => format!("[${byte:02X}]"),
        Mode::DirectIndirectLongY => format!("[${byte:02X}],Y"),
        Mode::Absolute => format!("${word:04X}"),
        Mode::AbsoluteX => format!("${word:04X},X"),
        Mode::AbsoluteY => format!("${word:04X},Y"),
        Mode::AbsoluteLong => format!("${b2:02X}{word:04X}"),
        Mode::AbsoluteLongX => format!("${b2:02X}{word:04X},X"),
        Mode::AbsoluteIndirect => format!("(${word:04X})"),
        Mode::AbsoluteIndirectLong => format!("[${word:04X}]"),
        Mode::AbsoluteIndirectX => format!("(${word:04X},X)"),
        Mode::StackRelative => format!("${byte:02X},S"),
        Mode::StackRelativeIndirectY => format!("(${byte:02X},S),Y"),
        Mode::Relative => format!("${:04X}", next.wrapping_add_signed(byte as i8 as i16)),
        Mode::RelativeLong => format!("${:04X}", next.wrapping_add_signed(word as i16)),
        // encoded destination first, printed source first
        Mode::BlockMove => format!("${b1:02X},${b0:02X}"),
    };

    let text = if operand.is_empty() {
        op.to_string()
    } else {
        format!("{op} {operand}")
    };
    (text, 1 + len)
}
