//! Effective address resolution
//!
//! Every resolver consumes its operand bytes from the instruction stream and
//! yields a (bank, offset) pair. Cycle penalties that depend only on the
//! address computation (direct page misalignment) are charged here; the
//! page-cross penalty is recorded on the operand and charged by reads.

use crate::bus::{AccessKind, Bus};

use super::{regs::Width, Cpu};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,                // i
    Accumulator,            // A
    Immediate,              // # (M width)
    ImmediateIndex,         // # (X width)
    ImmediateByte,          // # (always 8-bit: REP, SEP, BRK, COP, WDM)
    ImmediateWord,          // # (always 16-bit: PEA)
    Direct,                 // d
    DirectX,                // d,x
    DirectY,                // d,y
    DirectIndirect,         // (d)
    DirectIndirectX,        // (d,x)
    DirectIndirectY,        // (d),y
    DirectIndirectLong,     // [d]
    DirectIndirectLongY,    // [d],y
    Absolute,               // a
    AbsoluteX,              // a,x
    AbsoluteY,              // a,y
    AbsoluteLong,           // al
    AbsoluteLongX,          // al,x
    AbsoluteIndirect,       // (a)
    AbsoluteIndirectLong,   // [a]
    AbsoluteIndirectX,      // (a,x)
    StackRelative,          // d,s
    StackRelativeIndirectY, // (d,s),y
    Relative,               // r
    RelativeLong,           // rl
    BlockMove,              // xyc
}

impl Mode {
    /// Number of operand bytes following the opcode.
    pub fn operand_len(self, m8: bool, x8: bool) -> u16 {
        match self {
            Mode::Implied | Mode::Accumulator => 0,
            Mode::Immediate => 2 - (m8 as u16),
            Mode::ImmediateIndex => 2 - (x8 as u16),
            Mode::ImmediateByte
            | Mode::Direct
            | Mode::DirectX
            | Mode::DirectY
            | Mode::DirectIndirect
            | Mode::DirectIndirectX
            | Mode::DirectIndirectY
            | Mode::DirectIndirectLong
            | Mode::DirectIndirectLongY
            | Mode::StackRelative
            | Mode::StackRelativeIndirectY
            | Mode::Relative => 1,
            Mode::ImmediateWord
            | Mode::Absolute
            | Mode::AbsoluteX
            | Mode::AbsoluteY
            | Mode::AbsoluteIndirect
            | Mode::AbsoluteIndirectLong
            | Mode::AbsoluteIndirectX
            | Mode::RelativeLong
            | Mode::BlockMove => 2,
            Mode::AbsoluteLong | Mode::AbsoluteLongX => 3,
        }
    }
}

/// A resolved effective address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub bank: u8,
    pub addr: u16,
    /// Multi-byte accesses wrap inside the bank instead of carrying into the
    /// next one (direct page, stack and instruction stream operands).
    pub in_bank: bool,
    /// Indexing moved the address onto another page.
    pub crossed: bool,
    pub kind: AccessKind,
}

impl Operand {
    pub fn long(bank: u8, addr: u16) -> Self {
        Self {
            bank,
            addr,
            in_bank: false,
            crossed: false,
            kind: AccessKind::Data,
        }
    }

    pub fn from_u32(addr: u32) -> Self {
        let [lo, hi, bank, _] = addr.to_le_bytes();
        Self::long(bank, u16::from_le_bytes([lo, hi]))
    }

    /// Bank zero operand that wraps at 16 bits.
    pub fn direct(addr: u16) -> Self {
        Self {
            in_bank: true,
            ..Self::long(0, addr)
        }
    }

    pub fn to_u32(self) -> u32 {
        u32::from_le_bytes([self.addr as u8, (self.addr >> 8) as u8, self.bank, 0])
    }

    /// Address of the following byte.
    pub fn next(self) -> Self {
        if self.in_bank {
            Self {
                addr: self.addr.wrapping_add(1),
                ..self
            }
        } else {
            let next = Self::from_u32(self.to_u32().wrapping_add(1) & 0x00FF_FFFF);
            Self {
                bank: next.bank,
                addr: next.addr,
                ..self
            }
        }
    }
}

fn page_crossed(base: u16, addr: u16) -> bool {
    (base & 0xFF00) != (addr & 0xFF00)
}

impl Cpu {
    /// Reads the next instruction stream byte.
    pub(super) fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let data = bus.read(self.pbr, self.pc, AccessKind::Operand);
        self.pc = self.pc.wrapping_add(1);
        data
    }

    fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// D + offset + index, with 6502 zero page wrap when the direct page is
    /// page aligned in emulation mode.
    fn direct_addr(&self, offset: u8, index: u16) -> u16 {
        if self.engine.emulation && (self.d & 0x00FF) == 0 {
            (self.d & 0xFF00) | ((offset as u16).wrapping_add(index) & 0x00FF)
        } else {
            self.d.wrapping_add(offset as u16).wrapping_add(index)
        }
    }

    fn direct_next(&self, addr: u16) -> u16 {
        if self.engine.emulation && (self.d & 0x00FF) == 0 {
            (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF)
        } else {
            addr.wrapping_add(1)
        }
    }

    fn direct_offset<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let offset = self.fetch(bus);
        if (self.d & 0x00FF) != 0 {
            self.cycles += 1;
        }
        offset
    }

    // pointer stored in the direct page
    fn direct_pointer<B: Bus>(&mut self, bus: &mut B, ptr: u16) -> u16 {
        let lo = bus.read(0, ptr, AccessKind::OperandAddress);
        let hi = bus.read(0, self.direct_next(ptr), AccessKind::OperandAddress);
        u16::from_le_bytes([lo, hi])
    }

    fn direct_pointer_long<B: Bus>(&mut self, bus: &mut B, ptr: u16) -> Operand {
        let addr = self.direct_pointer(bus, ptr);
        let bank = bus.read(0, ptr.wrapping_add(2), AccessKind::OperandAddress);
        Operand::long(bank, addr)
    }

    fn pointer<B: Bus>(&mut self, bus: &mut B, bank: u8, ptr: u16) -> u16 {
        let lo = bus.read(bank, ptr, AccessKind::OperandAddress);
        let hi = bus.read(bank, ptr.wrapping_add(1), AccessKind::OperandAddress);
        u16::from_le_bytes([lo, hi])
    }

    fn immediate(&mut self, width: Width) -> Operand {
        let operand = Operand {
            in_bank: true,
            kind: AccessKind::Operand,
            ..Operand::long(self.pbr, self.pc)
        };
        self.pc = self.pc.wrapping_add(width.bytes());
        operand
    }

    fn indexed(&self, base: u16, index: u16) -> Operand {
        let addr = base.wrapping_add(index);
        Operand {
            crossed: page_crossed(base, addr),
            ..Operand::long(self.dbr, addr)
        }
    }

    // the index carries into the bank byte
    fn indexed_long(base: Operand, index: u16) -> Operand {
        let addr = (base.to_u32() + index as u32) & 0x00FF_FFFF;
        Operand {
            crossed: page_crossed(base.addr, addr as u16),
            ..Operand::from_u32(addr)
        }
    }

    pub(super) fn resolve<B: Bus>(&mut self, bus: &mut B, mode: Mode) -> Operand {
        let x = self.x.get(self.engine.idx);
        let y = self.y.get(self.engine.idx);
        match mode {
            Mode::Implied | Mode::Accumulator | Mode::BlockMove => {
                Operand::long(self.pbr, self.pc)
            }

            Mode::Immediate => self.immediate(self.engine.acc),
            Mode::ImmediateIndex => self.immediate(self.engine.idx),
            Mode::ImmediateByte => self.immediate(Width::Byte),
            Mode::ImmediateWord => self.immediate(Width::Word),

            Mode::Direct => {
                let offset = self.direct_offset(bus);
                Operand::direct(self.direct_addr(offset, 0))
            }

            Mode::DirectX => {
                let offset = self.direct_offset(bus);
                Operand::direct(self.direct_addr(offset, x))
            }

            Mode::DirectY => {
                let offset = self.direct_offset(bus);
                Operand::direct(self.direct_addr(offset, y))
            }

            Mode::DirectIndirect => {
                let offset = self.direct_offset(bus);
                let ptr = self.direct_addr(offset, 0);
                let addr = self.direct_pointer(bus, ptr);
                Operand::long(self.dbr, addr)
            }

            Mode::DirectIndirectX => {
                let offset = self.direct_offset(bus);
                let ptr = self.direct_addr(offset, x);
                let addr = self.direct_pointer(bus, ptr);
                Operand::long(self.dbr, addr)
            }

            Mode::DirectIndirectY => {
                let offset = self.direct_offset(bus);
                let ptr = self.direct_addr(offset, 0);
                let addr = self.direct_pointer(bus, ptr);
                Self::indexed_long(Operand::long(self.dbr, addr), y)
            }

            Mode::DirectIndirectLong => {
                let offset = self.direct_offset(bus);
                let ptr = self.direct_addr(offset, 0);
                self.direct_pointer_long(bus, ptr)
            }

            Mode::DirectIndirectLongY => {
                let offset = self.direct_offset(bus);
                let ptr = self.direct_addr(offset, 0);
                let base = self.direct_pointer_long(bus, ptr);
                Self::indexed_long(base, y)
            }

            Mode::Absolute => {
                let addr = self.fetch_word(bus);
                Operand::long(self.dbr, addr)
            }

            Mode::AbsoluteX => {
                let base = self.fetch_word(bus);
                self.indexed(base, x)
            }

            Mode::AbsoluteY => {
                let base = self.fetch_word(bus);
                self.indexed(base, y)
            }

            Mode::AbsoluteLong => {
                let addr = self.fetch_word(bus);
                let bank = self.fetch(bus);
                Operand::long(bank, addr)
            }

            Mode::AbsoluteLongX => {
                let addr = self.fetch_word(bus);
                let bank = self.fetch(bus);
                // long indexing never pays the page-cross cycle
                Operand {
                    crossed: false,
                    ..Self::indexed_long(Operand::long(bank, addr), x)
                }
            }

            // JMP (a): pointer lives in bank 0, target is in the program bank
            Mode::AbsoluteIndirect => {
                let ptr = self.fetch_word(bus);
                let addr = self.pointer(bus, 0, ptr);
                Operand::long(self.pbr, addr)
            }

            Mode::AbsoluteIndirectLong => {
                let ptr = self.fetch_word(bus);
                let addr = self.pointer(bus, 0, ptr);
                let bank = bus.read(0, ptr.wrapping_add(2), AccessKind::OperandAddress);
                Operand::long(bank, addr)
            }

            // pointer table lives in the program bank
            Mode::AbsoluteIndirectX => {
                let ptr = self.fetch_word(bus).wrapping_add(x);
                let addr = self.pointer(bus, self.pbr, ptr);
                Operand::long(self.pbr, addr)
            }

            Mode::StackRelative => {
                let offset = self.fetch(bus);
                Operand::direct(self.s.as_u16().wrapping_add(offset as u16))
            }

            Mode::StackRelativeIndirectY => {
                let offset = self.fetch(bus);
                let ptr = self.s.as_u16().wrapping_add(offset as u16);
                let addr = self.pointer(bus, 0, ptr);
                Operand {
                    crossed: false,
                    ..Self::indexed_long(Operand::long(self.dbr, addr), y)
                }
            }

            Mode::Relative => {
                let offset = self.fetch(bus) as i8;
                Operand::long(self.pbr, self.pc.wrapping_add_signed(offset as i16))
            }

            Mode::RelativeLong => {
                let offset = self.fetch_word(bus) as i16;
                Operand::long(self.pbr, self.pc.wrapping_add_signed(offset))
            }
        }
    }
}
