//! Instruction semantics
//!
//! Each `op_*` resolves its own operand through [`Mode`] and then works at
//! the width the active engine dictates. Extra bus cycles for 16-bit data
//! are charged by `read_data`/`write_data`.

use crate::bus::{AccessKind, Bus};

use super::{
    addressing::{Mode, Operand},
    regs::Width,
    Cpu, IntKind,
};

impl Cpu {
    fn read_data<B: Bus>(&mut self, bus: &mut B, ea: Operand, width: Width) -> u16 {
        let lo = bus.read(ea.bank, ea.addr, ea.kind);
        match width {
            Width::Byte => lo as u16,
            Width::Word => {
                self.cycles += 1;
                let next = ea.next();
                let hi = bus.read(next.bank, next.addr, ea.kind);
                u16::from_le_bytes([lo, hi])
            }
        }
    }

    fn write_data<B: Bus>(&mut self, bus: &mut B, ea: Operand, width: Width, data: u16) {
        let [lo, hi] = data.to_le_bytes();
        bus.write(ea.bank, ea.addr, lo, ea.kind);
        if width == Width::Word {
            self.cycles += 1;
            let next = ea.next();
            bus.write(next.bank, next.addr, hi, ea.kind);
        }
    }

    /// Resolves and reads an operand for a read-only instruction.
    fn read_operand<B: Bus>(&mut self, bus: &mut B, mode: Mode, width: Width) -> u16 {
        let ea = self.resolve(bus, mode);
        // page crossing only costs a cycle on the 8-bit personality
        if ea.crossed && self.engine.emulation {
            self.cycles += 1;
        }
        self.read_data(bus, ea, width)
    }

    fn acc(&self) -> u16 {
        self.a.get(self.engine.acc)
    }

    fn set_acc(&mut self, value: u16) {
        self.a.set(self.engine.acc, value);
    }

    /// Read-modify-write on memory, or on A for accumulator addressing.
    fn modify<B: Bus>(&mut self, bus: &mut B, mode: Mode, f: fn(&mut Self, u16) -> u16) {
        if mode == Mode::Accumulator {
            let result = f(self, self.acc());
            self.set_acc(result);
        } else {
            let width = self.engine.acc;
            let ea = self.resolve(bus, mode);
            let data = self.read_data(bus, ea, width);
            let result = f(self, data);
            self.write_data(bus, ea, width, result);
        }
    }

    // ---- logic ----

    pub(super) fn op_ora<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let data = self.read_operand(bus, mode, self.engine.acc);
        let result = self.acc() | data;
        self.set_acc(result);
        self.p.set_nz(result, self.engine.acc);
    }

    pub(super) fn op_and<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let data = self.read_operand(bus, mode, self.engine.acc);
        let result = self.acc() & data;
        self.set_acc(result);
        self.p.set_nz(result, self.engine.acc);
    }

    pub(super) fn op_eor<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let data = self.read_operand(bus, mode, self.engine.acc);
        let result = self.acc() ^ data;
        self.set_acc(result);
        self.p.set_nz(result, self.engine.acc);
    }

    pub(super) fn op_bit<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let width = self.engine.acc;
        let data = self.read_operand(bus, mode, width);
        self.p.z = (self.acc() & data) == 0;
        // BIT # only touches Z
        if mode != Mode::Immediate {
            self.p.n = (data & width.sign_bit()) != 0;
            self.p.v = (data & (width.sign_bit() >> 1)) != 0;
        }
    }

    pub(super) fn op_tsb<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let width = self.engine.acc;
        let ea = self.resolve(bus, mode);
        let data = self.read_data(bus, ea, width);
        self.p.z = (self.acc() & data) == 0;
        self.write_data(bus, ea, width, data | self.acc());
    }

    pub(super) fn op_trb<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let width = self.engine.acc;
        let ea = self.resolve(bus, mode);
        let data = self.read_data(bus, ea, width);
        self.p.z = (self.acc() & data) == 0;
        self.write_data(bus, ea, width, data & !self.acc());
    }

    // ---- shifts, rotates, increments ----

    fn asl(&mut self, data: u16) -> u16 {
        let width = self.engine.acc;
        self.p.c = (data & width.sign_bit()) != 0;
        let result = (data << 1) & width.mask();
        self.p.set_nz(result, width);
        result
    }

    fn lsr(&mut self, data: u16) -> u16 {
        let width = self.engine.acc;
        self.p.c = (data & 1) != 0;
        let result = (data & width.mask()) >> 1;
        self.p.set_nz(result, width);
        result
    }

    fn rol(&mut self, data: u16) -> u16 {
        let width = self.engine.acc;
        let carry = self.p.c as u16;
        self.p.c = (data & width.sign_bit()) != 0;
        let result = ((data << 1) | carry) & width.mask();
        self.p.set_nz(result, width);
        result
    }

    fn ror(&mut self, data: u16) -> u16 {
        let width = self.engine.acc;
        let carry = if self.p.c { width.sign_bit() } else { 0 };
        self.p.c = (data & 1) != 0;
        let result = ((data & width.mask()) >> 1) | carry;
        self.p.set_nz(result, width);
        result
    }

    fn inc(&mut self, data: u16) -> u16 {
        let width = self.engine.acc;
        let result = data.wrapping_add(1) & width.mask();
        self.p.set_nz(result, width);
        result
    }

    fn dec(&mut self, data: u16) -> u16 {
        let width = self.engine.acc;
        let result = data.wrapping_sub(1) & width.mask();
        self.p.set_nz(result, width);
        result
    }

    pub(super) fn op_asl<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        self.modify(bus, mode, Self::asl);
    }

    pub(super) fn op_lsr<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        self.modify(bus, mode, Self::lsr);
    }

    pub(super) fn op_rol<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        self.modify(bus, mode, Self::rol);
    }

    pub(super) fn op_ror<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        self.modify(bus, mode, Self::ror);
    }

    pub(super) fn op_inc<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        self.modify(bus, mode, Self::inc);
    }

    pub(super) fn op_dec<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        self.modify(bus, mode, Self::dec);
    }

    pub(super) fn op_inx(&mut self) {
        let width = self.engine.idx;
        let result = self.x.get(width).wrapping_add(1) & width.mask();
        self.x.set(width, result);
        self.p.set_nz(result, width);
    }

    pub(super) fn op_iny(&mut self) {
        let width = self.engine.idx;
        let result = self.y.get(width).wrapping_add(1) & width.mask();
        self.y.set(width, result);
        self.p.set_nz(result, width);
    }

    pub(super) fn op_dex(&mut self) {
        let width = self.engine.idx;
        let result = self.x.get(width).wrapping_sub(1) & width.mask();
        self.x.set(width, result);
        self.p.set_nz(result, width);
    }

    pub(super) fn op_dey(&mut self) {
        let width = self.engine.idx;
        let result = self.y.get(width).wrapping_sub(1) & width.mask();
        self.y.set(width, result);
        self.p.set_nz(result, width);
    }

    // ---- compares ----

    fn compare(&mut self, reg: u16, data: u16, width: Width) {
        let result = reg.wrapping_sub(data) & width.mask();
        self.p.c = reg >= data;
        self.p.set_nz(result, width);
    }

    pub(super) fn op_cmp<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let data = self.read_operand(bus, mode, self.engine.acc);
        self.compare(self.acc(), data, self.engine.acc);
    }

    pub(super) fn op_cpx<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let width = self.engine.idx;
        let data = self.read_operand(bus, mode, width);
        self.compare(self.x.get(width), data, width);
    }

    pub(super) fn op_cpy<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let width = self.engine.idx;
        let data = self.read_operand(bus, mode, width);
        self.compare(self.y.get(width), data, width);
    }

    // ---- arithmetic ----

    pub(super) fn op_adc<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let data = self.read_operand(bus, mode, self.engine.acc);
        self.adc(data);
    }

    pub(super) fn op_sbc<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let data = self.read_operand(bus, mode, self.engine.acc);
        self.sbc(data);
    }

    pub(super) fn adc(&mut self, data: u16) {
        let width = self.engine.acc;
        let a = self.acc();
        let result = if self.p.d {
            self.add_decimal(a, data, width)
        } else {
            self.add_binary(a, data, width)
        };
        self.set_acc(result);
        self.p.set_nz(result, width);
    }

    pub(super) fn sbc(&mut self, data: u16) {
        let width = self.engine.acc;
        let a = self.acc();
        let result = if self.p.d {
            self.sub_decimal(a, data, width)
        } else {
            // invert arg and adc
            self.add_binary(a, !data & width.mask(), width)
        };
        self.set_acc(result);
        self.p.set_nz(result, width);
    }

    fn add_binary(&mut self, a: u16, b: u16, width: Width) -> u16 {
        let sum = (a as u32) + (b as u32) + (self.p.c as u32);
        let result = (sum as u16) & width.mask();
        self.p.c = sum > (width.mask() as u32);
        self.p.v = ((!(a ^ b)) & (a ^ result) & width.sign_bit()) != 0;
        result
    }

    /// Nibble-serial BCD add. V comes from the result before the top digit
    /// is corrected.
    fn add_decimal(&mut self, a: u16, b: u16, width: Width) -> u16 {
        let digits = width.bytes() * 2;
        let mut carry = self.p.c as u16;
        let mut result = 0u16;
        let mut uncorrected = 0u16;
        for i in 0..digits {
            let shift = i * 4;
            let mut digit = ((a >> shift) & 0xF) + ((b >> shift) & 0xF) + carry;
            if i == digits - 1 {
                uncorrected = result | ((digit & 0xF) << shift);
            }
            if digit >= 10 {
                digit -= 10;
                carry = 1;
            } else {
                carry = 0;
            }
            result |= (digit & 0xF) << shift;
        }
        self.p.c = carry != 0;
        self.p.v = ((!(a ^ b)) & (a ^ uncorrected) & width.sign_bit()) != 0;
        result
    }

    /// Nibble-serial BCD subtract. C is the inverted borrow out of the top
    /// digit.
    fn sub_decimal(&mut self, a: u16, b: u16, width: Width) -> u16 {
        let digits = width.bytes() * 2;
        let mut borrow = (!self.p.c) as i16;
        let mut result = 0u16;
        let mut uncorrected = 0u16;
        for i in 0..digits {
            let shift = i * 4;
            let mut digit = ((a >> shift) & 0xF) as i16 - ((b >> shift) & 0xF) as i16 - borrow;
            if i == digits - 1 {
                uncorrected = result | (((digit as u16) & 0xF) << shift);
            }
            if digit < 0 {
                digit += 10;
                borrow = 1;
            } else {
                borrow = 0;
            }
            result |= ((digit as u16) & 0xF) << shift;
        }
        self.p.c = borrow == 0;
        self.p.v = ((a ^ b) & (a ^ uncorrected) & width.sign_bit()) != 0;
        result
    }

    // ---- loads and stores ----

    pub(super) fn op_lda<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let data = self.read_operand(bus, mode, self.engine.acc);
        self.set_acc(data);
        self.p.set_nz(data, self.engine.acc);
    }

    pub(super) fn op_ldx<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let width = self.engine.idx;
        let data = self.read_operand(bus, mode, width);
        self.x.set(width, data);
        self.p.set_nz(data, width);
    }

    pub(super) fn op_ldy<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let width = self.engine.idx;
        let data = self.read_operand(bus, mode, width);
        self.y.set(width, data);
        self.p.set_nz(data, width);
    }

    pub(super) fn op_sta<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        self.write_data(bus, ea, self.engine.acc, self.acc());
    }

    pub(super) fn op_stx<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        let width = self.engine.idx;
        self.write_data(bus, ea, width, self.x.get(width));
    }

    pub(super) fn op_sty<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        let width = self.engine.idx;
        self.write_data(bus, ea, width, self.y.get(width));
    }

    pub(super) fn op_stz<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        self.write_data(bus, ea, self.engine.acc, 0);
    }

    // ---- register transfers ----
    //
    // Each transfer has its own width rule, they are spelled out one by one.

    /// TAX: all of C when X is 16-bit, regardless of M.
    pub(super) fn op_tax(&mut self) {
        let width = self.engine.idx;
        let data = self.a.get(width);
        self.x.set(width, data);
        self.p.set_nz(data, width);
    }

    /// TAY: all of C when X is 16-bit, regardless of M.
    pub(super) fn op_tay(&mut self) {
        let width = self.engine.idx;
        let data = self.a.get(width);
        self.y.set(width, data);
        self.p.set_nz(data, width);
    }

    /// TXA: sized by M; an 8-bit A keeps its high byte.
    pub(super) fn op_txa(&mut self) {
        let width = self.engine.acc;
        let data = self.x.get(width);
        self.a.set(width, data);
        self.p.set_nz(data, width);
    }

    /// TYA: sized by M; an 8-bit A keeps its high byte.
    pub(super) fn op_tya(&mut self) {
        let width = self.engine.acc;
        let data = self.y.get(width);
        self.a.set(width, data);
        self.p.set_nz(data, width);
    }

    pub(super) fn op_txy(&mut self) {
        let width = self.engine.idx;
        let data = self.x.get(width);
        self.y.set(width, data);
        self.p.set_nz(data, width);
    }

    pub(super) fn op_tyx(&mut self) {
        let width = self.engine.idx;
        let data = self.y.get(width);
        self.x.set(width, data);
        self.p.set_nz(data, width);
    }

    /// TCD: always 16 bits.
    pub(super) fn op_tcd(&mut self) {
        self.d = self.a.as_u16();
        self.p.set_nz(self.d, Width::Word);
    }

    /// TDC: always 16 bits.
    pub(super) fn op_tdc(&mut self) {
        self.a.set_u16(self.d);
        self.p.set_nz(self.d, Width::Word);
    }

    /// TCS: ignores M. Emulation mode only moves the low byte. No flags.
    pub(super) fn op_tcs(&mut self) {
        if self.engine.emulation {
            self.s.set_low_byte(self.a.low_byte());
        } else {
            self.s = self.a;
        }
    }

    /// TSC: ignores M, always 16 bits.
    pub(super) fn op_tsc(&mut self) {
        self.a = self.s;
        self.p.set_nz(self.a.as_u16(), Width::Word);
    }

    /// TSX: bounded by the index width.
    pub(super) fn op_tsx(&mut self) {
        let width = self.engine.idx;
        let data = self.s.get(width);
        self.x.set(width, data);
        self.p.set_nz(data, width);
    }

    /// TXS: bounded by the index width. No flags.
    pub(super) fn op_txs(&mut self) {
        if self.engine.emulation {
            self.s.set_low_byte(self.x.low_byte());
        } else {
            // an 8-bit X has a zero high byte
            self.s = self.x;
        }
    }

    /// XBA: flags follow the new low byte.
    pub(super) fn op_xba(&mut self) {
        let [lo, hi] = self.a.as_u16().to_le_bytes();
        self.a.set_u16(u16::from_le_bytes([hi, lo]));
        self.p.set_nz(hi as u16, Width::Byte);
    }

    // ---- stack ----

    pub(super) fn op_pha<B: Bus>(&mut self, bus: &mut B) {
        if self.engine.acc == Width::Word {
            self.cycles += 1;
            self.push_word(bus, self.a.as_u16());
        } else {
            self.push(bus, self.a.low_byte());
        }
    }

    pub(super) fn op_phx<B: Bus>(&mut self, bus: &mut B) {
        if self.engine.idx == Width::Word {
            self.cycles += 1;
            self.push_word(bus, self.x.as_u16());
        } else {
            self.push(bus, self.x.low_byte());
        }
    }

    pub(super) fn op_phy<B: Bus>(&mut self, bus: &mut B) {
        if self.engine.idx == Width::Word {
            self.cycles += 1;
            self.push_word(bus, self.y.as_u16());
        } else {
            self.push(bus, self.y.low_byte());
        }
    }

    fn pull_sized<B: Bus>(&mut self, bus: &mut B, width: Width) -> u16 {
        match width {
            Width::Byte => self.pull(bus) as u16,
            Width::Word => {
                self.cycles += 1;
                self.pull_word(bus)
            }
        }
    }

    pub(super) fn op_pla<B: Bus>(&mut self, bus: &mut B) {
        let width = self.engine.acc;
        let data = self.pull_sized(bus, width);
        self.a.set(width, data);
        self.p.set_nz(data, width);
    }

    pub(super) fn op_plx<B: Bus>(&mut self, bus: &mut B) {
        let width = self.engine.idx;
        let data = self.pull_sized(bus, width);
        self.x.set(width, data);
        self.p.set_nz(data, width);
    }

    pub(super) fn op_ply<B: Bus>(&mut self, bus: &mut B) {
        let width = self.engine.idx;
        let data = self.pull_sized(bus, width);
        self.y.set(width, data);
        self.p.set_nz(data, width);
    }

    pub(super) fn op_phb<B: Bus>(&mut self, bus: &mut B) {
        self.push(bus, self.dbr);
    }

    pub(super) fn op_phk<B: Bus>(&mut self, bus: &mut B) {
        self.push(bus, self.pbr);
    }

    pub(super) fn op_phd<B: Bus>(&mut self, bus: &mut B) {
        self.push_word(bus, self.d);
    }

    pub(super) fn op_php<B: Bus>(&mut self, bus: &mut B) {
        // in emulation mode bit 4 goes out as B=1
        self.push(bus, self.p.to_byte());
    }

    pub(super) fn op_plb<B: Bus>(&mut self, bus: &mut B) {
        self.dbr = self.pull(bus);
        self.p.set_nz(self.dbr as u16, Width::Byte);
    }

    pub(super) fn op_pld<B: Bus>(&mut self, bus: &mut B) {
        self.d = self.pull_word(bus);
        self.p.set_nz(self.d, Width::Word);
    }

    pub(super) fn op_plp<B: Bus>(&mut self, bus: &mut B) {
        let data = self.pull(bus);
        self.p.from_byte(data);
        self.update_engine();
    }

    pub(super) fn op_pea<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        let lo = bus.read(ea.bank, ea.addr, ea.kind);
        let next = ea.next();
        let hi = bus.read(next.bank, next.addr, ea.kind);
        self.push_word(bus, u16::from_le_bytes([lo, hi]));
    }

    pub(super) fn op_pei<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        self.push_word(bus, ea.addr);
    }

    pub(super) fn op_per<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        self.push_word(bus, ea.addr);
    }

    // ---- status ----

    pub(super) fn op_rep<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        let mask = bus.read(ea.bank, ea.addr, AccessKind::Operand);
        self.p.clear_bits(mask);
        self.update_engine();
    }

    pub(super) fn op_sep<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        let mask = bus.read(ea.bank, ea.addr, AccessKind::Operand);
        self.p.set_bits(mask);
        self.update_engine();
    }

    pub(super) fn op_xce(&mut self) {
        let carry = self.p.c;
        self.p.c = self.p.e;
        self.p.e = carry;
        self.update_engine();
    }

    // ---- control flow ----

    pub(super) fn op_jmp<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        self.pc = ea.addr;
    }

    pub(super) fn op_jml<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        self.pbr = ea.bank;
        self.pc = ea.addr;
    }

    pub(super) fn op_jsr<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        // the return address is the last byte of the JSR
        self.push_word(bus, self.pc.wrapping_sub(1));
        self.pc = ea.addr;
    }

    pub(super) fn op_jsl<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        let ea = self.resolve(bus, mode);
        self.push(bus, self.pbr);
        self.push_word(bus, self.pc.wrapping_sub(1));
        self.pbr = ea.bank;
        self.pc = ea.addr;
    }

    pub(super) fn op_rts<B: Bus>(&mut self, bus: &mut B) {
        self.pc = self.pull_word(bus).wrapping_add(1);
    }

    pub(super) fn op_rtl<B: Bus>(&mut self, bus: &mut B) {
        self.pc = self.pull_word(bus).wrapping_add(1);
        self.pbr = self.pull(bus);
    }

    pub(super) fn op_rti<B: Bus>(&mut self, bus: &mut B) {
        let data = self.pull(bus);
        self.p.from_byte(data);
        self.update_engine();
        self.pc = self.pull_word(bus);
        if !self.engine.emulation {
            self.pbr = self.pull(bus);
            self.cycles += 1;
        }
    }

    pub(super) fn op_brk<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        // skip the signature byte
        self.resolve(bus, mode);
        self.interrupt(bus, IntKind::Brk);
    }

    pub(super) fn op_cop<B: Bus>(&mut self, bus: &mut B, mode: Mode) {
        self.resolve(bus, mode);
        self.interrupt(bus, IntKind::Cop);
    }

    pub(super) fn op_wai(&mut self) {
        tracing::debug!("WAI at {:02X}:{:04X}", self.pbr, self.pc.wrapping_sub(1));
        self.waiting = true;
    }

    pub(super) fn op_stp(&mut self) {
        tracing::debug!("STP at {:02X}:{:04X}", self.pbr, self.pc.wrapping_sub(1));
        self.stopped = true;
    }

    // ---- block moves ----

    /// Moves one byte, then rewinds PC onto the opcode until the count in C
    /// runs out, so the instruction repeats once per byte.
    fn block_move<B: Bus>(&mut self, bus: &mut B, increment: bool) {
        let dst = self.fetch(bus);
        let src = self.fetch(bus);
        self.dbr = dst;

        let width = self.engine.idx;
        let x = self.x.get(width);
        let y = self.y.get(width);
        let data = bus.read(src, x, AccessKind::Data);
        bus.write(dst, y, data, AccessKind::Data);

        let (x, y) = if increment {
            (x.wrapping_add(1), y.wrapping_add(1))
        } else {
            (x.wrapping_sub(1), y.wrapping_sub(1))
        };
        self.x.set(width, x & width.mask());
        self.y.set(width, y & width.mask());

        let count = self.a.as_u16().wrapping_sub(1);
        self.a.set_u16(count);
        if count != 0xFFFF {
            self.pc = self.pc.wrapping_sub(3);
        }
    }

    pub(super) fn op_mvn<B: Bus>(&mut self, bus: &mut B) {
        self.block_move(bus, true);
    }

    pub(super) fn op_mvp<B: Bus>(&mut self, bus: &mut B) {
        self.block_move(bus, false);
    }
}
