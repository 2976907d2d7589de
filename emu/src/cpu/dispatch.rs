use crate::bus::Bus;

use super::{
    addressing::Mode,
    engine::Engine,
    opcodes::{Op, OPCODES},
    Cpu,
};

impl Cpu {
    /// Runs the instruction for `opcode`; PC already points past it.
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert_eq!(self.engine, Engine::select(&self.p), "stale engine");
        let (op, mode, cycles) = OPCODES[opcode as usize];
        self.cycles += cycles as u32;

        match op {
            Op::Adc => self.op_adc(bus, mode),
            Op::And => self.op_and(bus, mode),
            Op::Asl => self.op_asl(bus, mode),
            Op::Bit => self.op_bit(bus, mode),
            Op::Cmp => self.op_cmp(bus, mode),
            Op::Cpx => self.op_cpx(bus, mode),
            Op::Cpy => self.op_cpy(bus, mode),
            Op::Dec => self.op_dec(bus, mode),
            Op::Eor => self.op_eor(bus, mode),
            Op::Inc => self.op_inc(bus, mode),
            Op::Lda => self.op_lda(bus, mode),
            Op::Ldx => self.op_ldx(bus, mode),
            Op::Ldy => self.op_ldy(bus, mode),
            Op::Lsr => self.op_lsr(bus, mode),
            Op::Ora => self.op_ora(bus, mode),
            Op::Rol => self.op_rol(bus, mode),
            Op::Ror => self.op_ror(bus, mode),
            Op::Sbc => self.op_sbc(bus, mode),
            Op::Sta => self.op_sta(bus, mode),
            Op::Stx => self.op_stx(bus, mode),
            Op::Sty => self.op_sty(bus, mode),
            Op::Stz => self.op_stz(bus, mode),
            Op::Trb => self.op_trb(bus, mode),
            Op::Tsb => self.op_tsb(bus, mode),

            Op::Bpl => self.branch(bus, mode, !self.p.n),
            Op::Bmi => self.branch(bus, mode, self.p.n),
            Op::Bvc => self.branch(bus, mode, !self.p.v),
            Op::Bvs => self.branch(bus, mode, self.p.v),
            Op::Bcc => self.branch(bus, mode, !self.p.c),
            Op::Bcs => self.branch(bus, mode, self.p.c),
            Op::Bne => self.branch(bus, mode, !self.p.z),
            Op::Beq => self.branch(bus, mode, self.p.z),
            Op::Bra => self.branch(bus, mode, true),
            Op::Brl => {
                let target = self.resolve(bus, mode);
                self.pc = target.addr;
            }

            Op::Jmp => self.op_jmp(bus, mode),
            Op::Jml => self.op_jml(bus, mode),
            Op::Jsr => self.op_jsr(bus, mode),
            Op::Jsl => self.op_jsl(bus, mode),
            Op::Rts => self.op_rts(bus),
            Op::Rtl => self.op_rtl(bus),
            Op::Rti => self.op_rti(bus),
            Op::Brk => self.op_brk(bus, mode),
            Op::Cop => self.op_cop(bus, mode),

            Op::Pha => self.op_pha(bus),
            Op::Phx => self.op_phx(bus),
            Op::Phy => self.op_phy(bus),
            Op::Pla => self.op_pla(bus),
            Op::Plx => self.op_plx(bus),
            Op::Ply => self.op_ply(bus),
            Op::Phb => self.op_phb(bus),
            Op::Phk => self.op_phk(bus),
            Op::Phd => self.op_phd(bus),
            Op::Php => self.op_php(bus),
            Op::Plb => self.op_plb(bus),
            Op::Pld => self.op_pld(bus),
            Op::Plp => self.op_plp(bus),
            Op::Pea => self.op_pea(bus, mode),
            Op::Pei => self.op_pei(bus, mode),
            Op::Per => self.op_per(bus, mode),

            Op::Clc => self.p.c = false,
            Op::Sec => self.p.c = true,
            Op::Cli => self.p.i = false,
            Op::Sei => self.p.i = true,
            Op::Cld => self.p.d = false,
            Op::Sed => self.p.d = true,
            Op::Clv => self.p.v = false,
            Op::Rep => self.op_rep(bus, mode),
            Op::Sep => self.op_sep(bus, mode),
            Op::Xce => self.op_xce(),

            Op::Inx => self.op_inx(),
            Op::Iny => self.op_iny(),
            Op::Dex => self.op_dex(),
            Op::Dey => self.op_dey(),

            Op::Tax => self.op_tax(),
            Op::Tay => self.op_tay(),
            Op::Txa => self.op_txa(),
            Op::Tya => self.op_tya(),
            Op::Txy => self.op_txy(),
            Op::Tyx => self.op_tyx(),
            Op::Tcd => self.op_tcd(),
            Op::Tdc => self.op_tdc(),
            Op::Tcs => self.op_tcs(),
            Op::Tsc => self.op_tsc(),
            Op::Tsx => self.op_tsx(),
            Op::Txs => self.op_txs(),
            Op::Xba => self.op_xba(),

            Op::Mvn => self.op_mvn(bus),
            Op::Mvp => self.op_mvp(bus),

            Op::Wai => self.op_wai(),
            Op::Stp => self.op_stp(),

            // WDM is reserved; skip its operand byte
            Op::Wdm => {
                self.resolve(bus, mode);
            }
            Op::Nop => {}
        }
    }

    /// Conditional branches always consume their displacement, but only pay
    /// for the jump (and, in emulation mode, a page cross) when taken.
    fn branch<B: Bus>(&mut self, bus: &mut B, mode: Mode, taken: bool) {
        let target = self.resolve(bus, mode);
        if taken {
            self.cycles += 1;
            if self.engine.emulation && (target.addr & 0xFF00) != (self.pc & 0xFF00) {
                self.cycles += 1;
            }
            self.pc = target.addr;
        }
    }
}
