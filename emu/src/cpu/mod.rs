//! W65C816 Emulation
//!
//! One engine serves all five personalities (emulation mode plus the four
//! native M/X width combinations). The active widths are cached in
//! [`Engine`] and reselected whenever E, M or X change.

use crate::bus::{AccessKind, Bus};

mod addressing;
mod dispatch;
mod engine;
mod opcodes;
mod ops;
mod regs;
mod status;

#[cfg(test)]
mod tests;

pub use addressing::{Mode, Operand};
pub use engine::Engine;
pub use opcodes::{Op, OPCODES};
pub use regs::{Register, Width};
pub use status::{Flags, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntKind {
    Abort,
    Nmi,
    Irq,
    Brk,
    Cop,
}

impl IntKind {
    fn vector(self, emulation: bool) -> u16 {
        match (self, emulation) {
            (IntKind::Cop, false) => 0xFFE4,
            (IntKind::Brk, false) => 0xFFE6,
            (IntKind::Abort, false) => 0xFFE8,
            (IntKind::Nmi, false) => 0xFFFA,
            (IntKind::Irq, false) => 0xFFEE,
            (IntKind::Cop, true) => 0xFFF4,
            (IntKind::Abort, true) => 0xFFF8,
            (IntKind::Nmi, true) => 0xFFEA,
            (IntKind::Irq | IntKind::Brk, true) => 0xFFFE,
        }
    }
}

const RESET_VECTOR: u16 = 0xFFFC;

/// Register snapshot for debuggers and tracers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u16,
    pub x: u16,
    pub y: u16,
    pub s: u16,
    pub d: u16,
    pub pc: u16,
    pub pbr: u8,
    pub dbr: u8,
    pub p: u8,
    pub e: bool,
}

#[derive(Debug)]
pub struct Cpu {
    a: Register,   // accumulator (aka: c, with b as the high byte)
    x: Register,   // index x
    y: Register,   // index y
    s: Register,   // stack pointer
    d: u16,        // direct page
    pc: u16,       // program counter
    pbr: u8,       // program bank (aka: k)
    dbr: u8,       // data bank (aka: b)
    p: Status,     // processor status
    engine: Engine,

    cycles: u32, // cycles charged to the instruction in flight
    total_cycles: u64,

    abort: bool,
    nmi: bool,
    irq: bool,
    waiting: bool,
    stopped: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            a: Register::default(),
            x: Register::default(),
            y: Register::default(),
            s: Register::new(0x01FF),
            d: 0,
            pc: 0,
            pbr: 0,
            dbr: 0,
            p: Status::power_on(),
            engine: Engine::EMULATION,
            cycles: 0,
            total_cycles: 0,
            abort: false,
            nmi: false,
            irq: false,
            waiting: false,
            stopped: false,
        }
    }

    pub fn a(&self) -> u16 {
        self.a.as_u16()
    }

    pub fn x(&self) -> u16 {
        self.x.as_u16()
    }

    pub fn y(&self) -> u16 {
        self.y.as_u16()
    }

    pub fn s(&self) -> u16 {
        self.s.as_u16()
    }

    pub fn d(&self) -> u16 {
        self.d
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn pbr(&self) -> u8 {
        self.pbr
    }

    pub fn dbr(&self) -> u8 {
        self.dbr
    }

    pub fn p(&self) -> u8 {
        self.p.to_byte()
    }

    pub fn status(&self) -> Status {
        self.p
    }

    pub fn e(&self) -> bool {
        self.p.e
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn regs(&self) -> Registers {
        Registers {
            a: self.a(),
            x: self.x(),
            y: self.y(),
            s: self.s(),
            d: self.d,
            pc: self.pc,
            pbr: self.pbr,
            dbr: self.dbr,
            p: self.p(),
            e: self.p.e,
        }
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Points the CPU at `bank:pc`, e.g. after a loader placed a program.
    pub fn set_pc(&mut self, bank: u8, pc: u16) {
        self.pbr = bank;
        self.pc = pc;
    }

    pub fn raise_nmi(&mut self) {
        self.nmi = true;
    }

    pub fn raise_abort(&mut self) {
        self.abort = true;
    }

    /// IRQ is level triggered; the line stays asserted until a device drops it.
    pub fn set_irq_line(&mut self, level: bool) {
        self.irq = level;
    }

    pub fn reset<B: Bus>(&mut self, bus: &mut B) {
        let lo = bus.read(0, RESET_VECTOR, AccessKind::Vector);
        let hi = bus.read(0, RESET_VECTOR.wrapping_add(1), AccessKind::Vector);
        *self = Self {
            pc: u16::from_le_bytes([lo, hi]),
            irq: self.irq,
            total_cycles: self.total_cycles,
            ..Self::new()
        };
        tracing::debug!("cpu reset, pc={:04X}", self.pc);
    }

    /// Runs whole instructions until at least `max_cycles` have elapsed and
    /// returns the cycles consumed. The last instruction always completes, so
    /// the result may exceed the budget. While waiting (WAI) with nothing
    /// pending, or stopped (STP), the remaining budget elapses idle.
    pub fn run_for<B: Bus>(&mut self, bus: &mut B, max_cycles: u64) -> u64 {
        let mut ran = 0;
        while ran < max_cycles {
            let cycles = self.step(bus);
            if cycles == 0 {
                self.total_cycles += max_cycles - ran;
                return max_cycles;
            }
            ran += cycles as u64;
        }
        ran
    }

    /// Executes one instruction, or enters one interrupt handler, and
    /// returns its cycle count. Returns 0 without touching the bus when the
    /// CPU is idle.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.stopped {
            return 0;
        }
        if self.waiting {
            if !(self.abort || self.nmi || self.irq) {
                return 0;
            }
            // any interrupt ends WAI, even a masked IRQ
            self.waiting = false;
        }

        self.cycles = 0;
        if self.abort {
            self.abort = false;
            self.hardware_interrupt(bus, IntKind::Abort);
        } else if self.nmi {
            self.nmi = false;
            self.hardware_interrupt(bus, IntKind::Nmi);
        } else if self.irq && !self.p.i {
            self.hardware_interrupt(bus, IntKind::Irq);
        } else {
            let opcode = bus.read(self.pbr, self.pc, AccessKind::Instruction);
            tracing::trace!(
                "{:02X}:{:04X} {:02X} A={:04X} X={:04X} Y={:04X} S={:04X} D={:04X} B={:02X} P={:02X} {}",
                self.pbr,
                self.pc,
                opcode,
                self.a(),
                self.x(),
                self.y(),
                self.s(),
                self.d,
                self.dbr,
                self.p(),
                self.engine,
            );
            self.pc = self.pc.wrapping_add(1);
            self.execute(bus, opcode);
        }
        self.total_cycles += self.cycles as u64;
        self.cycles
    }

    fn push<B: Bus>(&mut self, bus: &mut B, data: u8) {
        bus.write(0, self.s.as_u16(), data, AccessKind::Stack);
        if self.engine.emulation {
            self.s.set_low_byte(self.s.low_byte().wrapping_sub(1));
        } else {
            self.s.set_u16(self.s.as_u16().wrapping_sub(1));
        }
    }

    fn pull<B: Bus>(&mut self, bus: &mut B) -> u8 {
        if self.engine.emulation {
            self.s.set_low_byte(self.s.low_byte().wrapping_add(1));
        } else {
            self.s.set_u16(self.s.as_u16().wrapping_add(1));
        }
        bus.read(0, self.s.as_u16(), AccessKind::Stack)
    }

    fn push_word<B: Bus>(&mut self, bus: &mut B, data: u16) {
        let [lo, hi] = data.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
    }

    fn pull_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        u16::from_le_bytes([lo, hi])
    }

    fn hardware_interrupt<B: Bus>(&mut self, bus: &mut B, kind: IntKind) {
        self.cycles += 7;
        self.interrupt(bus, kind);
    }

    /// Shared entry sequence for BRK, COP, ABORT, NMI and IRQ.
    fn interrupt<B: Bus>(&mut self, bus: &mut B, kind: IntKind) {
        let emulation = self.engine.emulation;
        if !emulation {
            self.push(bus, self.pbr);
            self.cycles += 1;
        }
        self.push_word(bus, self.pc);
        let mut p = self.p.to_byte();
        if emulation && kind != IntKind::Brk {
            p &= !Flags::B;
        }
        self.push(bus, p);
        self.p.i = true;
        self.p.d = false;
        self.pbr = 0;
        let vector = kind.vector(emulation);
        let lo = bus.read(0, vector, AccessKind::Vector);
        let hi = bus.read(0, vector.wrapping_add(1), AccessKind::Vector);
        self.pc = u16::from_le_bytes([lo, hi]);
        tracing::debug!("{kind:?} via {vector:04X} to {:04X}", self.pc);
    }

    /// Reselects the engine after E, M or X may have changed.
    fn update_engine(&mut self) {
        if self.p.e {
            self.p.m = true;
            self.p.x = true;
            self.s.set_high_byte(0x01);
        }
        // narrowing the index registers clears their high bytes, A keeps its
        if self.p.x {
            self.x.set_high_byte(0);
            self.y.set_high_byte(0);
        }
        let engine = Engine::select(&self.p);
        if engine != self.engine {
            tracing::debug!("engine {} -> {}", self.engine, engine);
            self.engine = engine;
        }
    }
}
