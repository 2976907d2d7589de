//! Processor status register
//!
//! Bits 5 and 4 belong to M and X in native mode. In emulation mode M and X
//! are pinned high, so the packed byte carries 1 in bit 5 and the legacy
//! break flag in bit 4, and both bits are ignored when a byte is loaded.

use super::regs::Width;

pub enum Flags {}

impl Flags {
    pub const C: u8 = 1 << 0; // carry
    pub const Z: u8 = 1 << 1; // zero
    pub const I: u8 = 1 << 2; // interrupt 0=enabled 1=disable
    pub const D: u8 = 1 << 3; // decimal
    pub const X: u8 = 1 << 4; // 0=16-bit 1=8-bit index
    pub const B: u8 = 1 << 4; // break (only in emulation mode)
    pub const M: u8 = 1 << 5; // 0=16-bit 1=8-bit accumulator/memory
    pub const V: u8 = 1 << 6; // overflow
    pub const N: u8 = 1 << 7; // negative
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub n: bool,
    pub v: bool,
    pub m: bool,
    pub x: bool,
    pub d: bool,
    pub i: bool,
    pub z: bool,
    pub c: bool,
    pub e: bool,
}

impl Default for Status {
    fn default() -> Self {
        Self::power_on()
    }
}

impl Status {
    pub fn power_on() -> Self {
        Self {
            n: false,
            v: false,
            m: true,
            x: true,
            d: false,
            i: true,
            z: false,
            c: false,
            e: true,
        }
    }

    /// Packs the eight flags. E is not part of the byte.
    pub fn to_byte(&self) -> u8 {
        let mut p = 0;
        p |= if self.n { Flags::N } else { 0 };
        p |= if self.v { Flags::V } else { 0 };
        p |= if self.m { Flags::M } else { 0 };
        p |= if self.x { Flags::X } else { 0 };
        p |= if self.d { Flags::D } else { 0 };
        p |= if self.i { Flags::I } else { 0 };
        p |= if self.z { Flags::Z } else { 0 };
        p |= if self.c { Flags::C } else { 0 };
        p
    }

    /// Loads the flags from a packed byte (PLP, RTI).
    pub fn from_byte(&mut self, p: u8) {
        self.n = (p & Flags::N) != 0;
        self.v = (p & Flags::V) != 0;
        self.d = (p & Flags::D) != 0;
        self.i = (p & Flags::I) != 0;
        self.z = (p & Flags::Z) != 0;
        self.c = (p & Flags::C) != 0;
        if self.e {
            self.m = true;
            self.x = true;
        } else {
            self.m = (p & Flags::M) != 0;
            self.x = (p & Flags::X) != 0;
        }
    }

    /// SEP
    pub fn set_bits(&mut self, mask: u8) {
        self.from_byte(self.to_byte() | mask);
    }

    /// REP
    pub fn clear_bits(&mut self, mask: u8) {
        self.from_byte(self.to_byte() & !mask);
    }

    /// Sets N and Z from a value of the given width.
    pub fn set_nz(&mut self, value: u16, width: Width) {
        self.n = (value & width.sign_bit()) != 0;
        self.z = (value & width.mask()) == 0;
    }
}
