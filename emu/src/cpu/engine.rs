//! Width/mode selection
//!
//! The executing personality is derived from (E, M, X). It is cached on the
//! CPU and recomputed after every instruction that can write those flags.

use std::fmt;

use super::{regs::Width, status::Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
    pub acc: Width,
    pub idx: Width,
    pub emulation: bool,
}

impl Engine {
    pub fn select(p: &Status) -> Self {
        if p.e {
            debug_assert!(p.m && p.x, "emulation mode with 16-bit registers");
            Self::EMULATION
        } else {
            Self {
                acc: Width::from_flag(p.m),
                idx: Width::from_flag(p.x),
                emulation: false,
            }
        }
    }

    pub const EMULATION: Self = Self {
        acc: Width::Byte,
        idx: Width::Byte,
        emulation: true,
    };
}

impl Default for Engine {
    fn default() -> Self {
        Self::EMULATION
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.emulation {
            return write!(f, "emulation");
        }
        let bits = |w: Width| if w == Width::Byte { 8 } else { 16 };
        write!(f, "native m{} x{}", bits(self.acc), bits(self.idx))
    }
}
