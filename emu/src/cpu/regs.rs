/// Operand width selected by the M or X flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Word,
}

impl Width {
    pub fn from_flag(eight_bit: bool) -> Self {
        if eight_bit {
            Self::Byte
        } else {
            Self::Word
        }
    }

    pub fn mask(self) -> u16 {
        match self {
            Self::Byte => 0x00FF,
            Self::Word => 0xFFFF,
        }
    }

    pub fn sign_bit(self) -> u16 {
        match self {
            Self::Byte => 0x0080,
            Self::Word => 0x8000,
        }
    }

    pub fn bytes(self) -> u16 {
        match self {
            Self::Byte => 1,
            Self::Word => 2,
        }
    }
}

/// A 16-bit register cell that is read and written at a selectable width.
/// Narrow writes leave the high byte alone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Register(u16);

impl Register {
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }

    pub fn as_u8(self) -> u8 {
        self.0 as u8
    }

    pub fn low_byte(self) -> u8 {
        self.0 as u8
    }

    pub fn high_byte(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn set_u16(&mut self, value: u16) {
        self.0 = value;
    }

    pub fn set_low_byte(&mut self, value: u8) {
        self.0 = (self.0 & 0xFF00) | (value as u16);
    }

    pub fn set_high_byte(&mut self, value: u8) {
        self.0 = (self.0 & 0x00FF) | ((value as u16) << 8);
    }

    pub fn get(self, width: Width) -> u16 {
        self.0 & width.mask()
    }

    pub fn set(&mut self, width: Width, value: u16) {
        match width {
            Width::Byte => self.set_low_byte(value as u8),
            Width::Word => self.0 = value,
        }
    }
}
