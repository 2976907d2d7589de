//! Interval timer
//!
//! Registers:
//!
//! 0 Reload lo
//! 1 Reload hi
//! 2 Control (bit 0 run, bit 1 interrupt enable)
//! 3 Status (bit 7 fired, reads acknowledge)
//!
//! The counter counts CPU cycles down from the reload value and fires when
//! it reaches zero, then reloads.

use crate::bus::BusDevice;

enum ControlFlags {}

impl ControlFlags {
    const RUN: u8 = 1 << 0;
    const INTERRUPT_ENABLE: u8 = 1 << 1;
}

enum StatusFlags {}

impl StatusFlags {
    const FIRED: u8 = 1 << 7;
}

#[derive(Debug, Default)]
pub struct Timer {
    reload: [u8; 2],
    counter: u64,
    control: u8,
    status: u8,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    fn period(&self) -> u64 {
        // a reload of zero means 65536 cycles
        match u16::from_le_bytes(self.reload) {
            0 => 0x10000,
            n => n as u64,
        }
    }
}

impl BusDevice for Timer {
    fn reset(&mut self) {
        *self = Self::new();
    }

    fn tick(&mut self, cycles: u64) {
        if (self.control & ControlFlags::RUN) == 0 {
            return;
        }
        let mut cycles = cycles;
        while cycles >= self.counter {
            cycles -= self.counter;
            self.counter = self.period();
            self.status |= StatusFlags::FIRED;
        }
        self.counter -= cycles;
    }

    fn irq(&self) -> bool {
        (self.control & ControlFlags::INTERRUPT_ENABLE) != 0
            && (self.status & StatusFlags::FIRED) != 0
    }

    fn read(&mut self, addr: u8) -> u8 {
        match addr {
            0 => self.reload[0],
            1 => self.reload[1],
            2 => self.control,
            3 => {
                let status = self.status;
                self.status &= !StatusFlags::FIRED;
                status
            }
            _ => 0,
        }
    }

    fn write(&mut self, addr: u8, data: u8) {
        match addr {
            0 => self.reload[0] = data,
            1 => self.reload[1] = data,
            2 => {
                let starting = (self.control & ControlFlags::RUN) == 0;
                self.control = data;
                if starting && (data & ControlFlags::RUN) != 0 {
                    self.counter = self.period();
                }
            }
            _ => {}
        }
    }
}
