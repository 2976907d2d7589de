//! Byte-wide console port
//!
//! Registers:
//!
//! 0 Data (write transmits, read takes the received byte)
//! 1 Status (reads acknowledge the interrupt)
//! 2 Command

use std::io::{Read, Write};

use crate::bus::BusDevice;

enum StatusFlags {}

impl StatusFlags {
    const RX_DATA_REGISTER_FULL: u8 = 1 << 3;
    const TX_DATA_REGISTER_EMPTY: u8 = 1 << 4;
    const INTERRUPT: u8 = 1 << 7;
}

enum CommandFlags {}

impl CommandFlags {
    const RX_INTERRUPT_ENABLE: u8 = 1 << 1;
}

pub struct Console<T> {
    handle: T,
    status: u8,
    command: u8,
    tx: Option<u8>,
    rx: Option<u8>,
}

impl<T> Console<T> {
    pub fn new(handle: T) -> Self {
        Self {
            handle,
            status: StatusFlags::TX_DATA_REGISTER_EMPTY,
            command: 0,
            tx: None,
            rx: None,
        }
    }

    pub fn handle(&self) -> &T {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut T {
        &mut self.handle
    }
}

impl<T: Read + Write> Console<T> {
    fn transmit(&mut self) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        match self.handle.write(&[tx]) {
            // host is not ready, hold the byte
            Ok(0) => self.tx = Some(tx),
            Ok(_) => self.status |= StatusFlags::TX_DATA_REGISTER_EMPTY,
            Err(e) => {
                tracing::warn!("console tx failed, dropping byte {tx:02X}: {e}");
                self.status |= StatusFlags::TX_DATA_REGISTER_EMPTY;
            }
        }
        if let Err(e) = self.handle.flush() {
            tracing::warn!("console flush failed: {e}");
        }
    }

    fn receive(&mut self) {
        let mut buf = [0];
        match self.handle.read(&mut buf) {
            Ok(0) => {}
            Ok(_) => {
                self.rx = Some(buf[0]);
                self.status |= StatusFlags::RX_DATA_REGISTER_FULL;
                if self.rx_interrupt_enabled() {
                    self.status |= StatusFlags::INTERRUPT;
                }
            }
            Err(e) => tracing::warn!("console rx failed: {e}"),
        }
    }

    fn rx_interrupt_enabled(&self) -> bool {
        (self.command & CommandFlags::RX_INTERRUPT_ENABLE) != 0
    }
}

impl<T: Read + Write> BusDevice for Console<T> {
    fn reset(&mut self) {
        self.status = StatusFlags::TX_DATA_REGISTER_EMPTY;
        self.command = 0;
        self.tx = None;
        self.rx = None;
    }

    fn tick(&mut self, _cycles: u64) {
        self.transmit();
        if self.rx.is_none() {
            self.receive();
        }
    }

    fn irq(&self) -> bool {
        (self.status & StatusFlags::INTERRUPT) != 0
    }

    fn read(&mut self, addr: u8) -> u8 {
        match addr {
            0 => {
                self.status &= !StatusFlags::RX_DATA_REGISTER_FULL;
                self.rx.take().unwrap_or(0)
            }
            1 => {
                let status = self.status;
                self.status &= !StatusFlags::INTERRUPT;
                status
            }
            2 => self.command,
            _ => 0,
        }
    }

    fn write(&mut self, addr: u8, data: u8) {
        match addr {
            0 => {
                self.status &= !StatusFlags::TX_DATA_REGISTER_EMPTY;
                self.tx = Some(data);
            }
            2 => {
                self.command = data;
                // a byte that arrived before enabling still interrupts
                if self.rx_interrupt_enabled() && self.rx.is_some() {
                    self.status |= StatusFlags::INTERRUPT;
                }
            }
            _ => {}
        }
    }
}
