//! Sample System
//!
//! A small 65816 machine used by the runner and the integration tests:
//! * W65C816 CPU
//! * Console port
//! * Interval timer
//! * Up to 255 banks of RAM and a ROM at the top of the address space
//!
//! Memory Map:
//!
//! 00:0000-00:BFFF RAM
//! 00:C000-00:C0FF IO
//! 00:C100-00:FFFF RAM (writes) / ROM mirror of FF:C100-FF:FFFF (reads)
//! 01:0000-..      RAM, one bank per configured RAM bank
//! ..     -FF:FFFF ROM, aligned so its last byte sits at FF:FFFF
//!
//! IO Addresses:
//!
//! C000      Console Data
//! C001      Console Status
//! C002      Console Command
//! C010      Timer Reload lo
//! C011      Timer Reload hi
//! C012      Timer Control
//! C013      Timer Status

use std::io::{Read, Write};

use crate::{
    bus::{AccessKind, Bus, BusDevice},
    console::Console,
    cpu::Cpu,
    timer::Timer,
};

/// Cycles the devices advance per tick while the CPU sits idle in WAI.
const IDLE_QUANTUM: u64 = 32;

const ADDRESS_SPACE: usize = 0x0100_0000;

pub struct Mem {
    ram: Vec<u8>,
    rom: Vec<u8>,
}

impl Mem {
    pub fn new(ram_banks: u8, rom: &[u8]) -> Self {
        let rom = rom[rom.len().saturating_sub(ADDRESS_SPACE)..].to_vec();
        Self {
            ram: vec![0; (ram_banks as usize) * 0x10000],
            rom,
        }
    }

    fn rom_index(&self, addr: usize) -> Option<usize> {
        let base = ADDRESS_SPACE - self.rom.len();
        (addr >= base).then(|| addr - base)
    }

    fn long(bank: u8, addr: u16) -> usize {
        ((bank as usize) << 16) | (addr as usize)
    }

    pub fn read(&self, bank: u8, addr: u16) -> u8 {
        // bank 0 sees the top of ROM, which is where the vectors live
        if bank == 0 && addr >= 0xC100 {
            if let Some(index) = self.rom_index(Self::long(0xFF, addr)) {
                return self.rom[index];
            }
        }
        let addr = Self::long(bank, addr);
        if let Some(index) = self.rom_index(addr) {
            self.rom[index]
        } else {
            self.ram.get(addr).copied().unwrap_or(0)
        }
    }

    pub fn write(&mut self, bank: u8, addr: u16, data: u8) {
        let addr = Self::long(bank, addr);
        if bank != 0 && self.rom_index(addr).is_some() {
            return;
        }
        if let Some(cell) = self.ram.get_mut(addr) {
            *cell = data;
        }
    }

    /// Copies `data` into RAM starting at `bank:addr`. Bytes that fall
    /// outside of RAM are dropped.
    pub fn load(&mut self, bank: u8, addr: u16, data: &[u8]) {
        let start = Self::long(bank, addr);
        for (i, byte) in data.iter().enumerate() {
            if let Some(cell) = self.ram.get_mut(start + i) {
                *cell = *byte;
            }
        }
    }
}

pub struct System<T> {
    cpu: Cpu,
    console: Console<T>,
    timer: Timer,

    mem: Mem,

    // cycles the last instruction of the previous slice ran past its budget
    debt: u64,
}

impl<T> System<T>
where
    T: Read + Write,
{
    pub fn new(rom: &[u8], ram_banks: u8, console: T) -> Self {
        Self {
            cpu: Cpu::new(),
            console: Console::new(console),
            timer: Timer::new(),
            mem: Mem::new(ram_banks, rom),
            debt: 0,
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    pub fn mem_mut(&mut self) -> &mut Mem {
        &mut self.mem
    }

    pub fn console(&self) -> &Console<T> {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console<T> {
        &mut self.console
    }

    pub fn reset(&mut self) {
        self.console.reset();
        self.timer.reset();
        self.debt = 0;
        self.cpu.set_irq_line(false);
        let (cpu, mut view) = self.view();
        cpu.reset(&mut view);
    }

    /// Executes a single instruction and advances the devices by its cycles.
    pub fn step(&mut self) -> u64 {
        let cycles = {
            let (cpu, mut view) = self.view();
            cpu.step(&mut view) as u64
        };
        let cycles = if cycles == 0 { IDLE_QUANTUM } else { cycles };
        self.tick_devices(cycles);
        cycles
    }

    /// Runs one scheduling slice of `cycles` CPU clocks. Overshoot from the
    /// last instruction is carried into the next slice.
    pub fn run_for(&mut self, cycles: u64) -> u64 {
        let budget = cycles.saturating_sub(self.debt);
        let mut ran = 0;
        while ran < budget {
            let step = {
                let (cpu, mut view) = self.view();
                cpu.step(&mut view) as u64
            };
            let step = if step == 0 {
                IDLE_QUANTUM.min(budget - ran)
            } else {
                step
            };
            ran += step;
            self.tick_devices(step);
        }
        self.debt = self.debt + ran - cycles.min(self.debt + ran);
        ran
    }

    fn tick_devices(&mut self, cycles: u64) {
        self.console.tick(cycles);
        self.timer.tick(cycles);
        self.cpu.set_irq_line(self.console.irq() || self.timer.irq());
    }

    pub fn view(&mut self) -> (&'_ mut Cpu, CpuView<'_, T>) {
        let System {
            cpu,
            console,
            timer,
            mem,
            ..
        } = self;
        (
            cpu,
            CpuView {
                console,
                timer,
                mem,
            },
        )
    }
}

pub struct CpuView<'a, T> {
    console: &'a mut Console<T>,
    timer: &'a mut Timer,

    mem: &'a mut Mem,
}

impl<'a, T> Bus for CpuView<'a, T>
where
    T: Read + Write,
{
    fn read(&mut self, bank: u8, addr: u16, _kind: AccessKind) -> u8 {
        match (bank, addr) {
            (0, 0xC000..=0xC00F) => self.console.read((addr - 0xC000) as u8),
            (0, 0xC010..=0xC01F) => self.timer.read((addr - 0xC010) as u8),
            (0, 0xC020..=0xC0FF) => 0,
            _ => self.mem.read(bank, addr),
        }
    }

    fn write(&mut self, bank: u8, addr: u16, data: u8, _kind: AccessKind) {
        match (bank, addr) {
            (0, 0xC000..=0xC00F) => self.console.write((addr - 0xC000) as u8, data),
            (0, 0xC010..=0xC01F) => self.timer.write((addr - 0xC010) as u8, data),
            (0, 0xC020..=0xC0FF) => {}
            _ => self.mem.write(bank, addr, data),
        }
    }
}
