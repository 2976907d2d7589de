/// Why the CPU is touching the bus. Purely informational; a bus must not
/// change what a read returns or what a write stores based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Instruction,
    Operand,
    OperandAddress,
    Data,
    Stack,
    Vector,
}

pub trait Bus {
    fn read(&mut self, bank: u8, addr: u16, kind: AccessKind) -> u8;

    fn write(&mut self, bank: u8, addr: u16, data: u8, kind: AccessKind);
}

pub trait BusDevice {
    fn reset(&mut self);

    /// Advance the device by `cycles` CPU clocks.
    fn tick(&mut self, cycles: u64);

    /// Level of the device's IRQ output. Lines are wire-ORed by the system.
    fn irq(&self) -> bool {
        false
    }

    #[allow(unused_variables)]
    fn read(&mut self, addr: u8) -> u8 {
        0
    }

    #[allow(unused_variables)]
    fn write(&mut self, addr: u8, data: u8) {}
}
