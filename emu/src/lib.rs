pub mod bus;
pub mod console;
pub mod cpu;
pub mod disasm;
pub mod sys;
pub mod timer;
