use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader, Read, Stdout, Write},
    num::ParseIntError,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use clap::Parser;
use gs816::{
    cpu::{Cpu, Flags, Width},
    disasm,
    sys::System,
};
use signal_hook::{consts, flag};
use termion::{
    color::{Fg, LightBlue, LightMagenta, LightRed, LightYellow, Reset},
    raw::{IntoRawMode, RawTerminal},
    AsyncReader,
};
use tracing::Level;

/// Cycles run between debugger/breakpoint checks when nothing is being watched.
const SLICE_CYCLES: u64 = 10_000;

struct Tty {
    tx: RawTerminal<Stdout>,
    rx: AsyncReader,
}

impl Tty {
    fn new() -> io::Result<Self> {
        let tx = io::stdout().into_raw_mode()?;
        let rx = termion::async_stdin();
        Ok(Self { tx, rx })
    }
}

impl Read for Tty {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.rx.read(buf)
    }
}

impl Write for Tty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.tx.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.tx.flush()
    }
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to rom file, mapped so its last byte sits at FF:FFFF
    rom: PathBuf,

    /// Raw binary loaded into RAM before starting
    #[arg(long)]
    load: Option<PathBuf>,

    /// Where `--load` places its binary and where execution begins (`BB:AAAA`)
    #[arg(long, default_value = "00:0800")]
    load_addr: String,

    /// Number of 64KiB RAM banks starting at bank 00
    #[arg(long, default_value_t = 128)]
    ram_banks: u8,

    /// Stop after this many CPU cycles
    #[arg(long)]
    max_cycles: Option<u64>,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(short, long, default_value_t = Level::INFO)]
    log_level: Level,

    /// Start with debugger enabled
    #[arg(short, long)]
    debug: bool,

    /// Debugger symbol file
    #[arg(short, long)]
    sym: Option<PathBuf>,
}

type Symbols = HashMap<u32, Vec<String>>;

fn main() -> Result<(), ()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    let rom = read_file(&args.rom, "ROM")?;
    if rom.is_empty() || rom.len() > 0x10000 * 0x80 {
        tracing::error!(
            "ROM image is {} bytes, expected between 1 byte and 8MiB",
            rom.len()
        );
        return Err(());
    }

    let program = match &args.load {
        Some(path) => {
            let data = read_file(path, "program")?;
            let (bank, addr) = parse_long(&args.load_addr)
                .map_err(|e| tracing::error!("bad load address `{}`: {e}", args.load_addr))?;
            Some((bank, addr, data))
        }
        None => None,
    };

    let symbols = match &args.sym {
        Some(path) => load_symbols(path)?,
        None => Symbols::new(),
    };

    let debug_mode = Arc::new(AtomicBool::new(args.debug));
    if let Err(e) = flag::register(consts::SIGUSR1, debug_mode.clone()) {
        tracing::warn!("SIGUSR1 debugger toggle unavailable: {e}");
    }

    let tty = Tty::new().map_err(|e| tracing::error!("failed to set up terminal: {e}"))?;
    let mut sys = System::new(&rom, args.ram_banks, tty);
    sys.reset();
    if let Some((bank, addr, data)) = program {
        sys.mem_mut().load(bank, addr, &data);
        sys.cpu_mut().set_pc(bank, addr);
        tracing::info!("loaded {} bytes at {bank:02X}:{addr:04X}", data.len());
    }

    let mut debugger = Debugger::new(symbols);
    loop {
        if debugger.breakpoints.contains(&long_pc(sys.cpu())) {
            debug_mode.store(true, Ordering::Relaxed);
        }
        if debug_mode.swap(false, Ordering::Relaxed) {
            let tty = sys.console_mut().handle_mut();
            tty.tx
                .suspend_raw_mode()
                .map_err(|e| tracing::error!("failed to leave raw mode: {e}"))?;
            let quit = debugger.session(&mut sys)?;
            sys.console_mut()
                .handle_mut()
                .tx
                .activate_raw_mode()
                .map_err(|e| tracing::error!("failed to restore raw mode: {e}"))?;
            if quit {
                break;
            }
        }

        if debugger.breakpoints.is_empty() {
            sys.run_for(SLICE_CYCLES);
        } else {
            sys.step();
        }

        let cpu = sys.cpu();
        if cpu.is_stopped() {
            tracing::info!(
                "STP at {:02X}:{:04X} after {} cycles",
                cpu.pbr(),
                cpu.pc(),
                cpu.total_cycles()
            );
            break;
        }
        if args.max_cycles.is_some_and(|max| cpu.total_cycles() >= max) {
            tracing::info!("cycle limit reached at {:02X}:{:04X}", cpu.pbr(), cpu.pc());
            break;
        }
    }

    Ok(())
}

fn read_file(path: &Path, what: &str) -> Result<Vec<u8>, ()> {
    let mut data = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut data))
        .map_err(|e| tracing::error!("failed to read {what} file {}: {e}", path.display()))?;
    Ok(data)
}

/// Reads `label:ADDRESS` lines, one symbol per line, addresses in hex.
fn load_symbols(path: &Path) -> Result<Symbols, ()> {
    let file = File::open(path)
        .map_err(|e| tracing::error!("failed to open symbol file {}: {e}", path.display()))?;
    let mut symbols = Symbols::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| tracing::error!("failed to read symbol file: {e}"))?;
        let line_no = index + 1;
        let Some((label, addr)) = line.split_once(':') else {
            tracing::error!("{}:{line_no}: expected `label:address`", path.display());
            return Err(());
        };
        let addr = u32::from_str_radix(addr.trim(), 16)
            .map_err(|e| tracing::error!("{}:{line_no}: {e}", path.display()))?;
        symbols
            .entry(addr & 0xFF_FFFF)
            .or_default()
            .push(label.trim().to_string());
    }
    Ok(symbols)
}

struct Debugger {
    symbols: Symbols,
    breakpoints: Vec<u32>,
    last_command: Vec<String>,
}

impl Debugger {
    fn new(symbols: Symbols) -> Self {
        Self {
            symbols,
            breakpoints: Vec::new(),
            last_command: Vec::new(),
        }
    }

    /// Runs the prompt until the user continues. Returns `true` on quit.
    fn session(&mut self, sys: &mut System<Tty>) -> Result<bool, ()> {
        self.disassemble(sys, None, 1);
        loop {
            let line = read_line(sys.console_mut().handle_mut())?;
            let words: Vec<String> = line.split_whitespace().map(String::from).collect();
            // an empty line repeats the previous command
            if !words.is_empty() {
                self.last_command = words;
            }
            let Some(command) = self.last_command.first().cloned() else {
                continue;
            };
            let arg = self.last_command.get(1).cloned();
            let arg = arg.as_deref();
            match command.as_str() {
                "c" => return Ok(false),
                "q" => return Ok(true),
                "s" | "n" => {
                    sys.step();
                    self.disassemble(sys, None, 1);
                }
                "r" => print_regs(sys.cpu()),
                "b" => self.add_breakpoint(sys.cpu(), arg),
                "B" => self.remove_breakpoint(sys.cpu(), arg),
                "x" => self.examine(sys, arg),
                "d" => self.disassemble(sys, arg, 24),
                "?" => print_help(),
                _ => println!("unknown command `{command}`, `?` lists commands"),
            }
        }
    }

    /// Resolves an optional command argument, defaulting to the current PC.
    fn resolve(&self, cpu: &Cpu, arg: Option<&str>) -> Option<u32> {
        let Some(arg) = arg else {
            return Some(long_pc(cpu));
        };
        if let Some((&addr, _)) = self
            .symbols
            .iter()
            .find(|(_, labels)| labels.iter().any(|label| label == arg))
        {
            return Some(addr);
        }
        match parse_long(arg) {
            // a bare 16-bit address is in the program bank
            Ok((0, addr)) if !arg.contains(':') && arg.len() <= 4 => {
                Some(((cpu.pbr() as u32) << 16) | addr as u32)
            }
            Ok((bank, addr)) => Some(((bank as u32) << 16) | addr as u32),
            Err(e) => {
                println!("`{arg}` is not an address or symbol: {e}");
                None
            }
        }
    }

    fn add_breakpoint(&mut self, cpu: &Cpu, arg: Option<&str>) {
        let Some(addr) = self.resolve(cpu, arg) else {
            return;
        };
        if self.breakpoints.contains(&addr) {
            println!("breakpoint at {} already set", fmt_long(addr));
        } else {
            self.breakpoints.push(addr);
            println!("breakpoint set at {}", fmt_long(addr));
        }
    }

    fn remove_breakpoint(&mut self, cpu: &Cpu, arg: Option<&str>) {
        let Some(addr) = self.resolve(cpu, arg) else {
            return;
        };
        let before = self.breakpoints.len();
        self.breakpoints.retain(|&bp| bp != addr);
        if self.breakpoints.len() == before {
            println!("no breakpoint at {}", fmt_long(addr));
        } else {
            println!("breakpoint cleared at {}", fmt_long(addr));
        }
    }

    fn examine(&self, sys: &System<Tty>, arg: Option<&str>) {
        let Some(start) = self.resolve(sys.cpu(), arg) else {
            return;
        };
        let bank = (start >> 16) as u8;
        let mem = sys.mem();
        // 17 bytes, stopping at the end of the bank
        let bytes: Vec<u8> = ((start as u16)..=(start as u16).saturating_add(16))
            .map(|addr| mem.read(bank, addr))
            .collect();
        let hex: String = bytes.iter().map(|b| format!("{b:02X} ")).collect();
        let text: String = bytes
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect();
        println!("{}  {hex} |{text}|", fmt_long(start));
    }

    fn disassemble(&self, sys: &System<Tty>, arg: Option<&str>, count: usize) {
        let Some(start) = self.resolve(sys.cpu(), arg) else {
            return;
        };
        let mem = sys.mem();
        let engine = sys.cpu().engine();
        let m8 = engine.acc == Width::Byte;
        let x8 = engine.idx == Width::Byte;
        let bank = (start >> 16) as u8;
        let mut addr = start as u16;
        for _ in 0..count {
            let here = ((bank as u32) << 16) | addr as u32;
            if let Some(label) = self.symbols.get(&here).and_then(|labels| labels.first()) {
                println!("{}{label}:{}", Fg(LightBlue), Fg(Reset));
            }
            let (text, len) = disasm::disassemble(|b, a| mem.read(b, a), bank, addr, m8, x8);
            let raw: Vec<String> = (0..len)
                .map(|i| format!("{:02X}", mem.read(bank, addr.wrapping_add(i))))
                .collect();
            let (mnemonic, operand) = text.split_once(' ').unwrap_or((text.as_str(), ""));
            println!(
                "{}{}{}  {:<12}{}{mnemonic} {}{operand}{}",
                Fg(LightYellow),
                fmt_long(here),
                Fg(Reset),
                raw.join(" "),
                Fg(LightMagenta),
                Fg(LightRed),
                Fg(Reset),
            );
            addr = addr.wrapping_add(len);
        }
    }
}

/// Blocks until a full line arrives on the (non-blocking) terminal.
fn read_line(tty: &mut Tty) -> Result<String, ()> {
    print!("dbg> ");
    tty.tx
        .flush()
        .map_err(|e| tracing::error!("failed to flush terminal: {e}"))?;
    let mut line = Vec::new();
    let mut byte = [0];
    loop {
        let read = tty
            .rx
            .read(&mut byte)
            .map_err(|e| tracing::error!("failed to read terminal: {e}"))?;
        match (read, byte[0]) {
            (0, _) => continue,
            (_, b'\n') => break,
            (_, b) => line.push(b),
        }
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

fn long_pc(cpu: &Cpu) -> u32 {
    ((cpu.pbr() as u32) << 16) | cpu.pc() as u32
}

fn fmt_long(addr: u32) -> String {
    format!("{:02X}:{:04X}", (addr >> 16) as u8, addr as u16)
}

fn print_help() {
    const COMMANDS: &[(&str, &str)] = &[
        ("c", "leave the debugger and keep running"),
        ("q", "quit"),
        ("s, n", "step one instruction"),
        ("r", "show registers"),
        ("b [addr]", "set a breakpoint"),
        ("B [addr]", "clear a breakpoint"),
        ("x [addr]", "dump memory"),
        ("d [addr]", "disassemble"),
        ("?", "this list"),
    ];
    for (command, what) in COMMANDS {
        println!("  {command:<10} {what}");
    }
    println!("addr is `BB:AAAA`, `AAAA` in the program bank, or a symbol. [addr] defaults to PC");
}

fn print_regs(cpu: &Cpu) {
    let p = cpu.p();
    // X reads as B in emulation mode
    let x_name = if cpu.e() { 'B' } else { 'X' };
    let flags: String = [
        (Flags::N, 'N'),
        (Flags::V, 'V'),
        (Flags::M, 'M'),
        (Flags::X, x_name),
        (Flags::D, 'D'),
        (Flags::I, 'I'),
        (Flags::Z, 'Z'),
        (Flags::C, 'C'),
    ]
    .iter()
    .map(|&(mask, name)| if (p & mask) != 0 { name } else { '-' })
    .collect();
    println!(
        "A={:04X} X={:04X} Y={:04X} S={:04X} D={:04X} PC={:02X}:{:04X} DBR={:02X} P={p:02X} [{flags}] {}",
        cpu.a(),
        cpu.x(),
        cpu.y(),
        cpu.s(),
        cpu.d(),
        cpu.pbr(),
        cpu.pc(),
        cpu.dbr(),
        if cpu.e() { 'E' } else { '-' },
    );
    println!("{}", cpu.engine());
}

/// Parses `BB:AAAA`, or a plain hex 24-bit address.
fn parse_long(arg: &str) -> Result<(u8, u16), ParseIntError> {
    if let Some((bank, addr)) = arg.split_once(':') {
        return Ok((
            u8::from_str_radix(bank, 16)?,
            u16::from_str_radix(addr, 16)?,
        ));
    }
    let addr = u32::from_str_radix(arg, 16)?;
    Ok(((addr >> 16) as u8, addr as u16))
}
