use super::*;

struct TestBus {
    mem: Vec<u8>,
    log: Vec<(bool, u32, AccessKind)>,
}

impl TestBus {
    fn new() -> Self {
        Self {
            mem: vec![0; 0x100_0000],
            log: Vec::new(),
        }
    }

    fn load(&mut self, bank: u8, addr: u16, data: &[u8]) {
        let start = ((bank as usize) << 16) | (addr as usize);
        self.mem[start..start + data.len()].copy_from_slice(data);
    }

    fn peek(&self, bank: u8, addr: u16) -> u8 {
        self.mem[((bank as usize) << 16) | (addr as usize)]
    }
}

impl Bus for TestBus {
    fn read(&mut self, bank: u8, addr: u16, kind: AccessKind) -> u8 {
        let addr = ((bank as u32) << 16) | (addr as u32);
        self.log.push((false, addr, kind));
        self.mem[addr as usize]
    }

    fn write(&mut self, bank: u8, addr: u16, data: u8, kind: AccessKind) {
        let addr = ((bank as u32) << 16) | (addr as u32);
        self.log.push((true, addr, kind));
        self.mem[addr as usize] = data;
    }
}

/// Places `program` at 00:8000 and resets into it.
fn setup(program: &[u8]) -> (Cpu, TestBus) {
    let mut bus = TestBus::new();
    bus.load(0x00, 0x8000, program);
    bus.load(0x00, RESET_VECTOR, &[0x00, 0x80]);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    bus.log.clear();
    (cpu, bus)
}

fn native(cpu: &mut Cpu, m8: bool, x8: bool) {
    cpu.p.e = false;
    cpu.p.m = m8;
    cpu.p.x = x8;
    cpu.update_engine();
}

#[test]
fn reset_state() {
    let (cpu, _) = setup(&[]);
    assert_eq!(cpu.pc(), 0x8000);
    assert_eq!(cpu.pbr(), 0x00);
    assert_eq!(cpu.s(), 0x01FF);
    assert_eq!(cpu.p(), 0x34);
    assert!(cpu.e());
    let status = cpu.status();
    assert!(status.m && status.x && status.i && !status.d);
    assert_eq!(cpu.engine(), Engine::EMULATION);
    assert!(!cpu.is_waiting());
    assert!(!cpu.is_stopped());
}

#[test]
fn register_snapshot() {
    let (mut cpu, _) = setup(&[]);
    cpu.a = Register::new(0x1234);
    cpu.dbr = 0x7E;
    cpu.d = 0x0300;
    let regs = cpu.regs();
    assert_eq!(
        regs,
        Registers {
            a: 0x1234,
            x: 0,
            y: 0,
            s: 0x01FF,
            d: 0x0300,
            pc: 0x8000,
            pbr: 0,
            dbr: 0x7E,
            p: 0x34,
            e: true,
        }
    );
}

#[test]
fn binary_adc_matches_twos_complement() {
    let (mut cpu, _) = setup(&[]);
    for a in (0..=0xFFu16).step_by(7) {
        for b in (0..=0xFFu16).step_by(13) {
            for carry in [false, true] {
                cpu.a = Register::new(a);
                cpu.p.c = carry;
                cpu.adc(b);
                let sum = a + b + carry as u16;
                let result = sum & 0xFF;
                assert_eq!(cpu.a(), result, "{a:02X}+{b:02X}+{carry}");
                assert_eq!(cpu.p.c, sum > 0xFF);
                assert_eq!(cpu.p.z, result == 0);
                assert_eq!(cpu.p.n, (result & 0x80) != 0);
                let overflow = (a as u8 as i8 as i16) + (b as u8 as i8 as i16) + carry as i16;
                assert_eq!(cpu.p.v, !(-128..=127).contains(&overflow));
            }
        }
    }
}

#[test]
fn binary_sbc_borrows() {
    // SEC; LDA #$50; SBC #$F0
    let (mut cpu, mut bus) = setup(&[0x38, 0xA9, 0x50, 0xE9, 0xF0]);
    cpu.run_for(&mut bus, 6);
    assert_eq!(cpu.a(), 0x60);
    assert!(!cpu.p.c);
    assert!(!cpu.p.v);

    // SEC; LDA #$50; SBC #$B0
    let (mut cpu, mut bus) = setup(&[0x38, 0xA9, 0x50, 0xE9, 0xB0]);
    cpu.run_for(&mut bus, 6);
    assert_eq!(cpu.a(), 0xA0);
    assert!(!cpu.p.c);
    assert!(cpu.p.v);
    assert!(cpu.p.n);
}

#[test]
fn adc_word() {
    // CLC; ADC #$0001
    let (mut cpu, mut bus) = setup(&[0x18, 0x69, 0x01, 0x00]);
    native(&mut cpu, false, true);
    cpu.a = Register::new(0x7FFF);
    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 3);
    assert_eq!(cpu.a(), 0x8000);
    assert!(cpu.p.v);
    assert!(cpu.p.n);
    assert!(!cpu.p.c);
}

#[test]
fn decimal_adc_keeps_uncorrected_top_digit() {
    // SED; CLC; LDA #$79; ADC #$01
    let (mut cpu, mut bus) = setup(&[0xF8, 0x18, 0xA9, 0x79, 0x69, 0x01]);
    for _ in 0..4 {
        cpu.step(&mut bus);
    }
    assert_eq!(cpu.a(), 0x80);
    assert!(!cpu.p.c);
    assert!(cpu.p.n);
    assert!(cpu.p.v);
}

#[test]
fn decimal_adc_word_carries_out() {
    // SED; CLC; ADC #$0001
    let (mut cpu, mut bus) = setup(&[0xF8, 0x18, 0x69, 0x01, 0x00]);
    native(&mut cpu, false, true);
    cpu.a = Register::new(0x9999);
    for _ in 0..3 {
        cpu.step(&mut bus);
    }
    assert_eq!(cpu.a(), 0x0000);
    assert!(cpu.p.c);
    assert!(cpu.p.z);

    let (mut cpu, mut bus) = setup(&[0xF8, 0x18, 0x69, 0x58, 0x12]);
    native(&mut cpu, false, true);
    cpu.a = Register::new(0x1234);
    for _ in 0..3 {
        cpu.step(&mut bus);
    }
    assert_eq!(cpu.a(), 0x2492);
    assert!(!cpu.p.c);
}

#[test]
fn decimal_sbc() {
    // SED; SEC; LDA #$10; SBC #$01
    let (mut cpu, mut bus) = setup(&[0xF8, 0x38, 0xA9, 0x10, 0xE9, 0x01]);
    for _ in 0..4 {
        cpu.step(&mut bus);
    }
    assert_eq!(cpu.a(), 0x09);
    assert!(cpu.p.c);

    // SED; SEC; LDA #$00; SBC #$01
    let (mut cpu, mut bus) = setup(&[0xF8, 0x38, 0xA9, 0x00, 0xE9, 0x01]);
    for _ in 0..4 {
        cpu.step(&mut bus);
    }
    assert_eq!(cpu.a(), 0x99);
    assert!(!cpu.p.c);
}

#[test]
fn emulation_status_packing() {
    // PHP; PLP
    let (mut cpu, mut bus) = setup(&[0x08, 0x28]);
    cpu.step(&mut bus);
    // M and the break bit read as set
    assert_eq!(bus.peek(0, 0x01FF), 0x34);

    bus.load(0, 0x01FF, &[0x00]);
    cpu.step(&mut bus);
    assert_eq!(cpu.p(), 0x30);
    assert!(cpu.p.m && cpu.p.x);
    assert_eq!(cpu.engine(), Engine::EMULATION);
}

#[test]
fn php_plp_round_trip() {
    // SEP #$CB; PHP; REP #$FF; PLP
    let (mut cpu, mut bus) = setup(&[0xE2, 0xCB, 0x08, 0xC2, 0xFF, 0x28]);
    native(&mut cpu, true, true);
    cpu.step(&mut bus);
    let before = cpu.p();
    let engine = cpu.engine();
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.p(), 0x00);
    assert_eq!(cpu.engine().acc, Width::Word);
    assert_eq!(cpu.engine().idx, Width::Word);
    cpu.step(&mut bus);
    assert_eq!(cpu.p(), before);
    assert_eq!(cpu.engine(), engine);
    assert_eq!(cpu.s(), 0x01FF);
}

#[test]
fn direct_x_wraps_in_emulation_with_aligned_direct_page() {
    // LDA $FF,X
    let (mut cpu, mut bus) = setup(&[0xB5, 0xFF]);
    bus.load(0, 0x0000, &[0x42]);
    bus.load(0, 0x0100, &[0x99]);
    cpu.x = Register::new(0x01);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x42);

    let (mut cpu, mut bus) = setup(&[0xB5, 0xFF]);
    bus.load(0, 0x0000, &[0x42]);
    bus.load(0, 0x0100, &[0x99]);
    native(&mut cpu, true, true);
    cpu.x = Register::new(0x01);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x99);
}

#[test]
fn direct_page_wraps_at_bank_zero_end() {
    // LDA $0F,X
    let (mut cpu, mut bus) = setup(&[0xB5, 0x0F]);
    bus.load(0, 0x0000, &[0x42]);
    bus.load(1, 0x0000, &[0x99]);
    native(&mut cpu, true, true);
    cpu.d = 0xFFF0;
    cpu.x = Register::new(0x01);
    // misaligned direct page costs a cycle
    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.a(), 0x42);
}

#[test]
fn misaligned_direct_page_penalty() {
    // LDA $10
    let (mut cpu, mut bus) = setup(&[0xA5, 0x10]);
    native(&mut cpu, true, true);
    assert_eq!(cpu.step(&mut bus), 3);

    let (mut cpu, mut bus) = setup(&[0xA5, 0x10]);
    native(&mut cpu, true, true);
    cpu.d = 0x0001;
    assert_eq!(cpu.step(&mut bus), 4);
}

#[test]
fn sep_rep_index_width() {
    // SEP #$30; REP #$10
    let (mut cpu, mut bus) = setup(&[0xE2, 0x30, 0xC2, 0x10]);
    native(&mut cpu, false, false);
    cpu.a = Register::new(0xABCD);
    cpu.x = Register::new(0x1234);
    cpu.y = Register::new(0x5678);
    cpu.step(&mut bus);
    assert_eq!(cpu.x(), 0x0034);
    assert_eq!(cpu.y(), 0x0078);
    // A keeps its hidden high byte
    assert_eq!(cpu.a(), 0xABCD);
    cpu.step(&mut bus);
    assert_eq!(cpu.p() & Flags::M, Flags::M);
    assert_eq!(cpu.p() & Flags::X, 0);
    assert_eq!(cpu.x(), 0x0034);
    assert_eq!(cpu.y(), 0x0078);
    assert_eq!(cpu.engine().acc, Width::Byte);
    assert_eq!(cpu.engine().idx, Width::Word);
}

#[test]
fn engine_follows_flags() {
    let (mut cpu, _) = setup(&[]);
    assert_eq!(cpu.engine().to_string(), "emulation");
    native(&mut cpu, true, true);
    assert_eq!(cpu.engine().to_string(), "native m8 x8");
    native(&mut cpu, true, false);
    assert_eq!(cpu.engine().to_string(), "native m8 x16");
    native(&mut cpu, false, true);
    assert_eq!(cpu.engine().to_string(), "native m16 x8");
    native(&mut cpu, false, false);
    assert_eq!(cpu.engine().to_string(), "native m16 x16");
}

#[test]
fn xce_round_trip() {
    // CLC; XCE; REP #$10; LDX #$1234; TXS; SEC; XCE
    let (mut cpu, mut bus) = setup(&[
        0x18, 0xFB, 0xC2, 0x10, 0xA2, 0x34, 0x12, 0x9A, 0x38, 0xFB,
    ]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert!(!cpu.e());
    assert!(cpu.p.c);
    assert_eq!(cpu.engine().to_string(), "native m8 x8");
    for _ in 0..3 {
        cpu.step(&mut bus);
    }
    assert_eq!(cpu.x(), 0x1234);
    assert_eq!(cpu.s(), 0x1234);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert!(cpu.e());
    assert!(!cpu.p.c);
    assert_eq!(cpu.engine(), Engine::EMULATION);
    assert_eq!(cpu.x(), 0x0034);
    assert_eq!(cpu.s(), 0x0134);
}

#[test]
fn narrow_store_leaves_high_byte() {
    // STA $10
    let (mut cpu, mut bus) = setup(&[0x85, 0x10]);
    bus.load(0, 0x0010, &[0xEE, 0xEE]);
    native(&mut cpu, true, true);
    cpu.a = Register::new(0x1234);
    cpu.step(&mut bus);
    assert_eq!(bus.peek(0, 0x0010), 0x34);
    assert_eq!(bus.peek(0, 0x0011), 0xEE);
    let writes = bus.log.iter().filter(|(write, _, _)| *write).count();
    assert_eq!(writes, 1);

    let (mut cpu, mut bus) = setup(&[0x85, 0x10]);
    native(&mut cpu, false, true);
    cpu.a = Register::new(0x1234);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(bus.peek(0, 0x0010), 0x34);
    assert_eq!(bus.peek(0, 0x0011), 0x12);
}

#[test]
fn access_kinds() {
    // LDA $1234
    let (mut cpu, mut bus) = setup(&[0xAD, 0x34, 0x12]);
    cpu.step(&mut bus);
    assert_eq!(
        bus.log,
        vec![
            (false, 0x00_8000, AccessKind::Instruction),
            (false, 0x00_8001, AccessKind::Operand),
            (false, 0x00_8002, AccessKind::Operand),
            (false, 0x00_1234, AccessKind::Data),
        ]
    );
}

#[test]
fn page_cross_penalty_only_in_emulation() {
    // LDA $12FF,X
    fn cycles(emulation: bool, x: u16) -> u32 {
        let (mut cpu, mut bus) = setup(&[0xBD, 0xFF, 0x12]);
        if !emulation {
            native(&mut cpu, true, true);
        }
        cpu.x = Register::new(x);
        cpu.step(&mut bus)
    }
    assert_eq!(cycles(true, 0), 4);
    assert_eq!(cycles(true, 1), 5);
    assert_eq!(cycles(false, 0), 4);
    assert_eq!(cycles(false, 1), 4);
}

#[test]
fn long_index_never_pays_page_cross() {
    // LDA $0012FF,X
    let (mut cpu, mut bus) = setup(&[0xBF, 0xFF, 0x12, 0x00, 0xBF, 0xFF, 0x12, 0x00]);
    assert_eq!(cpu.step(&mut bus), 5);
    cpu.x = Register::new(1);
    assert_eq!(cpu.step(&mut bus), 5);
}

#[test]
fn absolute_index_wraps_in_data_bank() {
    // LDA $FFFF,X
    let (mut cpu, mut bus) = setup(&[0xBD, 0xFF, 0xFF]);
    bus.load(0x7E, 0x0000, &[0x11]);
    bus.load(0x7F, 0x0000, &[0x22]);
    cpu.dbr = 0x7E;
    cpu.x = Register::new(0x01);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x11);
}

#[test]
fn indirect_indexed_carries_into_bank() {
    // LDA ($10),Y
    let (mut cpu, mut bus) = setup(&[0xB1, 0x10]);
    bus.load(0, 0x0010, &[0xFF, 0xFF]);
    bus.load(1, 0x0000, &[0x5A]);
    cpu.y = Register::new(0x01);
    assert_eq!(cpu.step(&mut bus), 6);
    assert_eq!(cpu.a(), 0x5A);

    // LDA [$10],Y
    let (mut cpu, mut bus) = setup(&[0xB7, 0x10]);
    bus.load(0, 0x0010, &[0xFF, 0xFF, 0x12]);
    bus.load(0x13, 0x0000, &[0xA5]);
    cpu.y = Register::new(0x01);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0xA5);

    // LDA $12FFFF,X
    let (mut cpu, mut bus) = setup(&[0xBF, 0xFF, 0xFF, 0x12]);
    bus.load(0x13, 0x0000, &[0x3C]);
    cpu.x = Register::new(0x01);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x3C);
}

#[test]
fn branch_cycles() {
    // BNE +2
    let (mut cpu, mut bus) = setup(&[0xD0, 0x02]);
    assert_eq!(cpu.step(&mut bus), 3);
    assert_eq!(cpu.pc(), 0x8004);

    // BEQ +2, not taken
    let (mut cpu, mut bus) = setup(&[0xF0, 0x02]);
    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(cpu.pc(), 0x8002);

    // BRA across a page
    let (mut cpu, mut bus) = setup(&[]);
    bus.load(0, 0x80F0, &[0x80, 0x20]);
    cpu.set_pc(0, 0x80F0);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.pc(), 0x8112);

    let (mut cpu, mut bus) = setup(&[]);
    bus.load(0, 0x80F0, &[0x80, 0x20]);
    native(&mut cpu, true, true);
    cpu.set_pc(0, 0x80F0);
    assert_eq!(cpu.step(&mut bus), 3);

    // BRL backwards
    let (mut cpu, mut bus) = setup(&[0x82, 0xFD, 0xFF]);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.pc(), 0x8000);
}

#[test]
fn transfers() {
    // TAX with 8-bit A and 16-bit X moves all of C
    let (mut cpu, mut bus) = setup(&[0xAA]);
    native(&mut cpu, true, false);
    cpu.a = Register::new(0x1234);
    cpu.step(&mut bus);
    assert_eq!(cpu.x(), 0x1234);

    // TXA with 8-bit A keeps B
    let (mut cpu, mut bus) = setup(&[0x8A]);
    native(&mut cpu, true, false);
    cpu.a = Register::new(0xAB00);
    cpu.x = Register::new(0x5678);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0xAB78);

    // TCS in emulation only moves the low byte
    let (mut cpu, mut bus) = setup(&[0x1B]);
    cpu.a = Register::new(0x1234);
    cpu.step(&mut bus);
    assert_eq!(cpu.s(), 0x0134);

    // TSC ignores M
    let (mut cpu, mut bus) = setup(&[0x3B]);
    native(&mut cpu, true, true);
    cpu.s = Register::new(0x01F0);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x01F0);
    assert!(!cpu.p.z);

    // TSX is bounded by X
    let (mut cpu, mut bus) = setup(&[0xBA]);
    cpu.step(&mut bus);
    assert_eq!(cpu.x(), 0x00FF);

    // TCD and TDC are always 16 bits
    let (mut cpu, mut bus) = setup(&[0x5B, 0x7B]);
    cpu.a = Register::new(0x0300);
    cpu.step(&mut bus);
    assert_eq!(cpu.d(), 0x0300);
    cpu.a = Register::new(0);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x0300);

    // XBA sets flags from the new low byte
    let (mut cpu, mut bus) = setup(&[0xEB]);
    cpu.a = Register::new(0x80FF);
    assert_eq!(cpu.step(&mut bus), 3);
    assert_eq!(cpu.a(), 0xFF80);
    assert!(cpu.p.n);
    assert!(!cpu.p.z);
}

#[test]
fn bit_immediate_only_sets_z() {
    // BIT #$C0
    let (mut cpu, mut bus) = setup(&[0x89, 0xC0]);
    cpu.a = Register::new(0x01);
    cpu.step(&mut bus);
    assert!(cpu.p.z);
    assert!(!cpu.p.n);
    assert!(!cpu.p.v);

    // BIT $10
    let (mut cpu, mut bus) = setup(&[0x24, 0x10]);
    bus.load(0, 0x0010, &[0xC0]);
    cpu.a = Register::new(0x01);
    cpu.step(&mut bus);
    assert!(cpu.p.z);
    assert!(cpu.p.n);
    assert!(cpu.p.v);
}

#[test]
fn rmw_word_width() {
    // ASL $10; INC $12
    let (mut cpu, mut bus) = setup(&[0x06, 0x10, 0xE6, 0x12]);
    bus.load(0, 0x0010, &[0x01, 0x80, 0xFF, 0xFF]);
    native(&mut cpu, false, true);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(bus.peek(0, 0x0010), 0x02);
    assert_eq!(bus.peek(0, 0x0011), 0x00);
    assert!(cpu.p.c);
    assert!(!cpu.p.n);
    cpu.step(&mut bus);
    assert_eq!(bus.peek(0, 0x0012), 0x00);
    assert_eq!(bus.peek(0, 0x0013), 0x00);
    assert!(cpu.p.z);
}

#[test]
fn compare_sets_carry_unsigned() {
    // CMP #$40
    let (mut cpu, mut bus) = setup(&[0xC9, 0x40]);
    cpu.a = Register::new(0x30);
    cpu.step(&mut bus);
    assert!(!cpu.p.c);
    assert!(cpu.p.n);

    // CPX #$0100
    let (mut cpu, mut bus) = setup(&[0xE0, 0x00, 0x01]);
    native(&mut cpu, true, false);
    cpu.x = Register::new(0x0100);
    cpu.step(&mut bus);
    assert!(cpu.p.c);
    assert!(cpu.p.z);
}

#[test]
fn native_nmi_pushes_program_bank() {
    let (mut cpu, mut bus) = setup(&[]);
    bus.load(0, 0xFFFA, &[0x00, 0x90]);
    bus.load(0, 0xFFEA, &[0x00, 0xA0]);
    native(&mut cpu, true, true);
    cpu.set_pc(0x12, 0x3456);
    cpu.p.d = true;
    let p = cpu.p();
    cpu.raise_nmi();
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(bus.peek(0, 0x01FF), 0x12);
    assert_eq!(bus.peek(0, 0x01FE), 0x34);
    assert_eq!(bus.peek(0, 0x01FD), 0x56);
    assert_eq!(bus.peek(0, 0x01FC), p);
    assert_eq!(cpu.s(), 0x01FB);
    assert_eq!(cpu.pbr(), 0x00);
    assert_eq!(cpu.pc(), 0x9000);
    assert!(cpu.p.i);
    assert!(!cpu.p.d);
}

#[test]
fn emulation_nmi_skips_program_bank() {
    let (mut cpu, mut bus) = setup(&[]);
    bus.load(0, 0xFFFA, &[0x00, 0x90]);
    bus.load(0, 0xFFEA, &[0x00, 0xA0]);
    cpu.raise_nmi();
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(bus.peek(0, 0x01FF), 0x80);
    assert_eq!(bus.peek(0, 0x01FE), 0x00);
    // hardware interrupts push B clear
    assert_eq!(bus.peek(0, 0x01FD), 0x24);
    assert_eq!(cpu.s(), 0x01FC);
    assert_eq!(cpu.pc(), 0xA000);
    assert!(bus
        .log
        .iter()
        .any(|&(write, addr, kind)| !write && addr == 0xFFEA && kind == AccessKind::Vector));
}

#[test]
fn brk_and_rti_in_emulation() {
    // BRK #$EA
    let (mut cpu, mut bus) = setup(&[0x00, 0xEA]);
    bus.load(0, 0xFFFE, &[0x00, 0x90]);
    bus.load(0, 0x9000, &[0x40]);
    cpu.p.i = false;
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(bus.peek(0, 0x01FF), 0x80);
    assert_eq!(bus.peek(0, 0x01FE), 0x02);
    assert_eq!(bus.peek(0, 0x01FD) & Flags::B, Flags::B);
    assert_eq!(cpu.pc(), 0x9000);
    assert!(cpu.p.i);

    assert_eq!(cpu.step(&mut bus), 6);
    assert_eq!(cpu.pc(), 0x8002);
    assert_eq!(cpu.s(), 0x01FF);
    assert!(!cpu.p.i);
}

#[test]
fn cop_and_rti_in_native() {
    // COP #$00
    let (mut cpu, mut bus) = setup(&[]);
    bus.load(0x05, 0x8000, &[0x02, 0x00]);
    bus.load(0, 0xFFE4, &[0x00, 0x90]);
    bus.load(0, 0x9000, &[0x40]);
    native(&mut cpu, false, false);
    cpu.set_pc(0x05, 0x8000);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(bus.peek(0, 0x01FF), 0x05);
    assert_eq!(cpu.pbr(), 0x00);
    assert_eq!(cpu.pc(), 0x9000);

    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.pbr(), 0x05);
    assert_eq!(cpu.pc(), 0x8002);
    assert_eq!(cpu.engine().to_string(), "native m16 x16");
}

#[test]
fn interrupt_priority() {
    let (mut cpu, mut bus) = setup(&[]);
    bus.load(0, 0xFFE8, &[0x00, 0xA0]);
    bus.load(0, 0xFFFA, &[0x00, 0xB0]);
    bus.load(0, 0xFFEE, &[0x00, 0xC0]);
    bus.load(0, 0xB000, &[0xEA]);
    native(&mut cpu, true, true);
    cpu.p.i = false;
    cpu.raise_abort();
    cpu.raise_nmi();
    cpu.set_irq_line(true);

    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0xA000);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0xB000);
    // I is now set, so the IRQ stays pending
    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(cpu.pc(), 0xB001);

    cpu.p.i = false;
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0xC000);
}

#[test]
fn irq_waits_for_cli() {
    // NOP; CLI; NOP
    let (mut cpu, mut bus) = setup(&[0xEA, 0x58, 0xEA]);
    bus.load(0, 0xFFFE, &[0x00, 0x90]);
    cpu.set_irq_line(true);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0x8001);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0x8002);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.pc(), 0x9000);
    assert_eq!(bus.peek(0, 0x01FD) & Flags::B, 0);
}

#[test]
fn wai_resumes_on_masked_irq() {
    // WAI; NOP
    let (mut cpu, mut bus) = setup(&[0xCB, 0xEA]);
    assert_eq!(cpu.step(&mut bus), 3);
    assert!(cpu.is_waiting());
    bus.log.clear();
    assert_eq!(cpu.step(&mut bus), 0);
    assert!(bus.log.is_empty());

    cpu.set_irq_line(true);
    assert_eq!(cpu.step(&mut bus), 2);
    assert!(!cpu.is_waiting());
    assert_eq!(cpu.pc(), 0x8002);
}

#[test]
fn stp_holds_until_reset() {
    // STP; NOP
    let (mut cpu, mut bus) = setup(&[0xDB, 0xEA]);
    assert_eq!(cpu.step(&mut bus), 3);
    assert!(cpu.is_stopped());
    cpu.raise_nmi();
    assert_eq!(cpu.step(&mut bus), 0);
    assert_eq!(cpu.run_for(&mut bus, 50), 50);
    assert_eq!(cpu.pc(), 0x8001);

    cpu.reset(&mut bus);
    assert!(!cpu.is_stopped());
    assert_eq!(cpu.pc(), 0x8000);
    // the cycle count keeps running across resets
    assert_eq!(cpu.total_cycles(), 53);
}

#[test]
fn run_for_finishes_last_instruction() {
    let (mut cpu, mut bus) = setup(&[0xEA; 16]);
    assert_eq!(cpu.run_for(&mut bus, 5), 6);
    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.total_cycles(), 6);
    assert_eq!(cpu.run_for(&mut bus, 0), 0);
    assert_eq!(cpu.pc(), 0x8003);
}

#[test]
fn run_for_idles_while_waiting() {
    // WAI
    let (mut cpu, mut bus) = setup(&[0xCB]);
    assert_eq!(cpu.run_for(&mut bus, 100), 100);
    assert_eq!(cpu.total_cycles(), 100);
    assert!(cpu.is_waiting());
    assert_eq!(cpu.pc(), 0x8001);
}

#[test]
fn subroutine_frames() {
    // JSR $9000 / RTS
    let (mut cpu, mut bus) = setup(&[0x20, 0x00, 0x90]);
    bus.load(0, 0x9000, &[0x60]);
    assert_eq!(cpu.step(&mut bus), 6);
    assert_eq!(bus.peek(0, 0x01FF), 0x80);
    assert_eq!(bus.peek(0, 0x01FE), 0x02);
    assert_eq!(cpu.pc(), 0x9000);
    assert_eq!(cpu.step(&mut bus), 6);
    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.s(), 0x01FF);

    // JSL $123456 / RTL
    let (mut cpu, mut bus) = setup(&[0x22, 0x56, 0x34, 0x12]);
    bus.load(0x12, 0x3456, &[0x6B]);
    native(&mut cpu, true, true);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(bus.peek(0, 0x01FF), 0x00);
    assert_eq!(bus.peek(0, 0x01FE), 0x80);
    assert_eq!(bus.peek(0, 0x01FD), 0x03);
    assert_eq!((cpu.pbr(), cpu.pc()), (0x12, 0x3456));
    cpu.step(&mut bus);
    assert_eq!((cpu.pbr(), cpu.pc()), (0x00, 0x8004));
    assert_eq!(cpu.s(), 0x01FF);
}

#[test]
fn jumps() {
    // JMP ($1000)
    let (mut cpu, mut bus) = setup(&[0x6C, 0x00, 0x10]);
    bus.load(0, 0x1000, &[0x34, 0x12]);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0x1234);

    // JML [$1000]
    let (mut cpu, mut bus) = setup(&[0xDC, 0x00, 0x10]);
    bus.load(0, 0x1000, &[0x34, 0x12, 0x7E]);
    cpu.step(&mut bus);
    assert_eq!((cpu.pbr(), cpu.pc()), (0x7E, 0x1234));

    // JMP ($9000,X)
    let (mut cpu, mut bus) = setup(&[0x7C, 0x00, 0x90]);
    bus.load(0, 0x9002, &[0x78, 0x56]);
    cpu.x = Register::new(0x02);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0x5678);
}

#[test]
fn push_effective_address() {
    // PEA $1234
    let (mut cpu, mut bus) = setup(&[0xF4, 0x34, 0x12]);
    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(bus.peek(0, 0x01FF), 0x12);
    assert_eq!(bus.peek(0, 0x01FE), 0x34);

    // PEI ($10)
    let (mut cpu, mut bus) = setup(&[0xD4, 0x10]);
    bus.load(0, 0x0010, &[0x78, 0x56]);
    assert_eq!(cpu.step(&mut bus), 6);
    assert_eq!(bus.peek(0, 0x01FF), 0x56);
    assert_eq!(bus.peek(0, 0x01FE), 0x78);

    // PER $0010
    let (mut cpu, mut bus) = setup(&[0x62, 0x10, 0x00]);
    assert_eq!(cpu.step(&mut bus), 6);
    assert_eq!(bus.peek(0, 0x01FF), 0x80);
    assert_eq!(bus.peek(0, 0x01FE), 0x13);
}

#[test]
fn emulation_stack_wraps_in_page_one() {
    // PHA; PLA
    let (mut cpu, mut bus) = setup(&[0x48, 0x68]);
    cpu.s = Register::new(0x0100);
    cpu.a = Register::new(0x42);
    cpu.step(&mut bus);
    assert_eq!(bus.peek(0, 0x0100), 0x42);
    assert_eq!(cpu.s(), 0x01FF);
    cpu.a = Register::new(0);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x42);
    assert_eq!(cpu.s(), 0x0100);
}

#[test]
fn word_push_pull() {
    // PHA; PLX
    let (mut cpu, mut bus) = setup(&[0x48, 0xFA]);
    native(&mut cpu, false, false);
    cpu.a = Register::new(0x8001);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.s(), 0x01FD);
    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.x(), 0x8001);
    assert!(cpu.p.n);
    assert_eq!(cpu.s(), 0x01FF);
}

#[test]
fn mvn_copies_ascending() {
    // MVN $02,$01
    let (mut cpu, mut bus) = setup(&[0x54, 0x01, 0x02]);
    bus.load(0x02, 0x1000, &[0xAA, 0xBB, 0xCC]);
    native(&mut cpu, true, false);
    cpu.a = Register::new(0x0002);
    cpu.x = Register::new(0x1000);
    cpu.y = Register::new(0x2000);

    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.pc(), 0x8000);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.pc(), 0x8000);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.pc(), 0x8003);

    assert_eq!(bus.peek(0x01, 0x2000), 0xAA);
    assert_eq!(bus.peek(0x01, 0x2001), 0xBB);
    assert_eq!(bus.peek(0x01, 0x2002), 0xCC);
    assert_eq!(cpu.a(), 0xFFFF);
    assert_eq!(cpu.x(), 0x1003);
    assert_eq!(cpu.y(), 0x2003);
    assert_eq!(cpu.dbr(), 0x01);
}

#[test]
fn mvp_copies_descending() {
    // MVP $02,$01
    let (mut cpu, mut bus) = setup(&[0x44, 0x01, 0x02]);
    bus.load(0x02, 0x1000, &[0xAA, 0xBB]);
    native(&mut cpu, false, false);
    cpu.a = Register::new(0x0001);
    cpu.x = Register::new(0x1001);
    cpu.y = Register::new(0x2001);
    cpu.run_for(&mut bus, 14);
    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(bus.peek(0x01, 0x2000), 0xAA);
    assert_eq!(bus.peek(0x01, 0x2001), 0xBB);
    assert_eq!(cpu.a(), 0xFFFF);
    assert_eq!(cpu.x(), 0x0FFF);
    assert_eq!(cpu.y(), 0x1FFF);
}

#[test]
fn wdm_skips_operand() {
    let (mut cpu, mut bus) = setup(&[0x42, 0xFF]);
    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(cpu.pc(), 0x8002);
}

#[test]
fn every_opcode_executes() {
    for opcode in 0..=0xFFu8 {
        let (mut cpu, mut bus) = setup(&[opcode, 0x00, 0x00, 0x00]);
        // give MVN/MVP a single byte to move
        cpu.a = Register::new(0);
        let cycles = cpu.step(&mut bus);
        assert!(cycles >= 2, "{opcode:02X} took {cycles} cycles");
        assert_eq!(cpu.engine(), Engine::select(&cpu.p));
    }
}
