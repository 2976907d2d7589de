use std::fmt;

use super::addressing::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Bra,
    Brk,
    Brl,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cop,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jml,
    Jmp,
    Jsl,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Mvn,
    Mvp,
    Nop,
    Ora,
    Pea,
    Pei,
    Per,
    Pha,
    Phb,
    Phd,
    Phk,
    Php,
    Phx,
    Phy,
    Pla,
    Plb,
    Pld,
    Plp,
    Plx,
    Ply,
    Rep,
    Rol,
    Ror,
    Rti,
    Rtl,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sep,
    Sta,
    Stp,
    Stx,
    Sty,
    Stz,
    Tax,
    Tay,
    Tcd,
    Tcs,
    Tdc,
    Trb,
    Tsb,
    Tsc,
    Tsx,
    Txa,
    Txs,
    Txy,
    Tya,
    Tyx,
    Wai,
    Wdm,
    Xba,
    Xce,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{self:?}").to_ascii_uppercase())
    }
}

/// Operation, addressing mode and base cycle count of every opcode. Base
/// counts assume 8-bit registers, an aligned direct page and no page cross.
#[rustfmt::skip]
pub const OPCODES: [(Op, Mode, u8); 256] = [
    /* 00 */ (Op::Brk, Mode::ImmediateByte, 7),
    /* 01 */ (Op::Ora, Mode::DirectIndirectX, 6),
    /* 02 */ (Op::Cop, Mode::ImmediateByte, 7),
    /* 03 */ (Op::Ora, Mode::StackRelative, 4),
    /* 04 */ (Op::Tsb, Mode::Direct, 5),
    /* 05 */ (Op::Ora, Mode::Direct, 3),
    /* 06 */ (Op::Asl, Mode::Direct, 5),
    /* 07 */ (Op::Ora, Mode::DirectIndirectLong, 6),
    /* 08 */ (Op::Php, Mode::Implied, 3),
    /* 09 */ (Op::Ora, Mode::Immediate, 2),
    /* 0A */ (Op::Asl, Mode::Accumulator, 2),
    /* 0B */ (Op::Phd, Mode::Implied, 4),
    /* 0C */ (Op::Tsb, Mode::Absolute, 6),
    /* 0D */ (Op::Ora, Mode::Absolute, 4),
    /* 0E */ (Op::Asl, Mode::Absolute, 6),
    /* 0F */ (Op::Ora, Mode::AbsoluteLong, 5),
    /* 10 */ (Op::Bpl, Mode::Relative, 2),
    /* 11 */ (Op::Ora, Mode::DirectIndirectY, 5),
    /* 12 */ (Op::Ora, Mode::DirectIndirect, 5),
    /* 13 */ (Op::Ora, Mode::StackRelativeIndirectY, 7),
    /* 14 */ (Op::Trb, Mode::Direct, 5),
    /* 15 */ (Op::Ora, Mode::DirectX, 4),
    /* 16 */ (Op::Asl, Mode::DirectX, 6),
    /* 17 */ (Op::Ora, Mode::DirectIndirectLongY, 6),
    /* 18 */ (Op::Clc, Mode::Implied, 2),
    /* 19 */ (Op::Ora, Mode::AbsoluteY, 4),
    /* 1A */ (Op::Inc, Mode::Accumulator, 2),
    /* 1B */ (Op::Tcs, Mode::Implied, 2),
    /* 1C */ (Op::Trb, Mode::Absolute, 6),
    /* 1D */ (Op::Ora, Mode::AbsoluteX, 4),
    /* 1E */ (Op::Asl, Mode::AbsoluteX, 7),
    /* 1F */ (Op::Ora, Mode::AbsoluteLongX, 5),
    /* 20 */ (Op::Jsr, Mode::Absolute, 6),
    /* 21 */ (Op::And, Mode::DirectIndirectX, 6),
    /* 22 */ (Op::Jsl, Mode::AbsoluteLong, 8),
    /* 23 */ (Op::And, Mode::StackRelative, 4),
    /* 24 */ (Op::Bit, Mode::Direct, 3),
    /* 25 */ (Op::And, Mode::Direct, 3),
    /* 26 */ (Op::Rol, Mode::Direct, 5),
    /* 27 */ (Op::And, Mode::DirectIndirectLong, 6),
    /* 28 */ (Op::Plp, Mode::Implied, 4),
    /* 29 */ (Op::And, Mode::Immediate, 2),
    /* 2A */ (Op::Rol, Mode::Accumulator, 2),
    /* 2B */ (Op::Pld, Mode::Implied, 5),
    /* 2C */ (Op::Bit, Mode::Absolute, 4),
    /* 2D */ (Op::And, Mode::Absolute, 4),
    /* 2E */ (Op::Rol, Mode::Absolute, 6),
    /* 2F */ (Op::And, Mode::AbsoluteLong, 5),
    /* 30 */ (Op::Bmi, Mode::Relative, 2),
    /* 31 */ (Op::And, Mode::DirectIndirectY, 5),
    /* 32 */ (Op::And, Mode::DirectIndirect, 5),
    /* 33 */ (Op::And, Mode::StackRelativeIndirectY, 7),
    /* 34 */ (Op::Bit, Mode::DirectX, 4),
    /* 35 */ (Op::And, Mode::DirectX, 4),
    /* 36 */ (Op::Rol, Mode::DirectX, 6),
    /* 37 */ (Op::And, Mode::DirectIndirectLongY, 6),
    /* 38 */ (Op::Sec, Mode::Implied, 2),
    /* 39 */ (Op::And, Mode::AbsoluteY, 4),
    /* 3A */ (Op::Dec, Mode::Accumulator, 2),
    /* 3B */ (Op::Tsc, Mode::Implied, 2),
    /* 3C */ (Op::Bit, Mode::AbsoluteX, 4),
    /* 3D */ (Op::And, Mode::AbsoluteX, 4),
    /* 3E */ (Op::Rol, Mode::AbsoluteX, 7),
    /* 3F */ (Op::And, Mode::AbsoluteLongX, 5),
    /* 40 */ (Op::Rti, Mode::Implied, 6),
    /* 41 */ (Op::Eor, Mode::DirectIndirectX, 6),
    /* 42 */ (Op::Wdm, Mode::ImmediateByte, 2),
    /* 43 */ (Op::Eor, Mode::StackRelative, 4),
    /* 44 */ (Op::Mvp, Mode::BlockMove, 7),
    /* 45 */ (Op::Eor, Mode::Direct, 3),
    /* 46 */ (Op::Lsr, Mode::Direct, 5),
    /* 47 */ (Op::Eor, Mode::DirectIndirectLong, 6),
    /* 48 */ (Op::Pha, Mode::Implied, 3),
    /* 49 */ (Op::Eor, Mode::Immediate, 2),
    /* 4A */ (Op::Lsr, Mode::Accumulator, 2),
    /* 4B */ (Op::Phk, Mode::Implied, 3),
    /* 4C */ (Op::Jmp, Mode::Absolute, 3),
    /* 4D */ (Op::Eor, Mode::Absolute, 4),
    /* 4E */ (Op::Lsr, Mode::Absolute, 6),
    /* 4F */ (Op::Eor, Mode::AbsoluteLong, 5),
    /* 50 */ (Op::Bvc, Mode::Relative, 2),
    /* 51 */ (Op::Eor, Mode::DirectIndirectY, 5),
    /* 52 */ (Op::Eor, Mode::DirectIndirect, 5),
    /* 53 */ (Op::Eor, Mode::StackRelativeIndirectY, 7),
    /* 54 */ (Op::Mvn, Mode::BlockMove, 7),
    /* 55 */ (Op::Eor, Mode::DirectX, 4),
    /* 56 */ (Op::Lsr, Mode::DirectX, 6),
    /* 57 */ (Op::Eor, Mode::DirectIndirectLongY, 6),
    /* 58 */ (Op::Cli, Mode::Implied, 2),
    /* 59 */ (Op::Eor, Mode::AbsoluteY, 4),
    /* 5A */ (Op::Phy, Mode::Implied, 3),
    /* 5B */ (Op::Tcd, Mode::Implied, 2),
    /* 5C */ (Op::Jml, Mode::AbsoluteLong, 4),
    /* 5D */ (Op::Eor, Mode::AbsoluteX, 4),
    /* 5E */ (Op::Lsr, Mode::AbsoluteX, 7),
    /* 5F */ (Op::Eor, Mode::AbsoluteLongX, 5),
    /* 60 */ (Op::Rts, Mode::Implied, 6),
    /* 61 */ (Op::Adc, Mode::DirectIndirectX, 6),
    /* 62 */ (Op::Per, Mode::RelativeLong, 6),
    /* 63 */ (Op::Adc, Mode::StackRelative, 4),
    /* 64 */ (Op::Stz, Mode::Direct, 3),
    /* 65 */ (Op::Adc, Mode::Direct, 3),
    /* 66 */ (Op::Ror, Mode::Direct, 5),
    /* 67 */ (Op::Adc, Mode::DirectIndirectLong, 6),
    /* 68 */ (Op::Pla, Mode::Implied, 4),
    /* 69 */ (Op::Adc, Mode::Immediate, 2),
    /* 6A */ (Op::Ror, Mode::Accumulator, 2),
    /* 6B */ (Op::Rtl, Mode::Implied, 6),
    /* 6C */ (Op::Jmp, Mode::AbsoluteIndirect, 5),
    /* 6D */ (Op::Adc, Mode::Absolute, 4),
    /* 6E */ (Op::Ror, Mode::Absolute, 6),
    /* 6F */ (Op::Adc, Mode::AbsoluteLong, 5),
    /* 70 */ (Op::Bvs, Mode::Relative, 2),
    /* 71 */ (Op::Adc, Mode::DirectIndirectY, 5),
    /* 72 */ (Op::Adc, Mode::DirectIndirect, 5),
    /* 73 */ (Op::Adc, Mode::StackRelativeIndirectY, 7),
    /* 74 */ (Op::Stz, Mode::DirectX, 4),
    /* 75 */ (Op::Adc, Mode::DirectX, 4),
    /* 76 */ (Op::Ror, Mode::DirectX, 6),
    /* 77 */ (Op::Adc, Mode::DirectIndirectLongY, 6),
    /* 78 */ (Op::Sei, Mode::Implied, 2),
    /* 79 */ (Op::Adc, Mode::AbsoluteY, 4),
    /* 7A */ (Op::Ply, Mode::Implied, 4),
    /* 7B */ (Op::Tdc, Mode::Implied, 2),
    /* 7C */ (Op::Jmp, Mode::AbsoluteIndirectX, 6),
    /* 7D */ (Op::Adc, Mode::AbsoluteX, 4),
    /* 7E */ (Op::Ror, Mode::AbsoluteX, 7),
    /* 7F */ (Op::Adc, Mode::AbsoluteLongX, 5),
    /* 80 */ (Op::Bra, Mode::Relative, 2),
    /* 81 */ (Op::Sta, Mode::DirectIndirectX, 6),
    /* 82 */ (Op::Brl, Mode::RelativeLong, 4),
    /* 83 */ (Op::Sta, Mode::StackRelative, 4),
    /* 84 */ (Op::Sty, Mode::Direct, 3),
    /* 85 */ (Op::Sta, Mode::Direct, 3),
    /* 86 */ (Op::Stx, Mode::Direct, 3),
    /* 87 */ (Op::Sta, Mode::DirectIndirectLong, 6),
    /* 88 */ (Op::Dey, Mode::Implied, 2),
    /* 89 */ (Op::Bit, Mode::Immediate, 2),
    /* 8A */ (Op::Txa, Mode::Implied, 2),
    /* 8B */ (Op::Phb, Mode::Implied, 3),
    /* 8C */ (Op::Sty, Mode::Absolute, 4),
    /* 8D */ (Op::Sta, Mode::Absolute, 4),
    /* 8E */ (Op::Stx, Mode::Absolute, 4),
    /* 8F */ (Op::Sta, Mode::AbsoluteLong, 5),
    /* 90 */ (Op::Bcc, Mode::Relative, 2),
    /* 91 */ (Op::Sta, Mode::DirectIndirectY, 6),
    /* 92 */ (Op::Sta, Mode::DirectIndirect, 5),
    /* 93 */ (Op::Sta, Mode::StackRelativeIndirectY, 7),
    /* 94 */ (Op::Sty, Mode::DirectX, 4),
    /* 95 */ (Op::Sta, Mode::DirectX, 4),
    /* 96 */ (Op::Stx, Mode::DirectY, 4),
    /* 97 */ (Op::Sta, Mode::DirectIndirectLongY, 6),
    /* 98 */ (Op::Tya, Mode::Implied, 2),
    /* 99 */ (Op::Sta, Mode::AbsoluteY, 5),
    /* 9A */ (Op::Txs, Mode::Implied, 2),
    /* 9B */ (Op::Txy, Mode::Implied, 2),
    /* 9C */ (Op::Stz, Mode::Absolute, 4),
    /* 9D */ (Op::Sta, Mode::AbsoluteX, 5),
    /* 9E */ (Op::Stz, Mode::AbsoluteX, 5),
    /* 9F */ (Op::Sta, Mode::AbsoluteLongX, 5),
    /* A0 */ (Op::Ldy, Mode::ImmediateIndex, 2),
    /* A1 */ (Op::Lda, Mode::DirectIndirectX, 6),
    /* A2 */ (Op::Ldx, Mode::ImmediateIndex, 2),
    /* A3 */ (Op::Lda, Mode::StackRelative, 4),
    /* A4 */ (Op::Ldy, Mode::Direct, 3),
    /* A5 */ (Op::Lda, Mode::Direct, 3),
    /* A6 */ (Op::Ldx, Mode::Direct, 3),
    /* A7 */ (Op::Lda, Mode::DirectIndirectLong, 6),
    /* A8 */ (Op::Tay, Mode::Implied, 2),
    /* A9 */ (Op::Lda, Mode::Immediate, 2),
    /* AA */ (Op::Tax, Mode::Implied, 2),
    /* AB */ (Op::Plb, Mode::Implied, 4),
    /* AC */ (Op::Ldy, Mode::Absolute, 4),
    /* AD */ (Op::Lda, Mode::Absolute, 4),
    /* AE */ (Op::Ldx, Mode::Absolute, 4),
    /* AF */ (Op::Lda, Mode::AbsoluteLong, 5),
    /* B0 */ (Op::Bcs, Mode::Relative, 2),
    /* B1 */ (Op::Lda, Mode::DirectIndirectY, 5),
    /* B2 */ (Op::Lda, Mode::DirectIndirect, 5),
    /* B3 */ (Op::Lda, Mode::StackRelativeIndirectY, 7),
    /* B4 */ (Op::Ldy, Mode::DirectX, 4),
    /* B5 */ (Op::Lda, Mode::DirectX, 4),
    /* B6 */ (Op::Ldx, Mode::DirectY, 4),
    /* B7 */ (Op::Lda, Mode::DirectIndirectLongY, 6),
    /* B8 */ (Op::Clv, Mode::Implied, 2),
    /* B9 */ (Op::Lda, Mode::AbsoluteY, 4),
    /* BA */ (Op::Tsx, Mode::Implied, 2),
    /* BB */ (Op::Tyx, Mode::Implied, 2),
    /* BC */ (Op::Ldy, Mode::AbsoluteX, 4),
    /* BD */ (Op::Lda, Mode::AbsoluteX, 4),
    /* BE */ (Op::Ldx, Mode::AbsoluteY, 4),
    /* BF */ (Op::Lda, Mode::AbsoluteLongX, 5),
    /* C0 */ (Op::Cpy, Mode::ImmediateIndex, 2),
    /* C1 */ (Op::Cmp, Mode::DirectIndirectX, 6),
    /* C2 */ (Op::Rep, Mode::ImmediateByte, 3),
    /* C3 */ (Op::Cmp, Mode::StackRelative, 4),
    /* C4 */ (Op::Cpy, Mode::Direct, 3),
    /* C5 */ (Op::Cmp, Mode::Direct, 3),
    /* C6 */ (Op::Dec, Mode::Direct, 5),
    /* C7 */ (Op::Cmp, Mode::DirectIndirectLong, 6),
    /* C8 */ (Op::Iny, Mode::Implied, 2),
    /* C9 */ (Op::Cmp, Mode::Immediate, 2),
    /* CA */ (Op::Dex, Mode::Implied, 2),
    /* CB */ (Op::Wai, Mode::Implied, 3),
    /* CC */ (Op::Cpy, Mode::Absolute, 4),
    /* CD */ (Op::Cmp, Mode::Absolute, 4),
    /* CE */ (Op::Dec, Mode::Absolute, 6),
    /* CF */ (Op::Cmp, Mode::AbsoluteLong, 5),
    /* D0 */ (Op::Bne, Mode::Relative, 2),
    /* D1 */ (Op::Cmp, Mode::DirectIndirectY, 5),
    /* D2 */ (Op::Cmp, Mode::DirectIndirect, 5),
    /* D3 */ (Op::Cmp, Mode::StackRelativeIndirectY, 7),
    /* D4 */ (Op::Pei, Mode::DirectIndirect, 6),
    /* D5 */ (Op::Cmp, Mode::DirectX, 4),
    /* D6 */ (Op::Dec, Mode::DirectX, 6),
    /* D7 */ (Op::Cmp, Mode::DirectIndirectLongY, 6),
    /* D8 */ (Op::Cld, Mode::Implied, 2),
    /* D9 */ (Op::Cmp, Mode::AbsoluteY, 4),
    /* DA */ (Op::Phx, Mode::Implied, 3),
    /* DB */ (Op::Stp, Mode::Implied, 3),
    /* DC */ (Op::Jml, Mode::AbsoluteIndirectLong, 6),
    /* DD */ (Op::Cmp, Mode::AbsoluteX, 4),
    /* DE */ (Op::Dec, Mode::AbsoluteX, 7),
    /* DF */ (Op::Cmp, Mode::AbsoluteLongX, 5),
    /* E0 */ (Op::Cpx, Mode::ImmediateIndex, 2),
    /* E1 */ (Op::Sbc, Mode::DirectIndirectX, 6),
    /* E2 */ (Op::Sep, Mode::ImmediateByte, 3),
    /* E3 */ (Op::Sbc, Mode::StackRelative, 4),
    /* E4 */ (Op::Cpx, Mode::Direct, 3),
    /* E5 */ (Op::Sbc, Mode::Direct, 3),
    /* E6 */ (Op::Inc, Mode::Direct, 5),
    /* E7 */ (Op::Sbc, Mode::DirectIndirectLong, 6),
    /* E8 */ (Op::Inx, Mode::Implied, 2),
    /* E9 */ (Op::Sbc, Mode::Immediate, 2),
    /* EA */ (Op::Nop, Mode::Implied, 2),
    /* EB */ (Op::Xba, Mode::Implied, 3),
    /* EC */ (Op::Cpx, Mode::Absolute, 4),
    /* ED */ (Op::Sbc, Mode::Absolute, 4),
    /* EE */ (Op::Inc, Mode::Absolute, 6),
    /* EF */ (Op::Sbc, Mode::AbsoluteLong, 5),
    /* F0 */ (Op::Beq, Mode::Relative, 2),
    /* F1 */ (Op::Sbc, Mode::DirectIndirectY, 5),
    /* F2 */ (Op::Sbc, Mode::DirectIndirect, 5),
    /* F3 */ (Op::Sbc, Mode::StackRelativeIndirectY, 7),
    /* F4 */ (Op::Pea, Mode::ImmediateWord, 5),
    /* F5 */ (Op::Sbc, Mode::DirectX, 4),
    /* F6 */ (Op::Inc, Mode::DirectX, 6),
    /* F7 */ (Op::Sbc, Mode::DirectIndirectLongY, 6),
    /* F8 */ (Op::Sed, Mode::Implied, 2),
    /* F9 */ (Op::Sbc, Mode::AbsoluteY, 4),
    /* FA */ (Op::Plx, Mode::Implied, 4),
    /* FB */ (Op::Xce, Mode::Implied, 2),
    /* FC */ (Op::Jsr, Mode::AbsoluteIndirectX, 8),
    /* FD */ (Op::Sbc, Mode::AbsoluteX, 4),
    /* FE */ (Op::Inc, Mode::AbsoluteX, 7),
    /* FF */ (Op::Sbc, Mode::AbsoluteLongX, 5),
];
