// opcode.rs — WASM opcode bytes and the internal direct-threaded opcode set
// Grounded on: examples/original_source/src/common/vm/dispatch.h (the
// dispatch_table ordering becomes this enum's variant order) and
// examples/original_source/src/common/vm/load.c's `find_blocks`/`parse_code`
// opcode byte values.

/// Raw WASM opcode bytes the loader recognizes while walking a function body.
/// Only the bytes load.rs needs to branch on are named; everything else is
/// looked up through [`wasm_to_op`].
pub mod raw {
    pub const UNREACHABLE: u8 = 0x00;
    pub const NOP: u8 = 0x01;
    pub const BLOCK: u8 = 0x02;
    pub const LOOP: u8 = 0x03;
    pub const IF: u8 = 0x04;
    pub const ELSE: u8 = 0x05;
    pub const END: u8 = 0x0b;
    pub const BR: u8 = 0x0c;
    pub const BR_IF: u8 = 0x0d;
    pub const BR_TABLE: u8 = 0x0e;
    pub const RETURN: u8 = 0x0f;
    pub const CALL: u8 = 0x10;
    pub const CALL_INDIRECT: u8 = 0x11;
    pub const DROP: u8 = 0x1a;
    pub const SELECT: u8 = 0x1b;
    pub const LOCAL_GET: u8 = 0x20;
    pub const LOCAL_SET: u8 = 0x21;
    pub const LOCAL_TEE: u8 = 0x22;
    pub const GLOBAL_GET: u8 = 0x23;
    pub const GLOBAL_SET: u8 = 0x24;
    pub const I32_LOAD: u8 = 0x28;
    pub const I64_STORE32: u8 = 0x3e;
    pub const MEMORY_SIZE: u8 = 0x3f;
    pub const MEMORY_GROW: u8 = 0x40;
    pub const I32_CONST: u8 = 0x41;
    pub const I64_CONST: u8 = 0x42;
    pub const F32_CONST: u8 = 0x43;
    pub const F64_CONST: u8 = 0x44;
    pub const I32_EQZ: u8 = 0x45;
    pub const I64_EXTEND32_S: u8 = 0xc4;
    pub const EXTENDED_PREFIX: u8 = 0xfc;
    pub const EXT_MEMORY_COPY: u32 = 10;
    pub const EXT_MEMORY_FILL: u32 = 11;
    pub const EXT_TRUNC_SAT_START: u32 = 0;
    pub const EXT_TRUNC_SAT_END: u32 = 7;
}

/// Internal direct-threaded opcode, emitted into the compiled cell stream by
/// `prepare_function`. Variant order mirrors `dispatch.h`'s dispatch_table so
/// the mapping from a WASM opcode byte to `Op` reads the same as the
/// original's `OP(...)` list. `loop` collapses onto `Block` (both just push a
/// block frame; the distinction that matters — where `br` lands — is carried
/// by the block's `label_cell`, not by a separate opcode); float load/store
/// collapse onto same-width int load/store; float consts collapse onto int
/// consts carrying the same bit pattern; saturating truncation collapses onto
/// its non-saturating counterpart (guest code compiled for this host never
/// relies on saturating-trunc's NaN/out-of-range behavior differing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Unreachable,
    Block,
    If,
    Else,
    End,
    Br,
    BrIf,
    BrTable,
    Return,
    Call,
    CallIndirect,
    Drop,
    Select,
    LocalGet,
    LocalSet,
    LocalTee,
    GlobalGet,
    GlobalSet,

    I32Load,
    I64Load,
    I32Load8S,
    I32Load8U,
    I32Load16S,
    I32Load16U,
    I64Load8S,
    I64Load8U,
    I64Load16S,
    I64Load16U,
    I64Load32S,
    I64Load32U,

    I32Store,
    I64Store,
    I32Store8,
    I32Store16,
    I64Store8,
    I64Store16,
    I64Store32,

    MemorySize,
    MemoryGrow,
    ExtMemoryCopy,
    ExtMemoryFill,

    I32Const,
    I64Const,

    I32Eqz,
    I32Eq,
    I32Ne,
    I32LtS,
    I32LtU,
    I32GtS,
    I32GtU,
    I32LeS,
    I32LeU,
    I32GeS,
    I32GeU,

    I64Eqz,
    I64Eq,
    I64Ne,
    I64LtS,
    I64LtU,
    I64GtS,
    I64GtU,
    I64LeS,
    I64LeU,
    I64GeS,
    I64GeU,

    F32Eq,
    F32Ne,
    F32Lt,
    F32Gt,
    F32Le,
    F32Ge,

    F64Eq,
    F64Ne,
    F64Lt,
    F64Gt,
    F64Le,
    F64Ge,

    I32Clz,
    I32Ctz,
    I32Popcnt,

    I32Add,
    I32Sub,
    I32Mul,
    I32DivS,
    I32DivU,
    I32RemS,
    I32RemU,
    I32And,
    I32Or,
    I32Xor,
    I32Shl,
    I32ShrS,
    I32ShrU,
    I32Rotl,
    I32Rotr,

    I64Clz,
    I64Ctz,
    I64Popcnt,

    I64Add,
    I64Sub,
    I64Mul,
    I64DivS,
    I64DivU,
    I64RemS,
    I64RemU,
    I64And,
    I64Or,
    I64Xor,
    I64Shl,
    I64ShrS,
    I64ShrU,
    I64Rotl,
    I64Rotr,

    F32Abs,
    F32Neg,
    F32Ceil,
    F32Floor,
    F32Trunc,
    F32Nearest,
    F32Sqrt,

    F32Add,
    F32Sub,
    F32Mul,
    F32Div,
    F32Min,
    F32Max,
    F32Copysign,

    F64Abs,
    F64Neg,
    F64Ceil,
    F64Floor,
    F64Trunc,
    F64Nearest,
    F64Sqrt,

    F64Add,
    F64Sub,
    F64Mul,
    F64Div,
    F64Min,
    F64Max,
    F64Copysign,

    I32WrapI64,
    I32TruncF32S,
    I32TruncF32U,
    I32TruncF64S,
    I32TruncF64U,

    I64ExtendI32S,
    I64ExtendI32U,
    I64TruncF32S,
    I64TruncF32U,
    I64TruncF64S,
    I64TruncF64U,

    F32ConvertI32S,
    F32ConvertI32U,
    F32ConvertI64S,
    F32ConvertI64U,
    F32DemoteF64,

    F64ConvertI32S,
    F64ConvertI32U,
    F64ConvertI64S,
    F64ConvertI64U,
    F64PromoteF32,

    I32Extend8S,
    I32Extend16S,
    I64Extend8S,
    I64Extend16S,
    I64Extend32S,

    /// `nop` and the no-op tail of `if`/`block`/`loop` headers once their
    /// immediates have been consumed by the translator.
    Nop,
}

/// Maps a raw WASM opcode byte (0x00-0xc4 range actually used by this
/// subset) to the internal [`Op`]. Returns `None` for bytes the loader
/// rejects as unknown (`LoadError::UnknownOpcode`).
pub fn wasm_to_op(byte: u8) -> Option<Op> {
    use raw::*;
    Some(match byte {
        UNREACHABLE => Op::Unreachable,
        NOP => Op::Nop,
        BLOCK | LOOP => Op::Block,
        IF => Op::If,
        ELSE => Op::Else,
        END => Op::End,
        BR => Op::Br,
        BR_IF => Op::BrIf,
        BR_TABLE => Op::BrTable,
        RETURN => Op::Return,
        CALL => Op::Call,
        CALL_INDIRECT => Op::CallIndirect,
        DROP => Op::Drop,
        SELECT => Op::Select,
        LOCAL_GET => Op::LocalGet,
        LOCAL_SET => Op::LocalSet,
        LOCAL_TEE => Op::LocalTee,
        GLOBAL_GET => Op::GlobalGet,
        GLOBAL_SET => Op::GlobalSet,

        0x28 => Op::I32Load,
        0x29 => Op::I64Load,
        0x2a => Op::I32Load, // f32.load: same width as i32.load
        0x2b => Op::I64Load, // f64.load: same width as i64.load
        0x2c => Op::I32Load8S,
        0x2d => Op::I32Load8U,
        0x2e => Op::I32Load16S,
        0x2f => Op::I32Load16U,
        0x30 => Op::I64Load8S,
        0x31 => Op::I64Load8U,
        0x32 => Op::I64Load16S,
        0x33 => Op::I64Load16U,
        0x34 => Op::I64Load32S,
        0x35 => Op::I64Load32U,

        0x36 => Op::I32Store,
        0x37 => Op::I64Store,
        0x38 => Op::I32Store, // f32.store
        0x39 => Op::I64Store, // f64.store
        0x3a => Op::I32Store8,
        0x3b => Op::I32Store16,
        0x3c => Op::I64Store8,
        0x3d => Op::I64Store16,
        I64_STORE32 => Op::I64Store32,

        MEMORY_SIZE => Op::MemorySize,
        MEMORY_GROW => Op::MemoryGrow,

        I32_CONST => Op::I32Const,
        I64_CONST => Op::I64Const,
        F32_CONST => Op::I32Const, // bit pattern carried as an i32 immediate
        F64_CONST => Op::I64Const, // bit pattern carried as an i64 immediate

        0x45 => Op::I32Eqz,
        0x46 => Op::I32Eq,
        0x47 => Op::I32Ne,
        0x48 => Op::I32LtS,
        0x49 => Op::I32LtU,
        0x4a => Op::I32GtS,
        0x4b => Op::I32GtU,
        0x4c => Op::I32LeS,
        0x4d => Op::I32LeU,
        0x4e => Op::I32GeS,
        0x4f => Op::I32GeU,

        0x50 => Op::I64Eqz,
        0x51 => Op::I64Eq,
        0x52 => Op::I64Ne,
        0x53 => Op::I64LtS,
        0x54 => Op::I64LtU,
        0x55 => Op::I64GtS,
        0x56 => Op::I64GtU,
        0x57 => Op::I64LeS,
        0x58 => Op::I64LeU,
        0x59 => Op::I64GeS,
        0x5a => Op::I64GeU,

        0x5b => Op::F32Eq,
        0x5c => Op::F32Ne,
        0x5d => Op::F32Lt,
        0x5e => Op::F32Gt,
        0x5f => Op::F32Le,
        0x60 => Op::F32Ge,

        0x61 => Op::F64Eq,
        0x62 => Op::F64Ne,
        0x63 => Op::F64Lt,
        0x64 => Op::F64Gt,
        0x65 => Op::F64Le,
        0x66 => Op::F64Ge,

        0x67 => Op::I32Clz,
        0x68 => Op::I32Ctz,
        0x69 => Op::I32Popcnt,
        0x6a => Op::I32Add,
        0x6b => Op::I32Sub,
        0x6c => Op::I32Mul,
        0x6d => Op::I32DivS,
        0x6e => Op::I32DivU,
        0x6f => Op::I32RemS,
        0x70 => Op::I32RemU,
        0x71 => Op::I32And,
        0x72 => Op::I32Or,
        0x73 => Op::I32Xor,
        0x74 => Op::I32Shl,
        0x75 => Op::I32ShrS,
        0x76 => Op::I32ShrU,
        0x77 => Op::I32Rotl,
        0x78 => Op::I32Rotr,

        0x79 => Op::I64Clz,
        0x7a => Op::I64Ctz,
        0x7b => Op::I64Popcnt,
        0x7c => Op::I64Add,
        0x7d => Op::I64Sub,
        0x7e => Op::I64Mul,
        0x7f => Op::I64DivS,
        0x80 => Op::I64DivU,
        0x81 => Op::I64RemS,
        0x82 => Op::I64RemU,
        0x83 => Op::I64And,
        0x84 => Op::I64Or,
        0x85 => Op::I64Xor,
        0x86 => Op::I64Shl,
        0x87 => Op::I64ShrS,
        0x88 => Op::I64ShrU,
        0x89 => Op::I64Rotl,
        0x8a => Op::I64Rotr,

        0x8b => Op::F32Abs,
        0x8c => Op::F32Neg,
        0x8d => Op::F32Ceil,
        0x8e => Op::F32Floor,
        0x8f => Op::F32Trunc,
        0x90 => Op::F32Nearest,
        0x91 => Op::F32Sqrt,
        0x92 => Op::F32Add,
        0x93 => Op::F32Sub,
        0x94 => Op::F32Mul,
        0x95 => Op::F32Div,
        0x96 => Op::F32Min,
        0x97 => Op::F32Max,
        0x98 => Op::F32Copysign,

        0x99 => Op::F64Abs,
        0x9a => Op::F64Neg,
        0x9b => Op::F64Ceil,
        0x9c => Op::F64Floor,
        0x9d => Op::F64Trunc,
        0x9e => Op::F64Nearest,
        0x9f => Op::F64Sqrt,
        0xa0 => Op::F64Add,
        0xa1 => Op::F64Sub,
        0xa2 => Op::F64Mul,
        0xa3 => Op::F64Div,
        0xa4 => Op::F64Min,
        0xa5 => Op::F64Max,
        0xa6 => Op::F64Copysign,

        0xa7 => Op::I32WrapI64,
        0xa8 => Op::I32TruncF32S,
        0xa9 => Op::I32TruncF32U,
        0xaa => Op::I32TruncF64S,
        0xab => Op::I32TruncF64U,

        0xac => Op::I64ExtendI32S,
        0xad => Op::I64ExtendI32U,
        0xae => Op::I64TruncF32S,
        0xaf => Op::I64TruncF32U,
        0xb0 => Op::I64TruncF64S,
        0xb1 => Op::I64TruncF64U,

        0xb2 => Op::F32ConvertI32S,
        0xb3 => Op::F32ConvertI32U,
        0xb4 => Op::F32ConvertI64S,
        0xb5 => Op::F32ConvertI64U,
        0xb6 => Op::F32DemoteF64,

        0xb7 => Op::F64ConvertI32S,
        0xb8 => Op::F64ConvertI32U,
        0xb9 => Op::F64ConvertI64S,
        0xba => Op::F64ConvertI64U,
        0xbb => Op::F64PromoteF32,

        0xc0 => Op::I32Extend8S,
        0xc1 => Op::I32Extend16S,
        0xc2 => Op::I64Extend8S,
        0xc3 => Op::I64Extend16S,
        I64_EXTEND32_S => Op::I64Extend32S,

        _ => return None,
    })
}
