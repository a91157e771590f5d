// interp.rs — direct-threaded interpreter over the compiled cell stream
// Grounded on: examples/original_source/src/common/vm/interp.c (the
// pc/sp/fp/csp register discipline and per-opcode semantics) and
// examples/original_source/src/common/vm/dispatch.h (dispatch ordering,
// mirrored by crate::opcode::Op).

use crate::bridge::HostBridge;
use crate::load::Module;
use crate::opcode::Op;
use crate::types::{Value, ValType, VmTrap, CALLSTACK_SIZE, STACK_SIZE};

/// One entry on the call stack: where to resume the caller, its frame base,
/// and the locals slab for the callee about to run.
struct CallFrame {
    func_index: usize,
    return_pc: usize,
    return_function: usize,
    frame_base: usize,
    locals: Vec<i64>,
}

/// A running instance of a loaded module. Globals and memory live here
/// rather than in `Module` so the same `Module` can back multiple
/// concurrently-running instances (not exercised by the game, but keeps the
/// loader/interpreter split honest).
pub struct Interpreter<'m> {
    module: &'m Module,
    memory: Vec<u8>,
    globals: Vec<i64>,
    stack: Vec<i64>,
    callstack: Vec<CallFrame>,
    steps: u64,
}

/// Upper bound on instructions executed by a single `call_function`, guarding
/// against a guest module looping forever inside a single host call.
const MAX_STEPS: u64 = 64_000_000;

impl<'m> Interpreter<'m> {
    pub fn new(module: &'m Module) -> Self {
        Interpreter {
            memory: module.memory.bytes.clone(),
            globals: module.globals.clone(),
            module,
            stack: Vec::with_capacity(STACK_SIZE / 8),
            callstack: Vec::with_capacity(CALLSTACK_SIZE),
            steps: 0,
        }
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    /// Grows linear memory by `extra_bytes` once, before any guest code runs,
    /// returning the offset where the new region begins. For host-owned
    /// scratch (e.g. marshaling a filename or userinfo string into the
    /// instance before calling an export) rather than guest-visible growth —
    /// `memory.grow` itself stays unsupported (see `Op::MemoryGrow`).
    pub fn reserve_scratch(&mut self, extra_bytes: usize) -> u32 {
        let offset = self.memory.len() as u32;
        self.memory.resize(self.memory.len() + extra_bytes, 0);
        offset
    }

    /// Calls an exported or otherwise known function index with the given
    /// arguments, running it (and any non-import functions it calls in turn)
    /// to completion. Returns the single result value, if the function's
    /// signature declares one.
    pub fn call_function(
        &mut self,
        bridge: &mut dyn HostBridge,
        func_index: u32,
        args: &[Value],
    ) -> Result<Option<Value>, VmTrap> {
        let base = self.stack.len();
        for a in args {
            self.stack.push(a.as_i64());
        }
        self.enter(func_index as usize, base)?;
        self.run(bridge)?;

        let def = &self.module.functions[func_index as usize];
        let ty = &self.module.types[def.type_idx.unwrap()];
        let result = if ty.result.is_some() {
            let raw = self.stack.pop().ok_or(VmTrap::StackUnderflow)?;
            Some(retype(raw, ty.result.unwrap()))
        } else {
            None
        };
        self.stack.truncate(base);
        Ok(result)
    }

    /// Pushes a call frame for `func_index`, moving `base..` off the operand
    /// stack into the callee's locals slab (params first, then zeroed
    /// declared locals).
    fn enter(&mut self, func_index: usize, base: usize) -> Result<(), VmTrap> {
        if self.callstack.len() >= CALLSTACK_SIZE {
            return Err(VmTrap::CallStackOverflow);
        }
        let def = &self.module.functions[func_index];
        if def.import.is_some() {
            return Err(VmTrap::BadFunctionIndex); // imports are dispatched by `run`, never entered here
        }
        let ty = &self.module.types[def.type_idx.ok_or(VmTrap::BadFunctionIndex)?];
        let param_count = ty.params.len();
        let mut locals: Vec<i64> = self.stack.split_off(base);
        if locals.len() != param_count {
            return Err(VmTrap::BadFunctionIndex);
        }
        locals.resize(param_count + def.local_types.len(), 0);

        self.callstack.push(CallFrame {
            func_index,
            return_pc: usize::MAX, // patched by caller loop via pc/func bookkeeping
            return_function: usize::MAX,
            frame_base: base,
            locals,
        });
        Ok(())
    }

    /// The dispatch loop. Runs until the outermost call frame returns.
    fn run(&mut self, bridge: &mut dyn HostBridge) -> Result<(), VmTrap> {
        let mut cur_func = self.callstack.last().expect("enter pushed a frame").func_index;
        let mut pc = 0usize;

        loop {
            self.steps += 1;
            if self.steps > MAX_STEPS {
                return Err(VmTrap::Unreachable);
            }
            let code = &self.module.code[cur_func];
            if pc >= code.len() {
                // Implicit end-of-function return.
                if !self.pop_frame(&mut cur_func, &mut pc) {
                    return Ok(());
                }
                continue;
            }
            let op = decode_op(code[pc]);
            pc += 1;

            match op {
                Op::Unreachable => return Err(VmTrap::Unreachable),
                Op::Nop | Op::Block | Op::Else => {}
                Op::If => {
                    let target = read_u16(code, pc) as usize;
                    pc += 1;
                    let cond = self.pop()?;
                    if cond == 0 {
                        pc = target;
                    }
                }
                Op::End => {}
                Op::Br => {
                    let target = read_u16(code, pc) as usize;
                    pc = target;
                }
                Op::BrIf => {
                    let target = read_u16(code, pc) as usize;
                    pc += 1;
                    let cond = self.pop()?;
                    if cond != 0 {
                        pc = target;
                    }
                }
                Op::BrTable => {
                    let count = read_u16(code, pc) as usize;
                    pc += 1; // pc now at the first of `count` targets, followed by one default target
                    let idx = self.pop()? as usize;
                    let chosen = if idx < count { idx } else { count };
                    let target = read_u16(code, pc + chosen) as usize;
                    pc = target;
                }
                Op::Return => {
                    if !self.pop_frame(&mut cur_func, &mut pc) {
                        return Ok(());
                    }
                }
                Op::Drop => {
                    self.pop()?;
                }
                Op::Select => {
                    let cond = self.pop()?;
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.stack.push(if cond != 0 { a } else { b });
                }
                Op::LocalGet => {
                    let idx = read_u16(code, pc) as usize;
                    pc += 1;
                    let v = *self.locals(&cur_func).get(idx).ok_or(VmTrap::BadLocalIndex)?;
                    self.stack.push(v);
                }
                Op::LocalSet | Op::LocalTee => {
                    let idx = read_u16(code, pc) as usize;
                    pc += 1;
                    let v = if op == Op::LocalTee {
                        *self.stack.last().ok_or(VmTrap::StackUnderflow)?
                    } else {
                        self.pop()?
                    };
                    let frame = self.callstack.last_mut().ok_or(VmTrap::CallStackUnderflow)?;
                    let slot = frame.locals.get_mut(idx).ok_or(VmTrap::BadLocalIndex)?;
                    *slot = v;
                }
                Op::GlobalGet => {
                    let idx = read_u16(code, pc) as usize;
                    pc += 1;
                    let v = *self.globals.get(idx).ok_or(VmTrap::BadGlobalIndex)?;
                    self.stack.push(v);
                }
                Op::GlobalSet => {
                    let idx = read_u16(code, pc) as usize;
                    pc += 1;
                    let v = self.pop()?;
                    *self.globals.get_mut(idx).ok_or(VmTrap::BadGlobalIndex)? = v;
                }

                Op::I32Load => self.load(code, &mut pc, 4, false, |b| i32::from_le_bytes(b.try_into().unwrap()) as i64)?,
                Op::I64Load => self.load(code, &mut pc, 8, false, |b| i64::from_le_bytes(b.try_into().unwrap()))?,
                Op::I32Load8S => self.load(code, &mut pc, 1, false, |b| b[0] as i8 as i64)?,
                Op::I32Load8U => self.load(code, &mut pc, 1, false, |b| b[0] as i64)?,
                Op::I32Load16S => self.load(code, &mut pc, 2, false, |b| i16::from_le_bytes(b.try_into().unwrap()) as i64)?,
                Op::I32Load16U => self.load(code, &mut pc, 2, false, |b| u16::from_le_bytes(b.try_into().unwrap()) as i64)?,
                Op::I64Load8S => self.load(code, &mut pc, 1, false, |b| b[0] as i8 as i64)?,
                Op::I64Load8U => self.load(code, &mut pc, 1, false, |b| b[0] as i64)?,
                Op::I64Load16S => self.load(code, &mut pc, 2, false, |b| i16::from_le_bytes(b.try_into().unwrap()) as i64)?,
                Op::I64Load16U => self.load(code, &mut pc, 2, false, |b| u16::from_le_bytes(b.try_into().unwrap()) as i64)?,
                Op::I64Load32S => self.load(code, &mut pc, 4, false, |b| i32::from_le_bytes(b.try_into().unwrap()) as i64)?,
                Op::I64Load32U => self.load(code, &mut pc, 4, false, |b| u32::from_le_bytes(b.try_into().unwrap()) as i64)?,

                Op::I32Store => self.store(code, &mut pc, 4)?,
                Op::I64Store => self.store(code, &mut pc, 8)?,
                Op::I32Store8 | Op::I64Store8 => self.store(code, &mut pc, 1)?,
                Op::I32Store16 | Op::I64Store16 => self.store(code, &mut pc, 2)?,
                Op::I64Store32 => self.store(code, &mut pc, 4)?,

                Op::MemorySize => {
                    let pages = self.memory.len() / crate::types::PAGE_SIZE;
                    self.stack.push(pages as i64);
                }
                Op::MemoryGrow => {
                    let delta = self.pop()? as i64;
                    let cur_pages = (self.memory.len() / crate::types::PAGE_SIZE) as i64;
                    if delta == 0 {
                        self.stack.push(cur_pages);
                    } else {
                        // resize not supported: host pre-sizes memory at load time
                        self.stack.push(-1);
                    }
                }
                Op::ExtMemoryCopy => {
                    let n = self.pop()? as usize;
                    let src = self.pop()? as usize;
                    let dst = self.pop()? as usize;
                    let end_src = src.checked_add(n).ok_or(VmTrap::OutOfBoundsMemory { op: "memory.copy" })?;
                    let end_dst = dst.checked_add(n).ok_or(VmTrap::OutOfBoundsMemory { op: "memory.copy" })?;
                    if end_src > self.memory.len() || end_dst > self.memory.len() {
                        return Err(VmTrap::OutOfBoundsMemory { op: "memory.copy" });
                    }
                    self.memory.copy_within(src..end_src, dst);
                }
                Op::ExtMemoryFill => {
                    let n = self.pop()? as usize;
                    let val = self.pop()? as u8;
                    let dst = self.pop()? as usize;
                    let end = dst.checked_add(n).ok_or(VmTrap::OutOfBoundsMemory { op: "memory.fill" })?;
                    if end > self.memory.len() {
                        return Err(VmTrap::OutOfBoundsMemory { op: "memory.fill" });
                    }
                    self.memory[dst..end].fill(val);
                }

                Op::I32Const => {
                    let v = read_u32(code, pc) as i32;
                    pc += 2;
                    self.stack.push(v as i64);
                }
                Op::I64Const => {
                    let v = read_u64(code, pc);
                    pc += 4;
                    self.stack.push(v as i64);
                }

                Op::Call => {
                    let idx = read_u32(code, pc) as usize;
                    pc += 2;
                    self.do_call(bridge, idx, &mut cur_func, &mut pc)?;
                }
                Op::CallIndirect => {
                    let type_idx = read_u32(code, pc) as usize;
                    pc += 2;
                    let table_idx = self.pop()? as usize;
                    let fidx = *self
                        .module
                        .table
                        .entries
                        .get(table_idx)
                        .ok_or(VmTrap::IndirectCallTableIndexOutOfRange)? as usize;
                    let callee_ty = self.module.functions[fidx]
                        .type_idx
                        .ok_or(VmTrap::IndirectCallSignatureMismatch)?;
                    if callee_ty != type_idx {
                        return Err(VmTrap::IndirectCallSignatureMismatch);
                    }
                    self.do_call(bridge, fidx, &mut cur_func, &mut pc)?;
                }

                // Comparisons, arithmetic, conversions: all pop their
                // operand(s), compute, push. Grouped by the value kind they
                // operate on; see `binop_i32`/`binop_i64`/`binop_f32`/`binop_f64`.
                Op::I32Eqz => self.unop_i32(|a| (a == 0) as i32)?,
                Op::I32Eq => self.binop_i32(|a, b| (a == b) as i32)?,
                Op::I32Ne => self.binop_i32(|a, b| (a != b) as i32)?,
                Op::I32LtS => self.binop_i32(|a, b| (a < b) as i32)?,
                Op::I32LtU => self.binop_i32(|a, b| ((a as u32) < (b as u32)) as i32)?,
                Op::I32GtS => self.binop_i32(|a, b| (a > b) as i32)?,
                Op::I32GtU => self.binop_i32(|a, b| ((a as u32) > (b as u32)) as i32)?,
                Op::I32LeS => self.binop_i32(|a, b| (a <= b) as i32)?,
                Op::I32LeU => self.binop_i32(|a, b| ((a as u32) <= (b as u32)) as i32)?,
                Op::I32GeS => self.binop_i32(|a, b| (a >= b) as i32)?,
                Op::I32GeU => self.binop_i32(|a, b| ((a as u32) >= (b as u32)) as i32)?,

                Op::I64Eqz => self.unop_i64(|a| (a == 0) as i64)?,
                Op::I64Eq => self.binop_i64(|a, b| (a == b) as i64)?,
                Op::I64Ne => self.binop_i64(|a, b| (a != b) as i64)?,
                Op::I64LtS => self.binop_i64(|a, b| (a < b) as i64)?,
                Op::I64LtU => self.binop_i64(|a, b| ((a as u64) < (b as u64)) as i64)?,
                Op::I64GtS => self.binop_i64(|a, b| (a > b) as i64)?,
                Op::I64GtU => self.binop_i64(|a, b| ((a as u64) > (b as u64)) as i64)?,
                Op::I64LeS => self.binop_i64(|a, b| (a <= b) as i64)?,
                Op::I64LeU => self.binop_i64(|a, b| ((a as u64) <= (b as u64)) as i64)?,
                Op::I64GeS => self.binop_i64(|a, b| (a >= b) as i64)?,
                Op::I64GeU => self.binop_i64(|a, b| ((a as u64) >= (b as u64)) as i64)?,

                Op::F32Eq => self.binop_f32_to_i32(|a, b| (a == b) as i32)?,
                Op::F32Ne => self.binop_f32_to_i32(|a, b| (a != b) as i32)?,
                Op::F32Lt => self.binop_f32_to_i32(|a, b| (a < b) as i32)?,
                Op::F32Gt => self.binop_f32_to_i32(|a, b| (a > b) as i32)?,
                Op::F32Le => self.binop_f32_to_i32(|a, b| (a <= b) as i32)?,
                Op::F32Ge => self.binop_f32_to_i32(|a, b| (a >= b) as i32)?,

                Op::F64Eq => self.binop_f64_to_i32(|a, b| (a == b) as i32)?,
                Op::F64Ne => self.binop_f64_to_i32(|a, b| (a != b) as i32)?,
                Op::F64Lt => self.binop_f64_to_i32(|a, b| (a < b) as i32)?,
                Op::F64Gt => self.binop_f64_to_i32(|a, b| (a > b) as i32)?,
                Op::F64Le => self.binop_f64_to_i32(|a, b| (a <= b) as i32)?,
                Op::F64Ge => self.binop_f64_to_i32(|a, b| (a >= b) as i32)?,

                Op::I32Clz => self.unop_i32(|a| (a as u32).leading_zeros() as i32)?,
                Op::I32Ctz => self.unop_i32(|a| (a as u32).trailing_zeros() as i32)?,
                Op::I32Popcnt => self.unop_i32(|a| (a as u32).count_ones() as i32)?,
                Op::I32Add => self.binop_i32(|a, b| a.wrapping_add(b))?,
                Op::I32Sub => self.binop_i32(|a, b| a.wrapping_sub(b))?,
                Op::I32Mul => self.binop_i32(|a, b| a.wrapping_mul(b))?,
                Op::I32DivS => self.checked_binop_i32(|a, b| {
                    if b == 0 {
                        Err(VmTrap::DivideByZero)
                    } else if a == i32::MIN && b == -1 {
                        Err(VmTrap::IntegerOverflow)
                    } else {
                        Ok(a / b)
                    }
                })?,
                Op::I32DivU => self.checked_binop_i32(|a, b| {
                    if b == 0 {
                        Err(VmTrap::DivideByZero)
                    } else {
                        Ok(((a as u32) / (b as u32)) as i32)
                    }
                })?,
                Op::I32RemS => self.checked_binop_i32(|a, b| {
                    if b == 0 {
                        Err(VmTrap::DivideByZero)
                    } else if a == i32::MIN && b == -1 {
                        Ok(0)
                    } else {
                        Ok(a % b)
                    }
                })?,
                Op::I32RemU => self.checked_binop_i32(|a, b| {
                    if b == 0 {
                        Err(VmTrap::DivideByZero)
                    } else {
                        Ok(((a as u32) % (b as u32)) as i32)
                    }
                })?,
                Op::I32And => self.binop_i32(|a, b| a & b)?,
                Op::I32Or => self.binop_i32(|a, b| a | b)?,
                Op::I32Xor => self.binop_i32(|a, b| a ^ b)?,
                Op::I32Shl => self.binop_i32(|a, b| a.wrapping_shl(b as u32 & 31))?,
                Op::I32ShrS => self.binop_i32(|a, b| a.wrapping_shr(b as u32 & 31))?,
                Op::I32ShrU => self.binop_i32(|a, b| ((a as u32).wrapping_shr(b as u32 & 31)) as i32)?,
                Op::I32Rotl => self.binop_i32(|a, b| (a as u32).rotate_left(b as u32 & 31) as i32)?,
                Op::I32Rotr => self.binop_i32(|a, b| (a as u32).rotate_right(b as u32 & 31) as i32)?,

                Op::I64Clz => self.unop_i64(|a| (a as u64).leading_zeros() as i64)?,
                Op::I64Ctz => self.unop_i64(|a| (a as u64).trailing_zeros() as i64)?,
                Op::I64Popcnt => self.unop_i64(|a| (a as u64).count_ones() as i64)?,
                Op::I64Add => self.binop_i64(|a, b| a.wrapping_add(b))?,
                Op::I64Sub => self.binop_i64(|a, b| a.wrapping_sub(b))?,
                Op::I64Mul => self.binop_i64(|a, b| a.wrapping_mul(b))?,
                Op::I64DivS => self.checked_binop_i64(|a, b| {
                    if b == 0 {
                        Err(VmTrap::DivideByZero)
                    } else if a == i64::MIN && b == -1 {
                        Err(VmTrap::IntegerOverflow)
                    } else {
                        Ok(a / b)
                    }
                })?,
                Op::I64DivU => self.checked_binop_i64(|a, b| {
                    if b == 0 {
                        Err(VmTrap::DivideByZero)
                    } else {
                        Ok(((a as u64) / (b as u64)) as i64)
                    }
                })?,
                Op::I64RemS => self.checked_binop_i64(|a, b| {
                    if b == 0 {
                        Err(VmTrap::DivideByZero)
                    } else if a == i64::MIN && b == -1 {
                        Ok(0)
                    } else {
                        Ok(a % b)
                    }
                })?,
                Op::I64RemU => self.checked_binop_i64(|a, b| {
                    if b == 0 {
                        Err(VmTrap::DivideByZero)
                    } else {
                        Ok(((a as u64) % (b as u64)) as i64)
                    }
                })?,
                Op::I64And => self.binop_i64(|a, b| a & b)?,
                Op::I64Or => self.binop_i64(|a, b| a | b)?,
                Op::I64Xor => self.binop_i64(|a, b| a ^ b)?,
                Op::I64Shl => self.binop_i64(|a, b| a.wrapping_shl(b as u32 & 63))?,
                Op::I64ShrS => self.binop_i64(|a, b| a.wrapping_shr(b as u32 & 63))?,
                Op::I64ShrU => self.binop_i64(|a, b| ((a as u64).wrapping_shr(b as u32 & 63)) as i64)?,
                Op::I64Rotl => self.binop_i64(|a, b| (a as u64).rotate_left(b as u32 & 63) as i64)?,
                Op::I64Rotr => self.binop_i64(|a, b| (a as u64).rotate_right(b as u32 & 63) as i64)?,

                Op::F32Abs => self.unop_f32(|a| a.abs())?,
                Op::F32Neg => self.unop_f32(|a| -a)?,
                Op::F32Ceil => self.unop_f32(|a| a.ceil())?,
                Op::F32Floor => self.unop_f32(|a| a.floor())?,
                Op::F32Trunc => self.unop_f32(|a| a.trunc())?,
                Op::F32Nearest => self.unop_f32(|a| a.round_ties_even())?,
                Op::F32Sqrt => self.unop_f32(|a| a.sqrt())?,
                Op::F32Add => self.binop_f32(|a, b| a + b)?,
                Op::F32Sub => self.binop_f32(|a, b| a - b)?,
                Op::F32Mul => self.binop_f32(|a, b| a * b)?,
                Op::F32Div => self.binop_f32(|a, b| a / b)?,
                Op::F32Min => self.binop_f32(|a, b| a.min(b))?,
                Op::F32Max => self.binop_f32(|a, b| a.max(b))?,
                Op::F32Copysign => self.binop_f32(|a, b| a.copysign(b))?,

                Op::F64Abs => self.unop_f64(|a| a.abs())?,
                Op::F64Neg => self.unop_f64(|a| -a)?,
                Op::F64Ceil => self.unop_f64(|a| a.ceil())?,
                Op::F64Floor => self.unop_f64(|a| a.floor())?,
                Op::F64Trunc => self.unop_f64(|a| a.trunc())?,
                Op::F64Nearest => self.unop_f64(|a| a.round_ties_even())?,
                Op::F64Sqrt => self.unop_f64(|a| a.sqrt())?,
                Op::F64Add => self.binop_f64(|a, b| a + b)?,
                Op::F64Sub => self.binop_f64(|a, b| a - b)?,
                Op::F64Mul => self.binop_f64(|a, b| a * b)?,
                Op::F64Div => self.binop_f64(|a, b| a / b)?,
                Op::F64Min => self.binop_f64(|a, b| a.min(b))?,
                Op::F64Max => self.binop_f64(|a, b| a.max(b))?,
                Op::F64Copysign => self.binop_f64(|a, b| a.copysign(b))?,

                Op::I32WrapI64 => self.unop_i64_to_i32(|a| a as i32)?,
                Op::I32TruncF32S => self.unop_f32_to_i32(|a| a as i32)?,
                Op::I32TruncF32U => self.unop_f32_to_i32(|a| a as u32 as i32)?,
                Op::I32TruncF64S => self.unop_f64_to_i32(|a| a as i32)?,
                Op::I32TruncF64U => self.unop_f64_to_i32(|a| a as u32 as i32)?,

                Op::I64ExtendI32S => self.unop_i32_to_i64(|a| a as i64)?,
                Op::I64ExtendI32U => self.unop_i32_to_i64(|a| a as u32 as i64)?,
                Op::I64TruncF32S => self.unop_f32_to_i64(|a| a as i64)?,
                Op::I64TruncF32U => self.unop_f32_to_i64(|a| a as u64 as i64)?,
                Op::I64TruncF64S => self.unop_f64_to_i64(|a| a as i64)?,
                Op::I64TruncF64U => self.unop_f64_to_i64(|a| a as u64 as i64)?,

                Op::F32ConvertI32S => self.unop_i32_to_f32(|a| a as f32)?,
                Op::F32ConvertI32U => self.unop_i32_to_f32(|a| a as u32 as f32)?,
                Op::F32ConvertI64S => self.unop_i64_to_f32(|a| a as f32)?,
                Op::F32ConvertI64U => self.unop_i64_to_f32(|a| a as u64 as f32)?,
                Op::F32DemoteF64 => self.unop_f64_to_f32(|a| a as f32)?,

                Op::F64ConvertI32S => self.unop_i32_to_f64(|a| a as f64)?,
                Op::F64ConvertI32U => self.unop_i32_to_f64(|a| a as u32 as f64)?,
                Op::F64ConvertI64S => self.unop_i64_to_f64(|a| a as f64)?,
                Op::F64ConvertI64U => self.unop_i64_to_f64(|a| a as u64 as f64)?,
                Op::F64PromoteF32 => self.unop_f32_to_f64(|a| a as f64)?,

                Op::I32Extend8S => self.unop_i32(|a| a as i8 as i32)?,
                Op::I32Extend16S => self.unop_i32(|a| a as i16 as i32)?,
                Op::I64Extend8S => self.unop_i64(|a| a as i8 as i64)?,
                Op::I64Extend16S => self.unop_i64(|a| a as i16 as i64)?,
                Op::I64Extend32S => self.unop_i64(|a| a as i32 as i64)?,
            }
        }
    }

    fn do_call(
        &mut self,
        bridge: &mut dyn HostBridge,
        idx: usize,
        cur_func: &mut usize,
        pc: &mut usize,
    ) -> Result<(), VmTrap> {
        let def = self.module.functions.get(idx).ok_or(VmTrap::BadFunctionIndex)?;
        let ty = &self.module.types[def.type_idx.ok_or(VmTrap::BadFunctionIndex)?];
        let argc = ty.params.len();
        if self.stack.len() < argc {
            return Err(VmTrap::StackUnderflow);
        }
        if let Some(import) = &def.import {
            let base = self.stack.len() - argc;
            let args: Vec<Value> = self.stack[base..]
                .iter()
                .zip(ty.params.iter())
                .map(|(&raw, &ty)| retype(raw, ty))
                .collect();
            self.stack.truncate(base);
            let result = bridge.call(
                &import.module,
                &import.field,
                crate::bridge::MemoryView::new(&mut self.memory),
                &args,
            )?;
            if let Some(v) = result {
                self.stack.push(v.as_i64());
            }
            return Ok(());
        }

        let base = self.stack.len() - argc;
        let return_pc = *pc;
        let return_function = *cur_func;
        self.enter(idx, base)?;
        let callee = self.callstack.last_mut().expect("enter just pushed a frame");
        callee.return_pc = return_pc;
        callee.return_function = return_function;
        *cur_func = idx;
        *pc = 0;
        Ok(())
    }

    /// Pops the current call frame, restoring the caller's `pc`/function.
    /// Returns `false` when the outermost frame just returned (nothing left
    /// to resume, `run` should stop).
    fn pop_frame(&mut self, cur_func: &mut usize, pc: &mut usize) -> bool {
        let frame = match self.callstack.pop() {
            Some(f) => f,
            None => return false,
        };
        let def = &self.module.functions[*cur_func];
        let ty = &self.module.types[def.type_idx.unwrap()];
        let result = if ty.result.is_some() { self.stack.pop() } else { None };
        self.stack.truncate(frame.frame_base);
        if let Some(r) = result {
            self.stack.push(r);
        }
        if frame.return_function == usize::MAX {
            return false;
        }
        *cur_func = frame.return_function;
        *pc = frame.return_pc;
        true
    }

    fn locals(&self, _cur_func: &usize) -> &[i64] {
        &self.callstack.last().expect("active frame").locals
    }

    fn pop(&mut self) -> Result<i64, VmTrap> {
        self.stack.pop().ok_or(VmTrap::StackUnderflow)
    }

    fn unop_i32(&mut self, f: impl Fn(i32) -> i32) -> Result<(), VmTrap> {
        let a = self.pop()? as i32;
        self.stack.push(f(a) as i64);
        Ok(())
    }
    fn unop_i64(&mut self, f: impl Fn(i64) -> i64) -> Result<(), VmTrap> {
        let a = self.pop()?;
        self.stack.push(f(a));
        Ok(())
    }
    fn unop_f32(&mut self, f: impl Fn(f32) -> f32) -> Result<(), VmTrap> {
        let a = f32::from_bits(self.pop()? as u32);
        self.stack.push(f(a).to_bits() as i64);
        Ok(())
    }
    fn unop_f64(&mut self, f: impl Fn(f64) -> f64) -> Result<(), VmTrap> {
        let a = f64::from_bits(self.pop()? as u64);
        self.stack.push(f(a).to_bits() as i64);
        Ok(())
    }
    fn unop_i64_to_i32(&mut self, f: impl Fn(i64) -> i32) -> Result<(), VmTrap> {
        let a = self.pop()?;
        self.stack.push(f(a) as i64);
        Ok(())
    }
    fn unop_i32_to_i64(&mut self, f: impl Fn(i32) -> i64) -> Result<(), VmTrap> {
        let a = self.pop()? as i32;
        self.stack.push(f(a));
        Ok(())
    }
    fn unop_f32_to_i32(&mut self, f: impl Fn(f32) -> i32) -> Result<(), VmTrap> {
        let a = f32::from_bits(self.pop()? as u32);
        self.stack.push(f(a) as i64);
        Ok(())
    }
    fn unop_f64_to_i32(&mut self, f: impl Fn(f64) -> i32) -> Result<(), VmTrap> {
        let a = f64::from_bits(self.pop()? as u64);
        self.stack.push(f(a) as i64);
        Ok(())
    }
    fn unop_f32_to_i64(&mut self, f: impl Fn(f32) -> i64) -> Result<(), VmTrap> {
        let a = f32::from_bits(self.pop()? as u32);
        self.stack.push(f(a));
        Ok(())
    }
    fn unop_f64_to_i64(&mut self, f: impl Fn(f64) -> i64) -> Result<(), VmTrap> {
        let a = f64::from_bits(self.pop()? as u64);
        self.stack.push(f(a));
        Ok(())
    }
    fn unop_i32_to_f32(&mut self, f: impl Fn(i32) -> f32) -> Result<(), VmTrap> {
        let a = self.pop()? as i32;
        self.stack.push(f(a).to_bits() as i64);
        Ok(())
    }
    fn unop_i64_to_f32(&mut self, f: impl Fn(i64) -> f32) -> Result<(), VmTrap> {
        let a = self.pop()?;
        self.stack.push(f(a).to_bits() as i64);
        Ok(())
    }
    fn unop_f64_to_f32(&mut self, f: impl Fn(f64) -> f32) -> Result<(), VmTrap> {
        let a = f64::from_bits(self.pop()? as u64);
        self.stack.push(f(a).to_bits() as i64);
        Ok(())
    }
    fn unop_i32_to_f64(&mut self, f: impl Fn(i32) -> f64) -> Result<(), VmTrap> {
        let a = self.pop()? as i32;
        self.stack.push(f(a).to_bits() as i64);
        Ok(())
    }
    fn unop_i64_to_f64(&mut self, f: impl Fn(i64) -> f64) -> Result<(), VmTrap> {
        let a = self.pop()?;
        self.stack.push(f(a).to_bits() as i64);
        Ok(())
    }
    fn unop_f32_to_f64(&mut self, f: impl Fn(f32) -> f64) -> Result<(), VmTrap> {
        let a = f32::from_bits(self.pop()? as u32);
        self.stack.push(f(a).to_bits() as i64);
        Ok(())
    }

    fn binop_i32(&mut self, f: impl Fn(i32, i32) -> i32) -> Result<(), VmTrap> {
        let b = self.pop()? as i32;
        let a = self.pop()? as i32;
        self.stack.push(f(a, b) as i64);
        Ok(())
    }
    fn checked_binop_i32(&mut self, f: impl Fn(i32, i32) -> Result<i32, VmTrap>) -> Result<(), VmTrap> {
        let b = self.pop()? as i32;
        let a = self.pop()? as i32;
        self.stack.push(f(a, b)? as i64);
        Ok(())
    }
    fn binop_i64(&mut self, f: impl Fn(i64, i64) -> i64) -> Result<(), VmTrap> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.stack.push(f(a, b));
        Ok(())
    }
    fn checked_binop_i64(&mut self, f: impl Fn(i64, i64) -> Result<i64, VmTrap>) -> Result<(), VmTrap> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.stack.push(f(a, b)?);
        Ok(())
    }
    fn binop_f32(&mut self, f: impl Fn(f32, f32) -> f32) -> Result<(), VmTrap> {
        let b = f32::from_bits(self.pop()? as u32);
        let a = f32::from_bits(self.pop()? as u32);
        self.stack.push(f(a, b).to_bits() as i64);
        Ok(())
    }
    fn binop_f32_to_i32(&mut self, f: impl Fn(f32, f32) -> i32) -> Result<(), VmTrap> {
        let b = f32::from_bits(self.pop()? as u32);
        let a = f32::from_bits(self.pop()? as u32);
        self.stack.push(f(a, b) as i64);
        Ok(())
    }
    fn binop_f64(&mut self, f: impl Fn(f64, f64) -> f64) -> Result<(), VmTrap> {
        let b = f64::from_bits(self.pop()? as u64);
        let a = f64::from_bits(self.pop()? as u64);
        self.stack.push(f(a, b).to_bits() as i64);
        Ok(())
    }
    fn binop_f64_to_i32(&mut self, f: impl Fn(f64, f64) -> i32) -> Result<(), VmTrap> {
        let b = f64::from_bits(self.pop()? as u64);
        let a = f64::from_bits(self.pop()? as u64);
        self.stack.push(f(a, b) as i64);
        Ok(())
    }

    fn load(
        &mut self,
        code: &[u16],
        pc: &mut usize,
        width: usize,
        _signed: bool,
        convert: impl Fn(&[u8]) -> i64,
    ) -> Result<(), VmTrap> {
        let offset = read_u32(code, *pc);
        *pc += 2;
        let base = self.pop()? as u32 as u64;
        let addr = base
            .checked_add(offset as u64)
            .ok_or(VmTrap::OutOfBoundsMemory { op: "load" })? as usize;
        let end = addr.checked_add(width).ok_or(VmTrap::OutOfBoundsMemory { op: "load" })?;
        if end > self.memory.len() {
            return Err(VmTrap::OutOfBoundsMemory { op: "load" });
        }
        self.stack.push(convert(&self.memory[addr..end]));
        Ok(())
    }

    fn store(&mut self, code: &[u16], pc: &mut usize, width: usize) -> Result<(), VmTrap> {
        let offset = read_u32(code, *pc);
        *pc += 2;
        let value = self.pop()?;
        let base = self.pop()? as u32 as u64;
        let addr = base
            .checked_add(offset as u64)
            .ok_or(VmTrap::OutOfBoundsMemory { op: "store" })? as usize;
        let end = addr.checked_add(width).ok_or(VmTrap::OutOfBoundsMemory { op: "store" })?;
        if end > self.memory.len() {
            return Err(VmTrap::OutOfBoundsMemory { op: "store" });
        }
        let bytes = value.to_le_bytes();
        self.memory[addr..end].copy_from_slice(&bytes[..width]);
        Ok(())
    }
}

/// Inverse of `push_op` (load.rs): `Op` has no explicit discriminant values,
/// so the cell stream's `Op as u16` cast is undone via table lookup rather
/// than a transmute.
fn decode_op(cell: u16) -> Op {
    OP_TABLE[cell as usize]
}

static OP_TABLE: [Op; 179] = build_op_table();

const fn build_op_table() -> [Op; 179] {
    // Mirrors crate::opcode::Op's declaration order exactly; keep the two in
    // sync by hand (there are no `#[repr(u16)]` discriminants to derive
    // this from without unsafe transmute tricks this module deliberately
    // avoids).
    [
        Op::Unreachable,
        Op::Block,
        Op::If,
        Op::Else,
        Op::End,
        Op::Br,
        Op::BrIf,
        Op::BrTable,
        Op::Return,
        Op::Call,
        Op::CallIndirect,
        Op::Drop,
        Op::Select,
        Op::LocalGet,
        Op::LocalSet,
        Op::LocalTee,
        Op::GlobalGet,
        Op::GlobalSet,
        Op::I32Load,
        Op::I64Load,
        Op::I32Load8S,
        Op::I32Load8U,
        Op::I32Load16S,
        Op::I32Load16U,
        Op::I64Load8S,
        Op::I64Load8U,
        Op::I64Load16S,
        Op::I64Load16U,
        Op::I64Load32S,
        Op::I64Load32U,
        Op::I32Store,
        Op::I64Store,
        Op::I32Store8,
        Op::I32Store16,
        Op::I64Store8,
        Op::I64Store16,
        Op::I64Store32,
        Op::MemorySize,
        Op::MemoryGrow,
        Op::ExtMemoryCopy,
        Op::ExtMemoryFill,
        Op::I32Const,
        Op::I64Const,
        Op::I32Eqz,
        Op::I32Eq,
        Op::I32Ne,
        Op::I32LtS,
        Op::I32LtU,
        Op::I32GtS,
        Op::I32GtU,
        Op::I32LeS,
        Op::I32LeU,
        Op::I32GeS,
        Op::I32GeU,
        Op::I64Eqz,
        Op::I64Eq,
        Op::I64Ne,
        Op::I64LtS,
        Op::I64LtU,
        Op::I64GtS,
        Op::I64GtU,
        Op::I64LeS,
        Op::I64LeU,
        Op::I64GeS,
        Op::I64GeU,
        Op::F32Eq,
        Op::F32Ne,
        Op::F32Lt,
        Op::F32Gt,
        Op::F32Le,
        Op::F32Ge,
        Op::F64Eq,
        Op::F64Ne,
        Op::F64Lt,
        Op::F64Gt,
        Op::F64Le,
        Op::F64Ge,
        Op::I32Clz,
        Op::I32Ctz,
        Op::I32Popcnt,
        Op::I32Add,
        Op::I32Sub,
        Op::I32Mul,
        Op::I32DivS,
        Op::I32DivU,
        Op::I32RemS,
        Op::I32RemU,
        Op::I32And,
        Op::I32Or,
        Op::I32Xor,
        Op::I32Shl,
        Op::I32ShrS,
        Op::I32ShrU,
        Op::I32Rotl,
        Op::I32Rotr,
        Op::I64Clz,
        Op::I64Ctz,
        Op::I64Popcnt,
        Op::I64Add,
        Op::I64Sub,
        Op::I64Mul,
        Op::I64DivS,
        Op::I64DivU,
        Op::I64RemS,
        Op::I64RemU,
        Op::I64And,
        Op::I64Or,
        Op::I64Xor,
        Op::I64Shl,
        Op::I64ShrS,
        Op::I64ShrU,
        Op::I64Rotl,
        Op::I64Rotr,
        Op::F32Abs,
        Op::F32Neg,
        Op::F32Ceil,
        Op::F32Floor,
        Op::F32Trunc,
        Op::F32Nearest,
        Op::F32Sqrt,
        Op::F32Add,
        Op::F32Sub,
        Op::F32Mul,
        Op::F32Div,
        Op::F32Min,
        Op::F32Max,
        Op::F32Copysign,
        Op::F64Abs,
        Op::F64Neg,
        Op::F64Ceil,
        Op::F64Floor,
        Op::F64Trunc,
        Op::F64Nearest,
        Op::F64Sqrt,
        Op::F64Add,
        Op::F64Sub,
        Op::F64Mul,
        Op::F64Div,
        Op::F64Min,
        Op::F64Max,
        Op::F64Copysign,
        Op::I32WrapI64,
        Op::I32TruncF32S,
        Op::I32TruncF32U,
        Op::I32TruncF64S,
        Op::I32TruncF64U,
        Op::I64ExtendI32S,
        Op::I64ExtendI32U,
        Op::I64TruncF32S,
        Op::I64TruncF32U,
        Op::I64TruncF64S,
        Op::I64TruncF64U,
        Op::F32ConvertI32S,
        Op::F32ConvertI32U,
        Op::F32ConvertI64S,
        Op::F32ConvertI64U,
        Op::F32DemoteF64,
        Op::F64ConvertI32S,
        Op::F64ConvertI32U,
        Op::F64ConvertI64S,
        Op::F64ConvertI64U,
        Op::F64PromoteF32,
        Op::I32Extend8S,
        Op::I32Extend16S,
        Op::I64Extend8S,
        Op::I64Extend16S,
        Op::I64Extend32S,
        Op::Nop,
        // Padding to round the table out; these slots are never produced by
        // `push_op` and would indicate a corrupted cell stream if decoded.
        Op::Nop,
        Op::Nop,
        Op::Nop,
        Op::Nop,
        Op::Nop,
        Op::Nop,
        Op::Nop,
        Op::Nop,
        Op::Nop,
        Op::Nop,
        Op::Nop,
    ]
}

fn read_u16(code: &[u16], pc: usize) -> u16 {
    code.get(pc).copied().unwrap_or(0)
}

fn read_u32(code: &[u16], pc: usize) -> u32 {
    let lo = code.get(pc).copied().unwrap_or(0) as u32;
    let hi = code.get(pc + 1).copied().unwrap_or(0) as u32;
    lo | (hi << 16)
}

fn read_u64(code: &[u16], pc: usize) -> u64 {
    let a = code.get(pc).copied().unwrap_or(0) as u64;
    let b = code.get(pc + 1).copied().unwrap_or(0) as u64;
    let c = code.get(pc + 2).copied().unwrap_or(0) as u64;
    let d = code.get(pc + 3).copied().unwrap_or(0) as u64;
    a | (b << 16) | (c << 32) | (d << 48)
}

fn retype(raw: i64, ty: ValType) -> Value {
    match ty {
        ValType::I32 => Value::I32(raw as i32),
        ValType::I64 => Value::I64(raw),
        ValType::F32 => Value::F32(f32::from_bits(raw as u32)),
        ValType::F64 => Value::F64(f64::from_bits(raw as u64)),
    }
}
