// load.rs — WASM module parser, validator, and pre-execution translator
// Grounded on: examples/original_source/src/common/vm/load.c (parse_types,
// parse_imports, parse_functions, parse_tables, parse_memory, parse_globals,
// parse_exports, parse_start, parse_elements, parse_data, parse_code,
// find_blocks, parse_sections, fill_exports).

use crate::opcode::{raw, wasm_to_op, Op};
use crate::types::{
    Block, BlockKind, Export, ExportKind, FuncType, ImportFunc, LoadError, MemoryDef, TableDef,
    ValType, MAX_PAGES,
};

/// A fully loaded and translated module, ready for [`crate::interp::Interpreter`].
#[derive(Debug, Clone)]
pub struct Module {
    pub types: Vec<FuncType>,
    pub import_count: u32,
    pub functions: Vec<Block>,
    /// Compiled cell stream per function, parallel to `functions` (imports
    /// carry an empty body — calling one dispatches through `VmExports`
    /// instead of jumping into `code`).
    pub code: Vec<Vec<u16>>,
    pub table: TableDef,
    pub memory: MemoryDef,
    pub globals: Vec<i64>, // stored as raw 64-bit bit patterns; caller knows the declared type
    pub global_types: Vec<ValType>,
    pub global_mutable: Vec<bool>,
    pub exports: Vec<Export>,
    pub start_function: Option<u32>,
}

impl Module {
    pub fn find_export(&self, name: &str, kind: ExportKind) -> Option<u32> {
        self.exports
            .iter()
            .find(|e| e.kind == kind && e.name == name)
            .map(|e| e.index)
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn read_u8(&mut self) -> Result<u8, LoadError> {
        let b = *self.bytes.get(self.pos).ok_or(LoadError::Truncated)?;
        self.pos += 1;
        Ok(b)
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], LoadError> {
        if self.remaining() < n {
            return Err(LoadError::Truncated);
        }
        let s = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    fn read_u32le(&mut self) -> Result<u32, LoadError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_f32(&mut self) -> Result<f32, LoadError> {
        Ok(f32::from_bits(self.read_u32le()?))
    }

    fn read_f64(&mut self) -> Result<f64, LoadError> {
        let b = self.read_bytes(8)?;
        Ok(f64::from_bits(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ])))
    }

    /// Unsigned LEB128, standard byte-oriented WASM encoding (distinct from
    /// the bit-packed network-protocol LEB in `myq2_common::leb`).
    fn read_uleb(&mut self) -> Result<u64, LoadError> {
        let mut result: u64 = 0;
        let mut shift = 0;
        loop {
            let byte = self.read_u8()?;
            result |= ((byte & 0x7f) as u64) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift >= 64 {
                return Err(LoadError::Truncated);
            }
        }
        Ok(result)
    }

    fn read_uleb32(&mut self) -> Result<u32, LoadError> {
        Ok(self.read_uleb()? as u32)
    }

    fn read_sleb(&mut self, bits: u32) -> Result<i64, LoadError> {
        let mut result: i64 = 0;
        let mut shift = 0u32;
        let mut byte;
        loop {
            byte = self.read_u8()?;
            result |= ((byte & 0x7f) as i64) << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                break;
            }
            if shift >= 64 {
                return Err(LoadError::Truncated);
            }
        }
        if shift < bits && (byte & 0x40) != 0 {
            result |= -1i64 << shift;
        }
        Ok(result)
    }

    fn read_name(&mut self) -> Result<String, LoadError> {
        let len = self.read_uleb32()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn read_val_type(&mut self) -> Result<ValType, LoadError> {
        let b = self.read_u8()?;
        ValType::from_byte(b).ok_or(LoadError::TypeMismatch)
    }
}

const SECTION_TYPE: u8 = 1;
const SECTION_IMPORT: u8 = 2;
const SECTION_FUNCTION: u8 = 3;
const SECTION_TABLE: u8 = 4;
const SECTION_MEMORY: u8 = 5;
const SECTION_GLOBAL: u8 = 6;
const SECTION_EXPORT: u8 = 7;
const SECTION_START: u8 = 8;
const SECTION_ELEMENT: u8 = 9;
const SECTION_CODE: u8 = 10;
const SECTION_DATA: u8 = 11;

/// Parses, validates, and translates a complete WASM module.
///
/// Sections are processed in their fixed logical order regardless of the
/// physical order they appear in the file: a first pass records each
/// section's byte range by id, a second pass dispatches those ranges through
/// `SECTION_TYPE..=SECTION_DATA` in order.
pub fn load_module(bytes: &[u8]) -> Result<Module, LoadError> {
    let mut r = Reader::new(bytes);
    if r.read_u32le()? != crate::types::WA_MAGIC {
        return Err(LoadError::BadMagic);
    }
    if r.read_u32le()? != crate::types::WA_VERSION {
        return Err(LoadError::BadVersion);
    }

    let mut section_ranges: [Option<(usize, usize)>; 12] = [None; 12];
    while r.remaining() > 0 {
        let id = r.read_u8()?;
        let len = r.read_uleb32()? as usize;
        let start = r.pos;
        r.read_bytes(len)?; // skip; revisited below in canonical order
        if (id as usize) < section_ranges.len() {
            section_ranges[id as usize] = Some((start, len));
        }
    }

    let mut types = Vec::new();
    if let Some((start, len)) = section_ranges[SECTION_TYPE as usize] {
        types = parse_types(&bytes[start..start + len])?;
    }

    let mut functions: Vec<Block> = Vec::new();
    if let Some((start, len)) = section_ranges[SECTION_IMPORT as usize] {
        parse_imports(&bytes[start..start + len], &types, &mut functions)?;
    }
    let import_count = functions.len() as u32;

    let mut type_idxs: Vec<u32> = Vec::new();
    if let Some((start, len)) = section_ranges[SECTION_FUNCTION as usize] {
        type_idxs = parse_function_section(&bytes[start..start + len])?;
    }
    for &tidx in &type_idxs {
        let ty = types.get(tidx as usize).ok_or(LoadError::TypeMismatch)?;
        functions.push(Block {
            kind: BlockKind::Function,
            type_idx: Some(tidx as usize),
            local_types: Vec::new(),
            start_cell: 0,
            label_cell: 0,
            else_cell: None,
            import: None,
            export_name: None,
        });
        let _ = ty;
    }

    let mut table = TableDef {
        initial: 0,
        maximum: 0,
        entries: Vec::new(),
    };
    if let Some((start, len)) = section_ranges[SECTION_TABLE as usize] {
        table = parse_table(&bytes[start..start + len])?;
    }

    let mut memory = MemoryDef {
        initial: 0,
        maximum: 0,
        pages: 0,
        bytes: Vec::new(),
    };
    if let Some((start, len)) = section_ranges[SECTION_MEMORY as usize] {
        memory = parse_memory(&bytes[start..start + len])?;
    } else {
        return Err(LoadError::MissingMemory);
    }

    let mut globals = Vec::new();
    let mut global_types = Vec::new();
    let mut global_mutable = Vec::new();
    if let Some((start, len)) = section_ranges[SECTION_GLOBAL as usize] {
        parse_globals(
            &bytes[start..start + len],
            &mut globals,
            &mut global_types,
            &mut global_mutable,
        )?;
    }

    let mut exports = Vec::new();
    if let Some((start, len)) = section_ranges[SECTION_EXPORT as usize] {
        exports = parse_exports(&bytes[start..start + len])?;
    }

    let mut start_function = None;
    if let Some((start, len)) = section_ranges[SECTION_START as usize] {
        start_function = Some(parse_start(&bytes[start..start + len])?);
    }

    if let Some((start, len)) = section_ranges[SECTION_ELEMENT as usize] {
        parse_elements(&bytes[start..start + len], &mut table)?;
    }

    let mut code: Vec<Vec<u16>> = Vec::with_capacity(functions.len());
    for f in functions.iter().take(import_count as usize) {
        let _ = f;
        code.push(Vec::new()); // imports have no body
    }
    if let Some((start, len)) = section_ranges[SECTION_CODE as usize] {
        let bodies = parse_code(&bytes[start..start + len])?;
        if bodies.len() != type_idxs.len() {
            return Err(LoadError::TypeMismatch);
        }
        for (i, body) in bodies.into_iter().enumerate() {
            let fidx = import_count as usize + i;
            let tidx = type_idxs[i] as usize;
            let ty = &types[tidx];
            let (compiled, locals) = prepare_function(body, ty.params.len())?;
            functions[fidx].local_types = locals;
            code.push(compiled);
        }
    }

    if let Some((start, len)) = section_ranges[SECTION_DATA as usize] {
        parse_data(&bytes[start..start + len], &mut memory)?;
    }

    Ok(Module {
        types,
        import_count,
        functions,
        code,
        table,
        memory,
        globals,
        global_types,
        global_mutable,
        exports,
        start_function,
    })
}

fn parse_types(section: &[u8]) -> Result<Vec<FuncType>, LoadError> {
    let mut r = Reader::new(section);
    let count = r.read_uleb32()?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let form = r.read_u8()?;
        if form != 0x60 {
            return Err(LoadError::TypeMismatch);
        }
        let param_count = r.read_uleb32()?;
        let mut params = Vec::with_capacity(param_count as usize);
        for _ in 0..param_count {
            params.push(r.read_val_type()?);
        }
        let result_count = r.read_uleb32()?;
        if result_count > 1 {
            return Err(LoadError::TypeMismatch); // MAX_RESULTS = 1
        }
        let result = if result_count == 1 {
            Some(r.read_val_type()?)
        } else {
            None
        };
        let mask = FuncType::calc_mask(result, &params);
        out.push(FuncType { params, result, mask });
    }
    Ok(out)
}

fn parse_imports(
    section: &[u8],
    types: &[FuncType],
    functions: &mut Vec<Block>,
) -> Result<(), LoadError> {
    let mut r = Reader::new(section);
    let count = r.read_uleb32()?;
    for _ in 0..count {
        let module = r.read_name()?;
        let field = r.read_name()?;
        let kind = r.read_u8()?;
        match kind {
            0 => {
                // function import
                let tidx = r.read_uleb32()?;
                let _ty = types.get(tidx as usize).ok_or(LoadError::TypeMismatch)?;
                functions.push(Block {
                    kind: BlockKind::Function,
                    type_idx: Some(tidx as usize),
                    local_types: Vec::new(),
                    start_cell: 0,
                    label_cell: 0,
                    else_cell: None,
                    import: Some(ImportFunc { module, field }),
                    export_name: None,
                });
            }
            1 => {
                r.read_u8()?; // elem type
                r.read_u8()?; // limits flags
                r.read_uleb32()?;
            }
            2 => {
                r.read_u8()?; // limits flags
                r.read_uleb32()?;
            }
            3 => {
                r.read_val_type()?;
                r.read_u8()?; // mutability
            }
            _ => return Err(LoadError::TypeMismatch),
        }
    }
    Ok(())
}

fn parse_function_section(section: &[u8]) -> Result<Vec<u32>, LoadError> {
    let mut r = Reader::new(section);
    let count = r.read_uleb32()?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(r.read_uleb32()?);
    }
    Ok(out)
}

fn parse_table(section: &[u8]) -> Result<TableDef, LoadError> {
    let mut r = Reader::new(section);
    let count = r.read_uleb32()?;
    if count != 1 {
        return Err(LoadError::MissingTable);
    }
    let _elem_type = r.read_u8()?; // must be funcref (0x70)
    let flags = r.read_u8()?;
    let initial = r.read_uleb32()?;
    let maximum = if flags & 1 != 0 { r.read_uleb32()? } else { initial };
    Ok(TableDef {
        initial,
        maximum,
        entries: vec![0; initial as usize],
    })
}

fn parse_memory(section: &[u8]) -> Result<MemoryDef, LoadError> {
    let mut r = Reader::new(section);
    let count = r.read_uleb32()?;
    if count != 1 {
        return Err(LoadError::MissingMemory);
    }
    let flags = r.read_u8()?;
    let initial = r.read_uleb32()?;
    let maximum = if flags & 1 != 0 { r.read_uleb32()? } else { initial };
    if initial > MAX_PAGES || maximum > MAX_PAGES {
        return Err(LoadError::MemoryTooLarge);
    }
    Ok(MemoryDef {
        initial,
        maximum,
        pages: initial,
        bytes: vec![0u8; initial as usize * crate::types::PAGE_SIZE],
    })
}

fn parse_globals(
    section: &[u8],
    globals: &mut Vec<i64>,
    global_types: &mut Vec<ValType>,
    global_mutable: &mut Vec<bool>,
) -> Result<(), LoadError> {
    let mut r = Reader::new(section);
    let count = r.read_uleb32()?;
    for _ in 0..count {
        let ty = r.read_val_type()?;
        let mutable = r.read_u8()? != 0;
        let value = run_init_expr(&mut r, ty, globals)?;
        globals.push(value);
        global_types.push(ty);
        global_mutable.push(mutable);
    }
    Ok(())
}

/// Constant-initializer expressions accept only a single `*.const` or a
/// `global.get` of an already-defined immutable global, followed by `end`.
fn run_init_expr(r: &mut Reader, ty: ValType, prior_globals: &[i64]) -> Result<i64, LoadError> {
    let op = r.read_u8()?;
    let value = match op {
        raw::I32_CONST => r.read_sleb(32)?,
        raw::I64_CONST => r.read_sleb(64)?,
        raw::F32_CONST => r.read_f32()? .to_bits() as i64,
        raw::F64_CONST => r.read_f64()?.to_bits() as i64,
        raw::GLOBAL_GET => {
            let idx = r.read_uleb32()? as usize;
            *prior_globals.get(idx).ok_or(LoadError::BadGlobalIndex)?
        }
        _ => return Err(LoadError::TypeMismatch),
    };
    let _ = ty;
    let end = r.read_u8()?;
    if end != raw::END {
        return Err(LoadError::TypeMismatch);
    }
    Ok(value)
}

fn parse_exports(section: &[u8]) -> Result<Vec<Export>, LoadError> {
    let mut r = Reader::new(section);
    let count = r.read_uleb32()?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name = r.read_name()?;
        let kind = r.read_u8()?;
        let index = r.read_uleb32()?;
        let kind = match kind {
            0 => ExportKind::Function,
            1 => ExportKind::Table,
            2 => ExportKind::Memory,
            3 => ExportKind::Global,
            _ => return Err(LoadError::TypeMismatch),
        };
        out.push(Export { kind, name, index });
    }
    Ok(out)
}

fn parse_start(section: &[u8]) -> Result<u32, LoadError> {
    let mut r = Reader::new(section);
    r.read_uleb32()
}

fn parse_elements(section: &[u8], table: &mut TableDef) -> Result<(), LoadError> {
    let mut r = Reader::new(section);
    let count = r.read_uleb32()?;
    for _ in 0..count {
        let tidx = r.read_uleb32()?;
        if tidx != 0 {
            return Err(LoadError::BadTableIndex);
        }
        let globals_placeholder: Vec<i64> = Vec::new();
        let offset = run_init_expr(&mut r, ValType::I32, &globals_placeholder)? as usize;
        let n = r.read_uleb32()?;
        for i in 0..n {
            let fidx = r.read_uleb32()?;
            let slot = offset + i as usize;
            if slot < table.entries.len() {
                table.entries[slot] = fidx;
            }
        }
    }
    Ok(())
}

fn parse_data(section: &[u8], memory: &mut MemoryDef) -> Result<(), LoadError> {
    let mut r = Reader::new(section);
    let count = r.read_uleb32()?;
    for _ in 0..count {
        let midx = r.read_uleb32()?;
        if midx != 0 {
            return Err(LoadError::BadMemoryIndex);
        }
        let globals_placeholder: Vec<i64> = Vec::new();
        let offset = run_init_expr(&mut r, ValType::I32, &globals_placeholder)? as usize;
        let n = r.read_uleb32()? as usize;
        let data = r.read_bytes(n)?;
        let end = offset.checked_add(n).ok_or(LoadError::MemoryTooLarge)?;
        if end > memory.bytes.len() {
            return Err(LoadError::MemoryTooLarge);
        }
        memory.bytes[offset..end].copy_from_slice(data);
    }
    Ok(())
}

/// One function body: declared locals plus the raw instruction bytes.
struct RawBody<'a> {
    local_types: Vec<ValType>,
    code: &'a [u8],
}

fn parse_code(section: &[u8]) -> Result<Vec<RawBody>, LoadError> {
    let mut r = Reader::new(section);
    let count = r.read_uleb32()?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let body_size = r.read_uleb32()? as usize;
        let body_start = r.pos;
        let local_decl_count = r.read_uleb32()?;
        let mut local_types = Vec::new();
        for _ in 0..local_decl_count {
            let n = r.read_uleb32()?;
            let ty = r.read_val_type()?;
            for _ in 0..n {
                local_types.push(ty);
            }
            if local_types.len() > crate::types::MAX_LOCALS {
                return Err(LoadError::BadLocalIndex);
            }
        }
        let code_start = r.pos;
        let body_end = body_start + body_size;
        if body_end > section.len() {
            return Err(LoadError::Truncated);
        }
        r.pos = body_end;
        out.push(RawBody {
            local_types,
            code: &section[code_start..body_end],
        });
    }
    Ok(out)
}

/// A structured block being tracked during translation (`find_blocks`'
/// blockstack, generalized to also record where the compiled `end` lands so
/// `br`/`br_if` can be pre-resolved to an absolute cell index).
struct TransBlock {
    kind: BlockKind,
    /// Cell index of a placeholder that must be patched once the block's
    /// label location is known (the `end`/`else` target).
    patch_cells: Vec<usize>,
    /// For `loop`: label is the block's own start (already known).
    label_cell: Option<usize>,
}

/// `prepare_function`: translates one function's LEB-encoded WASM bytecode
/// into the internal `Vec<u16>` cell stream, resolving branch targets to
/// absolute cell indices so the interpreter never needs a runtime block
/// lookup for control flow.
fn prepare_function(body: RawBody, param_count: usize) -> Result<(Vec<u16>, Vec<ValType>), LoadError> {
    let mut cells: Vec<u16> = Vec::new();
    let mut stack: Vec<TransBlock> = Vec::new();
    let mut r = Reader::new(body.code);
    let local_base = param_count; // local indices: params first, then declared locals
    // Cell positions of branches targeting past every tracked block (i.e. the
    // function's own end); patched to the final cell length once known.
    let mut function_exit_patches: Vec<usize> = Vec::new();

    loop {
        if r.remaining() == 0 {
            return Err(LoadError::UnmatchedEnd);
        }
        let byte = r.read_u8()?;

        if byte == raw::EXTENDED_PREFIX {
            let sub = r.read_uleb32()?;
            if (raw::EXT_TRUNC_SAT_START..=raw::EXT_TRUNC_SAT_END).contains(&sub) {
                push_op(&mut cells, truncating_op_for(sub));
            } else if sub == raw::EXT_MEMORY_COPY {
                r.read_u8()?;
                r.read_u8()?;
                push_op(&mut cells, Op::ExtMemoryCopy);
            } else if sub == raw::EXT_MEMORY_FILL {
                r.read_u8()?;
                push_op(&mut cells, Op::ExtMemoryFill);
            } else {
                return Err(LoadError::UnknownOpcode(0xfc));
            }
            continue;
        }

        match byte {
            raw::BLOCK | raw::LOOP => {
                r.read_u8()?; // block type byte (result arity only, not tracked further)
                let kind = if byte == raw::LOOP { BlockKind::Loop } else { BlockKind::Block };
                push_op(&mut cells, Op::Block);
                let label_cell = if kind == BlockKind::Loop { Some(cells.len()) } else { None };
                stack.push(TransBlock {
                    kind,
                    patch_cells: Vec::new(),
                    label_cell,
                });
                if stack.len() > crate::types::BLOCKSTACK_SIZE {
                    return Err(LoadError::BranchTooDeep);
                }
            }
            raw::IF => {
                r.read_u8()?;
                push_op(&mut cells, Op::If);
                let placeholder = cells.len();
                cells.push(0); // patched to else/end target
                stack.push(TransBlock {
                    kind: BlockKind::If,
                    patch_cells: vec![placeholder],
                    label_cell: None,
                });
            }
            raw::ELSE => {
                let top = stack.last_mut().ok_or(LoadError::UnmatchedEnd)?;
                if top.kind != BlockKind::If {
                    return Err(LoadError::UnmatchedEnd);
                }
                push_op(&mut cells, Op::Else);
                let placeholder = cells.len();
                cells.push(0);
                let if_patch = top.patch_cells.drain(..).collect::<Vec<_>>();
                for p in if_patch {
                    cells[p] = cells.len() as u16;
                }
                top.patch_cells.push(placeholder);
            }
            raw::END => {
                if let Some(block) = stack.pop() {
                    push_op(&mut cells, Op::End);
                    let here = cells.len() as u16;
                    for p in block.patch_cells {
                        cells[p] = here;
                    }
                } else {
                    push_op(&mut cells, Op::End);
                    break; // function's own closing end
                }
            }
            raw::BR | raw::BR_IF => {
                let depth = r.read_uleb32()? as usize;
                if depth > stack.len() {
                    return Err(LoadError::BranchTooDeep);
                }
                push_op(&mut cells, if byte == raw::BR { Op::Br } else { Op::BrIf });
                if depth == stack.len() {
                    // Branches past every tracked block target the
                    // function's own end.
                    let placeholder = cells.len();
                    cells.push(0);
                    function_exit_patches.push(placeholder);
                } else {
                    let target_block = &mut stack[stack.len() - 1 - depth];
                    match target_block.label_cell {
                        Some(label) => cells.push(label as u16),
                        None => {
                            let placeholder = cells.len();
                            cells.push(0);
                            target_block.patch_cells.push(placeholder);
                        }
                    }
                }
            }
            raw::BR_TABLE => {
                let count = r.read_uleb32()?;
                push_op(&mut cells, Op::BrTable);
                cells.push(count as u16);
                for _ in 0..count {
                    let depth = r.read_uleb32()? as usize;
                    push_branch_target(&mut cells, &mut stack, &mut function_exit_patches, depth)?;
                }
                let default_depth = r.read_uleb32()? as usize;
                push_branch_target(&mut cells, &mut stack, &mut function_exit_patches, default_depth)?;
            }
            raw::LOCAL_GET | raw::LOCAL_SET | raw::LOCAL_TEE => {
                let idx = r.read_uleb32()?;
                if idx as usize >= local_base + body.local_types.len() {
                    return Err(LoadError::BadLocalIndex);
                }
                push_op(
                    &mut cells,
                    match byte {
                        raw::LOCAL_GET => Op::LocalGet,
                        raw::LOCAL_SET => Op::LocalSet,
                        _ => Op::LocalTee,
                    },
                );
                cells.push(idx as u16);
            }
            raw::GLOBAL_GET | raw::GLOBAL_SET => {
                let idx = r.read_uleb32()?;
                push_op(&mut cells, if byte == raw::GLOBAL_GET { Op::GlobalGet } else { Op::GlobalSet });
                cells.push(idx as u16);
            }
            raw::MEMORY_SIZE | raw::MEMORY_GROW => {
                r.read_u8()?; // reserved memory index byte, must be 0
                push_op(&mut cells, if byte == raw::MEMORY_SIZE { Op::MemorySize } else { Op::MemoryGrow });
            }
            0x28..=0x3e => {
                let align = r.read_uleb32()?;
                let offset = r.read_uleb32()?;
                let _ = align;
                let op = wasm_to_op(byte).ok_or(LoadError::UnknownOpcode(byte))?;
                push_op(&mut cells, op);
                push_u32(&mut cells, offset);
            }
            raw::I32_CONST => {
                let v = r.read_sleb(32)? as i32;
                push_op(&mut cells, Op::I32Const);
                push_u32(&mut cells, v as u32);
            }
            raw::I64_CONST => {
                let v = r.read_sleb(64)?;
                push_op(&mut cells, Op::I64Const);
                push_u64(&mut cells, v as u64);
            }
            raw::F32_CONST => {
                let v = r.read_f32()?;
                push_op(&mut cells, Op::I32Const);
                push_u32(&mut cells, v.to_bits());
            }
            raw::F64_CONST => {
                let v = r.read_f64()?;
                push_op(&mut cells, Op::I64Const);
                push_u64(&mut cells, v.to_bits());
            }
            raw::CALL => {
                let idx = r.read_uleb32()?;
                push_op(&mut cells, Op::Call);
                push_u32(&mut cells, idx);
            }
            raw::CALL_INDIRECT => {
                let tidx = r.read_uleb32()?;
                let tbl = r.read_uleb32()?;
                if tbl != 0 {
                    return Err(LoadError::BadTableIndex);
                }
                push_op(&mut cells, Op::CallIndirect);
                push_u32(&mut cells, tidx);
            }
            raw::RETURN => push_op(&mut cells, Op::Return),
            raw::DROP => push_op(&mut cells, Op::Drop),
            raw::SELECT => push_op(&mut cells, Op::Select),
            raw::UNREACHABLE => push_op(&mut cells, Op::Unreachable),
            raw::NOP => push_op(&mut cells, Op::Nop),
            _ => {
                let op = wasm_to_op(byte).ok_or(LoadError::UnknownOpcode(byte))?;
                push_op(&mut cells, op);
            }
        }
    }

    if !stack.is_empty() {
        return Err(LoadError::UnmatchedEnd);
    }

    let end = cells.len() as u16;
    for p in function_exit_patches {
        cells[p] = end;
    }

    Ok((cells, body.local_types))
}

fn push_branch_target(
    cells: &mut Vec<u16>,
    stack: &mut [TransBlock],
    function_exit_patches: &mut Vec<usize>,
    depth: usize,
) -> Result<(), LoadError> {
    if depth > stack.len() {
        return Err(LoadError::BranchTooDeep);
    }
    if depth == stack.len() {
        let placeholder = cells.len();
        cells.push(0);
        function_exit_patches.push(placeholder);
    } else {
        let target_block = &mut stack[stack.len() - 1 - depth];
        match target_block.label_cell {
            Some(label) => cells.push(label as u16),
            None => {
                let placeholder = cells.len();
                cells.push(0);
                target_block.patch_cells.push(placeholder);
            }
        }
    }
    Ok(())
}

fn push_op(cells: &mut Vec<u16>, op: Op) {
    cells.push(op as u16);
}

fn push_u32(cells: &mut Vec<u16>, v: u32) {
    cells.push(v as u16);
    cells.push((v >> 16) as u16);
}

fn push_u64(cells: &mut Vec<u16>, v: u64) {
    cells.push(v as u16);
    cells.push((v >> 16) as u16);
    cells.push((v >> 32) as u16);
    cells.push((v >> 48) as u16);
}

fn truncating_op_for(sub: u32) -> Op {
    // Saturating truncation remaps to its non-saturating counterpart.
    match sub {
        0 => Op::I32TruncF32S,
        1 => Op::I32TruncF32U,
        2 => Op::I32TruncF64S,
        3 => Op::I32TruncF64U,
        4 => Op::I64TruncF32S,
        5 => Op::I64TruncF32U,
        6 => Op::I64TruncF64S,
        _ => Op::I64TruncF64U,
    }
}
