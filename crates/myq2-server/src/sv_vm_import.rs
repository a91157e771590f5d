// sv_vm_import.rs — HostBridge implementation wiring WASM `game`/`cgame`
// module imports to server state.
//
// Grounded on server_game_import.rs's ServerGameImport (the native-cdylib
// import surface this mirrors) and examples/original_source/src/common/vm/
// vm.c's import dispatch (`VM_CallImport`: look up by name, marshal args
// out of the VM's stack/memory, call the host thunk, push the result).
// Where the native surface passes Rust-native arguments, this one receives
// `&[Value]` slots and a `MemoryView` into the module's own linear memory,
// since a WASM guest can only pass scalars and pointers-into-its-own-memory.
//
// Only a representative subset of the larger import surface is wired here
// (see SPEC_FULL.md's own framing of the list as "examples"); the dispatch
// structure below is the template any additional import follows.

use myq2_common::q_shared::{Trace, UserCmd, Vec3, Multicast, ERR_DROP, PRINT_ALL};
use myq2_common::qcommon::SvcOps;
use myq2_common::qfiles::MAX_MAP_ENTSTRING;
use myq2_vm::load::Module;
use myq2_vm::types::ExportKind;
use myq2_vm::{FileHandleTable, GameDataLayout, HostBridge, Interpreter, MemoryView, Value, VmTrap};

use std::sync::Mutex;

use crate::server::ServerContext;
use crate::sv_game::*;
use crate::sv_send::sv_multicast;

/// One of these is owned per loaded module instance (`game`/`cgame`), kept
/// alongside its `Interpreter` by the server's module-table. Holds the
/// per-module state a native cdylib would otherwise keep in statics.
pub struct VmGameImport {
    pub layout: GameDataLayout,
    pub files: FileHandleTable<std::fs::File>,
}

impl VmGameImport {
    pub fn new() -> Self {
        VmGameImport {
            layout: GameDataLayout::default(),
            files: FileHandleTable::new(),
        }
    }
}

/// Reads three consecutive f32 slots out of guest memory as a `Vec3`.
fn read_vec3(memory: &MemoryView<'_>, ptr: u32) -> Result<Vec3, VmTrap> {
    memory.read(ptr, 12, 4, |b| {
        [
            f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            f32::from_le_bytes([b[4], b[5], b[6], b[7]]),
            f32::from_le_bytes([b[8], b[9], b[10], b[11]]),
        ]
    })
}

fn write_vec3(memory: &mut MemoryView<'_>, ptr: u32, v: Vec3) -> Result<(), VmTrap> {
    let mut buf = [0u8; 12];
    buf[0..4].copy_from_slice(&v[0].to_le_bytes());
    buf[4..8].copy_from_slice(&v[1].to_le_bytes());
    buf[8..12].copy_from_slice(&v[2].to_le_bytes());
    memory.write(ptr, &buf, 4)
}

/// Guest-side layout of `trace_t`, a flat C struct with no padding beyond
/// natural `i32`/`f32` alignment (every field here is 4 bytes wide):
/// `{ i32 allsolid, i32 startsolid, f32 fraction, vec3 endpos, vec3 normal,
///    f32 plane_dist, i32 surface_flags, i32 contents, i32 ent_index }`.
/// `cplane_t`'s non-numeric fields (type/signbits) and `csurface_t` are
/// summarized for the guest rather than mirrored byte-for-byte, since game
/// code only ever reads `normal`/`dist` and a flags word off of them.
const TRACE_STRUCT_SIZE: usize = 4 + 4 + 4 + 12 + 12 + 4 + 4 + 4 + 4;

fn write_trace(memory: &mut MemoryView<'_>, ptr: u32, t: &Trace) -> Result<(), VmTrap> {
    let mut off = ptr;
    memory.write(off, &(t.allsolid as i32).to_le_bytes(), 4)?;
    off += 4;
    memory.write(off, &(t.startsolid as i32).to_le_bytes(), 4)?;
    off += 4;
    memory.write(off, &t.fraction.to_le_bytes(), 4)?;
    off += 4;
    write_vec3(memory, off, t.endpos)?;
    off += 12;
    write_vec3(memory, off, t.plane.normal)?;
    off += 12;
    memory.write(off, &t.plane.dist.to_le_bytes(), 4)?;
    off += 4;
    let surf_flags = t.surface.as_ref().map(|s| s.flags).unwrap_or(0);
    memory.write(off, &surf_flags.to_le_bytes(), 4)?;
    off += 4;
    memory.write(off, &t.contents.to_le_bytes(), 4)?;
    off += 4;
    memory.write(off, &t.ent_index.to_le_bytes(), 4)?;
    Ok(())
}

/// Dispatches one `game`/`cgame` import call by name. Mirrors
/// `ServerGameImport`'s per-field match in shape; differs in that every
/// argument crossing the host/guest boundary is a `Value` slot or a
/// `MemoryView`-validated pointer rather than a native Rust type.
///
/// Guest code formats its own variadic calls into a local buffer via the
/// `vsnprintf` import below before calling `Print`/`Error`/etc. with the
/// already-formatted string — the same split the original's libc-free guest
/// runtime uses, since a WASM callee has no native varargs ABI to receive.
pub fn call_game_import(
    ctx: &mut ServerContext,
    state: &mut VmGameImport,
    field: &str,
    mut memory: MemoryView<'_>,
    args: &[Value],
) -> Result<Option<Value>, VmTrap> {
    match field {
        // vsnprintf(dst_ptr, size, fmt_ptr, ap_ptr) -> formatted length
        "vsnprintf" => {
            let dst = args[0].as_u32();
            let size = args[1].as_u32();
            let fmt_ptr = args[2].as_u32();
            let ap = args[3].as_u32();
            let n = vsnprintf_into(&mut memory, dst, size, fmt_ptr, ap)?;
            Ok(Some(Value::I32(n)))
        }

        // Print(level, str_ptr)
        "Print" => {
            let level = args[0].as_i32();
            let text = String::from_utf8_lossy(memory.read_cstr(args[1].as_u32())?).into_owned();
            msg_write_byte(&mut ctx.sv.multicast, SvcOps::Print as i32);
            msg_write_byte(&mut ctx.sv.multicast, level);
            msg_write_string(&mut ctx.sv.multicast, &text);
            sv_multicast(ctx, Some([0.0; 3]), Multicast::AllR);
            Ok(None)
        }
        "DPrint" => {
            let text = String::from_utf8_lossy(memory.read_cstr(args[0].as_u32())?).into_owned();
            pf_dprintf(&text);
            Ok(None)
        }
        "CPrint" => {
            let level = args.get(1).map(|v| v.as_i32()).unwrap_or(PRINT_ALL);
            let text = String::from_utf8_lossy(memory.read_cstr(args[2].as_u32())?).into_owned();
            pf_cprintf(ctx, None, level, &text);
            Ok(None)
        }

        // Error(str_ptr) — fatal; never returns to the guest.
        "Error" => {
            let text = String::from_utf8_lossy(memory.read_cstr(args[0].as_u32())?).into_owned();
            myq2_common::common::com_error(ERR_DROP, &text);
            Ok(None)
        }

        // Trace(start_ptr, mins_ptr, maxs_ptr, end_ptr, passent, contentmask, out_ptr)
        "Trace" => {
            let start = read_vec3(&memory, args[0].as_u32())?;
            let mins = read_vec3(&memory, args[1].as_u32())?;
            let maxs = read_vec3(&memory, args[2].as_u32())?;
            let end = read_vec3(&memory, args[3].as_u32())?;
            let _passent = args[4].as_i32();
            let contentmask = args[5].as_i32();
            let out_ptr = args[6].as_u32();
            let trace = myq2_common::cmodel::with_cmodel_ctx(|cctx| {
                let headnode = if cctx.numcmodels > 0 { cctx.map_cmodels[0].headnode } else { 0 };
                cctx.box_trace(&start, &end, &mins, &maxs, headnode, contentmask)
            })
            .unwrap_or_default();
            write_trace(&mut memory, out_ptr, &trace)?;
            Ok(None)
        }

        // PointContents(point_ptr) -> contents
        "PointContents" => {
            let point = read_vec3(&memory, args[0].as_u32())?;
            let contents = myq2_common::cmodel::cm_point_contents(&point, 0);
            Ok(Some(Value::I32(contents)))
        }

        // BoxEdicts(mins_ptr, maxs_ptr, out_ptr, maxcount, areatype) -> count
        "BoxEdicts" => {
            let mins = read_vec3(&memory, args[0].as_u32())?;
            let maxs = read_vec3(&memory, args[1].as_u32())?;
            let out_ptr = args[2].as_u32();
            let maxcount = args[3].as_i32();
            let found = if let Some(ref ge) = ctx.ge {
                ge.edicts
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.inuse)
                    .filter(|(_, e)| {
                        !(e.absmin[0] > maxs[0] || e.absmin[1] > maxs[1] || e.absmin[2] > maxs[2]
                            || e.absmax[0] < mins[0] || e.absmax[1] < mins[1] || e.absmax[2] < mins[2])
                    })
                    .map(|(i, _)| i as i32)
                    .take(maxcount.max(0) as usize)
                    .collect::<Vec<_>>()
            } else {
                Vec::new()
            };
            let mut off = out_ptr;
            for idx in &found {
                memory.write(off, &idx.to_le_bytes(), 4)?;
                off += 4;
            }
            Ok(Some(Value::I32(found.len() as i32)))
        }

        // LinkEntity(entity_ptr) / UnlinkEntity(entity_ptr)
        // The entity pointer is validated against the module's declared
        // edict array bounds (set via `locate_game_data`); the index is
        // used only for host-side bookkeeping (area/PVS linking happens
        // against the host's own Edict mirror, kept in sync separately).
        "LinkEntity" => {
            let idx = state.layout.entity_index(args[0].as_u32())?;
            if let Some(ref mut ge) = ctx.ge {
                if let Some(ent) = ge.edicts.get_mut(idx as usize) {
                    for i in 0..3 {
                        ent.size[i] = ent.maxs[i] - ent.mins[i];
                        ent.absmin[i] = ent.s.origin[i] + ent.mins[i] - 1.0;
                        ent.absmax[i] = ent.s.origin[i] + ent.maxs[i] + 1.0;
                    }
                    if ent.linkcount == 0 {
                        ent.s.old_origin = ent.s.origin;
                    }
                    ent.linkcount += 1;
                }
            }
            Ok(None)
        }
        "UnlinkEntity" => {
            let idx = state.layout.entity_index(args[0].as_u32())?;
            if let Some(ref mut ge) = ctx.ge {
                if let Some(ent) = ge.edicts.get_mut(idx as usize) {
                    ent.area_node = -1;
                    ent.area_linked = false;
                    ent.num_clusters = 0;
                }
            }
            Ok(None)
        }

        // LocateGameData(edicts_base, edict_size, max_edicts, clients_base, client_size, max_clients)
        "LocateGameData" => {
            state.layout = GameDataLayout {
                edicts_base: args[0].as_u32(),
                edict_size: args[1].as_u32(),
                max_edicts: args[2].as_u32(),
                clients_base: args[3].as_u32(),
                client_size: args[4].as_u32(),
                max_clients: args[5].as_u32(),
            };
            Ok(None)
        }

        // Cvar_Register(name_ptr, value_ptr, flags) -> cvar value
        "Cvar_Register" | "Cvar" => {
            let name = String::from_utf8_lossy(memory.read_cstr(args[0].as_u32())?).into_owned();
            let value = String::from_utf8_lossy(memory.read_cstr(args[1].as_u32())?).into_owned();
            let flags = args[2].as_i32();
            myq2_common::cvar::cvar_get(&name, &value, flags);
            Ok(Some(Value::F32(myq2_common::cvar::cvar_variable_value(&name))))
        }
        "Cvar_Set" => {
            let name = String::from_utf8_lossy(memory.read_cstr(args[0].as_u32())?).into_owned();
            let value = String::from_utf8_lossy(memory.read_cstr(args[1].as_u32())?).into_owned();
            myq2_common::cvar::cvar_set(&name, &value);
            Ok(None)
        }

        // SetConfigstring(index, string_ptr)
        "SetConfigstring" => {
            let index = args[0].as_i32();
            let string = String::from_utf8_lossy(memory.read_cstr(args[1].as_u32())?).into_owned();
            pf_configstring(ctx, index, &string);
            Ok(None)
        }

        // FS_OpenFile(name_ptr, mode) -> handle (0 on failure)
        "FS_OpenFile" => {
            let name = String::from_utf8_lossy(memory.read_cstr(args[0].as_u32())?).into_owned();
            let mode = args[1].as_i32();
            let opened = if mode == 0 {
                std::fs::File::open(&name).ok()
            } else {
                std::fs::OpenOptions::new().write(true).create(true).truncate(true).open(&name).ok()
            };
            let handle = match opened {
                Some(f) => state.files.insert(f),
                None => 0,
            };
            Ok(Some(Value::I32(handle as i32)))
        }
        "FS_CloseFile" => {
            state.files.close(args[0].as_u32());
            Ok(None)
        }
        "FS_ReadFile" => {
            use std::io::Read;
            let dst_ptr = args[0].as_u32();
            let count = args[1].as_i32().max(0) as usize;
            let handle = args[2].as_u32();
            let mut tmp = vec![0u8; count];
            let n = match state.files.get_mut(handle) {
                Some(file) => file.read(&mut tmp).unwrap_or(0),
                None => 0,
            };
            memory.write(dst_ptr, &tmp[..n], 1)?;
            Ok(Some(Value::I32(n as i32)))
        }
        "FS_WriteFile" => {
            use std::io::Write;
            let src_ptr = args[0].as_u32();
            let count = args[1].as_i32().max(0) as usize;
            let handle = args[2].as_u32();
            let data = memory.read_array(src_ptr, count, 1, 1)?.to_vec();
            let n = match state.files.get_mut(handle) {
                Some(file) => file.write(&data).unwrap_or(0),
                None => 0,
            };
            Ok(Some(Value::I32(n as i32)))
        }

        // memcmp(a_ptr, b_ptr, n) -> like C memcmp
        "memcmp" => {
            let a_ptr = args[0].as_u32();
            let b_ptr = args[1].as_u32();
            let n = args[2].as_u32() as usize;
            let a = memory.read_array(a_ptr, n, 1, 1)?;
            let b = memory.read_array(b_ptr, n, 1, 1)?;
            let result = a.cmp(b) as i32;
            Ok(Some(Value::I32(result)))
        }

        // Single-precision math helpers the guest's libm calls resolve to.
        "sinf" => Ok(Some(Value::F32(args[0].as_f32().sin()))),
        "cosf" => Ok(Some(Value::F32(args[0].as_f32().cos()))),
        "sqrtf" => Ok(Some(Value::F32(args[0].as_f32().sqrt()))),
        "atan2f" => Ok(Some(Value::F32(args[0].as_f32().atan2(args[1].as_f32())))),
        "floorf" => Ok(Some(Value::F32(args[0].as_f32().floor()))),

        // R_AddDebug* — rendering debug overlays, no-op on a headless server.
        name if name.starts_with("R_AddDebug") => Ok(None),

        _ => Err(VmTrap::UnknownImport { module: "game".to_string(), field: field.to_string() }),
    }
}

/// Thin re-export point: `vsnprintf` reads both its format string and its
/// packed argument area out of the same guest linear memory it writes its
/// result into, via `myq2_vm::printf`'s bounds-checked state machine.
fn vsnprintf_into(memory: &mut MemoryView<'_>, dst: u32, size: u32, fmt_ptr: u32, ap: u32) -> Result<i32, VmTrap> {
    myq2_vm::printf::vm_vsnprintf(memory, dst, size, fmt_ptr, ap)
}

/// Bridges a specific module instance's import namespace (`"game"` or
/// `"cgame"`) to [`call_game_import`]. A thin adaptor so the interpreter's
/// generic `HostBridge::call(module, field, ...)` can route to the one
/// shared dispatch table regardless of which module is asking.
pub struct ServerHostBridge<'ctx> {
    pub ctx: &'ctx mut ServerContext,
    pub state: &'ctx mut VmGameImport,
}

impl<'ctx> HostBridge for ServerHostBridge<'ctx> {
    fn call(&mut self, module: &str, field: &str, memory: MemoryView<'_>, args: &[Value]) -> Result<Option<Value>, VmTrap> {
        match module {
            "game" | "cgame" | "env" => call_game_import(self.ctx, self.state, field, memory, args),
            _ => Err(VmTrap::UnknownImport { module: module.to_string(), field: field.to_string() }),
        }
    }
}

// ============================================================
// Global server context for the WASM path
//
// `GameModule`'s methods (apiversion, init, run_frame, ...) take no
// `ServerContext` parameter, matching the Dynamic (native DLL) variant's
// shape. The DLL path reaches the context through `game_ffi`'s
// `FFI_SERVER_CTX`; this mirrors that same pattern for the WASM path so
// `GameModule::Wasm`'s methods can borrow a `ServerHostBridge` without a
// signature change.
// ============================================================

struct SendPtr(*mut ServerContext);
unsafe impl Send for SendPtr {}

static VM_SERVER_CTX: Mutex<Option<SendPtr>> = Mutex::new(None);

/// # Safety
/// `ctx` must outlive every call routed through `with_vm_ctx` until
/// `clear_vm_server_context` is called.
pub unsafe fn set_vm_server_context(ctx: *mut ServerContext) {
    *VM_SERVER_CTX.lock().unwrap() = Some(SendPtr(ctx));
}

pub fn clear_vm_server_context() {
    *VM_SERVER_CTX.lock().unwrap() = None;
}

fn with_vm_ctx<F, R>(f: F) -> R
where
    F: FnOnce(&mut ServerContext) -> R,
{
    let guard = VM_SERVER_CTX.lock().unwrap();
    let ptr = guard.as_ref().expect("VM ServerContext not set").0;
    let ctx = unsafe { &mut *ptr };
    f(ctx)
}

// ============================================================
// WasmGameModule — a loaded `.wasm` game module instance
// ============================================================

/// Width of one scratch string slot (mapname, spawnpoint, and the shared
/// userinfo/filename slot). Long enough for any configstring-length string
/// the game passes across the boundary.
const SCRATCH_STR_SIZE: u32 = 256;
const SCRATCH_MAPNAME: u32 = 0;
const SCRATCH_SPAWNPOINT: u32 = SCRATCH_STR_SIZE;
/// Shared slot for any other single string argument (userinfo, a savegame
/// filename): none of those calls overlap with `SpawnEntities` or with each
/// other, since the interpreter only ever runs one export call at a time.
const SCRATCH_STRING: u32 = SCRATCH_STR_SIZE * 2;
const SCRATCH_ENTSTRING: u32 = SCRATCH_STR_SIZE * 3;
const SCRATCH_SIZE: usize = SCRATCH_STR_SIZE as usize * 3 + MAX_MAP_ENTSTRING;

/// Flat encoding of `UserCmd` written into `SCRATCH_STRING` before a
/// `ClientThink` call: msec, buttons (u8 each), angles[3], forwardmove,
/// sidemove, upmove (i16 each), impulse, lightlevel (u8 each) — 16 bytes,
/// field order matching the struct.
const USERCMD_SIZE: u32 = 16;

/// A loaded `.wasm` game module instance: the parsed module, its running
/// interpreter, and the import-side state `call_game_import` needs.
///
/// `Interpreter<'m>` borrows the `Module` it runs; to keep both together in
/// one struct that outlives any single host call (interpreter state —
/// memory, globals, the operand stack — must persist across many separate
/// `call_export` calls, not just one), the module is boxed and the borrow's
/// lifetime is erased to `'static`. This is sound only because a `Box<T>`'s
/// heap allocation keeps a stable address across moves of the `Box` value
/// itself, and `module` is never replaced or reallocated for the lifetime
/// of this struct.
pub struct WasmGameModule {
    module: Box<Module>,
    interp: Interpreter<'static>,
    import_state: VmGameImport,
    scratch_base: u32,
}

impl WasmGameModule {
    pub fn load(bytes: &[u8]) -> Result<Self, String> {
        let module = Box::new(myq2_vm::load_module(bytes).map_err(|e| e.to_string())?);
        let module_ref: &'static Module = unsafe { &*(module.as_ref() as *const Module) };
        let mut interp = Interpreter::new(module_ref);
        let scratch_base = interp.reserve_scratch(SCRATCH_SIZE);
        Ok(WasmGameModule {
            module,
            interp,
            import_state: VmGameImport::new(),
            scratch_base,
        })
    }

    fn write_str(&mut self, slot_off: u32, s: &str) -> u32 {
        let ptr = self.scratch_base + slot_off;
        let mut bytes = s.as_bytes().to_vec();
        bytes.push(0);
        let mut view = MemoryView::new(self.interp.memory_mut());
        let _ = view.write(ptr, &bytes, 1);
        ptr
    }

    fn write_usercmd(&mut self, slot_off: u32, cmd: &UserCmd) -> u32 {
        let ptr = self.scratch_base + slot_off;
        let mut buf = [0u8; USERCMD_SIZE as usize];
        buf[0] = cmd.msec;
        buf[1] = cmd.buttons;
        buf[2..4].copy_from_slice(&cmd.angles[0].to_le_bytes());
        buf[4..6].copy_from_slice(&cmd.angles[1].to_le_bytes());
        buf[6..8].copy_from_slice(&cmd.angles[2].to_le_bytes());
        buf[8..10].copy_from_slice(&cmd.forwardmove.to_le_bytes());
        buf[10..12].copy_from_slice(&cmd.sidemove.to_le_bytes());
        buf[12..14].copy_from_slice(&cmd.upmove.to_le_bytes());
        buf[14] = cmd.impulse;
        buf[15] = cmd.lightlevel;
        let mut view = MemoryView::new(self.interp.memory_mut());
        let _ = view.write(ptr, &buf, 1);
        ptr
    }

    /// Calls an export by name with `ctx` reachable through the import
    /// bridge. Missing exports behave like an unset `Option<fn>` on the
    /// static/dynamic variants: a silent no-op, since most of these
    /// callbacks are optional in the original game ABI.
    fn call(&mut self, ctx: &mut ServerContext, name: &str, args: &[Value]) -> Result<Option<Value>, VmTrap> {
        let Some(idx) = self.module.find_export(name, ExportKind::Function) else {
            return Ok(None);
        };
        let mut bridge = ServerHostBridge { ctx, state: &mut self.import_state };
        self.interp.call_function(&mut bridge, idx, args)
    }

    fn call_i32(&mut self, ctx: &mut ServerContext, name: &str, args: &[Value], default: i32) -> i32 {
        match self.call(ctx, name, args) {
            Ok(Some(v)) => v.as_i32(),
            _ => default,
        }
    }

    pub fn apiversion(&mut self) -> i32 {
        with_vm_ctx(|ctx| self.call_i32(ctx, "apiversion", &[], GAME_API_VERSION))
    }

    pub fn init(&mut self) {
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "Init", &[]);
        });
    }

    pub fn shutdown(&mut self) {
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "Shutdown", &[]);
        });
    }

    pub fn spawn_entities(&mut self, mapname: &str, entstring: &str, spawnpoint: &str) {
        let mapname_ptr = self.write_str(SCRATCH_MAPNAME, mapname);
        let spawnpoint_ptr = self.write_str(SCRATCH_SPAWNPOINT, spawnpoint);
        let entstring_ptr = self.write_str(SCRATCH_ENTSTRING, entstring);
        with_vm_ctx(|ctx| {
            let _ = self.call(
                ctx,
                "SpawnEntities",
                &[
                    Value::I32(mapname_ptr as i32),
                    Value::I32(entstring_ptr as i32),
                    Value::I32(spawnpoint_ptr as i32),
                ],
            );
        });
    }

    pub fn run_frame(&mut self) {
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "RunFrame", &[]);
        });
    }

    pub fn server_command(&mut self) {
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "ServerCommand", &[]);
        });
    }

    pub fn client_connect(&mut self, ent_index: i32, userinfo: &mut String) -> bool {
        let userinfo_ptr = self.write_str(SCRATCH_STRING, userinfo);
        let accepted = with_vm_ctx(|ctx| {
            self.call_i32(ctx, "ClientConnect", &[Value::I32(ent_index), Value::I32(userinfo_ptr as i32)], 1)
        });
        accepted != 0
    }

    pub fn client_begin(&mut self, ent_index: i32) {
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "ClientBegin", &[Value::I32(ent_index)]);
        });
    }

    pub fn client_userinfo_changed(&mut self, ent_index: i32, userinfo: &str) {
        let userinfo_ptr = self.write_str(SCRATCH_STRING, userinfo);
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "ClientUserinfoChanged", &[Value::I32(ent_index), Value::I32(userinfo_ptr as i32)]);
        });
    }

    pub fn client_disconnect(&mut self, ent_index: i32) {
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "ClientDisconnect", &[Value::I32(ent_index)]);
        });
    }

    pub fn client_command(&mut self, ent_index: i32) {
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "ClientCommand", &[Value::I32(ent_index)]);
        });
    }

    pub fn client_think(&mut self, ent_index: i32, cmd: &UserCmd) {
        let cmd_ptr = self.write_usercmd(SCRATCH_STRING, cmd);
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "ClientThink", &[Value::I32(ent_index), Value::I32(cmd_ptr as i32)]);
        });
    }

    pub fn write_game(&mut self, filename: &str, autosave: bool) {
        let filename_ptr = self.write_str(SCRATCH_STRING, filename);
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "WriteGame", &[Value::I32(filename_ptr as i32), Value::I32(autosave as i32)]);
        });
    }

    pub fn read_game(&mut self, filename: &str) {
        let filename_ptr = self.write_str(SCRATCH_STRING, filename);
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "ReadGame", &[Value::I32(filename_ptr as i32)]);
        });
    }

    pub fn write_level(&mut self, filename: &str) {
        let filename_ptr = self.write_str(SCRATCH_STRING, filename);
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "WriteLevel", &[Value::I32(filename_ptr as i32)]);
        });
    }

    pub fn read_level(&mut self, filename: &str) {
        let filename_ptr = self.write_str(SCRATCH_STRING, filename);
        with_vm_ctx(|ctx| {
            let _ = self.call(ctx, "ReadLevel", &[Value::I32(filename_ptr as i32)]);
        });
    }
}
