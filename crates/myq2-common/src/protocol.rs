//! Wire protocol constants shared by client and server.
//!
//! Grounded on `inc/common/protocol.h` (protocol version, `MAX_MSGLEN`) and on
//! the bit-width constants implied by `src/common/msg.c`'s field tables. A
//! handful of sizing constants (`ENTITYNUM_BITS`, `MAX_PACKET_ENTITIES`,
//! `RATE_MESSAGES`, ...) are not present in the filtered original-source pack;
//! these use the classic Quake 2 engine values, recorded in DESIGN.md.

pub const MAX_MSGLEN: usize = 0x8000;

pub const PROTOCOL_VERSION_MAJOR: i32 = 36;
pub const PROTOCOL_VERSION_MINOR: u16 = 2000;
pub const PROTOCOL_VERSION_MINOR_OLDEST: u16 = 2000;

pub fn q2pro_supported(minor: u16) -> bool {
    (PROTOCOL_VERSION_MINOR_OLDEST..=PROTOCOL_VERSION_MINOR).contains(&minor)
}

pub const MAX_EDICTS: usize = 1024;
pub const ENTITYNUM_BITS: i32 = 10;
pub const ENTITYNUM_WORLD: i32 = MAX_EDICTS as i32 - 1;
pub const ENTITYNUM_NONE: i32 = MAX_EDICTS as i32 - 1;

pub const MAX_MODELS: usize = 256;
pub const MODELINDEX_BITS: i32 = 8;

pub const FRAMENUM_BITS: i32 = 32;
pub const DELTAFRAME_BITS: i32 = 5;
pub const DELTAFRAME_NONE: u32 = 31;
pub const FRAMEFLAGS_BITS: i32 = 8;

pub const UPDATE_BACKUP: usize = 64;
pub const UPDATE_MASK: usize = UPDATE_BACKUP - 1;

pub const RATE_MESSAGES: usize = 10;
pub const MAX_PACKET_ENTITIES: usize = 256;

pub const MAX_ENT_CLUSTERS: usize = 16;
pub const MAX_TOTAL_ENT_LEAFS: usize = 128;

pub const BASELINES_PER_CHUNK: usize = 64;
pub const SV_BASELINES_SHIFT: u32 = 6;
pub const SV_BASELINES_MASK: i32 = BASELINES_PER_CHUNK as i32 - 1;

pub const SOUND_FULLVOLUME: f32 = 80.0;

pub const MAX_MAP_AREA_BYTES: usize = 32;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FrameFlags: u8 {
        const SUPPRESSED = 1 << 0;
        const CLIENTDROP = 1 << 1;
        const CLIENTPRED = 1 << 2;
        const OLDFRAME   = 1 << 3;
        const OLDENT     = 1 << 4;
        const NODELTA    = 1 << 5;
    }
}

impl FrameFlags {
    /// `FF_CLIENTPRED` masks out `FF_CLIENTDROP` when both would be set.
    /// Replicated verbatim per the design note in SPEC_FULL.md rather than
    /// re-derived from first principles.
    pub fn normalize(mut self) -> Self {
        if self.contains(FrameFlags::CLIENTPRED) {
            self.remove(FrameFlags::CLIENTDROP);
        }
        self
    }
}

/// Server-to-client command opcodes (subset relevant to this crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ServerCommand {
    Nop = 0,
    Disconnect = 1,
    Reconnect = 2,
    Print = 3,
    Centerprint = 4,
    Stufftext = 5,
    Serverdata = 6,
    Configstring = 7,
    Configstringstream = 8,
    Baselinestream = 9,
    Sound = 10,
    Spawnbaseline = 11,
    TempEntity = 12,
    Muzzleflash = 13,
    Muzzleflash2 = 14,
    Download = 15,
    Zdownload = 16,
    Zpacket = 17,
    Frame = 18,
    Inventory = 19,
    Layout = 20,
    Gamestate = 21,
    Setting = 22,
}
