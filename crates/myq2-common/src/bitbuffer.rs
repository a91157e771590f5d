//! Shared bit + byte message buffer.
//!
//! Grounded on `src/common/msg.c` (`MSG_WriteBits`/`MSG_WriteBit`/
//! `MSG_FlushBits`/`MSG_ReadBits`/`MSG_ReadBit`/`MSG_AlignBits`) and
//! `inc/common/sizebuf.h` (`sizebuf_t`). Unlike the original, this is an
//! owned value threaded through the call chain rather than a pair of global
//! statics — the "no two concurrent uses" invariant becomes a borrow-checker
//! fact instead of a convention.

use std::fmt;

/// Mirrors `sizebuf_t`'s `bool overflowed` / `allowoverflow` / `allowunderflow`
/// plus the bit accumulator, minus the process-wide `tag` debug field (no
/// longer needed once the buffer is a named local).
pub struct MessageBuffer {
    data: Vec<u8>,
    max_size: usize,
    cursor: usize,
    readcount: usize,
    bits_buf: u64,
    bits_left: u32,
    pub allow_overflow: bool,
    pub allow_underflow: bool,
    pub overflowed: bool,
}

impl fmt::Debug for MessageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuffer")
            .field("cursor", &self.cursor)
            .field("readcount", &self.readcount)
            .field("overflowed", &self.overflowed)
            .finish()
    }
}

impl MessageBuffer {
    pub fn new(max_size: usize) -> Self {
        Self {
            data: vec![0u8; max_size],
            max_size,
            cursor: 0,
            readcount: 0,
            bits_buf: 0,
            bits_left: 32,
            allow_overflow: true,
            allow_underflow: true,
            overflowed: false,
        }
    }

    pub fn clear(&mut self) {
        self.cursor = 0;
        self.readcount = 0;
        self.bits_buf = 0;
        self.bits_left = 32;
        self.overflowed = false;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// `MSG_BeginWriting`
    pub fn begin_writing(&mut self) {
        self.cursor = 0;
        self.bits_buf = 0;
        self.bits_left = 32;
        self.overflowed = false;
    }

    /// `SZ_GetSpace`
    fn get_space(&mut self, len: usize) -> usize {
        if self.cursor + len > self.max_size {
            if !self.allow_overflow {
                panic!("MessageBuffer overflowed");
            }
            self.overflowed = true;
            self.cursor = 0;
            return 0;
        }
        let start = self.cursor;
        self.cursor += len;
        start
    }

    pub fn write_data(&mut self, bytes: &[u8]) {
        let start = self.get_space(bytes.len());
        if self.overflowed {
            return;
        }
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write_data(&[v]);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.write_data(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write_data(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write_data(&v.to_le_bytes());
    }

    pub fn write_string(&mut self, s: &str) {
        self.write_data(s.as_bytes());
        self.write_u8(0);
    }

    /// `MSG_WriteBits`: `bits` in `[-32, 32] \ {0}`.
    pub fn write_bits(&mut self, value: i32, bits: i32) {
        assert!(bits != 0 && bits >= -32 && bits <= 32, "bad bit count {bits}");
        let bits = bits.unsigned_abs();

        let mut bits_buf = self.bits_buf;
        let mut bits_left = self.bits_left;
        let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
        let v = (value as u32 as u64) & mask;

        bits_buf |= v << (32 - bits_left);
        if bits >= bits_left {
            self.write_u32(bits_buf as u32);
            bits_buf = v >> bits_left;
            bits_left += 32;
        }
        bits_left -= bits;

        self.bits_buf = bits_buf;
        self.bits_left = bits_left;
    }

    /// `MSG_WriteBit`
    pub fn write_bit(&mut self, value: bool) {
        if self.bits_left == 0 {
            self.write_u32(self.bits_buf as u32);
            self.bits_buf = 0;
            self.bits_left = 32;
        }
        self.bits_buf |= (value as u64) << (32 - self.bits_left);
        self.bits_left -= 1;
    }

    /// `MSG_FlushBits`
    pub fn flush_bits(&mut self) {
        let mut bits_buf = self.bits_buf as u32;
        let mut bits_left = self.bits_left;
        while bits_left < 32 {
            self.write_u8((bits_buf & 0xff) as u8);
            bits_buf >>= 8;
            bits_left += 8;
        }
        self.bits_buf = 0;
        self.bits_left = 32;
    }

    // === reading ===

    /// `MSG_BeginReading`
    pub fn begin_reading(&mut self) {
        self.readcount = 0;
        self.bits_buf = 0;
        self.bits_left = 0;
    }

    pub fn remaining(&self) -> usize {
        self.cursor.saturating_sub(self.readcount)
    }

    fn read_data_raw(&mut self, len: usize) -> Option<&[u8]> {
        if self.readcount + len > self.cursor {
            if !self.allow_underflow {
                panic!("MessageBuffer underflowed");
            }
            self.readcount = self.cursor;
            return None;
        }
        let start = self.readcount;
        self.readcount += len;
        Some(&self.data[start..start + len])
    }

    pub fn read_data(&mut self, len: usize) -> Vec<u8> {
        self.read_data_raw(len).map(|s| s.to_vec()).unwrap_or_default()
    }

    pub fn read_u8(&mut self) -> i32 {
        match self.read_data_raw(1) {
            Some(b) => b[0] as i32,
            None => -1,
        }
    }

    pub fn read_u16(&mut self) -> i32 {
        match self.read_data_raw(2) {
            Some(b) => u16::from_le_bytes([b[0], b[1]]) as i32,
            None => -1,
        }
    }

    pub fn read_u32(&mut self) -> i32 {
        match self.read_data_raw(4) {
            Some(b) => i32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            None => -1,
        }
    }

    pub fn read_u64(&mut self) -> i64 {
        match self.read_data_raw(8) {
            Some(b) => i64::from_le_bytes(b.try_into().unwrap()),
            None => -1,
        }
    }

    pub fn read_string(&mut self, max: usize) -> String {
        let mut out = Vec::new();
        loop {
            let c = self.read_u8();
            if c <= 0 {
                break;
            }
            if out.len() + 1 < max || max == 0 {
                out.push(c as u8);
            }
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    pub fn read_string_line(&mut self, max: usize) -> String {
        let mut out = Vec::new();
        loop {
            let c = self.read_u8();
            if c <= 0 || c == b'\n' as i32 {
                break;
            }
            if out.len() + 1 < max || max == 0 {
                out.push(c as u8);
            }
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    /// `MSG_ReadBits`. The read accumulator counts bits *up* from 0 as bytes
    /// are pulled in, unlike the writer's 32-down-counter — this asymmetry
    /// matches the original and must be preserved exactly.
    pub fn read_bits(&mut self, bits: i32) -> i32 {
        assert!(bits != 0 && bits >= -32 && bits <= 32, "bad bit count {bits}");
        let signed = bits < 0;
        let bits = bits.unsigned_abs();

        let mut bits_buf = self.bits_buf;
        let mut bits_left = self.bits_left;

        while bits > bits_left {
            bits_buf |= (self.read_u8() as u8 as u64) << bits_left;
            bits_left += 8;
        }

        let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
        let value = (bits_buf & mask) as u32;

        self.bits_buf = bits_buf >> bits;
        self.bits_left = bits_left - bits;

        if signed {
            sign_extend(value, bits)
        } else {
            value as i32
        }
    }

    /// `MSG_ReadBit`
    pub fn read_bit(&mut self) -> bool {
        if self.bits_left == 0 {
            self.bits_buf = self.read_u8() as u8 as u64;
            self.bits_left = 8;
        }
        let v = (self.bits_buf & 1) != 0;
        self.bits_buf >>= 1;
        self.bits_left -= 1;
        v
    }

    /// `MSG_AlignBits`
    pub fn align_bits(&mut self) {
        self.bits_buf = 0;
        self.bits_left = 0;
    }
}

fn sign_extend(value: u32, bits: u32) -> i32 {
    if bits == 0 || bits >= 32 {
        return value as i32;
    }
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_byte_roundtrip() {
        let mut buf = MessageBuffer::new(256);
        buf.begin_writing();
        buf.write_u8(0x42);
        buf.write_u16(0xbeef);
        buf.write_u32(0xdead_beef);
        buf.write_u64(0x0123_4567_89ab_cdef);
        buf.write_string("hello");

        buf.begin_reading();
        assert_eq!(buf.read_u8(), 0x42);
        assert_eq!(buf.read_u16(), 0xbeef);
        assert_eq!(buf.read_u32() as u32, 0xdead_beef);
        assert_eq!(buf.read_u64() as u64, 0x0123_4567_89ab_cdef);
        assert_eq!(buf.read_string(0), "hello");
    }

    #[test]
    fn write_read_bits_roundtrip_unsigned() {
        let mut buf = MessageBuffer::new(256);
        buf.begin_writing();
        buf.write_bits(5, 3);
        buf.write_bits(200, 8);
        buf.write_bits(1, 1);
        buf.write_bits(0x1fffffff, 29);
        buf.flush_bits();

        buf.begin_reading();
        assert_eq!(buf.read_bits(3), 5);
        assert_eq!(buf.read_bits(8), 200);
        assert_eq!(buf.read_bits(1), 1);
        assert_eq!(buf.read_bits(29), 0x1fffffff);
    }

    #[test]
    fn write_read_bits_signed() {
        let mut buf = MessageBuffer::new(256);
        buf.begin_writing();
        buf.write_bits(-5, -8);
        buf.write_bits(-1, -16);
        buf.flush_bits();

        buf.begin_reading();
        assert_eq!(buf.read_bits(-8), -5);
        assert_eq!(buf.read_bits(-16), -1);
    }

    #[test]
    fn flush_bits_byte_aligns() {
        let mut buf = MessageBuffer::new(256);
        buf.begin_writing();
        buf.write_bit(true);
        buf.flush_bits();
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn many_single_bits_flush_on_word_boundary() {
        let mut buf = MessageBuffer::new(256);
        buf.begin_writing();
        for i in 0..40 {
            buf.write_bit(i % 3 == 0);
        }
        buf.flush_bits();

        buf.begin_reading();
        for i in 0..40 {
            assert_eq!(buf.read_bit(), i % 3 == 0, "bit {i}");
        }
    }

    #[test]
    fn overflow_sets_flag_and_resets_cursor() {
        let mut buf = MessageBuffer::new(4);
        buf.begin_writing();
        buf.write_data(&[1, 2, 3, 4, 5]);
        assert!(buf.overflowed);
    }

    #[test]
    fn underflow_returns_minus_one() {
        let mut buf = MessageBuffer::new(4);
        buf.begin_writing();
        buf.begin_reading();
        assert_eq!(buf.read_u8(), -1);
    }
}
