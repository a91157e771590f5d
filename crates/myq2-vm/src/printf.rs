// printf.rs — host-side vm_vsnprintf: walks a guest format string and the
// guest varargs area, writing the formatted result into a guest buffer.
// Grounded on: examples/original_source/src/common/vm/printf.c (musl's
// vsnprintf, adapted to operate over `vm_memory_t` instead of a native
// varargs list). The argument-popping/alignment state machine and the
// flag/width/precision parsing follow that source; digit generation is
// delegated to `core::fmt` rather than reimplementing musl's `fmt_fp`/`fmt_u`
// big-integer routines — see DESIGN.md.

use crate::bridge::MemoryView;
use crate::types::VmTrap;

bitflags::bitflags! {
    struct Flags: u32 {
        const ALT_FORM = 1 << 0;
        const ZERO_PAD = 1 << 1;
        const LEFT_ADJ = 1 << 2;
        const PAD_POS  = 1 << 3;
        const MARK_POS = 1 << 4;
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ArgKind {
    Int32,
    UInt32,
    Int64,
    UInt64,
    Ptr,
    Double,
}

struct Cursor<'a> {
    fmt: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> u8 {
        self.fmt.get(self.pos).copied().unwrap_or(0)
    }
    fn bump(&mut self) -> u8 {
        let c = self.peek();
        if c != 0 {
            self.pos += 1;
        }
        c
    }
    fn eof(&self) -> bool {
        self.pos >= self.fmt.len()
    }
}

/// Pops one argument from the guest varargs area at `*ap`, honoring C
/// varargs promotion alignment (4 bytes for anything narrower than a
/// double/64-bit value, 8 bytes for those).
fn pop_arg(mem: &MemoryView<'_>, kind: ArgKind, ap: &mut u32) -> Result<u64, VmTrap> {
    let wide = matches!(kind, ArgKind::Int64 | ArgKind::UInt64 | ArgKind::Double);
    let align = if wide { 8 } else { 4 };
    *ap = align_up(*ap, align);
    let bytes = if wide { 8 } else { 4 };
    let raw = if wide {
        mem.read(*ap, 8, 8, |b| u64::from_le_bytes(b.try_into().unwrap()))?
    } else {
        mem.read(*ap, 4, 4, |b| u32::from_le_bytes(b.try_into().unwrap()) as u64)?
    };
    *ap += bytes;
    Ok(raw)
}

fn align_up(v: u32, a: u32) -> u32 {
    (v + a - 1) & !(a - 1)
}

struct Output<'a, 'b> {
    mem: &'a mut MemoryView<'b>,
    buf_ptr: u32,
    capacity: usize, // bytes available for content, excluding the final NUL
    written: usize,  // bytes actually written so far (never exceeds capacity)
    total: usize,    // full formatted length, C99 semantics (may exceed capacity)
}

impl<'a, 'b> Output<'a, 'b> {
    fn push(&mut self, s: &[u8]) {
        self.total += s.len();
        if self.written >= self.capacity {
            return;
        }
        let room = self.capacity - self.written;
        let n = room.min(s.len());
        if n > 0 {
            let _ = self.mem.write(self.buf_ptr + self.written as u32, &s[..n], 1);
            self.written += n;
        }
    }

    fn pad(&mut self, c: u8, width: usize, content_len: usize, flags: Flags) {
        if flags.contains(Flags::LEFT_ADJ) || content_len >= width {
            return;
        }
        let n = width - content_len;
        let fill = vec![c; n];
        self.push(&fill);
    }
}

/// Formats `fmt` (a guest NUL-terminated string) with varargs starting at
/// `ap`, writing up to `size` bytes (including the terminator) at `dst`.
/// Returns the full formatted length regardless of truncation, matching
/// C99 `vsnprintf`; returns `Err` only for a malformed format string or an
/// out-of-bounds guest pointer, never for truncation.
pub fn vm_vsnprintf(
    mem: &mut MemoryView<'_>,
    dst: u32,
    size: u32,
    fmt_ptr: u32,
    mut ap: u32,
) -> Result<i32, VmTrap> {
    let fmt_bytes = mem.read_cstr(fmt_ptr)?.to_vec();
    let capacity = size.saturating_sub(1) as usize;
    let mut out = Output {
        mem,
        buf_ptr: dst,
        capacity,
        written: 0,
        total: 0,
    };

    let mut c = Cursor { fmt: &fmt_bytes, pos: 0 };
    while !c.eof() {
        if c.peek() != b'%' {
            let start = c.pos;
            while !c.eof() && c.peek() != b'%' {
                c.pos += 1;
            }
            out.push(&fmt_bytes[start..c.pos]);
            continue;
        }
        c.bump(); // consume '%'
        if c.peek() == b'%' {
            c.bump();
            out.push(b"%");
            continue;
        }

        let mut flags = Flags::empty();
        loop {
            let set = match c.peek() {
                b'#' => Flags::ALT_FORM,
                b'0' => Flags::ZERO_PAD,
                b'-' => Flags::LEFT_ADJ,
                b' ' => Flags::PAD_POS,
                b'+' => Flags::MARK_POS,
                _ => break,
            };
            flags |= set;
            c.bump();
        }

        let width = if c.peek() == b'*' {
            c.bump();
            let v = pop_arg(out.mem, ArgKind::Int32, &mut ap)? as i32;
            if v < 0 {
                flags |= Flags::LEFT_ADJ;
                (-v) as usize
            } else {
                v as usize
            }
        } else {
            read_uint(&mut c)
        };

        let precision: Option<usize> = if c.peek() == b'.' {
            c.bump();
            if c.peek() == b'*' {
                c.bump();
                let v = pop_arg(out.mem, ArgKind::Int32, &mut ap)? as i32;
                Some(v.max(0) as usize)
            } else {
                Some(read_uint(&mut c))
            }
        } else {
            None
        };

        // Length modifiers.
        let mut is64 = false;
        loop {
            match c.peek() {
                b'h' => {
                    c.bump();
                    if c.peek() == b'h' {
                        c.bump();
                    }
                }
                b'l' => {
                    c.bump();
                    if c.peek() == b'l' {
                        c.bump();
                        is64 = true;
                    }
                }
                b'L' => {
                    c.bump();
                }
                b'z' | b'j' | b't' => {
                    c.bump();
                    is64 = cfg!(target_pointer_width = "64");
                }
                _ => break,
            }
        }

        if flags.contains(Flags::LEFT_ADJ) {
            flags.remove(Flags::ZERO_PAD);
        }

        let conv = c.bump();
        match conv {
            b'd' | b'i' => {
                let kind = if is64 { ArgKind::Int64 } else { ArgKind::Int32 };
                let raw = pop_arg(out.mem, kind, &mut ap)?;
                let v: i64 = if is64 { raw as i64 } else { raw as u32 as i32 as i64 };
                write_signed(&mut out, v, width, precision, flags);
            }
            b'u' => {
                let kind = if is64 { ArgKind::UInt64 } else { ArgKind::UInt32 };
                let raw = pop_arg(out.mem, kind, &mut ap)?;
                let v: u64 = if is64 { raw } else { raw as u32 as u64 };
                write_unsigned(&mut out, v, 10, false, width, precision, flags, "");
            }
            b'o' => {
                let raw = pop_arg(out.mem, if is64 { ArgKind::UInt64 } else { ArgKind::UInt32 }, &mut ap)?;
                let v = if is64 { raw } else { raw as u32 as u64 };
                write_octal(&mut out, v, width, precision, flags);
            }
            b'x' | b'X' => {
                let raw = pop_arg(out.mem, if is64 { ArgKind::UInt64 } else { ArgKind::UInt32 }, &mut ap)?;
                let v = if is64 { raw } else { raw as u32 as u64 };
                write_hex(&mut out, v, conv == b'X', width, precision, flags);
            }
            b'p' => {
                let raw = pop_arg(out.mem, ArgKind::Ptr, &mut ap)?;
                write_hex(&mut out, raw, false, width, precision, flags | Flags::ALT_FORM);
            }
            b'c' => {
                let raw = pop_arg(out.mem, ArgKind::Int32, &mut ap)?;
                let b = raw as u8;
                out.pad(b' ', width, 1, flags);
                out.push(&[b]);
                out.pad(b' ', width, 1, flags | Flags::LEFT_ADJ);
            }
            b's' => {
                let raw = pop_arg(out.mem, ArgKind::Ptr, &mut ap)?;
                let bytes: &[u8] = if raw == 0 {
                    b"(null)"
                } else {
                    out.mem.read_cstr(raw as u32)?
                };
                let n = precision.map(|p| p.min(bytes.len())).unwrap_or(bytes.len());
                out.pad(b' ', width, n, flags);
                out.push(&bytes[..n]);
                out.pad(b' ', width, n, flags | Flags::LEFT_ADJ);
            }
            b'e' | b'f' | b'g' | b'a' | b'E' | b'F' | b'G' | b'A' => {
                let raw = pop_arg(out.mem, ArgKind::Double, &mut ap)?;
                let v = f64::from_bits(raw);
                write_float(&mut out, v, conv, width, precision, flags);
            }
            b'n' => {
                let raw = pop_arg(out.mem, ArgKind::Ptr, &mut ap)?;
                if raw != 0 {
                    let total = out.total as i32;
                    out.mem.write(raw as u32, &total.to_le_bytes(), 4)?;
                }
            }
            _ => return Err(VmTrap::OutOfBoundsMemory { op: "vsnprintf: bad conversion" }),
        }
    }

    if size > 0 {
        let term_at = out.buf_ptr + out.written.min(capacity) as u32;
        out.mem.write(term_at, &[0], 1)?;
    }
    Ok(out.total as i32)
}

fn read_uint(c: &mut Cursor<'_>) -> usize {
    let mut v = 0usize;
    while c.peek().is_ascii_digit() {
        v = v.saturating_mul(10).saturating_add((c.bump() - b'0') as usize);
    }
    v
}

fn write_signed(out: &mut Output, v: i64, width: usize, precision: Option<usize>, mut flags: Flags) {
    let neg = v < 0;
    let mag = v.unsigned_abs();
    let sign: &[u8] = if neg {
        b"-"
    } else if flags.contains(Flags::MARK_POS) {
        b"+"
    } else if flags.contains(Flags::PAD_POS) {
        b" "
    } else {
        b""
    };
    if precision.is_some() {
        flags.remove(Flags::ZERO_PAD);
    }
    let digits = format!("{mag}");
    let digits = pad_precision(&digits, precision);
    emit_numeric(out, sign, digits.as_bytes(), width, flags);
}

fn write_unsigned(out: &mut Output, v: u64, _base: u32, _upper: bool, width: usize, precision: Option<usize>, mut flags: Flags, _prefix: &str) {
    if precision.is_some() {
        flags.remove(Flags::ZERO_PAD);
    }
    let digits = format!("{v}");
    let digits = pad_precision(&digits, precision);
    emit_numeric(out, b"", digits.as_bytes(), width, flags);
}

fn write_octal(out: &mut Output, v: u64, width: usize, precision: Option<usize>, mut flags: Flags) {
    if precision.is_some() {
        flags.remove(Flags::ZERO_PAD);
    }
    let mut digits = format!("{v:o}");
    if flags.contains(Flags::ALT_FORM) && !digits.starts_with('0') {
        digits = format!("0{digits}");
    }
    let digits = pad_precision(&digits, precision);
    emit_numeric(out, b"", digits.as_bytes(), width, flags);
}

fn write_hex(out: &mut Output, v: u64, upper: bool, width: usize, precision: Option<usize>, mut flags: Flags) {
    if precision.is_some() {
        flags.remove(Flags::ZERO_PAD);
    }
    let digits = if upper { format!("{v:X}") } else { format!("{v:x}") };
    let digits = pad_precision(&digits, precision);
    let prefix: &[u8] = if flags.contains(Flags::ALT_FORM) && v != 0 {
        if upper { b"0X" } else { b"0x" }
    } else {
        b""
    };
    emit_numeric(out, prefix, digits.as_bytes(), width, flags);
}

fn write_float(out: &mut Output, v: f64, conv: u8, width: usize, precision: Option<usize>, flags: Flags) {
    let p = precision.unwrap_or(6);
    let sign: &[u8] = if v.is_sign_negative() {
        b"-"
    } else if flags.contains(Flags::MARK_POS) {
        b"+"
    } else if flags.contains(Flags::PAD_POS) {
        b" "
    } else {
        b""
    };
    let mag = v.abs();
    let body = match conv | 0x20 {
        b'f' => format!("{mag:.*}", p),
        b'e' => {
            let s = format!("{mag:.*e}", p);
            normalize_exponent(&s, conv == b'E')
        }
        b'g' => {
            let s = format!("{mag}");
            s
        }
        _ => format!("{mag:.*}", p), // 'a' (hex float) collapses to decimal; rarely used by game logging
    };
    emit_numeric(out, sign, body.as_bytes(), width, flags);
}

fn normalize_exponent(s: &str, upper: bool) -> String {
    // Rust renders `1.5e2`; C wants `1.500000e+02`.
    if let Some(idx) = s.find('e') {
        let (mantissa, exp) = s.split_at(idx);
        let exp_val: i32 = exp[1..].parse().unwrap_or(0);
        let e = if upper { 'E' } else { 'e' };
        format!("{mantissa}{e}{:+03}", exp_val)
    } else {
        s.to_string()
    }
}

fn pad_precision(digits: &str, precision: Option<usize>) -> String {
    match precision {
        Some(p) if p > digits.len() => format!("{}{}", "0".repeat(p - digits.len()), digits),
        Some(0) if digits == "0" => String::new(),
        _ => digits.to_string(),
    }
}

fn emit_numeric(out: &mut Output, prefix: &[u8], digits: &[u8], width: usize, flags: Flags) {
    let content_len = prefix.len() + digits.len();
    if flags.contains(Flags::ZERO_PAD) && !flags.contains(Flags::LEFT_ADJ) && width > content_len {
        out.push(prefix);
        let zeros = vec![b'0'; width - content_len];
        out.push(&zeros);
        out.push(digits);
    } else {
        out.pad(b' ', width, content_len, flags);
        out.push(prefix);
        out.push(digits);
        out.pad(b' ', width, content_len, flags | Flags::LEFT_ADJ);
    }
}
