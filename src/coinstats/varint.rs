//! Variable-length integer encodings used by the serialized-hash transcript
//! (§4.2) and the per-output MuHash serialization (§4.1).
//!
//! These are two distinct encodings and must not be conflated (SPEC_FULL
//! §4.1): `write_varint` is the legacy base-128 "VARINT" with the `(n>>7)-1`
//! folding trick, used only inside the `SerializedHash` transcript;
//! `write_compact_size` is the 1/3/5/9-byte length-prefix encoding, used for
//! the script length inside the per-output MuHash serialization.

/// Base-128 VARINT: continuation bit `0x80` on every byte but the last
/// emitted one, most-significant group first, with the folding trick that
/// lets an unbounded range of values reuse otherwise-redundant encodings.
pub fn write_varint(buf: &mut Vec<u8>, mut n: u64) {
    let mut tmp = [0u8; 10];
    let mut len = 0usize;
    loop {
        tmp[len] = ((n & 0x7f) as u8) | if len != 0 { 0x80 } else { 0 };
        if n <= 0x7f {
            break;
        }
        n = (n >> 7) - 1;
        len += 1;
    }
    loop {
        buf.push(tmp[len]);
        if len == 0 {
            break;
        }
        len -= 1;
    }
}

/// Traditional compact-size length prefix: `<0xfd` one byte; `<=0xffff` →
/// `0xfd` + u16 LE; `<=0xffffffff` → `0xfe` + u32 LE; else `0xff` + u64 LE.
pub fn write_compact_size(buf: &mut Vec<u8>, n: u64) {
    if n < 0xfd {
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(0xfd);
        buf.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(0xfe);
        buf.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        buf.push(0xff);
        buf.extend_from_slice(&n.to_le_bytes());
    }
}

/// `varint_signed_nonneg`: the per-output amount in the serialized-hash
/// transcript is always non-negative (invariant 3, §8) so it reuses the
/// plain VARINT encoding over its `u64` bit pattern.
pub fn write_varint_signed_nonneg(buf: &mut Vec<u8>, n: i64) {
    debug_assert!(n >= 0, "serialized-hash transcript requires non-negative amounts");
    write_varint(buf, n as u64);
}
