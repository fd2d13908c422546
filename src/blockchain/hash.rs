//! Wegman-style universal hash used for block fingerprints and the
//! proof-of-work oracle.
//!
//! This is deliberately NOT a cryptographic hash. It is a fast
//! multiply-shift mixer in the Wegman-Carter family: good enough to look
//! uniform for a leading-zeros difficulty check, and cheap enough that
//! mining stays interactive at dev difficulties. Do not rely on it for
//! preimage resistance.

/// One mixing round over a 64-bit word.
///
/// Splits the input into 32-bit halves, offsets each with a fixed odd
/// constant (32-bit wraparound), multiplies them into a 64-bit product and
/// folds the product back together. Only the low ~28 bits of the result
/// are uniformly distributed; `digest` compensates by chaining rounds and
/// keeping the low 32 bits of two independent lanes.
pub fn wegman_mix(x: u64) -> u64 {
    let lo = (x as u32).wrapping_add(0xACEF_ADE5);
    let hi = ((x >> 32) as u32).wrapping_add(0xBADB_ABE5);

    let product = (lo as u64).wrapping_mul(hi as u64);

    (product & 0xFFFF_FFFF) + ((product >> 31) & 0xFFFF_FFFF)
}

/// Hash an arbitrary byte sequence into a fixed-width 16-hex-char digest.
///
/// Folds the input 8 bytes at a time (little-endian, zero-padded tail)
/// through `wegman_mix`, seeding the state with the input length so that
/// zero-padding cannot collide with genuine trailing zero bytes. The final
/// state feeds two mix lanes whose low 32 bits form the 64-bit digest.
///
/// Deterministic and platform-independent: the same bytes produce the same
/// digest on every node, which is what cross-node chain validation relies on.
pub fn digest(data: &[u8]) -> String {
    let mut state = data.len() as u64;

    for chunk in data.chunks(8) {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        state = wegman_mix(state ^ u64::from_le_bytes(word)).rotate_left(29);
    }

    let hi = wegman_mix(state) as u32;
    let lo = wegman_mix(state ^ 0x7777_7777) as u32;

    hex::encode((((hi as u64) << 32) | lo as u64).to_be_bytes())
}
