//! Multi-base encoding and decoding of identifier words.
//!
//! Power-of-two bases (Base2, z-base-32, Hex) extract digits by bitshift;
//! the rest divide. Decoding uses 256-entry lookup tables built at compile
//! time. Every decoder rejects oversized input up front and checks for
//! signed 64-bit overflow before each shift or multiply.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use thiserror::Error;

/// z-base-32 alphabet: avoids visually similar characters (0/O, 1/I/l are
/// all absent or repositioned).
const BASE32_ALPHABET: &[u8] = b"ybndrfg8ejkmcpqxot1uwisza345h769";

/// Bitcoin-style Base58 alphabet: omits `0`, `O`, `I` and `l`.
const BASE58_ALPHABET: &[u8] = b"123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

/// Base36 alphabet; decoding also accepts uppercase letters.
const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lowercase hex; decoding also accepts uppercase.
const HEX_ALPHABET: &[u8] = b"0123456789abcdef";

const BASE2_ALPHABET: &[u8] = b"01";

/// Maximum encoded lengths for a 63-bit positive value. Inputs longer than
/// these are rejected before any arithmetic.
pub const MAX_BASE2_LEN: usize = 63;
/// Maximum z-base-32 input length (`ceil(64 / 5)`).
pub const MAX_BASE32_LEN: usize = 13;
/// Maximum Base36 input length for an `i64`.
pub const MAX_BASE36_LEN: usize = 13;
/// Maximum Base58 input length for an `i64`.
pub const MAX_BASE58_LEN: usize = 11;
/// Maximum Base62 input length for an `i64`.
pub const MAX_BASE62_LEN: usize = 11;
/// Maximum Base64 input length: 8 bytes pad to 12 characters.
pub const MAX_BASE64_LEN: usize = 12;
/// Maximum hex input length (`64 / 4`).
pub const MAX_HEX_LEN: usize = 16;
/// Maximum decimal input length (sign included).
pub const MAX_DECIMAL_LEN: usize = 20;

/// A decoder rejected its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// A character outside the codec's alphabet.
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// Input longer than the codec's documented maximum.
    #[error("encoded string is {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },

    /// The decoded value would exceed the signed 64-bit positive range.
    #[error("decoded value overflows the signed 64-bit identifier range")]
    Overflow,

    /// A binary payload of the wrong size.
    #[error("payload is {len} bytes, expected {expected}")]
    InvalidLength { len: usize, expected: usize },
}

const INVALID: u8 = 0xFF;

/// Build a 256-entry byte-to-digit table. `fold_case` additionally maps the
/// uppercase form of each lowercase letter to the same digit.
const fn decode_table(alphabet: &[u8], fold_case: bool) -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < alphabet.len() {
        let c = alphabet[i];
        table[c as usize] = i as u8;
        if fold_case && c.is_ascii_lowercase() {
            table[(c - 32) as usize] = i as u8;
        }
        i += 1;
    }
    table
}

static BASE2_DECODE: [u8; 256] = decode_table(BASE2_ALPHABET, false);
static BASE32_DECODE: [u8; 256] = decode_table(BASE32_ALPHABET, false);
static BASE36_DECODE: [u8; 256] = decode_table(BASE36_ALPHABET, true);
static BASE58_DECODE: [u8; 256] = decode_table(BASE58_ALPHABET, false);
static HEX_DECODE: [u8; 256] = decode_table(HEX_ALPHABET, true);

/// Encode via bitshift extraction for an alphabet of size `2^bits`.
///
/// Non-positive input encodes to the alphabet's first character; generated
/// identifiers are positive, so only hand-built words reach that branch.
fn encode_shift(mut value: i64, alphabet: &[u8], bits: u32) -> String {
    if value <= 0 {
        return (alphabet[0] as char).to_string();
    }
    let mask = (alphabet.len() - 1) as i64;
    let mut buf = [0u8; MAX_HEX_LEN];
    let mut pos = buf.len();
    while value > 0 {
        pos -= 1;
        buf[pos] = alphabet[(value & mask) as usize];
        value >>= bits;
    }
    String::from_utf8_lossy(&buf[pos..]).into_owned()
}

/// Encode via repeated division for a non-power-of-two alphabet.
fn encode_division(mut value: i64, alphabet: &[u8]) -> String {
    if value <= 0 {
        return (alphabet[0] as char).to_string();
    }
    let base = alphabet.len() as i64;
    let mut buf = [0u8; MAX_BASE36_LEN];
    let mut pos = buf.len();
    while value > 0 {
        pos -= 1;
        buf[pos] = alphabet[(value % base) as usize];
        value /= base;
    }
    String::from_utf8_lossy(&buf[pos..]).into_owned()
}

/// Decode a power-of-two base with `(acc << bits) | digit` accumulation.
/// Empty input decodes to 0, mirroring the encoders' single-character zero.
fn decode_shift(s: &str, table: &[u8; 256], bits: u32, max_len: usize) -> Result<i64, DecodeError> {
    let bytes = s.as_bytes();
    if bytes.len() > max_len {
        return Err(DecodeError::TooLong {
            len: bytes.len(),
            max: max_len,
        });
    }
    let max_safe = i64::MAX >> bits;
    let mut value: i64 = 0;
    for (position, &b) in bytes.iter().enumerate() {
        let digit = table[b as usize];
        if digit == INVALID {
            return Err(DecodeError::InvalidCharacter {
                character: b as char,
                position,
            });
        }
        if value > max_safe {
            return Err(DecodeError::Overflow);
        }
        value = (value << bits) | digit as i64;
    }
    Ok(value)
}

/// Decode a non-power-of-two base with `acc * base + digit` accumulation.
fn decode_division(
    s: &str,
    table: &[u8; 256],
    base: i64,
    max_len: usize,
) -> Result<i64, DecodeError> {
    let bytes = s.as_bytes();
    if bytes.len() > max_len {
        return Err(DecodeError::TooLong {
            len: bytes.len(),
            max: max_len,
        });
    }
    let max_safe = i64::MAX / base;
    let mut value: i64 = 0;
    for (position, &b) in bytes.iter().enumerate() {
        let digit = table[b as usize];
        if digit == INVALID {
            return Err(DecodeError::InvalidCharacter {
                character: b as char,
                position,
            });
        }
        if value > max_safe {
            return Err(DecodeError::Overflow);
        }
        value = (value * base)
            .checked_add(digit as i64)
            .ok_or(DecodeError::Overflow)?;
    }
    Ok(value)
}

pub(crate) fn encode_base2(value: i64) -> String {
    if value <= 0 {
        return "0".to_string();
    }
    format!("{value:b}")
}

pub(crate) fn decode_base2(s: &str) -> Result<i64, DecodeError> {
    decode_shift(s, &BASE2_DECODE, 1, MAX_BASE2_LEN)
}

pub(crate) fn encode_base32(value: i64) -> String {
    encode_shift(value, BASE32_ALPHABET, 5)
}

pub(crate) fn decode_base32(s: &str) -> Result<i64, DecodeError> {
    decode_shift(s, &BASE32_DECODE, 5, MAX_BASE32_LEN)
}

pub(crate) fn encode_base36(value: i64) -> String {
    encode_division(value, BASE36_ALPHABET)
}

pub(crate) fn decode_base36(s: &str) -> Result<i64, DecodeError> {
    decode_division(s, &BASE36_DECODE, 36, MAX_BASE36_LEN)
}

pub(crate) fn encode_base58(value: i64) -> String {
    encode_division(value, BASE58_ALPHABET)
}

pub(crate) fn decode_base58(s: &str) -> Result<i64, DecodeError> {
    decode_division(s, &BASE58_DECODE, 58, MAX_BASE58_LEN)
}

pub(crate) fn encode_base62(value: i64) -> String {
    if value <= 0 {
        return "0".to_string();
    }
    let mut buf = [0u8; MAX_BASE62_LEN];
    let len = base62::encode_alternative_bytes(value as u64, &mut buf)
        .expect("11-byte buffer fits any u64");
    String::from_utf8_lossy(&buf[..len]).into_owned()
}

pub(crate) fn decode_base62(s: &str) -> Result<i64, DecodeError> {
    if s.is_empty() {
        return Ok(0);
    }
    if s.len() > MAX_BASE62_LEN {
        return Err(DecodeError::TooLong {
            len: s.len(),
            max: MAX_BASE62_LEN,
        });
    }
    match base62::decode_alternative(s) {
        Ok(v) if v > i64::MAX as u128 => Err(DecodeError::Overflow),
        Ok(v) => Ok(v as i64),
        Err(base62::DecodeError::ArithmeticOverflow) => Err(DecodeError::Overflow),
        Err(base62::DecodeError::InvalidBase62Byte(byte, position)) => {
            Err(DecodeError::InvalidCharacter {
                character: byte as char,
                position,
            })
        }
        Err(base62::DecodeError::EmptyInput) => Ok(0),
    }
}

pub(crate) fn encode_hex(value: i64) -> String {
    encode_shift(value, HEX_ALPHABET, 4)
}

pub(crate) fn decode_hex(s: &str) -> Result<i64, DecodeError> {
    decode_shift(s, &HEX_DECODE, 4, MAX_HEX_LEN)
}

pub(crate) fn encode_base64(value: i64) -> String {
    STANDARD.encode(value.to_be_bytes())
}

pub(crate) fn decode_base64(s: &str) -> Result<i64, DecodeError> {
    decode_base64_with(&STANDARD, s)
}

pub(crate) fn encode_base64_url(value: i64) -> String {
    URL_SAFE.encode(value.to_be_bytes())
}

pub(crate) fn decode_base64_url(s: &str) -> Result<i64, DecodeError> {
    decode_base64_with(&URL_SAFE, s)
}

fn decode_base64_with<E: Engine>(engine: &E, s: &str) -> Result<i64, DecodeError> {
    if s.len() > MAX_BASE64_LEN {
        return Err(DecodeError::TooLong {
            len: s.len(),
            max: MAX_BASE64_LEN,
        });
    }
    let bytes = engine.decode(s).map_err(|e| map_base64_error(e, s))?;
    let raw: [u8; 8] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| DecodeError::InvalidLength {
            len: bytes.len(),
            expected: 8,
        })?;
    let value = u64::from_be_bytes(raw);
    if value > i64::MAX as u64 {
        return Err(DecodeError::Overflow);
    }
    Ok(value as i64)
}

fn map_base64_error(err: base64::DecodeError, input: &str) -> DecodeError {
    match err {
        base64::DecodeError::InvalidByte(position, byte)
        | base64::DecodeError::InvalidLastSymbol(position, byte) => DecodeError::InvalidCharacter {
            character: byte as char,
            position,
        },
        base64::DecodeError::InvalidLength(len) => DecodeError::InvalidLength {
            len,
            expected: MAX_BASE64_LEN,
        },
        base64::DecodeError::InvalidPadding => DecodeError::InvalidCharacter {
            character: '=',
            position: input.len().saturating_sub(1),
        },
    }
}

pub(crate) fn decode_decimal(s: &str) -> Result<i64, DecodeError> {
    if s.is_empty() {
        return Err(DecodeError::InvalidLength {
            len: 0,
            expected: 1,
        });
    }
    if s.len() > MAX_DECIMAL_LEN {
        return Err(DecodeError::TooLong {
            len: s.len(),
            max: MAX_DECIMAL_LEN,
        });
    }
    s.parse::<i64>().map_err(|e| match e.kind() {
        std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow => {
            DecodeError::Overflow
        }
        _ => {
            let position = s
                .bytes()
                .position(|b| !b.is_ascii_digit() && b != b'+' && b != b'-')
                .unwrap_or(0);
            DecodeError::InvalidCharacter {
                character: s.as_bytes()[position.min(s.len() - 1)] as char,
                position,
            }
        }
    })
}
