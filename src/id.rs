//! The identifier value type.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::codec::{self, DecodeError};
use crate::config::DEFAULT_EPOCH_MS;
use crate::layout::{BitLayout, LayoutShifts};

// Constant-folded shift/mask set for the default 41+10+12 layout, so the
// plain extraction methods compile down to fixed shifts.
const DEFAULT_SHIFTS: LayoutShifts = BitLayout::DEFAULT.shifts();

const ONE_DAY_MS: i64 = 86_400_000;

/// A 64-bit time-ordered identifier.
///
/// Wraps the signed 64-bit word produced by a [`Generator`](crate::Generator).
/// The sign bit of a valid identifier is always zero, so the word sorts the
/// same whether treated as signed or unsigned. Component extraction without
/// an explicit layout assumes the default 41+10+12 layout and epoch; use the
/// `*_with_layout` variants for identifiers generated under other layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlakeId(i64);

impl FlakeId {
    /// Wrap a raw word. No validation; see [`FlakeId::is_valid`].
    pub const fn from_i64(word: i64) -> Self {
        Self(word)
    }

    /// The raw signed word.
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// The raw word as unsigned. Lossless for valid identifiers.
    pub const fn as_u64(self) -> u64 {
        self.0 as u64
    }

    /// Fixed 8-byte big-endian representation for binary protocols.
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Reconstruct from the 8-byte big-endian representation.
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(i64::from_be_bytes(bytes))
    }

    /// Reconstruct from a byte slice, rejecting any length other than 8.
    pub fn try_from_be_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| DecodeError::InvalidLength {
            len: bytes.len(),
            expected: 8,
        })?;
        Ok(Self::from_be_bytes(raw))
    }

    // --- Encodings ---

    /// Binary string, mostly useful for debugging bit layouts.
    pub fn base2(self) -> String {
        codec::encode_base2(self.0)
    }

    /// z-base-32: case-stable, avoids visually similar characters.
    pub fn base32(self) -> String {
        codec::encode_base32(self.0)
    }

    /// Base36 (`0-9a-z`).
    pub fn base36(self) -> String {
        codec::encode_base36(self.0)
    }

    /// Bitcoin-style Base58: no `0`, `O`, `I` or `l`.
    pub fn base58(self) -> String {
        codec::encode_base58(self.0)
    }

    /// URL-safe alphanumeric Base62 (`0-9a-zA-Z`), the recommended encoding
    /// for identifiers in URLs.
    pub fn base62(self) -> String {
        codec::encode_base62(self.0)
    }

    /// Standard padded Base64 of the 8-byte big-endian form.
    pub fn base64(self) -> String {
        codec::encode_base64(self.0)
    }

    /// URL-safe padded Base64 of the 8-byte big-endian form.
    pub fn base64_url(self) -> String {
        codec::encode_base64_url(self.0)
    }

    /// Lowercase hexadecimal.
    pub fn hex(self) -> String {
        codec::encode_hex(self.0)
    }

    /// Encode under a format named at runtime.
    ///
    /// Accepted names: `hex`/`x`, `binary`/`bin`/`b`, `base32`/`b32`/`32`,
    /// `base36`/`b36`/`36`, `base58`/`b58`/`58`, `base62`/`b62`/`62`,
    /// `base64`/`b64`/`64`, `decimal`/`dec`/`d`. Anything else, including
    /// the empty string, falls back to decimal.
    pub fn format(self, format: &str) -> String {
        match format {
            "hex" | "x" => self.hex(),
            "binary" | "bin" | "b" => self.base2(),
            "base32" | "b32" | "32" => self.base32(),
            "base36" | "b36" | "36" => self.base36(),
            "base58" | "b58" | "58" => self.base58(),
            "base62" | "b62" | "62" => self.base62(),
            "base64" | "b64" | "64" => self.base64(),
            _ => self.to_string(),
        }
    }

    // --- Parsers ---

    /// Parse a decimal string.
    pub fn parse_decimal(s: &str) -> Result<Self, DecodeError> {
        codec::decode_decimal(s).map(Self)
    }

    /// Parse a binary string.
    pub fn parse_base2(s: &str) -> Result<Self, DecodeError> {
        codec::decode_base2(s).map(Self)
    }

    /// Parse a z-base-32 string.
    pub fn parse_base32(s: &str) -> Result<Self, DecodeError> {
        codec::decode_base32(s).map(Self)
    }

    /// Parse a Base36 string; both letter cases are accepted.
    pub fn parse_base36(s: &str) -> Result<Self, DecodeError> {
        codec::decode_base36(s).map(Self)
    }

    /// Parse a Base58 string.
    pub fn parse_base58(s: &str) -> Result<Self, DecodeError> {
        codec::decode_base58(s).map(Self)
    }

    /// Parse a Base62 string.
    pub fn parse_base62(s: &str) -> Result<Self, DecodeError> {
        codec::decode_base62(s).map(Self)
    }

    /// Parse a standard Base64 string.
    pub fn parse_base64(s: &str) -> Result<Self, DecodeError> {
        codec::decode_base64(s).map(Self)
    }

    /// Parse a URL-safe Base64 string.
    pub fn parse_base64_url(s: &str) -> Result<Self, DecodeError> {
        codec::decode_base64_url(s).map(Self)
    }

    /// Parse a hexadecimal string; both letter cases are accepted.
    pub fn parse_hex(s: &str) -> Result<Self, DecodeError> {
        codec::decode_hex(s).map(Self)
    }

    // --- Component extraction ---

    /// Timestamp in milliseconds since the Unix epoch, assuming the default
    /// layout and epoch.
    pub const fn timestamp_ms(self) -> i64 {
        (self.0 >> DEFAULT_SHIFTS.timestamp_shift) + DEFAULT_EPOCH_MS
    }

    /// Worker identity, assuming the default layout.
    pub const fn worker(self) -> u32 {
        ((self.0 >> DEFAULT_SHIFTS.worker_shift) & DEFAULT_SHIFTS.max_worker) as u32
    }

    /// Sequence number, assuming the default layout.
    pub const fn sequence(self) -> u16 {
        (self.0 & DEFAULT_SHIFTS.max_sequence) as u16
    }

    /// All three components at once, assuming the default layout and epoch.
    pub const fn components(self) -> (i64, u32, u16) {
        (self.timestamp_ms(), self.worker(), self.sequence())
    }

    /// Timestamp in milliseconds under an explicit layout and epoch:
    /// `(word >> timestamp_shift) * time_unit_ms + epoch_ms`.
    pub fn timestamp_ms_with_layout(self, layout: &BitLayout, epoch_ms: i64) -> i64 {
        let shifts = layout.shifts();
        let time_units = self.0 >> shifts.timestamp_shift;
        time_units * layout.time_unit.as_millis() as i64 + epoch_ms
    }

    /// Worker identity under an explicit layout.
    pub fn worker_with_layout(self, layout: &BitLayout) -> u32 {
        let shifts = layout.shifts();
        ((self.0 >> shifts.worker_shift) & shifts.max_worker) as u32
    }

    /// Sequence number under an explicit layout.
    pub fn sequence_with_layout(self, layout: &BitLayout) -> u16 {
        (self.0 & layout.shifts().max_sequence) as u16
    }

    /// All three components under an explicit layout and epoch.
    pub fn components_with_layout(self, layout: &BitLayout, epoch_ms: i64) -> (i64, u32, u16) {
        (
            self.timestamp_ms_with_layout(layout, epoch_ms),
            self.worker_with_layout(layout),
            self.sequence_with_layout(layout),
        )
    }

    /// The instant this identifier was generated, assuming the default
    /// layout and epoch.
    pub fn system_time(self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.timestamp_ms().max(0) as u64)
    }

    /// The generation instant under an explicit layout and epoch.
    pub fn system_time_with_layout(self, layout: &BitLayout, epoch_ms: i64) -> SystemTime {
        let ms = self.timestamp_ms_with_layout(layout, epoch_ms).max(0);
        UNIX_EPOCH + Duration::from_millis(ms as u64)
    }

    /// Time elapsed since this identifier was generated, assuming the
    /// default layout and epoch. Zero if the timestamp is in the future.
    pub fn age(self) -> Duration {
        SystemTime::now()
            .duration_since(self.system_time())
            .unwrap_or(Duration::ZERO)
    }

    // --- Validation ---

    /// Structural validity under the default layout and epoch.
    pub fn is_valid(self) -> bool {
        self.is_valid_with_layout(&BitLayout::DEFAULT, DEFAULT_EPOCH_MS)
    }

    /// Structural validity under an explicit layout and epoch.
    ///
    /// Requires a positive word, a timestamp strictly after the epoch and no
    /// more than one day in the future (slack for clock skew), and worker
    /// and sequence components within the layout's masks.
    pub fn is_valid_with_layout(self, layout: &BitLayout, epoch_ms: i64) -> bool {
        if self.0 <= 0 || layout.validate().is_err() {
            return false;
        }
        let (ts, worker, sequence) = self.components_with_layout(layout, epoch_ms);
        if ts <= epoch_ms {
            return false;
        }
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as i64;
        if ts > now_ms + ONE_DAY_MS {
            return false;
        }
        let shifts = layout.shifts();
        worker as i64 <= shifts.max_worker && sequence as i64 <= shifts.max_sequence
    }

    // --- Ordering ---

    /// Whether this identifier was generated before `other`. Identifiers
    /// are time-ordered, so this is a plain word comparison.
    pub const fn before(self, other: FlakeId) -> bool {
        self.0 < other.0
    }

    /// Whether this identifier was generated after `other`.
    pub const fn after(self, other: FlakeId) -> bool {
        self.0 > other.0
    }

    // --- Sharding ---

    /// Shard by the whole word: `word mod shards`. Returns 0 when
    /// `shards <= 0`.
    pub const fn shard(self, shards: i64) -> i64 {
        if shards <= 0 {
            return 0;
        }
        self.0 % shards
    }

    /// Shard by worker identity, so one worker's identifiers always land on
    /// the same shard. Returns 0 when `shards <= 0`. Assumes the default
    /// layout.
    pub const fn shard_by_worker(self, shards: i64) -> i64 {
        if shards <= 0 {
            return 0;
        }
        self.worker() as i64 % shards
    }

    /// Time-bucket shard for time-series partitioning: the timestamp in
    /// seconds divided by the bucket size. Returns 0 for buckets shorter
    /// than one second. Assumes the default layout and epoch.
    pub fn shard_by_time(self, bucket: Duration) -> i64 {
        let bucket_secs = bucket.as_secs();
        if bucket_secs == 0 {
            return 0;
        }
        (self.timestamp_ms() / 1000) / bucket_secs as i64
    }
}

impl fmt::Display for FlakeId {
    /// Decimal form, the canonical text representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for FlakeId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

impl From<i64> for FlakeId {
    fn from(word: i64) -> Self {
        Self(word)
    }
}

impl From<FlakeId> for i64 {
    fn from(id: FlakeId) -> Self {
        id.0
    }
}
