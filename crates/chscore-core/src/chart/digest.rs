use std::fmt;
use std::io::{self, Read};

use base64::Engine as _;
use md5::{Digest as _, Md5};
use serde::{Serialize, Serializer};

use crate::hex;
use crate::scoredata::ChartFingerprint;

const BASE64_ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::URL_SAFE;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// 128-bit digest of a chart file's raw bytes; the key the game uses in
/// `scoredata.bin`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LegacyDigest([u8; 16]);

impl LegacyDigest {
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// The same 16 bytes as a score record key
    pub const fn as_chart_fingerprint(&self) -> ChartFingerprint {
        ChartFingerprint::new(self.0)
    }
}

/// 256-bit BLAKE3 digest of a chart file's raw bytes; the key of the online
/// chart catalog.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModernDigest([u8; 32]);

impl ModernDigest {
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// URL-safe base64 with padding, as the catalog expects
    pub fn to_base64_url(&self) -> String {
        BASE64_ENGINE.encode(self.0)
    }
}

macro_rules! impl_hex_fmt {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                hex::write(f, &self.0)
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($ty), "({})"), self)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    };
}

impl_hex_fmt!(LegacyDigest);
impl_hex_fmt!(ModernDigest);

/// Both identities of one chart file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChartFingerprintPair {
    pub legacy_digest: LegacyDigest,
    pub modern_digest: ModernDigest,
}

impl ChartFingerprintPair {
    /// Key to look this chart up among decoded score records
    pub fn chart_fingerprint(&self) -> ChartFingerprint {
        self.legacy_digest.as_chart_fingerprint()
    }
}

/// Incremental hasher feeding the same bytes to both digests.
#[derive(Debug, Clone)]
pub struct FingerprintHasher {
    legacy: Md5,
    modern: blake3::Hasher,
}

impl FingerprintHasher {
    pub fn new() -> Self {
        Self {
            legacy: Md5::new(),
            modern: blake3::Hasher::new(),
        }
    }

    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        self.legacy.update(bytes);
        self.modern.update(bytes);
        self
    }

    pub fn finalize(self) -> ChartFingerprintPair {
        let mut legacy = [0u8; 16];
        legacy.copy_from_slice(&self.legacy.finalize());

        ChartFingerprintPair {
            legacy_digest: LegacyDigest(legacy),
            modern_digest: ModernDigest(*self.modern.finalize().as_bytes()),
        }
    }
}

impl Default for FingerprintHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Fingerprint a chart's raw bytes exactly as stored, with no normalization.
pub fn fingerprint(bytes: &[u8]) -> ChartFingerprintPair {
    let mut hasher = FingerprintHasher::new();
    hasher.update(bytes);
    hasher.finalize()
}

/// Stream a reader through [`FingerprintHasher`] until EOF.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<ChartFingerprintPair> {
    let mut hasher = FingerprintHasher::new();
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];

    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&chunk[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_digests() {
        let pair = fingerprint(b"");
        assert_eq!(pair.legacy_digest.to_hex(), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            pair.modern_digest.to_hex(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn test_known_md5() {
        let pair = fingerprint(b"abc");
        assert_eq!(pair.legacy_digest.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_base64_url_is_padded_and_url_safe() {
        let encoded = fingerprint(b"").modern_digest.to_base64_url();
        assert_eq!(encoded.len(), 44);
        assert!(encoded.ends_with('='));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert_eq!(encoded, "rxNJufX5oaagQE3qNtzJSZvLJcmtwRK3zJqTyuQfMmI=");
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let data = b"[Song]\r\n{\r\n  Name = \"Test\"\r\n}\r\n";
        let mut hasher = FingerprintHasher::new();
        hasher.update(&data[..7]).update(&data[7..]);
        assert_eq!(hasher.finalize(), fingerprint(data));
    }

    #[test]
    fn test_reader_matches_one_shot() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let from_reader = fingerprint_reader(&data[..]).unwrap();
        assert_eq!(from_reader, fingerprint(&data));
    }

    #[test]
    fn test_line_endings_are_not_normalized() {
        assert_ne!(fingerprint(b"a\r\nb"), fingerprint(b"a\nb"));
    }

    #[test]
    fn test_chart_fingerprint_uses_legacy_bytes() {
        let pair = fingerprint(b"notes");
        assert_eq!(
            pair.chart_fingerprint().as_bytes(),
            pair.legacy_digest.as_bytes()
        );
    }

    #[test]
    fn test_serialize_as_hex() {
        let json = serde_json::to_value(fingerprint(b"")).unwrap();
        assert_eq!(json["legacy_digest"], "d41d8cd98f00b204e9800998ecf8427e");
    }
}
