//! Streaming CRC32 and MD5 accumulation

use crc32fast::Hasher as Crc32;
use md5::{Digest, Md5};
use std::io::{self, Read};

/// Which digests to compute in a single pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Digests {
    pub crc: bool,
    pub md5: bool,
}

impl Digests {
    pub const CRC: Self = Self {
        crc: true,
        md5: false,
    };

    pub fn any(self) -> bool {
        self.crc || self.md5
    }
}

/// Result of hashing a stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamDigest {
    pub crc: Option<u32>,
    pub md5: Option<[u8; 16]>,
    /// Bytes hashed, excluding the skipped prefix
    pub len: u64,
}

impl StreamDigest {
    pub fn md5_hex(&self) -> Option<String> {
        self.md5.map(hex::encode)
    }
}

/// Hash `reader` in `chunk_size` blocks after discarding its first `skip` bytes
///
/// A stream shorter than `skip` hashes as empty.
pub fn digest_reader<R: Read>(
    mut reader: R,
    skip: u64,
    digests: Digests,
    chunk_size: usize,
) -> io::Result<StreamDigest> {
    if skip > 0 {
        io::copy(&mut reader.by_ref().take(skip), &mut io::sink())?;
    }

    let mut crc = digests.crc.then(Crc32::new);
    let mut md5 = digests.md5.then(Md5::new);
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut len = 0u64;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let chunk = &buffer[..read];
        if let Some(hasher) = crc.as_mut() {
            hasher.update(chunk);
        }
        if let Some(hasher) = md5.as_mut() {
            hasher.update(chunk);
        }
        len += read as u64;
    }

    Ok(StreamDigest {
        crc: crc.map(Crc32::finalize),
        md5: md5.map(|h| h.finalize().into()),
        len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc_matches_one_shot() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let digest = digest_reader(&data[..], 0, Digests::CRC, 7).unwrap();
        assert_eq!(digest.crc, Some(0x414F_A339));
        assert_eq!(digest.len, data.len() as u64);
        assert!(digest.md5.is_none());
    }

    #[test]
    fn test_skip_applies_once() {
        let mut data = vec![0xFFu8; 16];
        data.extend((0u8..100).collect::<Vec<_>>());

        // Chunk smaller than the header to make sure the skip is not repeated
        let digest = digest_reader(&data[..], 16, Digests::CRC, 8).unwrap();
        assert_eq!(digest.crc, Some(crc32fast::hash(&data[16..])));
        assert_eq!(digest.len, 100);
    }

    #[test]
    fn test_md5_hex() {
        let digests = Digests {
            crc: false,
            md5: true,
        };
        let digest = digest_reader(&b"abc"[..], 0, digests, 1024).unwrap();
        assert_eq!(
            digest.md5_hex().as_deref(),
            Some("900150983cd24fb0d6963f7d28e17f72")
        );
        assert!(digest.crc.is_none());
    }

    #[test]
    fn test_short_stream_hashes_empty() {
        let digest = digest_reader(&b"abc"[..], 16, Digests::CRC, 1024).unwrap();
        assert_eq!(digest.crc, Some(0));
        assert_eq!(digest.len, 0);
    }
}
