//! Raw passthrough object: one encoded MessagePack object, uninterpreted.

use std::io;

use crate::error::Result;
use crate::read::skip;
use crate::write::append_nil;

/// An already-encoded MessagePack object.
///
/// `Raw` reads and writes wire data without interpreting it: unmarshaling
/// copies exactly one object's bytes, and marshaling replays them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raw(pub Vec<u8>);

impl Raw {
    /// Appends the stored object to `b`. An empty `Raw` encodes as nil.
    pub fn marshal_msg(&self, b: &mut Vec<u8>) {
        if self.0.is_empty() {
            append_nil(b);
        } else {
            b.extend_from_slice(&self.0);
        }
    }

    /// Replaces the contents with the next object in `b`, reusing the
    /// backing storage, and returns the remaining bytes.
    pub fn unmarshal_msg<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8]> {
        let rest = skip(b)?;
        let consumed = b.len() - rest.len();
        self.0.clear();
        self.0.extend_from_slice(&b[..consumed]);
        Ok(rest)
    }

    /// Upper bound on the encoded size: the stored length, or one byte for
    /// the nil an empty `Raw` marshals to.
    pub fn msgsize(&self) -> usize {
        if self.0.is_empty() {
            1
        } else {
            self.0.len()
        }
    }

    /// Transcodes the stored object to JSON.
    pub fn write_json<W: io::Write>(&self, w: W) -> Result<u64> {
        crate::reader::Reader::new(&self.0).write_to_json(w)
    }
}
