use bytes::{BufMut, Bytes, BytesMut};

use crate::types::Track;

/// Folds an ordered track assignment into one deliverable payload
///
/// The core calls this once per client and never looks inside the result.
pub trait PayloadCombiner: Send + Sync {
    /// Combine the tracks' bytes into a single blob
    fn combine(&self, tracks: &[Track]) -> Bytes;
}

/// Combiner that concatenates track payloads in assignment order
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatCombiner;

impl PayloadCombiner for ConcatCombiner {
    fn combine(&self, tracks: &[Track]) -> Bytes {
        let total: usize = tracks.iter().map(Track::len).sum();
        let mut payload = BytesMut::with_capacity(total);
        for track in tracks {
            payload.put_slice(&track.data);
        }
        payload.freeze()
    }
}
