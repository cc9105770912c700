//! Tagged parameter slots for command invocations.
//!
//! Every invocation carries exactly four slots. Unused slots are tagged
//! `None` explicitly so a handler can never misread a stale slot.

use std::fmt;

/// Tag of a parameter slot, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Slot is unused.
    None,
    /// Scalar value input.
    Value,
    /// Buffer input (read by the service).
    In,
    /// Buffer output (filled by the service).
    Out,
}

/// Output buffer with a written-length counter.
///
/// Handlers fill the underlying buffer and `commit` the produced length;
/// the caller reads it back through [`written`](Self::written) after the
/// invocation returns. Capacity is fixed by the caller.
pub struct OutBuf<'a> {
    data: &'a mut [u8],
    written: usize,
}

impl<'a> OutBuf<'a> {
    /// Wrap a caller-provided destination buffer.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, written: 0 }
    }

    /// Total capacity of the destination buffer.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes a handler has committed.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Full destination buffer, for handlers to fill.
    pub fn buf_mut(&mut self) -> &mut [u8] {
        self.data
    }

    /// Record how many bytes were produced.
    pub fn commit(&mut self, len: usize) {
        debug_assert!(len <= self.data.len());
        self.written = len.min(self.data.len());
    }

    /// Committed prefix of the destination buffer.
    pub fn as_written(&self) -> &[u8] {
        &self.data[..self.written]
    }
}

impl fmt::Debug for OutBuf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutBuf")
            .field("capacity", &self.data.len())
            .field("written", &self.written)
            .finish()
    }
}

/// One tagged parameter slot.
pub enum Param<'a> {
    /// Unused slot.
    None,
    /// Scalar value input.
    Value(u32),
    /// Buffer input.
    In(&'a [u8]),
    /// Buffer output.
    Out(OutBuf<'a>),
}

impl Param<'_> {
    /// Tag of this slot.
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::None => ParamKind::None,
            Self::Value(_) => ParamKind::Value,
            Self::In(_) => ParamKind::In,
            Self::Out(_) => ParamKind::Out,
        }
    }
}

// Buffer slots may carry key material; show lengths only.
impl fmt::Debug for Param<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Value(v) => write!(f, "Value({v})"),
            Self::In(buf) => write!(f, "In({} bytes)", buf.len()),
            Self::Out(out) => write!(f, "Out({:?})", out),
        }
    }
}

/// The four parameter slots of one invocation.
#[derive(Debug)]
pub struct Params<'a> {
    /// Slot array, indexed 0..4.
    pub slots: [Param<'a>; 4],
}

impl<'a> Params<'a> {
    /// Build a parameter list from four slots.
    pub fn new(slots: [Param<'a>; 4]) -> Self {
        Self { slots }
    }

    /// Four unused slots.
    pub fn empty() -> Self {
        Self { slots: [Param::None, Param::None, Param::None, Param::None] }
    }

    /// Tags of all four slots, for signature checking.
    pub fn kinds(&self) -> [ParamKind; 4] {
        [
            self.slots[0].kind(),
            self.slots[1].kind(),
            self.slots[2].kind(),
            self.slots[3].kind(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_reflect_slots() {
        let input = [1u8, 2, 3];
        let mut dest = [0u8; 8];
        let params = Params::new([
            Param::In(&input),
            Param::Out(OutBuf::new(&mut dest)),
            Param::Value(7),
            Param::None,
        ]);

        assert_eq!(
            params.kinds(),
            [ParamKind::In, ParamKind::Out, ParamKind::Value, ParamKind::None]
        );
    }

    #[test]
    fn empty_params_are_all_none() {
        assert_eq!(Params::empty().kinds(), [ParamKind::None; 4]);
    }

    #[test]
    fn outbuf_tracks_committed_length() {
        let mut dest = [0u8; 8];
        let mut out = OutBuf::new(&mut dest);
        assert_eq!(out.capacity(), 8);
        assert_eq!(out.written(), 0);

        out.buf_mut()[..3].copy_from_slice(&[9, 9, 9]);
        out.commit(3);

        assert_eq!(out.written(), 3);
        assert_eq!(out.as_written(), &[9, 9, 9]);
    }

    #[test]
    fn debug_hides_buffer_contents() {
        let secret = [0xAAu8; 16];
        let rendered = format!("{:?}", Param::In(&secret));
        assert_eq!(rendered, "In(16 bytes)");
        assert!(!rendered.contains("170"));
    }
}
