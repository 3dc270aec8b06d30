//! Canonical fixed-width wire encoding of keys, commitments and proofs.
//!
//! Every encodable value is a plain concatenation of fixed-width scalars and group elements in
//! a documented order; there is no framing, versioning or length prefix. Widths come from the
//! decoding context (the scheme and its group), and decoding rejects short input, trailing
//! bytes and any field that fails its own canonicality check.

use crate::{Error, Group, Result};

/// Cursor over an encoded byte string.
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Takes exactly `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                Error::MalformedEncoding(format!(
                    "truncated input: needed {len} bytes at offset {}, have {}",
                    self.pos,
                    self.bytes.len() - self.pos
                ))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn scalar<G: Group>(&mut self, group: &G) -> Result<G::Scalar> {
        let bytes = self.take(group.scalar_len())?;
        group.scalar_from_bytes(bytes)
    }

    pub fn element<G: Group>(&mut self, group: &G) -> Result<G::Element> {
        let bytes = self.take(group.element_len())?;
        group.element_from_bytes(bytes)
    }

    /// Fails if any input is left over.
    pub fn finish(self) -> Result<()> {
        if self.pos != self.bytes.len() {
            return Err(Error::MalformedEncoding(format!(
                "{} trailing bytes",
                self.bytes.len() - self.pos
            )));
        }
        Ok(())
    }
}

/// Values with a canonical encoding under a decoding context `C`.
pub trait Wire<C: ?Sized>: Sized {
    fn write(&self, ctx: &C, out: &mut Vec<u8>);

    fn read(ctx: &C, reader: &mut Reader<'_>) -> Result<Self>;

    fn to_bytes(&self, ctx: &C) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(ctx, &mut out);
        out
    }

    /// Decodes a complete value; trailing bytes are an error.
    fn from_bytes(ctx: &C, bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let value = Self::read(ctx, &mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

impl<C: ?Sized> Wire<C> for () {
    fn write(&self, _ctx: &C, _out: &mut Vec<u8>) {}

    fn read(_ctx: &C, _reader: &mut Reader<'_>) -> Result<Self> {
        Ok(())
    }
}

/// Writes a scalar in its fixed-width form.
pub fn put_scalar<G: Group>(group: &G, scalar: &G::Scalar, out: &mut Vec<u8>) {
    out.extend_from_slice(&group.scalar_to_bytes(scalar));
}

/// Writes an element in its fixed-width form.
pub fn put_element<G: Group>(group: &G, element: &G::Element, out: &mut Vec<u8>) {
    out.extend_from_slice(&group.element_to_bytes(element));
}
