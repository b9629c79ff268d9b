use bytes::{Buf, BufMut, Bytes, BytesMut};

// Binary serialization traits for the machine's wire formats.

/// Encode & decode machine data structures.
pub trait Encodable {
    /// Decode a data structure from a buffer.
    fn from_binary(buffer: &mut dyn Buf) -> crate::Result<Self>
    where
        Self: Sized;

    /// Encode a data structure into a buffer.
    fn to_binary(&self, buffer: &mut dyn BufMut) -> crate::Result<()>;

    /// Encode a data structure into a new buffer.
    fn encode(&self) -> crate::Result<Bytes> {
        let mut buffer = BytesMut::with_capacity(self.size());
        self.to_binary(&mut buffer)?;
        Ok(buffer.freeze())
    }

    /// Return the size of the serialized form.
    // It is vital that implementations of this function use a method that does not just serialize
    // the object and count the bytes. This function is used to determine the size of the buffer
    // to allocate for the serialization.
    fn size(&self) -> usize;
}
