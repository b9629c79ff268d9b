use crate::machine::encoding::Encodable;
use crate::machine::Operation;
use crate::Result;
use bytes::{Buf, Bytes, BytesMut};
use hex::FromHex;

/// A Script is a machine program in its encoded form.
///
/// This struct is read-only. Use [Script::operations] to examine a program or
/// [ScriptBuilder] to build one.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct Script {
    pub raw: Bytes,
}

impl Script {
    /// The length of the encoded program in bytes.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Is the program empty?
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Decode the program into its operations.
    pub fn operations(&self) -> Result<Vec<Operation>> {
        let mut result = Vec::new();
        let mut buf = self.raw.clone();
        while buf.has_remaining() {
            let o = Operation::from_binary(&mut buf)?;
            result.push(o);
        }
        Ok(result)
    }
}

impl From<Vec<u8>> for Script {
    fn from(value: Vec<u8>) -> Self {
        Self {
            raw: Bytes::from(value),
        }
    }
}

impl From<Bytes> for Script {
    fn from(value: Bytes) -> Self {
        Self { raw: value }
    }
}

impl FromHex for Script {
    type Error = crate::Error;

    fn from_hex<T: AsRef<[u8]>>(hex: T) -> std::result::Result<Self, Self::Error> {
        let raw = hex::decode(hex)?;
        Ok(Self {
            raw: Bytes::from(raw),
        })
    }
}

/// A ScriptBuilder can be used to build a [Script].
pub struct ScriptBuilder {
    /// The operations.
    ops: Vec<Operation>,
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptBuilder {
    /// Create a new ScriptBuilder for constructing a [Script].
    pub fn new() -> ScriptBuilder {
        Self { ops: Vec::new() }
    }

    /// Add an operation to the script.
    pub fn add(&mut self, op: Operation) -> &mut ScriptBuilder {
        self.ops.push(op);
        self
    }

    /// Add an OP_PUSH of the given bytes to the script.
    pub fn push_data(&mut self, data: Bytes) -> &mut ScriptBuilder {
        self.ops.push(Operation::OP_PUSH(data));
        self
    }

    /// Encode the accumulated operations into a [Script].
    pub fn build(&self) -> Result<Script> {
        let size = self.ops.iter().map(|op| op.size()).sum();
        let mut buffer = BytesMut::with_capacity(size);
        for op in &self.ops {
            op.to_binary(&mut buffer)?;
        }
        Ok(Script {
            raw: buffer.freeze(),
        })
    }
}
