use crate::machine::encoding::Encodable;
use crate::machine::Script;
use crate::{Error, Result};
use bytes::{Buf, BufMut};

/// Length of the envelope prefix: magic, machine type, code type.
pub const PREFIX_LEN: usize = 6;

const MAGIC: &[u8; 4] = b"xsig";
const MACHINE_TYPE: u8 = 0x00;

/// The two halves of a verification decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    /// The policy program, written by the key holder. Code type 0x00.
    XPubKey,
    /// The witness program, submitted by the claimant. Code type 0x01.
    XSig,
}

impl EnvelopeKind {
    /// The code-type byte of the prefix.
    pub fn code_type(&self) -> u8 {
        match self {
            EnvelopeKind::XPubKey => 0x00,
            EnvelopeKind::XSig => 0x01,
        }
    }

    fn from_code_type(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(EnvelopeKind::XPubKey),
            0x01 => Ok(EnvelopeKind::XSig),
            _ => Err(Error::BadEnvelopePrefix),
        }
    }
}

/// A tagged program blob: `"xsig" || 0x00 || code_type || program`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub kind: EnvelopeKind,
    pub code: Script,
}

impl Envelope {
    /// Wrap a program in an envelope of the given kind.
    pub fn new(kind: EnvelopeKind, code: Script) -> Envelope {
        Envelope { kind, code }
    }

    /// Deserialize an envelope of a specific kind, returning its program.
    ///
    /// The prefix comparison is a plain equality check; nothing in it is
    /// secret-dependent.
    pub fn deserialize(data: &[u8], kind: EnvelopeKind) -> Result<Script> {
        if data.len() < PREFIX_LEN {
            return Err(Error::EnvelopeTooSmall);
        }
        if &data[..4] != MAGIC || data[4] != MACHINE_TYPE || data[5] != kind.code_type() {
            return Err(Error::BadEnvelopePrefix);
        }
        Ok(Script::from(data[PREFIX_LEN..].to_vec()))
    }
}

impl Encodable for Envelope {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self>
    where
        Self: Sized,
    {
        if buffer.remaining() < PREFIX_LEN {
            return Err(Error::EnvelopeTooSmall);
        }
        let mut magic = [0u8; 4];
        buffer.copy_to_slice(&mut magic);
        if &magic != MAGIC || buffer.get_u8() != MACHINE_TYPE {
            return Err(Error::BadEnvelopePrefix);
        }
        let kind = EnvelopeKind::from_code_type(buffer.get_u8())?;
        let code = Script::from(buffer.copy_to_bytes(buffer.remaining()));
        Ok(Envelope { kind, code })
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        buffer.put_slice(MAGIC);
        buffer.put_u8(MACHINE_TYPE);
        buffer.put_u8(self.kind.code_type());
        buffer.put_slice(&self.code.raw);
        Ok(())
    }

    fn size(&self) -> usize {
        PREFIX_LEN + self.code.len()
    }
}
