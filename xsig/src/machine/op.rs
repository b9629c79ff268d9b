use crate::machine::encoding::Encodable;
use crate::{Error, Result};
use bytes::{Buf, BufMut, Bytes};

/// An Operation is an opcode plus any operand data it carries.
///
/// The opcode space is closed: decoding any byte outside 1..=10 fails, and
/// evaluation of a program containing such a byte fails with it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(non_camel_case_types)] // keep the wire-format opcode naming convention
pub enum Operation {
    /// Pops a then b, pushes a+b modulo 256.
    OP_ADD,
    /// Pops a then b, pushes a*b modulo 256.
    OP_MUL,
    /// Pushes the operand bytes onto the stack in order, so the last operand
    /// byte ends on top. The operand must be 0-255 bytes long.
    OP_PUSH(Bytes),
    /// Pops a compressed public key, then a DER signature frame; pushes 1 if
    /// the signature covers the bound message under the key, 0 otherwise.
    OP_SIGVERIFY,
    /// Pops n, k, n compressed public keys, and k DER signature frames;
    /// pushes 1 if at least k keys are covered, 0 otherwise.
    OP_MULTISIGVERIFY,
    /// Pops a then b, pushes the bitwise AND.
    OP_AND,
    /// Pops a then b, pushes the bitwise OR.
    OP_OR,
    /// Pops a, pushes the bitwise complement.
    OP_NOT,
    /// Pops two 32-byte values, pushes 1 if they are equal, 0 otherwise.
    OP_EQUAL32,
    /// Pushes the 32-byte device identifier in reverse index order, so a
    /// following 32-byte pop observes it in forward order.
    OP_DEVICEID,
}

impl Operation {
    // helper function to get push operand data of a particular size from the buffer
    fn get_pushdata(size: usize, buffer: &mut dyn Buf) -> Result<Bytes> {
        if size > buffer.remaining() {
            Err(Error::TruncatedPush)
        } else {
            Ok(buffer.copy_to_bytes(size))
        }
    }

    /// The wire value of the opcode.
    pub fn opcode(&self) -> u8 {
        use Operation::*;
        match self {
            OP_ADD => 1,
            OP_MUL => 2,
            OP_PUSH(_) => 3,
            OP_SIGVERIFY => 4,
            OP_MULTISIGVERIFY => 5,
            OP_AND => 6,
            OP_OR => 7,
            OP_NOT => 8,
            OP_EQUAL32 => 9,
            OP_DEVICEID => 10,
        }
    }
}

impl Encodable for Operation {
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self>
    where
        Self: Sized,
    {
        use Operation::*;
        match buffer.has_remaining() {
            false => Err(Error::DataTooSmall),
            true => match buffer.get_u8() {
                1 => Ok(OP_ADD),
                2 => Ok(OP_MUL),
                3 => {
                    if buffer.has_remaining() {
                        let size = buffer.get_u8() as usize;
                        Ok(OP_PUSH(Self::get_pushdata(size, buffer)?))
                    } else {
                        Err(Error::TruncatedPush)
                    }
                }
                4 => Ok(OP_SIGVERIFY),
                5 => Ok(OP_MULTISIGVERIFY),
                6 => Ok(OP_AND),
                7 => Ok(OP_OR),
                8 => Ok(OP_NOT),
                9 => Ok(OP_EQUAL32),
                10 => Ok(OP_DEVICEID),
                _ => Err(Error::UnrecognizedOpCode),
            },
        }
    }

    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()> {
        use Operation::*;
        match self {
            OP_PUSH(data) => {
                if data.len() > u8::MAX as usize {
                    return Err(Error::DataTooLarge);
                }
                buffer.put_u8(self.opcode());
                buffer.put_u8(data.len() as u8);
                buffer.put_slice(data);
                Ok(())
            }
            _ => {
                buffer.put_u8(self.opcode());
                Ok(())
            }
        }
    }

    fn size(&self) -> usize {
        match self {
            Operation::OP_PUSH(data) => 2 + data.len(),
            _ => 1,
        }
    }
}
