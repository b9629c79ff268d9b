//! The machine module contains the byte stack, the instruction set, program
//! envelopes, and the machine001 two-phase verification protocol.

mod der;
mod encoding;
mod envelope;
mod interpreter;
mod machine001;
mod op;
mod script;
mod stack;
mod verify;

#[cfg(test)]
mod vector_tests;

pub use self::der::{der_to_raw, RAW_SIGNATURE_LEN};
pub use self::encoding::Encodable;
pub use self::envelope::{Envelope, EnvelopeKind, PREFIX_LEN};
pub use self::interpreter::{DeviceContext, ExecutionContext, ScriptInterpreter, DEVICE_ID_LEN};
pub use self::machine001::{run_machine001, run_machine001_with_verifier};
pub use self::op::Operation;
pub use self::script::{Script, ScriptBuilder};
pub use self::stack::{
    DerSignature, Stack, COMPRESSED_PUBKEY_LEN, MAX_SIG_DER_LEN, MAX_STACK_SIZE,
};
pub use self::verify::{P256Verifier, SignatureVerifier};

pub use hex::{FromHex, ToHex};
