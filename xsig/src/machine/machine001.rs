use crate::machine::envelope::{Envelope, EnvelopeKind};
use crate::machine::interpreter::{DeviceContext, ExecutionContext, ScriptInterpreter};
use crate::machine::verify::{P256Verifier, SignatureVerifier};
use crate::Result;
use log::debug;

/// Run the machine001 two-phase verification protocol.
///
/// Phase 1 evaluates the witness (`xsig`) program with an empty message, so
/// the claimant cannot bind to the message. Phase 2 evaluates the policy
/// (`xpubkey`) program with the caller's message, starting from a copy of the
/// witness' terminal stack. The device context, if any, is available to both
/// phases.
///
/// Returns true iff phase 2 halts with the stack holding exactly the single
/// byte 0x01. Every violation, in either phase, is a rejection.
pub fn run_machine001(
    xpubkey: &[u8],
    xsig: &[u8],
    msg: &[u8],
    device: Option<&DeviceContext>,
) -> bool {
    run_machine001_with_verifier(xpubkey, xsig, msg, device, &P256Verifier)
}

/// Like [run_machine001] with an injected signature verifier.
pub fn run_machine001_with_verifier<V: SignatureVerifier>(
    xpubkey: &[u8],
    xsig: &[u8],
    msg: &[u8],
    device: Option<&DeviceContext>,
    verifier: &V,
) -> bool {
    match machine001(xpubkey, xsig, msg, device, verifier) {
        Ok(accepted) => accepted,
        Err(e) => {
            debug!("machine001 rejected: {}", e);
            false
        }
    }
}

fn machine001<V: SignatureVerifier>(
    xpubkey: &[u8],
    xsig: &[u8],
    msg: &[u8],
    device: Option<&DeviceContext>,
    verifier: &V,
) -> Result<bool> {
    // Phase 1: witness, message withheld
    let witness = Envelope::deserialize(xsig, EnvelopeKind::XSig)?;
    let mut interpreter = ScriptInterpreter::with_verifier(verifier);
    interpreter.eval_script_with_context(
        &witness,
        &ExecutionContext {
            message: &[],
            device,
        },
    )?;

    // Phase 2: policy, on a fresh interpreter seeded with a copy of the
    // witness' terminal stack
    let policy = Envelope::deserialize(xpubkey, EnvelopeKind::XPubKey)?;
    let mut interpreter2 = ScriptInterpreter::with_verifier(verifier);
    interpreter2.set_stack(interpreter.stack().clone());
    interpreter2.eval_script_with_context(
        &policy,
        &ExecutionContext {
            message: msg,
            device,
        },
    )?;

    // The stack must be exactly [0x01]; residue beneath a truthy top does
    // not authorize.
    Ok(interpreter2.stack().as_slice() == [0x01])
}
