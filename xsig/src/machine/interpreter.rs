use crate::machine::der::der_to_raw;
use crate::machine::encoding::Encodable;
use crate::machine::stack::{DerSignature, Stack, COMPRESSED_PUBKEY_LEN};
use crate::machine::verify::{P256Verifier, SignatureVerifier};
use crate::machine::{Operation, Script};
use crate::{Error, Result};
use bytes::{Buf, Bytes};

/// Length required of a device identifier by OP_DEVICEID.
pub const DEVICE_ID_LEN: usize = 32;

/// Device identity supplied by the party running the verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceContext {
    /// The device identifier. OP_DEVICEID requires exactly 32 bytes.
    pub device_id: Bytes,
}

/// Per-run inputs for script evaluation.
///
/// The message is bound to signature checks for the lifetime of the run; the
/// witness phase of machine001 always runs with an empty message. The device
/// context is optional and OP_DEVICEID fails without it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecutionContext<'a> {
    pub message: &'a [u8],
    pub device: Option<&'a DeviceContext>,
}

/// Interpreter for evaluating machine programs.
///
/// Owns the byte stack and an injected signature verifier. A program either
/// runs to the end of its code, leaving the stack as the evaluation result,
/// or halts with the first contract violation; the stack is meaningful only
/// on success. There are no jumps, so every run terminates.
pub struct ScriptInterpreter<V = P256Verifier> {
    stack: Stack,
    verifier: V,
}

impl Default for ScriptInterpreter<P256Verifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptInterpreter<P256Verifier> {
    /// Create an interpreter using the production P-256 verifier.
    pub fn new() -> Self {
        Self::with_verifier(P256Verifier)
    }
}

impl<V: SignatureVerifier> ScriptInterpreter<V> {
    /// Create an interpreter with an injected signature verifier.
    pub fn with_verifier(verifier: V) -> Self {
        Self {
            stack: Stack::new(),
            verifier,
        }
    }

    /// The interpreter's stack.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Replace the stack before a run. machine001 uses this to seed the
    /// policy phase with a copy of the witness phase's terminal stack.
    pub fn set_stack(&mut self, stack: Stack) {
        self.stack = stack;
    }

    /// Evaluate a script with an empty message and no device context.
    pub fn eval_script(&mut self, script: &Script) -> Result<()> {
        self.eval_script_with_context(script, &ExecutionContext::default())
    }

    /// Evaluate a script against a message and an optional device context.
    pub fn eval_script_with_context(
        &mut self,
        script: &Script,
        context: &ExecutionContext,
    ) -> Result<()> {
        let mut code = script.raw.clone();
        while code.has_remaining() {
            let op = Operation::from_binary(&mut code)?;
            self.execute_op(&op, context)?;
        }
        Ok(())
    }

    /// Execute a single operation
    fn execute_op(&mut self, op: &Operation, context: &ExecutionContext) -> Result<()> {
        use Operation::*;

        match op {
            OP_ADD => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                self.stack.push(a.wrapping_add(b))
            }
            OP_MUL => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                self.stack.push(a.wrapping_mul(b))
            }
            OP_AND => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                self.stack.push(a & b)
            }
            OP_OR => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                self.stack.push(a | b)
            }
            OP_NOT => {
                let a = self.stack.pop()?;
                self.stack.push(!a)
            }
            OP_PUSH(data) => self.stack.push_bytes(data),
            OP_SIGVERIFY => self.do_sigverify(context),
            OP_MULTISIGVERIFY => self.do_multisigverify(context),
            OP_EQUAL32 => {
                let mut a = [0u8; 32];
                let mut b = [0u8; 32];
                self.stack.pop_bytes(&mut a)?;
                self.stack.pop_bytes(&mut b)?;
                self.stack.push(if a == b { 1 } else { 0 })
            }
            OP_DEVICEID => {
                let device = context.device.ok_or(Error::MissingDeviceContext)?;
                if device.device_id.len() != DEVICE_ID_LEN {
                    return Err(Error::BadDeviceIdLength);
                }
                // Reverse index order, so a 32-byte pop observes the
                // identifier forward.
                for i in (0..DEVICE_ID_LEN).rev() {
                    self.stack.push(device.device_id[i])?;
                }
                Ok(())
            }
        }
    }

    /// Single signature check. Pop failures and DER conversion failures fail
    /// the program; only an oracle reject pushes 0.
    fn do_sigverify(&mut self, context: &ExecutionContext) -> Result<()> {
        let pk = self.stack.pop_pubkey_compressed()?;
        let sig = self.stack.pop_signature()?;
        let raw = der_to_raw(sig.as_bytes())?;
        let valid = self.verifier.verify(context.message, &raw, &pk);
        self.stack.push(u8::from(valid))
    }

    /// k-of-n signature check.
    ///
    /// Keys are popped before signatures. The match loop walks keys in pop
    /// order and, per key, signatures in pop order, advancing to the next key
    /// on the first accept. A signature with an unconvertible DER body is
    /// skipped, not fatal. This shape is load-bearing: it must not be
    /// reordered, deduplicated, or exited early.
    fn do_multisigverify(&mut self, context: &ExecutionContext) -> Result<()> {
        let n_public_keys = self.stack.pop()? as usize;
        let n_min_valid = self.stack.pop()? as usize;

        if n_public_keys == 0 || n_min_valid == 0 || n_min_valid > n_public_keys {
            return Err(Error::BadMultisigCounts);
        }

        // The counts are single bytes, so 255 of each is the worst case.
        // Inline buffers, no allocation during evaluation.
        let mut pks = [[0u8; COMPRESSED_PUBKEY_LEN]; 255];
        for pk in pks.iter_mut().take(n_public_keys) {
            *pk = self.stack.pop_pubkey_compressed()?;
        }

        let mut sigs = [DerSignature::default(); 255];
        for sig in sigs.iter_mut().take(n_min_valid) {
            *sig = self.stack.pop_signature()?;
        }

        let mut count_valid = 0;
        for pk in pks.iter().take(n_public_keys) {
            for sig in sigs.iter().take(n_min_valid) {
                let raw = match der_to_raw(sig.as_bytes()) {
                    Ok(raw) => raw,
                    Err(_) => continue,
                };
                if self.verifier.verify(context.message, &raw, pk) {
                    count_valid += 1;
                    break; // next key
                }
            }
        }

        self.stack.push(u8::from(count_valid >= n_min_valid))
    }
}
