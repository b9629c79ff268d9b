//! Verification of byte-code signing policies.
//!
//! A signing policy is published as an executable program (the "xpubkey") and a
//! claimant submits a witness program (the "xsig"). The two are evaluated on a
//! small byte-oriented stack machine under the machine001 protocol, which decides
//! whether a message is authorized. Single signatures and k-of-n multisignatures
//! over NIST P-256 are ordinary programs; any combinational logic over the
//! opcodes is admissible.

/// Contains the byte stack, the instruction set, envelopes, and the machine001 protocol.
pub mod machine;

mod result;
pub use result::{Error, ErrorKind, Result};

// re-export the p256 crate
pub extern crate p256;
