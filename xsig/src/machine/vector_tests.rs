//! End-to-end machine001 scenarios with live P-256 keys.
//!
//! These mirror the differential test-vector table: each case builds a policy
//! and a witness envelope, signs with freshly generated keys, and checks the
//! accept/reject decision of the full two-phase run.

#[cfg(test)]
mod tests {
    use crate::machine::*;
    use bytes::Bytes;
    use p256::ecdsa::{signature::Signer, Signature, SigningKey};

    fn keypair() -> (SigningKey, [u8; COMPRESSED_PUBKEY_LEN]) {
        let sk = SigningKey::random(&mut rand::thread_rng());
        let point = sk.verifying_key().to_encoded_point(true);
        let mut pk = [0u8; COMPRESSED_PUBKEY_LEN];
        pk.copy_from_slice(point.as_bytes());
        (sk, pk)
    }

    /// DER-encode a signature of `msg` under `sk`.
    fn sign_der(sk: &SigningKey, msg: &[u8]) -> Vec<u8> {
        let sig: Signature = sk.sign(msg);
        sig.to_der().as_bytes().to_vec()
    }

    fn envelope(kind: EnvelopeKind, script: Script) -> Vec<u8> {
        Envelope::new(kind, script).encode().unwrap().to_vec()
    }

    /// Witness that pushes each signature frame in order.
    fn witness(sigs: &[Vec<u8>]) -> Vec<u8> {
        let mut builder = ScriptBuilder::new();
        for sig in sigs {
            builder.push_data(Bytes::from(sig.clone()));
        }
        envelope(EnvelopeKind::XSig, builder.build().unwrap())
    }

    /// Policy requiring a single signature under `pk`.
    fn single_sig_policy(pk: &[u8; COMPRESSED_PUBKEY_LEN]) -> Vec<u8> {
        let mut builder = ScriptBuilder::new();
        builder
            .push_data(Bytes::copy_from_slice(pk))
            .add(Operation::OP_SIGVERIFY);
        envelope(EnvelopeKind::XPubKey, builder.build().unwrap())
    }

    /// Policy requiring k signatures from the given keys.
    fn multisig_policy(pks: &[[u8; COMPRESSED_PUBKEY_LEN]], k: u8) -> Vec<u8> {
        let mut builder = ScriptBuilder::new();
        for pk in pks {
            builder.push_data(Bytes::copy_from_slice(pk));
        }
        builder
            .push_data(Bytes::copy_from_slice(&[k]))
            .push_data(Bytes::copy_from_slice(&[pks.len() as u8]))
            .add(Operation::OP_MULTISIGVERIFY);
        envelope(EnvelopeKind::XPubKey, builder.build().unwrap())
    }

    #[test]
    fn single_sig_accepts() {
        let (sk, pk) = keypair();
        let msg = b"pay alice 10";
        let xpubkey = single_sig_policy(&pk);
        let xsig = witness(&[sign_der(&sk, msg)]);
        assert!(run_machine001(&xpubkey, &xsig, msg, None));
    }

    #[test]
    fn single_sig_rejects_wrong_message() {
        let (sk, pk) = keypair();
        let xpubkey = single_sig_policy(&pk);
        let xsig = witness(&[sign_der(&sk, b"pay alice 10")]);
        assert!(!run_machine001(&xpubkey, &xsig, b"pay mallory 10", None));
    }

    #[test]
    fn single_sig_rejects_wrong_key() {
        let (sk, _) = keypair();
        let (_, other_pk) = keypair();
        let msg = b"pay alice 10";
        let xpubkey = single_sig_policy(&other_pk);
        let xsig = witness(&[sign_der(&sk, msg)]);
        assert!(!run_machine001(&xpubkey, &xsig, msg, None));
    }

    #[test]
    fn multisig_one_of_one_accepts() {
        let (sk, pk) = keypair();
        let msg = b"rotate key";
        let xpubkey = multisig_policy(&[pk], 1);
        let xsig = witness(&[sign_der(&sk, msg)]);
        assert!(run_machine001(&xpubkey, &xsig, msg, None));
    }

    #[test]
    fn multisig_two_of_three_accepts() {
        let (sk1, pk1) = keypair();
        let (_, pk2) = keypair();
        let (sk3, pk3) = keypair();
        let msg = b"move treasury";
        let xpubkey = multisig_policy(&[pk1, pk2, pk3], 2);
        let xsig = witness(&[sign_der(&sk1, msg), sign_der(&sk3, msg)]);
        assert!(run_machine001(&xpubkey, &xsig, msg, None));
    }

    /// Swapping the order in which the witness pushes the signatures does not
    /// change the decision.
    #[test]
    fn multisig_two_of_three_accepts_in_either_order() {
        let (sk1, pk1) = keypair();
        let (sk2, pk2) = keypair();
        let (_, pk3) = keypair();
        let msg = b"move treasury";
        let xpubkey = multisig_policy(&[pk1, pk2, pk3], 2);
        let a = sign_der(&sk1, msg);
        let b = sign_der(&sk2, msg);
        assert!(run_machine001(&xpubkey, &witness(&[a.clone(), b.clone()]), msg, None));
        assert!(run_machine001(&xpubkey, &witness(&[b, a]), msg, None));
    }

    #[test]
    fn multisig_two_of_three_rejects_wrong_message() {
        let (sk1, pk1) = keypair();
        let (sk2, pk2) = keypair();
        let (_, pk3) = keypair();
        let xpubkey = multisig_policy(&[pk1, pk2, pk3], 2);
        let xsig = witness(&[
            sign_der(&sk1, b"move treasury"),
            sign_der(&sk2, b"move treasury"),
        ]);
        assert!(!run_machine001(&xpubkey, &xsig, b"drain treasury", None));
    }

    #[test]
    fn multisig_three_of_three_accepts() {
        let (sk1, pk1) = keypair();
        let (sk2, pk2) = keypair();
        let (sk3, pk3) = keypair();
        let msg = b"unanimous";
        let xpubkey = multisig_policy(&[pk1, pk2, pk3], 3);
        let xsig = witness(&[
            sign_der(&sk1, msg),
            sign_der(&sk2, msg),
            sign_der(&sk3, msg),
        ]);
        assert!(run_machine001(&xpubkey, &xsig, msg, None));
    }

    /// One signer submitting the same signature twice cannot cover two keys.
    #[test]
    fn multisig_rejects_duplicate_signatures() {
        let (sk1, pk1) = keypair();
        let (_, pk2) = keypair();
        let msg = b"two signers required";
        let xpubkey = multisig_policy(&[pk1, pk2], 2);
        let sig = sign_der(&sk1, msg);
        let xsig = witness(&[sig.clone(), sig]);
        assert!(!run_machine001(&xpubkey, &xsig, msg, None));
    }

    /// Three keys declared, three required, only two signatures supplied: the
    /// third signature pop underflows and the run rejects.
    #[test]
    fn multisig_rejects_missing_signer() {
        let (sk1, pk1) = keypair();
        let (sk2, pk2) = keypair();
        let (_, pk3) = keypair();
        let msg = b"unanimous";
        let xpubkey = multisig_policy(&[pk1, pk2, pk3], 3);
        let xsig = witness(&[sign_der(&sk1, msg), sign_der(&sk2, msg)]);
        assert!(!run_machine001(&xpubkey, &xsig, msg, None));
    }

    /// A policy gated on the device identity: the embedded constant is the
    /// byte-reversed identifier, since OP_PUSH and OP_DEVICEID leave the
    /// stack in opposite byte orders.
    #[test]
    fn deviceid_gate() {
        let id: Vec<u8> = (0u8..32).collect();
        let reversed: Vec<u8> = id.iter().rev().cloned().collect();

        let mut builder = ScriptBuilder::new();
        builder
            .push_data(Bytes::from(reversed))
            .add(Operation::OP_DEVICEID)
            .add(Operation::OP_EQUAL32);
        let xpubkey = envelope(EnvelopeKind::XPubKey, builder.build().unwrap());
        let xsig = witness(&[]);

        let device = DeviceContext {
            device_id: Bytes::from(id),
        };
        assert!(run_machine001(&xpubkey, &xsig, b"", Some(&device)));

        let wrong_device = DeviceContext {
            device_id: Bytes::from(vec![0x55; 32]),
        };
        assert!(!run_machine001(&xpubkey, &xsig, b"", Some(&wrong_device)));

        // no device context at all fails the policy evaluation
        assert!(!run_machine001(&xpubkey, &xsig, b"", None));
    }

    /// Signature check and device gate combined with OP_AND.
    #[test]
    fn deviceid_and_signature_gate() {
        let (sk, pk) = keypair();
        let msg = b"attested action";
        let id = vec![0xc3u8; 32];

        let mut builder = ScriptBuilder::new();
        builder
            .push_data(Bytes::copy_from_slice(&pk))
            .add(Operation::OP_SIGVERIFY)
            .push_data(Bytes::from(id.clone()))
            .add(Operation::OP_DEVICEID)
            .add(Operation::OP_EQUAL32)
            .add(Operation::OP_AND);
        let xpubkey = envelope(EnvelopeKind::XPubKey, builder.build().unwrap());
        let xsig = witness(&[sign_der(&sk, msg)]);

        let device = DeviceContext {
            device_id: Bytes::from(id),
        };
        assert!(run_machine001(&xpubkey, &xsig, msg, Some(&device)));
        assert!(!run_machine001(&xpubkey, &xsig, b"other action", Some(&device)));
    }

    /// Residue beneath a truthy top must not authorize.
    #[test]
    fn stack_residue_rejects() {
        let (sk, pk) = keypair();
        let msg = b"pay alice 10";
        let xpubkey = single_sig_policy(&pk);
        // a leading zero byte under the signature survives both phases
        let mut builder = ScriptBuilder::new();
        builder
            .push_data(Bytes::from_static(&[0]))
            .push_data(Bytes::from(sign_der(&sk, msg)));
        let xsig = envelope(EnvelopeKind::XSig, builder.build().unwrap());
        assert!(!run_machine001(&xpubkey, &xsig, msg, None));
    }
}
