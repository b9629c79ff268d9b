#![no_main]

use libfuzzer_sys::fuzz_target;
use xsig::machine::{run_machine001, DeviceContext};

// Fuzz the main entry point: run_machine001.
// Split the input into xsig, msg, and xpubkey using the first bytes as
// lengths. Bit 7 of data[0] signals a 32-byte device id after the header.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let xsig_len = (data[0] & 0x7f) as usize;
    let has_device_id = data[0] & 0x80 != 0;
    let msg_len = data[1] as usize;
    let mut offset = 2;

    let device = if has_device_id {
        if offset + 32 > data.len() {
            return;
        }
        let device = DeviceContext {
            device_id: bytes::Bytes::copy_from_slice(&data[offset..offset + 32]),
        };
        offset += 32;
        Some(device)
    } else {
        None
    };

    if offset + xsig_len > data.len() {
        return;
    }
    let xsig = &data[offset..offset + xsig_len];
    offset += xsig_len;

    if offset + msg_len > data.len() {
        return;
    }
    let msg = &data[offset..offset + msg_len];
    offset += msg_len;

    let xpubkey = &data[offset..];

    let _ = run_machine001(xpubkey, xsig, msg, device.as_ref());
});
