#![no_main]

use libfuzzer_sys::fuzz_target;
use xsig::machine::{DeviceContext, ExecutionContext, Script, ScriptInterpreter};

// Fuzz the evaluator directly with arbitrary bytecode.
// First byte: low nibble = message length (0..15), bit 4 = has device id.
// If the device id is present, the next 32 bytes hold it.
// The remaining bytes are bytecode.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let msg_len = (data[0] & 0x0f) as usize;
    let has_device_id = data[0] & 0x10 != 0;
    let mut offset = 1;

    if offset + msg_len > data.len() {
        return;
    }
    let msg = &data[offset..offset + msg_len];
    offset += msg_len;

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

    let script = Script::from(data[offset..].to_vec());
    let mut interpreter = ScriptInterpreter::new();
    let context = ExecutionContext {
        message: msg,
        device: device.as_ref(),
    };
    let _ = interpreter.eval_script_with_context(&script, &context);

    // Also exercise the program decoder
    let _ = script.operations();
});
