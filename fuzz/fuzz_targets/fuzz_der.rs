#![no_main]

use libfuzzer_sys::fuzz_target;
use xsig::machine::der_to_raw;

fuzz_target!(|data: &[u8]| {
    // The converter must reject or produce 64 bytes, never panic
    let _ = der_to_raw(data);
});
