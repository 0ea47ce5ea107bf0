#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };
    let _ = courtify::fuzz_api::upstream_message(body);
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        courtify::fuzz_api::parse_upstream_payload(&json);
    }
});
