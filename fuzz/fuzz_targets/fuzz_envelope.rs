//! Fuzz target: `CommandEnvelope::decode`
//!
//! Arbitrary UTF-8 must decode or be rejected without panicking. Any
//! recovered id must survive a reply round trip unchanged.
//!
//! cargo fuzz run fuzz_envelope

#![no_main]

use cpubridge::app::events::ReplyPayload;
use cpubridge::rpc::envelope::{CommandEnvelope, DecodeError, Outbound, ReplyEnvelope};
use libfuzzer_sys::fuzz_target;

fn echo_id(id: String, reply_to: String) {
    let json = Outbound::Reply(ReplyEnvelope::new(id.clone(), reply_to, ReplyPayload::error("fuzz")))
        .encode()
        .expect("reply must encode");
    let back: serde_json::Value = serde_json::from_str(&json).expect("reply must be valid JSON");
    assert_eq!(back["id"].as_str(), Some(id.as_str()));
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    match CommandEnvelope::decode(text) {
        Ok(env) => echo_id(env.id, env.cmd),
        Err(DecodeError::Malformed { id, .. }) => echo_id(id, String::new()),
        Err(DecodeError::Unaddressable(_)) => {}
    }
});
