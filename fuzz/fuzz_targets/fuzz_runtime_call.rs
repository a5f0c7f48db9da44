#![no_main]

use libfuzzer_sys::fuzz_target;

use attest_nullables::{NullChain, NullStore};
use attest_runtime::{Runtime, RuntimeCall};
use attest_types::{ProtocolParams, PublicKey};

// Decode a sequence of (sender byte, call) pairs and execute them in order.
// Every call must end in a receipt; none may panic the dispatcher.
fuzz_target!(|data: &[u8]| {
    let Ok(calls) = bincode::deserialize::<Vec<(u8, RuntimeCall)>>(data) else {
        return;
    };

    let store = NullStore::new();
    let chain = NullChain::new(0);
    let runtime = Runtime::new(&ProtocolParams::default());

    for (sender, call) in calls.iter().take(64) {
        let ctx = chain.context(PublicKey([*sender; 32]));
        let receipt = runtime.execute(&store, &ctx, call);
        assert_eq!(receipt.status, receipt.status_message.is_none());
        chain.advance(u64::from(*sender % 3));
    }
});
