use std::time::{SystemTime, UNIX_EPOCH};

/// Current ledger-style timestamp, in whole seconds since the unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("secretvote: system clock is before the unix epoch")
        .as_secs()
}
