//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use gitprov_core::{CommitRecord, Identity};

pub const PROJECT: &str = "group/app";

/// Fixed instant `minutes` after the fixture epoch
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn ada() -> Identity {
    Identity::new("Ada Lovelace")
        .with_email("ada@example.org")
        .with_username("ada")
        .with_platform_id("17")
}

pub fn grace() -> Identity {
    Identity::new("Grace Hopper").with_email("grace@example.org")
}

/// Git-only identity of Ada, as found in commits made from another machine
pub fn ada_at_home() -> Identity {
    Identity::new("ada").with_email("ada@home.example")
}

/// Ada's platform account as seen in a later run, after a profile change
pub fn ada_renamed() -> Identity {
    Identity::new("A. Lovelace")
        .with_email("lovelace@example.org")
        .with_username("alovelace")
        .with_platform_id("17")
}

/// Commit by Ada at `minutes` with the given parents
pub fn commit(hash: &str, minutes: i64, parents: &[&str]) -> CommitRecord {
    let mut record = CommitRecord::new(hash, ada(), at(minutes)).with_message(format!("commit {}", hash));
    for parent in parents {
        record = record.with_parent(*parent);
    }
    record
}

/// Route builder logs to the test harness; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
