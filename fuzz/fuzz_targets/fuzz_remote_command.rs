//! Fuzz the remote-stop payload decoder.
//!
//! The remote-stop topic is the only unauthenticated input the monitor
//! accepts from the network; arbitrary bytes must never panic and only a
//! leading b'1' may produce a command.

#![no_main]

use libfuzzer_sys::fuzz_target;
use towerwatch::app::commands::RemoteCommand;

fuzz_target!(|data: &[u8]| {
    let parsed = RemoteCommand::parse(data);
    match data.first() {
        Some(b'1') => assert_eq!(parsed, Some(RemoteCommand::Stop)),
        _ => assert_eq!(parsed, None),
    }
});
