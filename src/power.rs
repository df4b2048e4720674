//! Fatal halt path.
//!
//! The monitor must not run with a defaulted temperature feeding the safety
//! interlock, so a missing boot-critical sensor parks the device in deep
//! sleep with no wake source configured. Recovery requires a power cycle.

/// Enter an indefinite low-power halt. Never returns.
#[cfg(target_os = "espidf")]
pub fn halt_indefinitely() -> ! {
    log::error!("halting: entering indefinite deep sleep");
    unsafe {
        esp_idf_svc::sys::esp_deep_sleep_start();
    }
    // esp_deep_sleep_start does not return; satisfy the signature anyway.
    #[allow(unreachable_code)]
    loop {}
}

/// Simulation: park the thread forever so halt semantics hold on the host.
#[cfg(not(target_os = "espidf"))]
pub fn halt_indefinitely() -> ! {
    log::error!("halt(sim): parking forever");
    loop {
        std::thread::sleep(std::time::Duration::from_secs(60));
    }
}
