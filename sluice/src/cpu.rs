//! Thread-to-core pinning for feed and processing threads.
//!
//! Producer and consumer each on a dedicated core is what makes the
//! cache-line isolation of the cursors pay off; a migrating thread drags its
//! working set across L1/L2 domains.

use crate::error::{Result, SluiceError};
use crate::observe;

#[cfg(target_os = "linux")]
pub fn pin_to_core(core_id: usize) -> Result<()> {
    use std::mem;

    unsafe {
        let mut cpu_set: libc::cpu_set_t = mem::zeroed();
        libc::CPU_ZERO(&mut cpu_set);
        libc::CPU_SET(core_id, &mut cpu_set);

        if libc::sched_setaffinity(0, mem::size_of::<libc::cpu_set_t>(), &cpu_set) != 0 {
            return Err(SluiceError::system_resource(format!(
                "failed to pin thread to core {core_id}"
            )));
        }
    }
    observe::pinned(core_id);
    Ok(())
}

#[cfg(target_os = "macos")]
pub fn pin_to_core(core_id: usize) -> Result<()> {
    use libc::{mach_port_t, pthread_self, thread_policy_set};
    use libc::{thread_affinity_policy_data_t, THREAD_AFFINITY_POLICY};

    unsafe {
        let mut policy = thread_affinity_policy_data_t {
            affinity_tag: core_id as i32,
        };

        let result = thread_policy_set(
            pthread_self() as mach_port_t,
            THREAD_AFFINITY_POLICY as u32,
            &mut policy as *mut _ as *mut i32,
            1,
        );

        if result != 0 {
            return Err(SluiceError::system_resource(format!(
                "failed to pin thread to core {core_id}"
            )));
        }
    }
    observe::pinned(core_id);
    Ok(())
}

/// Affinity is advisory on other platforms; succeed without doing anything.
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub fn pin_to_core(core_id: usize) -> Result<()> {
    observe::pinned(core_id);
    Ok(())
}
