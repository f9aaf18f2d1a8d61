//! Native macOS statistics via Mach host calls and sysctl.

use std::ffi::CStr;
use std::mem;

use super::HostStatsProvider;
use crate::error::{Result, VmStatError};
use crate::memory::RawCounters;

const HOST_VM_INFO64: i32 = 4;
const HOST_VM_INFO64_COUNT: u32 =
    (mem::size_of::<VmStatistics64>() / mem::size_of::<i32>()) as u32;
const KERN_SUCCESS: i32 = 0;

/// Layout of `vm_statistics64_data_t`.
#[repr(C)]
#[allow(dead_code)]
#[derive(Debug, Default, Clone, Copy)]
struct VmStatistics64 {
    free_count: u32,
    active_count: u32,
    inactive_count: u32,
    wire_count: u32,
    zero_fill_count: u64,
    reactivations: u64,
    pageins: u64,
    pageouts: u64,
    faults: u64,
    cow_faults: u64,
    lookups: u64,
    hits: u64,
    purges: u64,
    purgeable_count: u32,
    speculative_count: u32,
    decompressions: u64,
    compressions: u64,
    swapins: u64,
    swapouts: u64,
    compressor_page_count: u32,
    throttled_count: u32,
    external_page_count: u32,
    internal_page_count: u32,
    total_uncompressed_pages_in_compressor: u64,
}

impl From<VmStatistics64> for RawCounters {
    fn from(vm: VmStatistics64) -> Self {
        RawCounters {
            free: vm.free_count as u64,
            active: vm.active_count as u64,
            inactive: vm.inactive_count as u64,
            speculative: vm.speculative_count as u64,
            throttled: vm.throttled_count as u64,
            wired: vm.wire_count as u64,
            purgeable: vm.purgeable_count as u64,
            external: vm.external_page_count as u64,
            internal: vm.internal_page_count as u64,
            compressor: vm.compressor_page_count as u64,
            uncompressed_in_compressor: vm.total_uncompressed_pages_in_compressor,
            faults: vm.faults,
            cow_faults: vm.cow_faults,
            zero_fill: vm.zero_fill_count,
            reactivations: vm.reactivations,
            purges: vm.purges,
            decompressions: vm.decompressions,
            compressions: vm.compressions,
            pageins: vm.pageins,
            pageouts: vm.pageouts,
            swapins: vm.swapins,
            swapouts: vm.swapouts,
        }
    }
}

extern "C" {
    fn mach_host_self() -> u32;
    fn host_page_size(host: u32, out_page_size: *mut usize) -> i32;
    fn host_statistics64(host: u32, flavor: i32, info: *mut i32, count: *mut u32) -> i32;
}

/// Reads a fixed-size value with `sysctlbyname`.
fn sysctl_value<T: Copy + Default>(name: &CStr, what: &'static str) -> Result<T> {
    let mut value = T::default();
    let mut len = mem::size_of::<T>();
    // SAFETY: value is a plain-old-data out parameter of exactly len bytes
    let ret = unsafe {
        libc::sysctlbyname(
            name.as_ptr(),
            &mut value as *mut T as *mut libc::c_void,
            &mut len,
            std::ptr::null_mut(),
            0,
        )
    };
    if ret != 0 {
        return Err(VmStatError::retrieval(
            what,
            format!(
                "sysctlbyname({}) failed: {}",
                name.to_string_lossy(),
                std::io::Error::last_os_error()
            ),
        ));
    }
    Ok(value)
}

/// Provider backed by the Mach host port.
#[derive(Debug, Clone, Copy)]
pub struct MachHostStats {
    host: u32,
}

impl Default for MachHostStats {
    fn default() -> Self {
        Self::new()
    }
}

impl MachHostStats {
    pub fn new() -> Self {
        // SAFETY: mach_host_self has no preconditions
        let host = unsafe { mach_host_self() };
        Self { host }
    }
}

impl HostStatsProvider for MachHostStats {
    fn page_size(&mut self) -> Result<u64> {
        let mut size: usize = 0;
        // SAFETY: size is a valid out parameter
        let ret = unsafe { host_page_size(self.host, &mut size) };
        if ret != KERN_SUCCESS {
            return Err(VmStatError::retrieval(
                "page size",
                format!("host_page_size returned {}", ret),
            ));
        }
        Ok(size as u64)
    }

    fn vm_statistics(&mut self) -> Result<RawCounters> {
        let mut stat = VmStatistics64::default();
        let mut count = HOST_VM_INFO64_COUNT;
        // SAFETY: stat matches vm_statistics64_data_t and count is its size in integer_t units
        let ret = unsafe {
            host_statistics64(
                self.host,
                HOST_VM_INFO64,
                &mut stat as *mut VmStatistics64 as *mut i32,
                &mut count,
            )
        };
        if ret != KERN_SUCCESS {
            return Err(VmStatError::retrieval(
                "VM statistics",
                format!("host_statistics64 returned {}", ret),
            ));
        }
        Ok(stat.into())
    }

    fn total_physical_memory(&mut self) -> Result<u64> {
        sysctl_value::<u64>(c"hw.memsize", "total memory")
    }

    fn swap_used(&mut self) -> Result<u64> {
        let usage = sysctl_value::<XswUsage>(c"vm.swapusage", "swap usage")?;
        Ok(usage.xsu_used)
    }
}

/// Layout of `struct xsw_usage`.
#[repr(C)]
#[allow(dead_code)]
#[derive(Debug, Default, Clone, Copy)]
struct XswUsage {
    xsu_total: u64,
    xsu_avail: u64,
    xsu_used: u64,
    xsu_pagesize: u32,
    xsu_encrypted: u32,
}
