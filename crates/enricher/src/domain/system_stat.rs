#![forbid(unsafe_code)]

/// Host-wide counters. Every field is optional: platforms expose different
/// subsets, and a counter that cannot be read stays `None`.
///
/// Memory values are in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemStat {
    pub commit_total: Option<u64>,
    pub commit_limit: Option<u64>,
    pub physical_total: Option<u64>,
    pub physical_available: Option<u64>,
    pub kernel_paged: Option<u64>,
    pub kernel_nonpaged: Option<u64>,
    pub kernel_total: Option<u64>,
    pub system_cache: Option<u64>,
    pub handle_count: Option<u64>,
    pub process_count: Option<u64>,
    pub thread_count: Option<u64>,
}
