#![forbid(unsafe_code)]

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuTimes {
    pub user: Duration,
    pub kernel: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadDescriptor {
    pub thread_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleDescriptor {
    /// Handle value or file descriptor number.
    pub handle: u64,
    /// Kind of object behind the handle (`file`, `socket`, ...), when known.
    pub type_name: Option<String>,
}
