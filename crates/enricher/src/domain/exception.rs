#![forbid(unsafe_code)]

/// The exception that stopped the process, as recorded by the crash handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionRecord {
    /// Address of the faulting instruction.
    pub address: u64,
    /// Raw platform exception code (e.g. `0xC0000005` on Windows, the signal
    /// number elsewhere).
    pub code: u32,
    /// Platform specific exception flags, if the platform reports any.
    pub flags: Option<u32>,
}

impl ExceptionRecord {
    pub fn new(address: u64, code: u32) -> Self {
        Self {
            address,
            code,
            flags: None,
        }
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = Some(flags);
        self
    }
}
