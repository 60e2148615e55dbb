#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[cfg(target_os = "linux")]
    #[error("Failed to read procfs info: {0}")]
    Procfs(#[from] procfs::ProcError),

    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode event document: {0}")]
    Encode(String),

    #[error("Process {0} does not exist or cannot be queried")]
    ProcessNotFound(u32),
}
