//! Conversion settings

/// Default arena size (64 MiB)
pub const DEFAULT_ARENA_CAPACITY: usize = 64 * 1024 * 1024;

/// Settings for a single conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfig {
    /// Bytes of working memory backing the conversion arena
    pub arena_capacity: usize,
    /// Reject documents whose generator is not gltfpack
    pub require_gltfpack: bool,
    /// Ignore published accessor bounds and scan the positions instead
    pub force_bounds_scan: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            arena_capacity: DEFAULT_ARENA_CAPACITY,
            require_gltfpack: false,
            force_bounds_scan: false,
        }
    }
}
