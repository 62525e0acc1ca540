pub mod dashboard;
pub mod host;
pub mod kernel;
pub mod module_system;
pub mod storage;
pub mod utils;

// Re-export key public types for the binary
pub use dashboard::{DashboardEntries, DashboardEntry, Sortable};
pub use host::Host;
pub use kernel::error::Error as KernelError;
pub use kernel::Application;
pub use module_system::{Module, ModuleManager, ModuleMetadata, ModuleScript, Registrar};
pub use storage::{AppConfig, StorageProvider};
