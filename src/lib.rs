pub mod config;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod report;

pub use config::AppConfig;
pub use engine::{ReconEngine, ReconOutcome};
pub use error::Error;
pub use inventory::{InventorySource, MemoryInventory, SqliteInventory};
pub use model::{FileRecord, ReconDiagnostics, ReconciliationRow, SourceTag};
