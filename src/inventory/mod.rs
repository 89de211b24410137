mod memory;
mod sqlite;

pub use memory::MemoryInventory;
pub use sqlite::SqliteInventory;

use crate::error::Error;
use crate::model::{FileRecord, SourceTag};

/// The boundary to the three backing catalogs.
///
/// How each catalog is populated (filesystem scans, the Sonarr mirror, the
/// Plex mirror) is an external concern; the engine only asks for a snapshot.
/// Implementations return every record they hold, soft-deleted ones
/// included; the engine applies the live filter. `Send + Sync` so the three
/// snapshots can be fetched in parallel.
pub trait InventorySource: Send + Sync {
    fn load(&self, source: SourceTag) -> Result<Vec<FileRecord>, Error>;
}
