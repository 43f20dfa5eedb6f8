//! Domain model (records, statuses, changes, errors).

pub mod change;
pub mod errors;
pub mod record;
pub mod status;

pub use self::change::StatusChange;
pub use self::errors::{NotifyError, SourceError, WatchError};
pub use self::record::{Record, RecordId};
pub use self::status::Status;
