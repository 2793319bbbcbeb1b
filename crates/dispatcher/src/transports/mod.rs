//! Transport implementations
//!
//! Each destination type implements the capability contract; the engine
//! only ever sees `ServiceDefinition` / `QueueService`.

mod file;
mod log;
mod memory;
mod queue;

pub use self::file::{FileQueueDefinition, FileQueueService};
pub use self::log::{LogQueueDefinition, LogQueueService};
pub use self::memory::{MemoryQueueDefinition, MemoryQueueService, SharedDeliveries};
pub use self::queue::{FifoQueueDefinition, FifoQueueService, QueueMessage, WireFormat};
