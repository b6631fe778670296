// Application Layer - Use Cases and Business Logic

pub mod engagement;
pub mod jobs;
pub mod maintenance;
pub mod shutdown;
pub mod slug;

// Re-exports
pub use engagement::{
    ApplicationReceipt, EngagementEngine, EngagementPolicy, EngagementStores, EventOutcome,
};
pub use jobs::JobService;
pub use maintenance::MaintenanceScheduler;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use slug::SlugAllocator;
