pub mod broadcaster;
pub mod handlers;
pub mod hub;
pub mod seats;
pub mod task;

// Re-export the main types for easy access
pub use hub::HubOptions;
pub use seats::Seat;
pub use task::hub_task;
