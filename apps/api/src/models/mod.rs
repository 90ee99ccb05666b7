pub mod candidate;
pub mod progress;
pub mod role;
