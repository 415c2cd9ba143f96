pub mod clock;
pub mod engine;
pub mod executor;
pub mod shutdown;
