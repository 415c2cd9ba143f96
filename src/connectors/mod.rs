pub mod alpaca;
pub mod messages;
pub mod traits;
