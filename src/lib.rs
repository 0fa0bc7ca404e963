pub mod clock;
pub mod compute;
pub mod config;
pub mod display;
pub mod enemy;
pub mod entities;
pub mod error;
pub mod input;
pub mod meteorite;
pub mod shield;
pub mod ship;
pub mod sinks;
pub mod upgrade;
