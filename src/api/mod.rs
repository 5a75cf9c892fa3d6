//! HTTP API handlers for beatshelf

pub mod beatmaps;
pub mod health;
pub mod import;

pub use beatmaps::beatmap_routes;
pub use health::health_routes;
pub use import::import_routes;
