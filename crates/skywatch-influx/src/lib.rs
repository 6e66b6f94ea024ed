mod client;
mod store;

pub use client::{InfluxClient, InfluxConfig};
pub use store::InfluxReadingStore;
