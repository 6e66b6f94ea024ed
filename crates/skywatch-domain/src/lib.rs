pub mod channel;
pub mod error;
pub mod narrative;
pub mod reading;
pub mod report;
pub mod service;
pub mod snapshot;
pub mod units;

pub use channel::*;
pub use error::*;
pub use narrative::*;
pub use reading::*;
pub use report::*;
pub use service::*;
pub use snapshot::*;
pub use units::*;
