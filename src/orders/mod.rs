pub mod handlers;
pub mod models;
pub mod order_id;
pub mod service;
pub mod stats;
pub mod store;

pub use handlers::*;
pub use models::*;
pub use order_id::*;
pub use service::*;
pub use stats::*;
pub use store::*;
