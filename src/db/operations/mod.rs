pub mod chat_history;
pub mod detections;
pub mod products;
pub mod profiles;
pub mod stories;
pub mod users;

pub use products::ProductInsert;
