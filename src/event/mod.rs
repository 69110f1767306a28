mod handler;

pub use handler::{Event, EventHandler};
