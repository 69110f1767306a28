pub mod error;
pub mod event;
pub mod request;
pub mod ui;
pub mod vim;
