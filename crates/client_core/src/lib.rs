pub mod board_view;
pub mod client;
pub mod due;
pub mod error;

pub use board_view::{BoardView, CardSlot, CardUpdate};
pub use client::BoardClient;
pub use due::DueStatus;
pub use error::ClientError;
