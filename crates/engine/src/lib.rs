//! Client-side state for the spendings service.
//!
//! The engine owns everything between the REST service and the screens:
//!
//! - [`HttpClient`] talks to the service, behind the [`RemoteApi`] trait.
//! - [`CategoryStore`] shares the category list between screens and carries a
//!   version counter bumped on every category mutation.
//! - [`CategoryController`] is the only writer of the store.
//! - [`SpendingController`] keeps the sorted spending list and reloads it
//!   when the store version advances.

pub use categories::CategoryController;
pub use client::{HttpClient, RemoteApi};
pub use error::EngineError;
pub use screen::{LoadTicket, ScreenStatus};
pub use sort::{SortDirection, SortKey, SortState, sort_spendings};
pub use spendings::{SpendingController, SpendingEdit, SpendingForm, SpendingRow, parse_magnitude};
pub use store::{CategoryReader, CategoryStore, CategoryWriter};

pub mod colors;

mod categories;
mod client;
mod error;
mod screen;
mod sort;
mod spendings;
mod store;

pub type Result<T> = std::result::Result<T, EngineError>;
