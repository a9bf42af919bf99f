//! Request Handlers module
//!
//! Array and child resource controllers. They validate ownership and the
//! direction policy, call the store collaborators, and project the results.

mod array_handler;
mod child_handler;
mod commands;
mod ownership;
mod pagination;


pub use array_handler::{ArrayHandler, ARRAY_COLLECTION, ARRAY_MEMBER};
pub use child_handler::ChildResourceHandler;
pub use commands::*;
pub use ownership::{load_owned, validate_ownership};
pub use pagination::{PageQuery, Pagination};
