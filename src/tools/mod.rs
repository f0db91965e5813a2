//! The assistant's tool surface: schema definitions, typed call parsing,
//! and execution against the stores.

mod calls;
mod executor;
mod schema;

pub use executor::ToolExecutor;
pub use schema::tool_definitions;
