//! Data models for the clinic scheduling client.
//!
//! These models match the GraphQL schema's camelCase field names exactly for
//! seamless interoperability with the backend.

mod activity;
mod appointment;
mod branch;
mod role;
mod user;

pub use activity::*;
pub use appointment::*;
pub use branch::*;
pub use role::*;
pub use user::*;
