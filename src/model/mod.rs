//! Request, response and record types shared by both services.

pub mod order;
pub mod user;

pub use order::*;
pub use user::*;
