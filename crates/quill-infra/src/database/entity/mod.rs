//! SeaORM entity models.

pub mod post;
pub mod user;
