// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod admin;
pub mod category;
pub mod contact;
pub mod image;
pub mod list_input;
pub mod pagination;
pub mod rating;
pub mod statistics;
pub mod user;
pub mod venue;

pub use admin::*;
pub use category::*;
pub use contact::*;
pub use image::*;
pub use list_input::*;
pub use pagination::*;
pub use rating::*;
pub use statistics::*;
pub use user::*;
pub use venue::*;
