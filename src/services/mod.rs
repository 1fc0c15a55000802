// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod admin_service;
pub mod auth_service;
pub mod contact_service;
pub mod rate_limit;
pub mod rating_service;
pub mod slug;
pub mod statistics_service;
pub mod storage;
pub mod venue_service;

pub use admin_service::*;
pub use auth_service::*;
pub use contact_service::*;
pub use rate_limit::*;
pub use rating_service::*;
pub use statistics_service::*;
pub use storage::*;
pub use venue_service::*;
