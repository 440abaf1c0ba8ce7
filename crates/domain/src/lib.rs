pub mod auth;
pub mod content;
pub mod error;
pub mod events;
pub mod identity;
pub mod news;
pub mod polls;
pub mod ports;
pub mod profiles;
pub mod region;
pub mod util;

pub type DomainResult<T> = Result<T, error::DomainError>;
