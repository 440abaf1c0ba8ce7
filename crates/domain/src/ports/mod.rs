use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub mod db;
pub mod events;
pub mod news;
pub mod polls;
pub mod profiles;
