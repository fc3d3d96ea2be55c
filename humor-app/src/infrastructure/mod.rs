pub mod memory;

#[cfg(feature = "server")]
pub mod auth;

#[cfg(feature = "server")]
pub mod db;
