pub mod chrome;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod markup;
pub mod notify;
pub mod record;
pub mod shutdown;
pub mod startup;
