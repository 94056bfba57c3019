pub mod config;
pub mod db;
pub mod error;
pub mod runner;

pub use config::Config;
pub use db::models::Trainer;
pub use error::CastorError;
