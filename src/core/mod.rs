pub mod errors;
pub mod models;
pub mod tasks;

pub use errors::ShiziError;
pub use models::{ Item, Round };
