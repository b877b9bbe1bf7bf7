pub mod config;
pub mod error;
pub mod io;
pub mod lookup;
pub mod memory;
pub mod recorder;
pub mod request;
pub mod store;

pub use error::{Result, RollcallError};
