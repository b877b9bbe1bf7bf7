pub mod log;
pub mod mark;
