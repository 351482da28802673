pub mod config;
pub mod covers;
pub mod logging;
pub mod openlibrary;
pub mod render;
pub mod session;
pub mod shell;
pub mod validate;
