pub mod cli;
pub mod clock;
pub mod host;
pub mod input;
pub mod layout;
pub mod utils;
