pub mod command;
pub mod dependencies;
pub mod installer;
