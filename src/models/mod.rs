pub mod payload;
pub mod settings;
