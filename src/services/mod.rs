pub mod keys;
pub mod resolver;
pub mod settings_store;
pub mod storage;
pub mod transform;
pub mod uploader;
pub mod validation;
