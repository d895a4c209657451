pub mod document;
pub mod synthesis;
pub mod voices;
