pub mod color;
pub mod layout;
pub mod preset;
pub mod presenter;
