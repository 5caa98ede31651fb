pub mod ease;
pub mod enter;
pub mod spring;
