pub mod interrupt;
pub mod reveal;
