pub mod core;
pub mod overview;
pub mod source;
pub mod ui;
