pub mod hierarchy;
pub mod properties;
pub mod status_bar;
