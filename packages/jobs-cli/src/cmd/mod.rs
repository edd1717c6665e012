pub mod apply;
pub mod browse;
pub mod category;
pub mod search;
pub mod show;
