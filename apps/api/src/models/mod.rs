pub mod analysis;
pub mod item;
