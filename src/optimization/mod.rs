pub mod analysis;
pub mod capital;
