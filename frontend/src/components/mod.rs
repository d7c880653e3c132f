pub mod sheet;
pub mod upload;
