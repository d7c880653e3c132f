pub mod company;
pub mod data_file;
pub mod file_kind;
pub mod mapping;
