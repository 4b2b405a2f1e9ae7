pub mod course;
pub mod files;
pub mod resource;
pub mod upload;
