pub mod course;
pub mod resource;
pub mod shared;
pub mod upload;
