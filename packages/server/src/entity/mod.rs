pub mod course;
pub mod resource;
pub mod specialization;
