mod common;
mod course;
mod upload;
