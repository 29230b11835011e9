pub mod profile;
pub mod upload;
pub mod videos;
