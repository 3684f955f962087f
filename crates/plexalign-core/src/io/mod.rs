pub mod filename;
pub mod image_io;
pub mod manifest;
