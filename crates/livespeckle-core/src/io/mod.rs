pub mod extract;
pub mod image_io;
pub mod ser;
