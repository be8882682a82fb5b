pub mod object_directory;
pub mod object_resolver;
