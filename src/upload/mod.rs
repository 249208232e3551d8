mod source;

pub use source::{expand_paths, FileSource};
