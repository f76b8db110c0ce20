pub mod aggregate;
pub mod dates;
pub mod duration;
pub mod embedded;
pub mod text_extract;
