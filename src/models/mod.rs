pub mod content;
pub mod normalize;
