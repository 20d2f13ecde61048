pub mod engine;
pub mod text;
pub mod theme;
pub mod title;
