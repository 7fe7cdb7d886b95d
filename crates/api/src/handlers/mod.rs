pub mod assets;
pub mod ping;
pub mod seed;
