pub mod host;
pub mod pil;
pub mod utils;
