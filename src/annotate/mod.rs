pub mod core;
pub mod dictionary;
pub(crate) mod log;
pub mod matcher;
pub mod renderer;
pub mod rules;
pub mod sanitize;
pub mod tokenizer;

pub use self::core::*;
pub use self::dictionary::*;
pub use self::matcher::*;
pub use self::renderer::*;
pub use self::rules::*;
pub use self::sanitize::*;
pub use self::tokenizer::*;
