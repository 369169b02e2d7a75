pub mod env_parse;
pub mod yaml_parse;

pub mod utils;

pub use yaml_parse::YamlValue;

pub use utils::*;
