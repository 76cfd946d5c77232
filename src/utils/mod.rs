pub mod code_generator;
pub mod email_template;
pub mod form;
pub mod jwt;
pub mod password;
pub mod paths;
pub mod slug;

pub use code_generator::{generate_random_suffix, generate_six_digit_code};
pub use email_template::*;
pub use form::*;
pub use jwt::*;
pub use password::*;
pub use paths::*;
pub use slug::*;
