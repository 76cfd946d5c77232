pub mod google;
pub mod mailer;

pub use google::*;
pub use mailer::*;
