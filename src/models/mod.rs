pub mod common;
pub mod company;
pub mod profile;
pub mod user;
pub mod verification;

pub use common::*;
pub use company::*;
pub use profile::*;
pub use user::*;
pub use verification::*;
