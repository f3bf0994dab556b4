pub(crate) mod common;
pub mod hash;
