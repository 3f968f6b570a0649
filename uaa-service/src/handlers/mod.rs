pub mod members;
pub mod oauth;
