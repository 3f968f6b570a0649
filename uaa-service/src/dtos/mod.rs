pub mod member;
pub mod oauth;
