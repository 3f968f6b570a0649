pub mod client;
pub mod member;

pub use client::{Client, TierPolicy, TrustTier};
pub use member::Member;
