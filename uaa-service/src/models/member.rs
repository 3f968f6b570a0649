use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account in the member directory.
///
/// `member_id` is generated at creation and never changes; `email` is the
/// canonical external lookup key. The password hash stays inside the process
/// boundary: external representations go through
/// [`crate::dtos::member::MemberResponse`], which has no password field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub member_id: Uuid,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    pub password_hash: String,
}

impl Member {
    pub fn new(
        given_name: String,
        family_name: String,
        email: String,
        password_hash: String,
    ) -> Self {
        Self {
            member_id: Uuid::new_v4(),
            given_name,
            family_name,
            email,
            password_hash,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}
