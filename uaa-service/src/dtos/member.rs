use serde::Serialize;
use uuid::Uuid;

use crate::models::Member;

/// External representation of a member. Password material never appears here;
/// field names stay camelCase on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub member_id: Uuid,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            member_id: member.member_id,
            given_name: member.given_name,
            family_name: member.family_name,
            email: member.email,
        }
    }
}

/// HAL-style collection wrapper for `findByIds`.
#[derive(Debug, Serialize)]
pub struct EmbeddedMembers {
    pub _embedded: MemberCollection,
}

#[derive(Debug, Serialize)]
pub struct MemberCollection {
    pub members: Vec<MemberResponse>,
}

impl EmbeddedMembers {
    pub fn new(members: Vec<MemberResponse>) -> Self {
        Self {
            _embedded: MemberCollection { members },
        }
    }
}
