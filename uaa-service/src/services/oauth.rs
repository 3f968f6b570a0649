use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::models::{Member, TierPolicy};
use crate::services::error::ServiceError;
use crate::services::jwt::JwtService;
use crate::services::registry::ClientRegistry;
use crate::services::store::{self, MemberStore};
use crate::utils::{verify_password, Password, PasswordHashString};

pub const GRANT_TYPE_PASSWORD: &str = "password";

/// Body of a successful grant. The display fields are denormalized onto the
/// response for client convenience.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub scope: String,
    pub given_name: String,
    pub family_name: String,
    pub display_name: String,
    pub user_id: String,
}

/// Implements the resource-owner password grant. Fully reentrant: the only
/// state it touches is the read-only client table and the member store.
#[derive(Clone)]
pub struct OAuthService {
    registry: Arc<ClientRegistry>,
    members: Arc<dyn MemberStore>,
    jwt: JwtService,
    store_timeout: Duration,
}

impl OAuthService {
    pub fn new(
        registry: Arc<ClientRegistry>,
        members: Arc<dyn MemberStore>,
        jwt: JwtService,
        store_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            members,
            jwt,
            store_timeout,
        }
    }

    /// The grant state machine: grant type, client authentication, tier
    /// eligibility, resource-owner verification, then minting. A client that
    /// fails any of the first three steps never reaches the member store.
    pub async fn issue_token(
        &self,
        client_id: &str,
        client_secret: &str,
        grant_type: &str,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, ServiceError> {
        if grant_type != GRANT_TYPE_PASSWORD {
            return Err(ServiceError::UnsupportedGrantType(grant_type.to_string()));
        }

        let client = self
            .registry
            .lookup(client_id)
            .ok_or(ServiceError::InvalidClient)?;

        verify_password(
            &Password::new(client_secret.to_string()),
            &PasswordHashString::new(client.secret_hash.clone()),
        )
        .map_err(|_| ServiceError::InvalidClient)?;

        let policy = client.tier.policy();
        if !policy.grant_eligible {
            tracing::warn!(client_id = %client.client_id, "Grant-ineligible client attempted password grant");
            return Err(ServiceError::InvalidClient);
        }

        let member = self.verify_resource_owner(username, password).await?;

        let response = self.mint(&member, &policy)?;
        tracing::info!(
            client_id = %client.client_id,
            tier = %client.tier,
            user_id = %response.user_id,
            "Token issued"
        );
        Ok(response)
    }

    /// Single code path for both "no such user" and "wrong password".
    async fn verify_resource_owner(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Member, ServiceError> {
        let member = store::with_timeout(self.store_timeout, self.members.find_by_email(username))
            .await?
            .ok_or(ServiceError::InvalidGrant)?;

        verify_password(
            &Password::new(password.to_string()),
            &PasswordHashString::new(member.password_hash.clone()),
        )
        .map_err(|_| ServiceError::InvalidGrant)?;

        Ok(member)
    }

    fn mint(&self, member: &Member, policy: &TierPolicy) -> Result<TokenResponse, ServiceError> {
        let scopes: Vec<String> = policy.scopes.iter().map(|s| s.to_string()).collect();
        let subject = member.member_id.to_string();

        let access_token = self
            .jwt
            .mint_access_token(&subject, scopes.clone(), policy.access_token_ttl_secs)
            .map_err(ServiceError::Internal)?;
        let refresh_token = self
            .jwt
            .mint_refresh_token(&subject, scopes.clone(), policy.refresh_token_ttl_secs)
            .map_err(ServiceError::Internal)?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in: policy.access_token_ttl_secs,
            scope: scopes.join(" "),
            given_name: member.given_name.clone(),
            family_name: member.family_name.clone(),
            display_name: member.display_name(),
            user_id: subject,
        })
    }
}
