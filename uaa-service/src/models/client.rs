use std::fmt;

/// Trust classification of a registered OAuth2 client. The tier fixes the
/// scope ceiling and token lifetimes; neither is negotiable per request or
/// per client, only by redeployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustTier {
    Trusted,
    Guest,
    Unregistered,
}

/// Policy attached to a trust tier.
#[derive(Debug, Clone, Copy)]
pub struct TierPolicy {
    pub scopes: &'static [&'static str],
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    /// Whether the tier may complete the password grant at all.
    pub grant_eligible: bool,
}

impl TrustTier {
    pub fn policy(&self) -> TierPolicy {
        match self {
            TrustTier::Trusted => TierPolicy {
                scopes: &["read", "write", "trust"],
                access_token_ttl_secs: 43_200,
                refresh_token_ttl_secs: 2_592_000,
                grant_eligible: true,
            },
            TrustTier::Guest => TierPolicy {
                scopes: &["read"],
                access_token_ttl_secs: 1_800,
                refresh_token_ttl_secs: 86_400,
                grant_eligible: true,
            },
            TrustTier::Unregistered => TierPolicy {
                scopes: &[],
                access_token_ttl_secs: 0,
                refresh_token_ttl_secs: 0,
                grant_eligible: false,
            },
        }
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrustTier::Trusted => write!(f, "trusted"),
            TrustTier::Guest => write!(f, "guest"),
            TrustTier::Unregistered => write!(f, "unregistered"),
        }
    }
}

impl std::str::FromStr for TrustTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trusted" => Ok(TrustTier::Trusted),
            "guest" => Ok(TrustTier::Guest),
            "unregistered" => Ok(TrustTier::Unregistered),
            _ => Err(format!("Invalid trust tier: {}", s)),
        }
    }
}

/// A statically provisioned OAuth2 client. Only the argon2 hash of the secret
/// is retained.
#[derive(Debug, Clone)]
pub struct Client {
    pub client_id: String,
    pub secret_hash: String,
    pub tier: TrustTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_access_ttl_is_under_a_day() {
        let policy = TrustTier::Trusted.policy();
        assert!(policy.access_token_ttl_secs < 86_400);
        assert_eq!(policy.scopes, &["read", "write", "trust"]);
        assert!(policy.grant_eligible);
    }

    #[test]
    fn guest_access_ttl_is_under_an_hour() {
        let policy = TrustTier::Guest.policy();
        assert!(policy.access_token_ttl_secs < 3_600);
        assert_eq!(policy.scopes, &["read"]);
        assert!(policy.grant_eligible);
    }

    #[test]
    fn guest_scopes_are_a_subset_of_trusted() {
        let trusted = TrustTier::Trusted.policy();
        let guest = TrustTier::Guest.policy();
        assert!(guest.scopes.iter().all(|s| trusted.scopes.contains(s)));
    }

    #[test]
    fn unregistered_tier_is_grant_ineligible() {
        let policy = TrustTier::Unregistered.policy();
        assert!(!policy.grant_eligible);
        assert!(policy.scopes.is_empty());
    }

    #[test]
    fn tier_round_trips_through_display_and_parse() {
        for tier in [TrustTier::Trusted, TrustTier::Guest, TrustTier::Unregistered] {
            assert_eq!(tier.to_string().parse::<TrustTier>().unwrap(), tier);
        }
        assert!("admin".parse::<TrustTier>().is_err());
    }
}
