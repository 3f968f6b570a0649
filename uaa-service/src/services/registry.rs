use std::collections::HashMap;

use crate::models::{Client, TrustTier};
use crate::utils::{hash_password, Password};

/// Immutable table of registered OAuth2 clients, built once at startup.
/// Unknown ids resolve to nothing, never to a fallback tier.
pub struct ClientRegistry {
    clients: HashMap<String, Client>,
}

impl ClientRegistry {
    /// Parse `client_id:secret:tier` triples, comma separated. Secrets are
    /// hashed before the registry retains them.
    pub fn from_spec(spec: &str) -> Result<Self, anyhow::Error> {
        let mut clients = HashMap::new();

        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let mut parts = entry.splitn(3, ':');
            let (Some(client_id), Some(secret), Some(tier)) =
                (parts.next(), parts.next(), parts.next())
            else {
                anyhow::bail!("Malformed client entry, expected client_id:secret:tier");
            };

            let tier: TrustTier = tier.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let secret_hash = hash_password(&Password::new(secret.to_string()))?.into_string();

            let previous = clients.insert(
                client_id.to_string(),
                Client {
                    client_id: client_id.to_string(),
                    secret_hash,
                    tier,
                },
            );
            if previous.is_some() {
                anyhow::bail!("Duplicate client id: {}", client_id);
            }
        }

        if clients.is_empty() {
            anyhow::bail!("Client table is empty");
        }

        Ok(Self { clients })
    }

    pub fn lookup(&self, client_id: &str) -> Option<&Client> {
        self.clients.get(client_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
