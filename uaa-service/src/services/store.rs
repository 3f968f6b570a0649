use std::collections::HashMap;
use std::future::Future;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use tokio::time::timeout;
use uuid::Uuid;

use crate::models::Member;
use crate::services::error::ServiceError;

/// External member directory, consumed at its interface boundary only. The
/// store owns its own consistency discipline.
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, anyhow::Error>;

    /// Missing ids are simply absent from the result; order is unspecified.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Member>, anyhow::Error>;

    async fn insert(&self, member: Member) -> Result<(), anyhow::Error>;

    async fn health_check(&self) -> Result<(), anyhow::Error>;
}

/// Bound a store call. Timeouts and transport errors surface as a transient
/// failure, never as "not found" and never as an authentication verdict.
pub async fn with_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, anyhow::Error>>,
) -> Result<T, ServiceError> {
    match timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Member store call failed");
            Err(ServiceError::StoreUnavailable(
                "member store error".to_string(),
            ))
        }
        Err(_) => {
            tracing::error!(timeout_ms = limit.as_millis() as u64, "Member store call timed out");
            Err(ServiceError::StoreUnavailable(
                "member store timed out".to_string(),
            ))
        }
    }
}

/// MongoDB-backed member store.
#[derive(Clone)]
pub struct MongoMemberStore {
    database: mongodb::Database,
    members: mongodb::Collection<Member>,
}

impl MongoMemberStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, anyhow::Error> {
        let client = mongodb::Client::with_uri_str(uri).await?;
        let database = client.database(database);
        let members = database.collection::<Member>("members");
        Ok(Self { database, members })
    }
}

#[async_trait]
impl MemberStore for MongoMemberStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, anyhow::Error> {
        Ok(self.members.find_one(doc! { "email": email }, None).await?)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Member>, anyhow::Error> {
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let cursor = self
            .members
            .find(doc! { "member_id": { "$in": ids } }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, member: Member) -> Result<(), anyhow::Error> {
        self.members.insert_one(&member, None).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), anyhow::Error> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

/// In-memory member store for dev mode and tests.
#[derive(Default)]
pub struct InMemoryMemberStore {
    members: RwLock<HashMap<Uuid, Member>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, anyhow::Error> {
        let members = self
            .members
            .read()
            .map_err(|_| anyhow::anyhow!("member map poisoned"))?;
        Ok(members.values().find(|m| m.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Member>, anyhow::Error> {
        let members = self
            .members
            .read()
            .map_err(|_| anyhow::anyhow!("member map poisoned"))?;
        Ok(ids.iter().filter_map(|id| members.get(id).cloned()).collect())
    }

    async fn insert(&self, member: Member) -> Result<(), anyhow::Error> {
        let mut members = self
            .members
            .write()
            .map_err(|_| anyhow::anyhow!("member map poisoned"))?;
        members.insert(member.member_id, member);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(email: &str) -> Member {
        Member::new("Given".into(), "Family".into(), email.into(), "hash".into())
    }

    #[tokio::test]
    async fn in_memory_store_finds_by_email() {
        let store = InMemoryMemberStore::new();
        store.insert(member("a@example.com")).await.unwrap();

        assert!(store
            .find_by_email("a@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(store.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn in_memory_store_omits_missing_ids() {
        let store = InMemoryMemberStore::new();
        let present = member("a@example.com");
        let present_id = present.member_id;
        store.insert(present).await.unwrap();

        let found = store
            .find_by_ids(&[present_id, Uuid::nil()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].member_id, present_id);
    }

    #[tokio::test]
    async fn with_timeout_maps_slow_calls_to_transient() {
        let result = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<(), anyhow::Error>(())
        })
        .await;

        assert!(matches!(result, Err(ServiceError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn with_timeout_maps_store_errors_to_transient() {
        let result =
            with_timeout(Duration::from_millis(10), async { Err::<(), _>(anyhow::anyhow!("down")) })
                .await;

        assert!(matches!(result, Err(ServiceError::StoreUnavailable(_))));
    }
}
