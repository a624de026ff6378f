use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::users::dtos::{UserRef, UserSummaryDto};
use crate::modules::store::Store;

/// Service for user lookups and reference expansion
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// All users as summaries, ordered by name
    pub async fn list_users(&self) -> Result<Vec<UserSummaryDto>> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserSummaryDto::from).collect())
    }

    pub async fn exists(&self, user_id: Uuid) -> Result<bool> {
        Ok(self.store.find_user(user_id).await?.is_some())
    }

    /// Expand a set of user ids into summaries in one lookup.
    /// Ids that no longer resolve are absent from the map.
    pub async fn summaries(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, UserSummaryDto>> {
        let mut unique: Vec<Uuid> = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let users = self.store.find_users(&unique).await?;
        Ok(users
            .into_iter()
            .map(|u| (u.id, UserSummaryDto::from(u)))
            .collect())
    }

    /// Reference shape for a single id: expanded when the user resolves, bare id otherwise
    pub fn reference(id: Uuid, summaries: &HashMap<Uuid, UserSummaryDto>) -> UserRef {
        summaries
            .get(&id)
            .cloned()
            .map(UserRef::Expanded)
            .unwrap_or(UserRef::Id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::{NewUser, UserRole};
    use crate::modules::store::{MemoryStore, UserStore};

    async fn seed(store: &MemoryStore, name: &str, email: &str) -> Uuid {
        store
            .insert_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Manager,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_summaries_skip_unknown_ids() {
        let store = Arc::new(MemoryStore::new());
        let known = seed(&store, "Kim", "kim@example.com").await;
        let service = UserService::new(store);

        let unknown = Uuid::now_v7();
        let map = service.summaries(&[known, unknown, known]).await.unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map[&known].email, "kim@example.com");
        assert_eq!(
            UserService::reference(unknown, &map),
            UserRef::Id(unknown)
        );
        assert!(matches!(
            UserService::reference(known, &map),
            UserRef::Expanded(_)
        ));
    }

    #[tokio::test]
    async fn test_list_users_sorted_by_name() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "Zoe", "zoe@example.com").await;
        seed(&store, "Ari", "ari@example.com").await;
        let service = UserService::new(store);

        let names: Vec<String> = service
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Ari", "Zoe"]);
    }
}
