//! 内存键值存储适配器
//!
//! 仓储接口的进程内实现。写操作在同一把写锁内完成，
//! 覆盖写入（删旧+插新）对并发调用原子。换成事务型存储
//! 时只需要实现同样的仓储接口。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use verigate_common::UserId;
use verigate_errors::{AppError, AppResult};

use crate::domain::repositories::{UserRepository, VerificationTokenRepository};
use crate::domain::value_objects::Email;
use crate::domain::{User, VerificationToken};

#[derive(Default)]
struct UserTable {
    by_email: HashMap<String, User>,
    email_by_id: HashMap<Uuid, String>,
}

/// 内存用户仓储
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> AppResult<()> {
        let mut table = self.inner.write().await;
        let key = user.email.as_str().to_string();

        if table.by_email.contains_key(&key) {
            return Err(AppError::conflict("User already exists"));
        }

        table.email_by_id.insert(user.id.0, key.clone());
        table.by_email.insert(key, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut table = self.inner.write().await;

        let key = table
            .email_by_id
            .get(&user.id.0)
            .cloned()
            .ok_or_else(|| AppError::not_found("User not found"))?;

        table.by_email.insert(key, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        let table = self.inner.read().await;
        let user = table
            .email_by_id
            .get(&id.0)
            .and_then(|key| table.by_email.get(key))
            .cloned();
        Ok(user)
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>> {
        let table = self.inner.read().await;
        Ok(table.by_email.get(email.as_str()).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AppResult<bool> {
        let table = self.inner.read().await;
        Ok(table.by_email.contains_key(email.as_str()))
    }
}

/// 内存验证令牌仓储
#[derive(Default)]
pub struct InMemoryVerificationTokenRepository {
    inner: RwLock<HashMap<String, VerificationToken>>,
}

impl InMemoryVerificationTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VerificationTokenRepository for InMemoryVerificationTokenRepository {
    async fn save(&self, token: &VerificationToken) -> AppResult<()> {
        let mut tokens = self.inner.write().await;
        // insert 即覆盖：同一邮箱的旧令牌被删除
        tokens.insert(token.email.clone(), token.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<VerificationToken>> {
        let tokens = self.inner.read().await;
        Ok(tokens.get(email).cloned())
    }

    async fn delete_by_email(&self, email: &str) -> AppResult<bool> {
        let mut tokens = self.inner.write().await;
        Ok(tokens.remove(email).is_some())
    }

    async fn count_by_email(&self, email: &str) -> AppResult<i64> {
        let tokens = self.inner.read().await;
        Ok(if tokens.contains_key(email) { 1 } else { 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::HashedPassword;
    use chrono::Utc;

    fn user(email: &str) -> User {
        User::new(
            "Test",
            Email::new(email).unwrap(),
            HashedPassword::from_plain("secret123").unwrap(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_user_save_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.save(&user("alice@example.com")).await.unwrap();

        let result = repo.save(&user("alice@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_user_lookup_by_id_and_email() {
        let repo = InMemoryUserRepository::new();
        let alice = user("alice@example.com");
        repo.save(&alice).await.unwrap();

        let by_id = repo.find_by_id(&alice.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, alice.email);

        let by_email = repo
            .find_by_email(&Email::new("alice@example.com").unwrap())
            .await
            .unwrap();
        assert!(by_email.is_some());
        assert!(
            repo.exists_by_email(&Email::new("alice@example.com").unwrap())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_user_update_persists_changes() {
        let repo = InMemoryUserRepository::new();
        let mut alice = user("alice@example.com");
        repo.save(&alice).await.unwrap();

        alice.mark_verified(Utc::now());
        repo.update(&alice).await.unwrap();

        let found = repo.find_by_id(&alice.id).await.unwrap().unwrap();
        assert!(found.is_verified());
    }

    #[tokio::test]
    async fn test_update_unknown_user_fails() {
        let repo = InMemoryUserRepository::new();
        let result = repo.update(&user("ghost@example.com")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_token_save_supersedes_previous() {
        let repo = InMemoryVerificationTokenRepository::new();
        let now = Utc::now();

        let t1 = VerificationToken::new("bob@example.com", "hash1".to_string(), now, 60);
        let t2 = VerificationToken::new("bob@example.com", "hash2".to_string(), now, 60);

        repo.save(&t1).await.unwrap();
        repo.save(&t2).await.unwrap();

        assert_eq!(repo.count_by_email("bob@example.com").await.unwrap(), 1);
        let live = repo.find_by_email("bob@example.com").await.unwrap().unwrap();
        assert_eq!(live.token_hash, "hash2");
    }

    #[tokio::test]
    async fn test_token_delete_reports_presence() {
        let repo = InMemoryVerificationTokenRepository::new();
        let token =
            VerificationToken::new("bob@example.com", "hash".to_string(), Utc::now(), 60);
        repo.save(&token).await.unwrap();

        assert!(repo.delete_by_email("bob@example.com").await.unwrap());
        assert!(!repo.delete_by_email("bob@example.com").await.unwrap());
        assert_eq!(repo.count_by_email("bob@example.com").await.unwrap(), 0);
    }
}
