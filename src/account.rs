use crate::{cryptography::generate_salt, error::InviteError};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Serialize, Debug, Clone)]
pub struct Account {
    id: Uuid,
    name: String,
    email: String,
    #[serde(skip)]
    #[allow(dead_code)]
    hashed_and_salted_password: String,
}

impl Account {
    pub fn new(id: Uuid, name: String, email: String, password: &str) -> Result<Self, InviteError> {
        let salt = generate_salt(32);
        let hashed_and_salted_password = argon2::hash_encoded(
            password.as_bytes(),
            salt.as_bytes(),
            &argon2::Config::default(),
        )?;
        Ok(Self {
            id,
            name,
            email,
            hashed_and_salted_password,
        })
    }
    pub fn to_safe(&self) -> AccountSafe {
        AccountSafe {
            id: self.id,
            name: self.name.to_owned(),
            email: self.email.to_owned(),
        }
    }
    pub fn get_email(&self) -> &str {
        &self.email
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountSafe {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

fn registry_key(email: &str) -> String {
    email.to_ascii_lowercase()
}

/// In-memory accounts, unique by case-insensitive email.
#[derive(Default, Clone)]
pub struct AccountRegistry {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
    email_to_id_registry: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl AccountRegistry {
    pub async fn email_exists(&self, email: &str) -> bool {
        self.email_to_id_registry
            .read()
            .await
            .contains_key(&registry_key(email))
    }

    pub async fn insert(&self, account: Account) -> Result<AccountSafe, InviteError> {
        let mut email_to_id_registry = self.email_to_id_registry.write().await;
        let key = registry_key(account.get_email());
        if email_to_id_registry.contains_key(&key) {
            return Err(InviteError::AlreadyRegistered(account.email));
        }
        let _ = email_to_id_registry.insert(key, account.id);
        let account_safe = account.to_safe();
        let _ = self.accounts.write().await.insert(account.id, account);
        Ok(account_safe)
    }

    /// Generates a v4 id not used by any registered account.
    pub async fn generate_account_uid(&self) -> Uuid {
        loop {
            let uid = Uuid::new_v4();
            if self.accounts.read().await.contains_key(&uid) {
                continue;
            }
            return uid;
        }
    }
}
