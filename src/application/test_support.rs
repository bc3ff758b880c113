//! In-memory port implementations for use-case tests.

use std::sync::Mutex;

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use async_trait::async_trait;
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::application::ports::disc_repository::DiscRepository;
use crate::application::ports::image_store::ImageStore;
use crate::application::ports::mailer::Mailer;
use crate::application::ports::post_repository::{NewPost, PostRepository};
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::marketplace::{Disc, FlightNumbers, Post};

fn hash_password(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("argon2 hashing")
        .to_string()
}

// --- Users ---

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<(UserRow, Option<String>)>>,
}

impl InMemoryUsers {
    /// Unverified user holding `token`, password "password123".
    pub fn insert_unverified(&self, name: &str, email: &str, token: &str) -> UserRow {
        self.insert(name, email, "password123", false, Some(token.to_string()))
    }

    pub fn insert_verified(&self, name: &str, email: &str, password: &str) -> UserRow {
        self.insert(name, email, password, true, None)
    }

    fn insert(
        &self,
        name: &str,
        email: &str,
        password: &str,
        is_verified: bool,
        token: Option<String>,
    ) -> UserRow {
        let row = UserRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: Some(hash_password(password)),
            is_verified,
            created_at: chrono::Utc::now(),
        };
        self.rows.lock().unwrap().push((row.clone(), token));
        row
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        verification_token: &str,
    ) -> anyhow::Result<UserRow> {
        let row = UserRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: Some(password_hash.to_string()),
            is_verified: false,
            created_at: chrono::Utc::now(),
        };
        self.rows
            .lock()
            .unwrap()
            .push((row.clone(), Some(verification_token.to_string())));
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(r, _)| r.email == email)
            .map(|(r, _)| r.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(r, _)| r.id == id)
            .map(|(r, _)| r.clone()))
    }

    async fn find_by_verification_token(&self, token: &str) -> anyhow::Result<Option<UserRow>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(_, t)| t.as_deref() == Some(token))
            .map(|(r, _)| r.clone()))
    }

    async fn mark_verified(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|(r, _)| r.id == id) {
            Some((row, token)) => {
                row.is_verified = true;
                *token = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_users(&self) -> anyhow::Result<Vec<UserRow>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|(r, _)| r.clone())
            .collect())
    }
}

// --- Mail ---

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub url: String,
}

#[derive(Default)]
pub struct FakeMailer {
    fail: bool,
    sent: Mutex<Vec<SentMail>>,
}

impl FakeMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send_verification(
        &self,
        to_email: &str,
        _to_name: Option<&str>,
        verification_url: &str,
    ) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("relay unavailable");
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to_email.to_string(),
            url: verification_url.to_string(),
        });
        Ok(())
    }
}

// --- Discs ---

#[derive(Default)]
pub struct InMemoryDiscs {
    rows: Mutex<Vec<Disc>>,
}

impl InMemoryDiscs {
    pub fn insert(&self, manufacturer: &str, name: &str, flight: FlightNumbers) -> Disc {
        let disc = Disc {
            id: Uuid::new_v4(),
            manufacturer: manufacturer.to_string(),
            name: name.to_string(),
            flight,
        };
        self.rows.lock().unwrap().push(disc.clone());
        disc
    }
}

#[async_trait]
impl DiscRepository for InMemoryDiscs {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Disc>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn list_discs(&self) -> anyhow::Result<Vec<Disc>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

// --- Posts ---

#[derive(Default)]
pub struct InMemoryPosts {
    rows: Mutex<Vec<Post>>,
    counter: Mutex<i64>,
}

#[async_trait]
impl PostRepository for InMemoryPosts {
    async fn create_post(&self, new_post: &NewPost) -> anyhow::Result<Post> {
        // Monotonic timestamps so ordering assertions are deterministic.
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        let post = Post {
            id: Uuid::new_v4(),
            title: new_post.title.clone(),
            disc: new_post.disc.clone(),
            price: new_post.price,
            description: new_post.description.clone(),
            images: new_post.images.clone(),
            user_id: new_post.user_id,
            created_at: chrono::Utc::now() + chrono::Duration::milliseconds(*counter),
        };
        self.rows.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Post>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Post>> {
        let mut rows: Vec<Post> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }
}

// --- Image store ---

#[derive(Default)]
pub struct FakeImageStore {
    fail_after: Option<usize>,
    keys: Mutex<Vec<String>>,
}

impl FakeImageStore {
    /// Succeeds for the first `n` objects, then errors.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            keys: Mutex::new(Vec::new()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for FakeImageStore {
    async fn put_image(
        &self,
        key: &str,
        _content_type: Option<&str>,
        _bytes: Vec<u8>,
    ) -> anyhow::Result<String> {
        let mut keys = self.keys.lock().unwrap();
        if let Some(limit) = self.fail_after {
            if keys.len() >= limit {
                anyhow::bail!("object store unavailable");
            }
        }
        keys.push(key.to_string());
        Ok(format!("https://img.test/{key}"))
    }
}
