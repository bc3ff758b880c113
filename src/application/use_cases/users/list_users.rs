use crate::application::ports::user_repository::{UserRepository, UserRow};

pub struct ListUsers<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ListUsers<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Vec<UserRow>> {
        let rows = self.repo.list_users().await?;
        // Password hashes never leave the repository layer.
        Ok(rows
            .into_iter()
            .map(|r| UserRow {
                password_hash: None,
                ..r
            })
            .collect())
    }
}
