use crate::application::ports::user_repository::UserRepository;

pub struct VerifyEmail<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> VerifyEmail<'a, R> {
    /// Returns false when no user carries the token. Verification clears the
    /// token, so a replayed link takes the same false path.
    pub async fn execute(&self, token: &str) -> anyhow::Result<bool> {
        let user = match self.repo.find_by_verification_token(token).await? {
            Some(u) => u,
            None => return Ok(false),
        };
        self.repo.mark_verified(user.id).await?;
        Ok(true)
    }
}
