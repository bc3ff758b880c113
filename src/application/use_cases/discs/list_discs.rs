use crate::application::ports::disc_repository::DiscRepository;
use crate::domain::marketplace::Disc;

pub struct ListDiscs<'a, R: DiscRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DiscRepository + ?Sized> ListDiscs<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Vec<Disc>> {
        self.repo.list_discs().await
    }
}
