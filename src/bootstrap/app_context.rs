use std::sync::Arc;

use crate::application::ports::disc_repository::DiscRepository;
use crate::application::ports::image_store::ImageStore;
use crate::application::ports::mailer::Mailer;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    disc_repo: Arc<dyn DiscRepository>,
    post_repo: Arc<dyn PostRepository>,
    mailer: Arc<dyn Mailer>,
    image_store: Arc<dyn ImageStore>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        disc_repo: Arc<dyn DiscRepository>,
        post_repo: Arc<dyn PostRepository>,
        mailer: Arc<dyn Mailer>,
        image_store: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            user_repo,
            disc_repo,
            post_repo,
            mailer,
            image_store,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn disc_repo(&self) -> Arc<dyn DiscRepository> {
        self.services.disc_repo.clone()
    }

    pub fn post_repo(&self) -> Arc<dyn PostRepository> {
        self.services.post_repo.clone()
    }

    pub fn mailer(&self) -> Arc<dyn Mailer> {
        self.services.mailer.clone()
    }

    pub fn image_store(&self) -> Arc<dyn ImageStore> {
        self.services.image_store.clone()
    }
}
