use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::CourseStore;
use crate::services::{AccountService, CourseService, CurriculumService, EnrollmentService, GradingService};

/// Shared handler state: the store seam and the loaded configuration
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CourseStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn CourseStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.store.clone(), self.config.clone())
    }

    pub fn courses(&self) -> CourseService {
        CourseService::new(self.store.clone())
    }

    pub fn curriculum(&self) -> CurriculumService {
        CurriculumService::new(self.store.clone())
    }

    pub fn enrollments(&self) -> EnrollmentService {
        EnrollmentService::new(self.store.clone())
    }

    pub fn grading(&self) -> GradingService {
        GradingService::new(self.store.clone())
    }
}
