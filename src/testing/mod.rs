use std::sync::Arc;

use crate::auth::{generate_jwt, hash_password, AuthUser};
use crate::config::AppConfig;
use crate::database::models::{NewCourse, NewUser, User};
use crate::database::{CourseStore, MemoryCourseStore};
use crate::state::AppState;
use crate::types::Role;

/// Password given to every seeded user
pub const FIXTURE_PASSWORD: &str = "password123";

/// Seeded in-memory world for unit tests: one user per role, a second
/// instructor with no assignment, and one course taught by `instructor`.
pub struct Fixture {
    pub store: Arc<MemoryCourseStore>,
    pub config: AppConfig,
    pub admin: AuthUser,
    pub instructor: AuthUser,
    pub other_instructor: AuthUser,
    pub student: AuthUser,
    pub analyst: AuthUser,
    pub course_id: i32,
}

impl Fixture {
    pub async fn new() -> Self {
        let config = AppConfig::for_tests();
        let store = Arc::new(MemoryCourseStore::new());

        let admin = seed_user(&store, &config, "Root", "admin@school.test", Role::Admin).await;
        let instructor = seed_user(&store, &config, "Grace", "grace@school.test", Role::Instructor).await;
        let other_instructor = seed_user(&store, &config, "Alan", "alan@school.test", Role::Instructor).await;
        let student = seed_user(&store, &config, "Linus", "linus@school.test", Role::Student).await;
        let analyst = seed_user(&store, &config, "Edsger", "edsger@school.test", Role::Analyst).await;

        let course = store
            .insert_course(NewCourse {
                course_name: "Systems Programming".into(),
                description: Some("Ownership, borrowing and friends".into()),
            })
            .await
            .expect("seed course");
        store
            .assign_instructor(course.course_id, instructor.user_id)
            .await
            .expect("seed assignment");

        Self {
            store,
            config,
            admin: AuthUser::from(&admin),
            instructor: AuthUser::from(&instructor),
            other_instructor: AuthUser::from(&other_instructor),
            student: AuthUser::from(&student),
            analyst: AuthUser::from(&analyst),
            course_id: course.course_id,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.store.clone(), self.config.clone())
    }

    /// `Authorization` header value for a seeded user
    pub async fn bearer(&self, actor: &AuthUser) -> String {
        let user = self
            .store
            .find_user(actor.user_id)
            .await
            .expect("lookup fixture user")
            .expect("fixture user exists");
        let issued = generate_jwt(&self.config.security, &user).expect("sign fixture token");
        format!("Bearer {}", issued.token)
    }
}

async fn seed_user(store: &MemoryCourseStore, config: &AppConfig, name: &str, email: &str, role: Role) -> User {
    let password_hash = hash_password(FIXTURE_PASSWORD, config.security.bcrypt_cost).expect("hash fixture password");
    store
        .insert_user(NewUser {
            name: name.into(),
            email: email.into(),
            password_hash,
            role,
        })
        .await
        .expect("seed user")
}
