#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use course_api::auth::{generate_jwt, hash_password};
use course_api::config::AppConfig;
use course_api::database::models::{NewCourse, NewUser, User};
use course_api::database::{CourseStore, MemoryCourseStore};
use course_api::types::Role;
use course_api::{app, AppState};

pub const PASSWORD: &str = "password123";

/// The real router served on a free local port, backed by a fresh in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryCourseStore>,
    pub config: AppConfig,
    client: reqwest::Client,
}

/// A seeded account and a bearer token for it
#[derive(Debug, Clone)]
pub struct Actor {
    pub user: User,
    pub token: String,
}

impl Actor {
    pub fn id(&self) -> i32 {
        self.user.user_id
    }
}

/// One account per role plus a course taught by `instructor`
pub struct World {
    pub admin: Actor,
    pub instructor: Actor,
    pub other_instructor: Actor,
    pub student: Actor,
    pub analyst: Actor,
    pub course_id: i32,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = AppConfig::for_tests();
        let store = Arc::new(MemoryCourseStore::new());
        let state = AppState::new(store.clone(), config.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            store,
            config,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the status with the decoded body (`Null` when empty)
    pub async fn send(&self, method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let value = if text.is_empty() { Value::Null } else { serde_json::from_str(&text)? };
        Ok((status, value))
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, path, Some(token), None).await
    }

    pub async fn seed_user(&self, name: &str, email: &str, role: Role) -> Result<Actor> {
        let password_hash = hash_password(PASSWORD, self.config.security.bcrypt_cost)?;
        let user = self
            .store
            .insert_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role,
            })
            .await?;
        let token = generate_jwt(&self.config.security, &user)?.token;
        Ok(Actor { user, token })
    }

    pub async fn seed_course(&self, name: &str, instructor_id: i32) -> Result<i32> {
        let course = self
            .store
            .insert_course(NewCourse {
                course_name: name.to_string(),
                description: None,
            })
            .await?;
        self.store.assign_instructor(course.course_id, instructor_id).await?;
        Ok(course.course_id)
    }

    pub async fn store_enrollment_score(&self, enrollment_id: i64) -> Result<Option<i32>> {
        let enrollment = self
            .store
            .find_enrollment(i32::try_from(enrollment_id)?)
            .await?
            .context("enrollment missing from store")?;
        Ok(enrollment.evaluation_score)
    }

    pub async fn world(&self) -> Result<World> {
        let admin = self.seed_user("Root", "admin@school.test", Role::Admin).await?;
        let instructor = self.seed_user("Grace", "grace@school.test", Role::Instructor).await?;
        let other_instructor = self.seed_user("Alan", "alan@school.test", Role::Instructor).await?;
        let student = self.seed_user("Linus", "linus@school.test", Role::Student).await?;
        let analyst = self.seed_user("Edsger", "edsger@school.test", Role::Analyst).await?;
        let course_id = self.seed_course("Systems Programming", instructor.id()).await?;

        Ok(World {
            admin,
            instructor,
            other_instructor,
            student,
            analyst,
            course_id,
        })
    }
}

/// Boot a server and seed the standard world
pub async fn start_with_world() -> Result<(TestServer, World)> {
    let server = TestServer::start().await?;
    let world = server.world().await?;
    Ok((server, world))
}
