//! Shared helpers for tests.

use crate::config::{Config, PoolSettings, SeedConfig};
use crate::db::handlers::Persons;
use crate::db::models::persons::PersonCreateDBRequest;
use crate::random_user::{FetchPeople, RandomUserResponse, StaticPeopleFetcher};
use crate::types::PersonId;
use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: crate::config::DatabaseConfig {
            // Tests hand in their own pool
            url: "Something".to_string(),
            pool: PoolSettings {
                max_connections: 1,
                min_connections: 0,
                ..Default::default()
            },
        },
        page_size: 10,
        seed: SeedConfig {
            enabled: false,
            quantity: 0,
        },
        ..Default::default()
    }
}

/// App over `pool`, taking new persons from a fixed pool of 50 generated records
pub async fn create_test_app(pool: PgPool) -> TestServer {
    create_test_app_with_fetcher(pool, static_fetcher(50)).await
}

pub async fn create_test_app_with_fetcher(pool: PgPool, fetcher: Arc<dyn FetchPeople>) -> TestServer {
    crate::Application::new_with_fetcher(create_test_config(), pool, fetcher)
        .await
        .expect("Failed to create application")
        .into_test_server()
}

/// randomuser.me shaped payload with `n` distinct records
pub fn random_user_payload(n: usize) -> serde_json::Value {
    let results: Vec<_> = (0..n)
        .map(|i| {
            let gender = if i % 2 == 0 { "female" } else { "male" };
            json!({
                "gender": gender,
                "name": { "title": "Mx", "first": format!("Rand{i}"), "last": "Person" },
                "location": {
                    "street": { "number": i, "name": "Main Street" },
                    "city": "Springfield",
                    "country": "United States",
                    "postcode": 12345
                },
                "email": format!("rand{i}.person@example.com"),
                "cell": format!("(555) 010-{:04}", i),
                "picture": {
                    "large": format!("https://randomuser.me/api/portraits/{}/{}.jpg", if i % 2 == 0 { "women" } else { "men" }, i % 100),
                    "thumbnail": "https://randomuser.me/api/portraits/thumb/men/1.jpg"
                }
            })
        })
        .collect();

    json!({
        "results": results,
        "info": { "seed": "test", "results": n, "page": 1, "version": "1.4" }
    })
}

pub fn static_fetcher(n: usize) -> Arc<dyn FetchPeople> {
    let pool: RandomUserResponse = serde_json::from_value(random_user_payload(n)).expect("payload should decode");
    Arc::new(StaticPeopleFetcher::new(pool))
}

struct FailingFetcher;

#[async_trait]
impl FetchPeople for FailingFetcher {
    async fn fetch(&self, _count: usize) -> anyhow::Result<RandomUserResponse> {
        Err(anyhow::anyhow!("randomuser API error: 503 Service Unavailable - Uh oh"))
    }
}

/// A fetcher whose every call fails
pub fn failing_fetcher() -> Arc<dyn FetchPeople> {
    Arc::new(FailingFetcher)
}

/// Valid, distinct person fields; `first_name` is `first{i}`
pub fn sample_person(i: usize) -> PersonCreateDBRequest {
    PersonCreateDBRequest {
        gender: if i % 2 == 0 { "female" } else { "male" }.to_string(),
        first_name: format!("first{i}"),
        last_name: format!("last{i}"),
        cell: format!("+1-555-{:06}", i),
        email: format!("person{i}@example.com"),
        location: format!("City {i}, Country"),
        pic_link: format!("https://example.com/pictures/{i}.jpg"),
    }
}

/// Insert `n` sample persons, returning their ids in ascending order
pub async fn seed_persons(pool: &PgPool, n: usize) -> Vec<PersonId> {
    let requests: Vec<_> = (0..n).map(sample_person).collect();
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Persons::new(&mut conn)
        .create_bulk(&requests)
        .await
        .expect("Failed to seed persons");

    sqlx::query_scalar("SELECT id FROM persons ORDER BY id")
        .fetch_all(pool)
        .await
        .expect("Failed to read seeded ids")
}
