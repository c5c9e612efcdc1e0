//! MongoDB 연결 헬퍼
//!
//! 재시도/타임아웃이 적용된 클라이언트 생성과 데이터베이스/컬렉션 조회를 제공합니다.

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use super::retry::{retry_connect, RetryPolicy};
use super::DbError;
use crate::config::DatabaseConfig;

/// MongoDB 모니터링에 표시될 애플리케이션 이름
const APP_NAME: &str = "backend_toolkit";

/// 재시도 정책에 따라 MongoDB에 연결합니다.
///
/// 각 시도는 연결 문자열 파싱, 클라이언트 생성, `ping` 명령으로 구성됩니다.
///
/// # Examples
///
/// ```rust,ignore
/// let client = connect_mongo("mongodb://localhost:27017", &RetryPolicy::default()).await?;
/// ```
pub async fn connect_mongo(dsn: &str, policy: &RetryPolicy) -> Result<Client, DbError> {
    retry_connect("MongoDB", dsn, policy, |_| async move {
        let mut client_options = ClientOptions::parse(dsn).await?;
        if client_options.app_name.is_none() {
            client_options.app_name = Some(APP_NAME.to_string());
        }
        client_options.server_selection_timeout = Some(policy.attempt_timeout());
        client_options.connect_timeout = Some(policy.attempt_timeout());

        let client = Client::with_options(client_options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        Ok::<_, mongodb::error::Error>(client)
    })
    .await
}

/// MongoDB에 연결하고 지정된 데이터베이스 래퍼를 반환합니다.
pub async fn connect_mongo_database(
    dsn: &str,
    policy: &RetryPolicy,
    database_name: &str,
) -> Result<MongoDatabase, DbError> {
    let client = connect_mongo(dsn, policy).await?;
    Ok(MongoDatabase::new(client, database_name))
}

/// 클라이언트에서 데이터베이스 핸들을 가져옵니다.
pub fn get_database(client: &Client, database_name: &str) -> mongodb::Database {
    client.database(database_name)
}

/// 데이터베이스에서 타입이 지정된 컬렉션 핸들을 가져옵니다.
///
/// ```rust,ignore
/// let users = get_collection::<User>(&database, "users");
/// ```
pub fn get_collection<T>(database: &mongodb::Database, collection_name: &str) -> Collection<T>
where
    T: Send + Sync,
{
    database.collection::<T>(collection_name)
}

/// MongoDB 클라이언트와 데이터베이스 이름을 묶은 래퍼
///
/// 리포지토리 계층에서 컬렉션에 접근할 때 사용합니다.
#[derive(Clone, Debug)]
pub struct MongoDatabase {
    client: Client,
    database_name: String,
}

impl MongoDatabase {
    pub fn new(client: Client, database_name: &str) -> Self {
        Self {
            client,
            database_name: database_name.to_string(),
        }
    }

    /// 환경 변수 설정으로 연결합니다.
    ///
    /// ## 환경 변수
    /// - `MONGODB_URI`: MongoDB 연결 URI (기본값: "mongodb://localhost:27017")
    /// - `DATABASE_NAME`: 데이터베이스 이름 (기본값: "backend_toolkit_dev")
    /// - `DB_MAX_RETRIES`, `DB_CONNECT_TIMEOUT_SECS`, `DB_RETRY_DELAY_SECS`
    pub async fn from_env() -> Result<Self, DbError> {
        connect_mongo_database(
            &DatabaseConfig::mongodb_uri(),
            &DatabaseConfig::retry_policy(),
            &DatabaseConfig::database_name(),
        )
        .await
    }

    /// MongoDB 데이터베이스 인스턴스를 반환합니다.
    pub fn get_database(&self) -> mongodb::Database {
        get_database(&self.client, &self.database_name)
    }

    /// 컬렉션 핸들을 반환합니다.
    pub fn collection<T: Send + Sync>(&self, collection_name: &str) -> Collection<T> {
        get_collection(&self.get_database(), collection_name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
