//! # Postgres Store
//!
//! Diesel-backed [`EndpointStore`]. Queries run on actix's blocking pool
//! against an r2d2 connection pool.

use crate::models::endpoints::{CreateEndpoints, Endpoints, UpdateEndpoints};
use crate::schema::endpoints;
use actix_web::web;
use async_trait::async_trait;
use autodoc_core::oas::EndpointDocument;
use autodoc_core::{AppError, AppResult, EndpointRecord, EndpointStore, HttpMethod};
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use uuid::Uuid;

/// Shared connection pool.
pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Creates a lazily connecting pool; connection failures surface on first use.
pub fn build_pool(database_url: &str, max_size: u32) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build_unchecked(manager)
}

/// Endpoint records in the `endpoints` table.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    /// Wraps a pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, query: F) -> AppResult<T>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        web::block(move || {
            let mut conn = pool
                .get()
                .map_err(|e| AppError::Database(format!("connection unavailable: {}", e)))?;
            query(&mut conn).map_err(|e| AppError::Database(e.to_string()))
        })
        .await
        .map_err(|e| AppError::Database(format!("blocking task failed: {}", e)))?
    }

    fn create_row(
        path: &str,
        method: HttpMethod,
        document: &EndpointDocument,
    ) -> AppResult<CreateEndpoints> {
        let now = Utc::now().naive_utc();
        Ok(CreateEndpoints {
            id: Uuid::new_v4(),
            path: path.to_string(),
            method: method.as_upper().to_string(),
            spec: serde_json::to_value(document)?,
            created_at: now,
            updated_at: now,
        })
    }

    fn update_row(document: &EndpointDocument) -> AppResult<UpdateEndpoints> {
        Ok(UpdateEndpoints {
            spec: Some(serde_json::to_value(document)?),
            updated_at: Some(Utc::now().naive_utc()),
        })
    }
}

#[async_trait]
impl EndpointStore for PgStore {
    async fn find_by_key(
        &self,
        path: &str,
        method: HttpMethod,
    ) -> AppResult<Option<EndpointRecord>> {
        let path = path.to_string();
        let method = method.as_upper();
        let row = self
            .run(move |conn| {
                endpoints::table
                    .filter(endpoints::path.eq(path))
                    .filter(endpoints::method.eq(method))
                    .select(Endpoints::as_select())
                    .first(conn)
                    .optional()
            })
            .await?;
        row.map(EndpointRecord::try_from).transpose()
    }

    async fn insert(
        &self,
        path: &str,
        method: HttpMethod,
        document: EndpointDocument,
    ) -> AppResult<EndpointRecord> {
        let row = Self::create_row(path, method, &document)?;
        let stored = self
            .run(move |conn| {
                diesel::insert_into(endpoints::table)
                    .values(&row)
                    .returning(Endpoints::as_returning())
                    .get_result(conn)
            })
            .await?;
        EndpointRecord::try_from(stored)
    }

    async fn update(&self, id: Uuid, document: EndpointDocument) -> AppResult<EndpointRecord> {
        let changes = Self::update_row(&document)?;
        let stored = self
            .run(move |conn| {
                diesel::update(endpoints::table.find(id))
                    .set(&changes)
                    .returning(Endpoints::as_returning())
                    .get_result(conn)
            })
            .await?;
        EndpointRecord::try_from(stored)
    }

    async fn list_by_recency(&self) -> AppResult<Vec<EndpointRecord>> {
        let rows = self
            .run(|conn| {
                endpoints::table
                    .order(endpoints::created_at.desc())
                    .select(Endpoints::as_select())
                    .load(conn)
            })
            .await?;
        rows.into_iter().map(EndpointRecord::try_from).collect()
    }

    async fn check(&self) -> AppResult<()> {
        self.run(|conn| {
            endpoints::table
                .select(endpoints::id)
                .first::<Uuid>(conn)
                .optional()
        })
        .await
        .map(|_| ())
    }

    /// Single `INSERT .. ON CONFLICT (path, method) DO UPDATE`, so concurrent
    /// observations of one endpoint never produce a second row.
    async fn upsert(
        &self,
        path: &str,
        method: HttpMethod,
        document: EndpointDocument,
    ) -> AppResult<EndpointRecord> {
        let row = Self::create_row(path, method, &document)?;
        let changes = Self::update_row(&document)?;
        let stored = self
            .run(move |conn| {
                diesel::insert_into(endpoints::table)
                    .values(&row)
                    .on_conflict((endpoints::path, endpoints::method))
                    .do_update()
                    .set(&changes)
                    .returning(Endpoints::as_returning())
                    .get_result(conn)
            })
            .await?;
        EndpointRecord::try_from(stored)
    }
}
