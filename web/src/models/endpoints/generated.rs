/* @generated and managed by dsync */

#[allow(unused)]
use crate::diesel::*;
use crate::schema::*;

/// Struct representing a row in table `endpoints`
#[derive(
    Debug,
    Clone,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::QueryableByName,
    diesel::Identifiable,
)]
#[diesel(table_name=endpoints, primary_key(id))]
pub struct Endpoints {
    /// Field representing column `id`
    pub id: uuid::Uuid,
    /// Field representing column `path`
    pub path: String,
    /// Field representing column `method`
    pub method: String,
    /// Field representing column `spec`
    pub spec: serde_json::Value,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Create Struct for a row in table `endpoints` for [`Endpoints`]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, diesel::Insertable)]
#[diesel(table_name=endpoints)]
pub struct CreateEndpoints {
    /// Field representing column `id`
    pub id: uuid::Uuid,
    /// Field representing column `path`
    pub path: String,
    /// Field representing column `method`
    pub method: String,
    /// Field representing column `spec`
    pub spec: serde_json::Value,
    /// Field representing column `created_at`
    pub created_at: chrono::NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: chrono::NaiveDateTime,
}

/// Update Struct for a row in table `endpoints` for [`Endpoints`]
#[derive(
    Debug, Clone, serde::Serialize, serde::Deserialize, diesel::AsChangeset, PartialEq, Default,
)]
#[diesel(table_name=endpoints)]
pub struct UpdateEndpoints {
    /// Field representing column `spec`
    pub spec: Option<serde_json::Value>,
    /// Field representing column `updated_at`
    pub updated_at: Option<chrono::NaiveDateTime>,
}
