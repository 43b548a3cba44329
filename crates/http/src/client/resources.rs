//! Back-office entity endpoints

use super::ClientError;
use super::pipeline::AuthPipeline;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// Bytes escaped in an id path segment: everything except RFC 3986 unreserved
const ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Entity collections exposed by the backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Customers,
    Suppliers,
    Products,
    Cheques,
    Invoices,
    BulkPayments,
    Sales,
    Orders,
    Vehicles,
    Warehouses,
    Users,
    Roles,
}

impl Resource {
    pub const ALL: [Self; 12] = [
        Self::Customers,
        Self::Suppliers,
        Self::Products,
        Self::Cheques,
        Self::Invoices,
        Self::BulkPayments,
        Self::Sales,
        Self::Orders,
        Self::Vehicles,
        Self::Warehouses,
        Self::Users,
        Self::Roles,
    ];

    /// Kebab-case name, also used as the collection path segment
    pub const fn name(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Suppliers => "suppliers",
            Self::Products => "products",
            Self::Cheques => "cheques",
            Self::Invoices => "invoices",
            Self::BulkPayments => "bulk-payments",
            Self::Sales => "sales",
            Self::Orders => "orders",
            Self::Vehicles => "vehicles",
            Self::Warehouses => "warehouses",
            Self::Users => "users",
            Self::Roles => "roles",
        }
    }

    /// Collection path, e.g. `/bulk-payments`
    pub fn collection_path(self) -> String {
        format!("/{}", self.name())
    }

    /// Item path, e.g. `/customers/42`; the id is percent-encoded as one segment
    pub fn item_path(self, id: &str) -> String {
        format!("/{}/{}", self.name(), utf8_percent_encode(id, ID_SEGMENT))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| ClientError::Configuration(format!("unknown resource: {s}")))
    }
}

/// CRUD calls for one or more [`Resource`] collections
///
/// Every call goes through the pipeline, so expired sessions are renewed
/// transparently. Responses are decoded from the `{ result }` envelope.
#[derive(Clone)]
pub struct ResourceClient {
    pipeline: AuthPipeline,
}

impl ResourceClient {
    pub const fn new(pipeline: AuthPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, ClientError> {
        self.pipeline
            .get_result(&resource.collection_path())
            .await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<T, ClientError> {
        self.pipeline.get_result(&resource.item_path(id)).await
    }

    pub async fn create<B, T>(&self, resource: Resource, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.pipeline
            .post_json(&resource.collection_path(), body)
            .await?
            .result()
    }

    pub async fn update<B, T>(&self, resource: Resource, id: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.pipeline
            .put_json(&resource.item_path(id), body)
            .await?
            .result()
    }

    pub async fn delete(&self, resource: Resource, id: &str) -> Result<(), ClientError> {
        self.pipeline.delete(&resource.item_path(id)).await?;
        Ok(())
    }
}
