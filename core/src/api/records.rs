//! Records resource client
//!
//! Every operation maps straight onto one request. Bodies come back as the
//! server sent them and transport errors are returned untouched.

use crate::error::Result;
use crate::transport::{ApiRequest, QueryParams, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

const RECORDS_PATH: &str = "/records";

/// Client for the `/records` resource
#[derive(Clone)]
pub struct RecordsApi {
    transport: Arc<dyn Transport>,
}

impl RecordsApi {
    /// Create a new client over a shared transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// List records, forwarding `params` as the query string
    pub async fn get_records<T: DeserializeOwned>(&self, params: &QueryParams) -> Result<T> {
        self.call(ApiRequest::get(RECORDS_PATH).with_query(params.clone()))
            .await
    }

    /// Create a record from `record`
    pub async fn create_record<T, R>(&self, record: &R) -> Result<T>
    where
        T: DeserializeOwned,
        R: Serialize + ?Sized,
    {
        let body = serde_json::to_value(record)?;
        self.call(ApiRequest::post(RECORDS_PATH).with_body(body))
            .await
    }

    /// Replace the record with the given id
    pub async fn update_record<T, R>(&self, id: impl Display, record: &R) -> Result<T>
    where
        T: DeserializeOwned,
        R: Serialize + ?Sized,
    {
        let body = serde_json::to_value(record)?;
        self.call(ApiRequest::put(record_path(id)).with_body(body))
            .await
    }

    /// Delete the record with the given id
    pub async fn delete_record<T: DeserializeOwned>(&self, id: impl Display) -> Result<T> {
        self.call(ApiRequest::delete(record_path(id))).await
    }

    /// List grade levels that have records, forwarding `params`
    pub async fn get_grades<T: DeserializeOwned>(&self, params: &QueryParams) -> Result<T> {
        self.call(ApiRequest::get(format!("{}/grades", RECORDS_PATH)).with_query(params.clone()))
            .await
    }

    /// Fetch a single record
    pub async fn get_record<T: DeserializeOwned>(&self, id: impl Display) -> Result<T> {
        self.call(ApiRequest::get(record_path(id))).await
    }

    /// List every batch label in use
    pub async fn get_batches<T: DeserializeOwned>(&self) -> Result<T> {
        self.call(ApiRequest::get(format!("{}/batches", RECORDS_PATH)))
            .await
    }

    /// List classes that have records, forwarding `params`
    pub async fn get_classes<T: DeserializeOwned>(&self, params: &QueryParams) -> Result<T> {
        self.call(ApiRequest::get(format!("{}/classes", RECORDS_PATH)).with_query(params.clone()))
            .await
    }

    /// Per-student score summary for the records matching `filter`
    pub async fn get_summary<T, F>(&self, filter: &F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let body = serde_json::to_value(filter)?;
        self.call(ApiRequest::post(format!("{}/summary", RECORDS_PATH)).with_body(body))
            .await
    }

    /// Scores for one subject grouped by date
    ///
    /// The server rejects a filter without a subject with 400.
    pub async fn get_subject_summary<T, F>(&self, filter: &F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let body = serde_json::to_value(filter)?;
        self.call(ApiRequest::post(format!("{}/subject-summary", RECORDS_PATH)).with_body(body))
            .await
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        debug!(method = %request.method, path = %request.path, "records api call");
        let body = self.transport.send(request).await?;
        Ok(serde_json::from_value(body)?)
    }
}

fn record_path(id: impl Display) -> String {
    format!("{}/{}", RECORDS_PATH, id)
}
