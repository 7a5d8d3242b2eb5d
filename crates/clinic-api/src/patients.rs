//! Patient record endpoints

use std::sync::Arc;

use tracing::debug;

use clinic_http::{ApiTransport, Request};

use crate::error::{ApiError, Result};
use crate::models::{ApiMessage, Paginated, PatientPayload, PatientRecord, PatientSummary};
use crate::query::{PageQuery, SearchQuery};

/// CRUD operations over patient records
pub struct PatientsApi {
    transport: Arc<dyn ApiTransport>,
}

impl PatientsApi {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Page through the patients table
    pub async fn list(&self, query: &PageQuery) -> Result<Paginated<PatientSummary>> {
        let path = format!("/patients/patients?{}", query.query_string());
        debug!(%path, "listing patients");
        self.fetch(Request::get(path)).await
    }

    /// Page through patients matching a search term
    pub async fn search(&self, query: &SearchQuery) -> Result<Paginated<PatientSummary>> {
        let path = format!("/patients/patients/search?{}", query.query_string());
        debug!(%path, "searching patients");
        self.fetch(Request::get(path)).await
    }

    /// Full record of one patient, documents and latest admission included
    pub async fn detail(&self, patient_id: i64) -> Result<PatientRecord> {
        self.fetch(Request::get(format!(
            "/patients/patients/detail/{patient_id}"
        )))
        .await
    }

    /// Register a new patient
    pub async fn create(&self, payload: &PatientPayload) -> Result<ApiMessage> {
        self.fetch(Request::post("/patients/patients").json(payload)?)
            .await
    }

    /// Update an existing patient record
    pub async fn update(&self, patient_id: i64, payload: &PatientPayload) -> Result<ApiMessage> {
        self.fetch(Request::put(format!("/patients/patients/{patient_id}")).json(payload)?)
            .await
    }

    /// Remove a patient record
    pub async fn delete(&self, patient_id: i64) -> Result<ApiMessage> {
        self.fetch(Request::delete(format!(
            "/patients/delete/patients/{patient_id}"
        )))
        .await
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, request: Request) -> Result<T> {
        let value = self.transport.dispatch(request).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
