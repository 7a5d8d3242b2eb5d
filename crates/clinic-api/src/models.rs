//! Wire models for the clinic backend
//!
//! Field names on the wire are the backend's contract (French, snake_case);
//! Rust-side names are mapped with serde renames. Timestamps come back as
//! naive ISO datetimes, the format the gateway's services emit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use clinic_session::TokenPair;

/// Generic success envelope used by mutating endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

/// Login form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Login exchange response
///
/// The gateway answers with a bare success envelope (credentials travel in
/// cookies); older deployments return the token pair in the body. Both
/// shapes parse here.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub tokens: Option<TokenPair>,
}

/// Response of the current-user endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub role: String,
}

/// Paginated list envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
}

/// One row of the patients table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    #[serde(rename = "id_patient")]
    pub id: i64,
    #[serde(rename = "civilite")]
    pub civility: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "date_de_naissance")]
    pub birth_date: NaiveDateTime,
    #[serde(rename = "telephone")]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Payload for creating or updating a patient record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientPayload {
    #[serde(rename = "civilite")]
    pub civility: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "date_de_naissance")]
    pub birth_date: NaiveDateTime,
    #[serde(rename = "adresse")]
    pub address: String,
    #[serde(rename = "code_postal")]
    pub postal_code: String,
    #[serde(rename = "ville")]
    pub city: String,
    #[serde(rename = "telephone")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Full patient record returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "id_patient")]
    pub id: i64,
    #[serde(flatten)]
    pub payload: PatientPayload,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    #[serde(default)]
    pub latest_admission: Option<Admission>,
}

/// A patient's admission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    #[serde(rename = "id_admission")]
    pub id: i64,
    #[serde(rename = "entree_le")]
    pub admitted_at: NaiveDateTime,
    #[serde(rename = "ambulatoire")]
    pub outpatient: bool,
    #[serde(rename = "sorti_le")]
    pub discharged_at: Option<NaiveDateTime>,
    #[serde(rename = "sortie_prevue_le")]
    pub planned_discharge_at: Option<NaiveDateTime>,
    #[serde(rename = "ref_chambre")]
    pub room_ref: String,
    #[serde(rename = "nom_chambre")]
    pub room_name: Option<String>,
}

/// An uploaded administrative document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(rename = "id_document")]
    pub id: i64,
    #[serde(rename = "nom_fichier")]
    pub file_name: String,
    #[serde(rename = "type_document")]
    pub kind: DocumentKind,
    pub created_at: NaiveDateTime,
}

/// Administrative document types accepted by the upload endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    HealthInsuranceCardCertificate,
    AuthorizationForCare,
    AuthorizationForTreatment,
    AuthorizationForVisit,
    AuthorizationForOvernightStay,
    AuthorizationForDeparture,
    AuthorizationForDisconnection,
    #[serde(other)]
    Miscellaneous,
}

impl DocumentKind {
    /// Wire name sent in the upload form's `document_type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::HealthInsuranceCardCertificate => "health_insurance_card_certificate",
            DocumentKind::AuthorizationForCare => "authorization_for_care",
            DocumentKind::AuthorizationForTreatment => "authorization_for_treatment",
            DocumentKind::AuthorizationForVisit => "authorization_for_visit",
            DocumentKind::AuthorizationForOvernightStay => "authorization_for_overnight_stay",
            DocumentKind::AuthorizationForDeparture => "authorization_for_departure",
            DocumentKind::AuthorizationForDisconnection => "authorization_for_disconnection",
            DocumentKind::Miscellaneous => "miscellaneous",
        }
    }
}

/// A care service and its rooms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "chambres", default)]
    pub rooms: Vec<Room>,
}

/// A room within a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    #[serde(rename = "numero")]
    pub number: i64,
    pub status: String,
    #[serde(default)]
    pub last_freed: Option<NaiveDateTime>,
    #[serde(rename = "last_occuped", default)]
    pub last_occupied: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_cleanup: Option<NaiveDateTime>,
}
