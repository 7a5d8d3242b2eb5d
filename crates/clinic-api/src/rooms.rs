//! Room and service endpoints

use std::sync::Arc;

use tracing::debug;

use clinic_http::{ApiTransport, Request};

use crate::error::{ApiError, Result};
use crate::models::{Room, Service};

/// Care services and room availability
pub struct RoomsApi {
    transport: Arc<dyn ApiTransport>,
}

impl RoomsApi {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// All care services with their rooms
    pub async fn services(&self) -> Result<Vec<Service>> {
        let value = self
            .transport
            .dispatch(Request::get("/chambres/services"))
            .await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// First free room of a service
    pub async fn available_room(&self, service_id: i64) -> Result<Room> {
        debug!(service_id, "looking up a free room");
        let value = self
            .transport
            .dispatch(Request::get(format!(
                "/chambres/chambres?service_id={service_id}"
            )))
            .await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_services_parses_list() {
        let transport = Arc::new(StubTransport::replying(json!([
            {"id": 1, "nom": "Cardiologie", "chambres": []},
            {"id": 2, "nom": "Pediatrie", "chambres": [
                {"id": 7, "numero": 201, "status": "libre",
                 "last_freed": null, "last_occuped": null, "last_cleanup": null}
            ]}
        ])));
        let api = RoomsApi::new(transport.clone());

        let services = api.services().await.unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[1].rooms[0].number, 201);
        assert_eq!(transport.requests()[0].path, "/chambres/services");
    }

    #[tokio::test]
    async fn test_available_room_passes_service_id() {
        let transport = Arc::new(StubTransport::replying(json!({
            "id": 7, "numero": 201, "status": "libre",
            "last_freed": null, "last_occuped": null, "last_cleanup": null
        })));
        let api = RoomsApi::new(transport.clone());

        let room = api.available_room(2).await.unwrap();
        assert_eq!(room.id, 7);
        assert_eq!(
            transport.requests()[0].path,
            "/chambres/chambres?service_id=2"
        );
    }
}
