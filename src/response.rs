use serde::Serialize;
use utoipa::ToSchema;

/// Envelope returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiResponse;

    #[test]
    fn envelope_has_message_and_data() {
        let body = ApiResponse::success("Found", vec![1, 2]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Found", "data": [1, 2] }));
    }

    #[test]
    fn empty_envelope_serializes_null_data() {
        let body: ApiResponse<()> = ApiResponse::empty("Deleted");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Deleted", "data": null }));
    }
}
