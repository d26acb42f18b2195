// Session cookie payload encoding
//
// The cookie value is the JSON-serialized `SessionUser`; integrity comes
// from the signed cookie jar in the API crate, not from this module.

use crate::errors::SessionError;
use crate::models::SessionUser;

impl SessionUser {
    /// Serialize the session payload for storage in the cookie value.
    pub fn encode(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(|e| SessionError::EncodeFailed(e.to_string()))
    }

    /// Parse a cookie value back into a session payload. Fails on anything
    /// that is not a well-formed payload, which callers treat as "no session".
    pub fn decode(value: &str) -> Result<Self, SessionError> {
        serde_json::from_str(value).map_err(|e| SessionError::InvalidPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_session_payload_round_trip() {
        let session = SessionUser {
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
        };

        let encoded = session.encode().expect("encode");
        let decoded = SessionUser::decode(&encoded).expect("decode");
        assert_eq!(decoded, session);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(SessionUser::decode("").is_err());
        assert!(SessionUser::decode("not json").is_err());
        assert!(SessionUser::decode(r#"{"user_id": "nope"}"#).is_err());
    }
}
