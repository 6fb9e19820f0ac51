//! Tests for the HTTP backend.
//!
//! These tests use mock servers to verify the wire format and error mapping
//! without requiring a real server connection.

use nothing_core::{Backend, BackendError, TrackId, UserProfile};
use nothing_server_client::{HttpBackend, ServerClientError, ServerConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ids(raw: &[&str]) -> Vec<TrackId> {
    raw.iter().map(|id| TrackId::new(*id)).collect()
}

async fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(ServerConfig::with_token(server.uri(), "test-token")).unwrap()
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_https_url() {
        assert!(HttpBackend::new(ServerConfig::new("https://example.com")).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        match HttpBackend::new(ServerConfig::new("  ")) {
            Err(ServerClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_missing_scheme_rejected() {
        assert!(matches!(
            HttpBackend::new(ServerConfig::new("example.com")),
            Err(ServerClientError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_trailing_slash_removed() {
        let backend = HttpBackend::new(ServerConfig::new("https://example.com/")).unwrap();
        assert_eq!(backend.url().await, "https://example.com");
    }

    #[tokio::test]
    async fn test_token_lifecycle() {
        let backend = HttpBackend::new(ServerConfig::new("https://example.com")).unwrap();
        assert!(!backend.is_authenticated().await);

        backend.set_token("abc").await;
        assert!(backend.is_authenticated().await);

        backend.clear_token().await;
        assert!(!backend.is_authenticated().await);
    }
}

// =============================================================================
// Wire Format Tests
// =============================================================================

mod wire_format {
    use super::*;

    #[tokio::test]
    async fn test_get_favorites_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/rpc/getFavorites"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["track-2", "track-1"])))
            .expect(1)
            .mount(&server)
            .await;

        let favorites = backend_for(&server).await.get_favorites().await.unwrap();

        assert_eq!(favorites, ids(&["track-2", "track-1"]));
    }

    #[tokio::test]
    async fn test_save_playlist_by_name_sends_named_arguments() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/rpc/savePlaylistByName"))
            .and(body_json(json!({"name": "Mix", "tracks": ["track-3"]})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        backend_for(&server)
            .await
            .save_playlist_by_name("Mix", ids(&["track-3"]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_save_profile_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/rpc/saveCallerUserProfile"))
            .and(body_json(json!({"profile": {"name": "Ada"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
            .expect(1)
            .mount(&server)
            .await;

        backend_for(&server)
            .await
            .save_caller_user_profile(UserProfile::new("Ada"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_profile_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/rpc/getCallerUserProfile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
            .mount(&server)
            .await;

        let profile = backend_for(&server)
            .await
            .get_caller_user_profile()
            .await
            .unwrap();

        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_set_active_playlist() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/rpc/setActivePlaylist"))
            .and(body_json(json!({"name": "Evening"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        backend_for(&server)
            .await
            .set_active_playlist("Evening")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_no_token_no_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/rpc/getPlaylistNames"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["A"])))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(ServerConfig::new(server.uri())).unwrap();
        assert_eq!(backend.get_playlist_names().await.unwrap(), vec!["A"]);

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get(&wiremock::http::HeaderName::from("authorization")).is_none());
    }
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

mod error_mapping {
    use super::*;

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = backend_for(&server).await.get_favorites().await;

        assert_eq!(result, Err(BackendError::Unauthorized));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = backend_for(&server).await.delete_playlist("Mix").await;

        assert_eq!(
            result,
            Err(BackendError::Server {
                status: 500,
                message: "boom".into()
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = backend_for(&server).await.get_active_playlist().await;

        assert!(matches!(result, Err(BackendError::Parse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Nothing listens on port 1
        let backend = HttpBackend::new(ServerConfig::new("http://127.0.0.1:1")).unwrap();

        let err = backend.get_playlist_names().await.unwrap_err();

        assert!(err.is_connectivity(), "unexpected error: {:?}", err);
    }

    #[tokio::test]
    async fn test_dropped_connection_is_unreachable() {
        // Accepts the connection, then closes it before answering
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                drop(socket);
            }
        });

        let backend = HttpBackend::new(ServerConfig::new(format!("http://{}", addr))).unwrap();
        let err = backend.save_favorites(ids(&["track-1"])).await.unwrap_err();

        assert!(
            matches!(err, BackendError::Unreachable(_)),
            "unexpected error: {:?}",
            err
        );
    }
}
