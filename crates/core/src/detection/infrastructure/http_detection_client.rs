use crate::detection::domain::detection_client::{ClientError, DetectionClient};
use crate::detection::domain::face_geometry::DetectionResponse;

/// Blocking HTTP client for the detection endpoint.
///
/// Error statuses still carry a JSON body, so the status code is not
/// treated as a failure here; only unreachable hosts and unparseable
/// bodies are. Requests wait for the service as long as it takes.
#[derive(Clone, Debug)]
pub struct HttpDetectionClient {
    client: reqwest::blocking::Client,
}

impl HttpDetectionClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder().timeout(None).build()?;
        Ok(Self { client })
    }
}

impl DetectionClient for HttpDetectionClient {
    fn fetch(&self, target: &str) -> Result<DetectionResponse, ClientError> {
        log::debug!("GET {target}");
        let response = self
            .client
            .get(target)
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            log::warn!("Unparseable detection response (HTTP {status}): {e}");
            ClientError::Parse(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_geometry::DetectionOutcome;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// The blocking client runs off the async test runtime.
    async fn fetch(target: String) -> Result<DetectionResponse, ClientError> {
        tokio::task::spawn_blocking(move || HttpDetectionClient::new().unwrap().fetch(&target))
            .await
            .unwrap()
    }

    async fn serve(status: u16, route: &str, body: &[u8], mime: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_raw(body.to_vec(), mime))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_fetch_faces() {
        let body = br#"{"faces":[{"bounds":{"x":1,"y":2,"width":3,"height":4},
            "right_eye":{"x":0,"y":0,"scale":1},"left_eye":{"x":0,"y":0,"scale":1},
            "mouth":{"x":0,"y":0,"width":0,"height":0}}]}"#;
        let server = serve(200, "/v1/facedetection/aGk=", body, "application/json").await;

        let response = fetch(format!("{}/v1/facedetection/aGk=", server.uri()))
            .await
            .unwrap();

        assert_eq!(response.faces.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_body_is_still_parsed() {
        let body = br#"{"error":{"message":"bad input data","code":400}}"#;
        let server = serve(400, "/v1/facedetection/x", body, "application/json").await;

        let response = fetch(format!("{}/v1/facedetection/x", server.uri()))
            .await
            .unwrap();

        assert_eq!(
            DetectionOutcome::from(response),
            DetectionOutcome::Error("bad input data".into())
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_error() {
        let server = serve(502, "/v1/facedetection/x", b"<h1>Bad Gateway</h1>", "text/html").await;

        let err = fetch(format!("{}/v1/facedetection/x", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Parse(_)));
        assert!(err.to_string().starts_with("request failed"));
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();

        let err = HttpDetectionClient::new()
            .unwrap()
            .fetch(&format!("http://{addr}/v1/facedetection/x"))
            .unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
    }
}
