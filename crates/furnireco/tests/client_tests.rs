use furnireco::types::RecommendRequest;
use furnireco::{ClientConfig, RecoClient, RecommendationBackend, RequestError};
use mockito::Matcher;
use serde_json::json;

fn client_for(url: &str, timeout_secs: u64) -> RecoClient {
  RecoClient::new(ClientConfig::new(url, timeout_secs).unwrap()).unwrap()
}

fn request(query: &str) -> RecommendRequest {
  RecommendRequest { query: query.to_string(), top_k: 5 }
}

#[tokio::test]
async fn test_recommend_posts_query_and_top_k() {
  let mut server = mockito::Server::new_async().await;
  let mock = server
    .mock("POST", "/recommend")
    .match_body(Matcher::Json(json!({"query": "wooden chair", "top_k": 5})))
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(
      json!({
        "query": "wooden chair",
        "results": [
          {"id": "p1", "score": 0.912, "title": "Oak Chair", "brand": "Woodline"},
          {"metadata": {"title": "Pine Chair"}}
        ]
      })
      .to_string(),
    )
    .expect(1)
    .create_async()
    .await;

  let client = client_for(&server.url(), 5);
  let response = client.recommend(&request("wooden chair")).await.unwrap();

  assert_eq!(response.results.len(), 2);
  assert_eq!(response.results[0]["title"], "Oak Chair");
  assert_eq!(response.results[1]["metadata"]["title"], "Pine Chair");
  mock.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
  let mut server = mockito::Server::new_async().await;
  let _mock = server
    .mock("POST", "/recommend")
    .with_status(500)
    .with_body("Internal Server Error")
    .create_async()
    .await;

  let err = client_for(&server.url(), 5).recommend(&request("sofa")).await.unwrap_err();

  match err {
    RequestError::Status { status, body, .. } => {
      assert_eq!(status, 500);
      assert_eq!(body, "Internal Server Error");
    }
    other => panic!("expected status error, got {other:?}"),
  }
}

#[tokio::test]
async fn test_error_body_with_ok_status_is_an_error() {
  let mut server = mockito::Server::new_async().await;
  let _mock = server
    .mock("POST", "/recommend")
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(r#"{"error": "Pinecone query failed: index not found"}"#)
    .create_async()
    .await;

  let err = client_for(&server.url(), 5).recommend(&request("sofa")).await.unwrap_err();

  assert!(
    matches!(err, RequestError::Backend { ref message, .. } if message.contains("index not found"))
  );
}

#[tokio::test]
async fn test_body_without_results_is_malformed() {
  let mut server = mockito::Server::new_async().await;
  let _mock = server
    .mock("POST", "/recommend")
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(r#"{"message": "No results found"}"#)
    .create_async()
    .await;

  let err = client_for(&server.url(), 5).recommend(&request("sofa")).await.unwrap_err();
  assert!(matches!(err, RequestError::Decode { .. }));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
  let mut server = mockito::Server::new_async().await;
  let _mock = server
    .mock("GET", "/analytics")
    .with_status(200)
    .with_body("<html>oops</html>")
    .create_async()
    .await;

  let err = client_for(&server.url(), 5).analytics().await.unwrap_err();
  assert!(matches!(err, RequestError::Decode { .. }));
}

#[tokio::test]
async fn test_analytics_keeps_wire_order() {
  let mut server = mockito::Server::new_async().await;
  let _mock = server
    .mock("GET", "/analytics")
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(
      r#"{
        "brand_counts": {"Zeta": 9, "Alpha": 4, "Mid": 6},
        "price_bins": {"(0, 100]": 2, "(100, 500]": 11, "(500, 1000]": 5},
        "category_counts": {"Sofas": 3, "Beds": 7}
      }"#,
    )
    .create_async()
    .await;

  let aggregate = client_for(&server.url(), 5).analytics().await.unwrap();

  let brands: Vec<_> = aggregate.brand_counts.iter().collect();
  assert_eq!(brands, vec![("Zeta", 9), ("Alpha", 4), ("Mid", 6)]);
  let bins: Vec<_> = aggregate.price_bins.iter().map(|(label, _)| label).collect();
  assert_eq!(bins, vec!["(0, 100]", "(100, 500]", "(500, 1000]"]);
  assert_eq!(aggregate.category_counts.len(), 2);
}

#[tokio::test]
async fn test_analytics_keeps_price_bins_and_brand_ranking() {
  let mut server = mockito::Server::new_async().await;
  let _mock = server
    .mock("GET", "/analytics")
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(
      r#"{
        "brand_counts": {"IKEA": 40, "Ashley": 12},
        "price_bins": {"(0, 100]": 5, "(100, 500]": 9, "(500, 1000]": 3,
                       "(1000, 5000]": 2, "(5000, 10000]": 1, "(10000, 50000]": 1}
      }"#,
    )
    .create_async()
    .await;

  let aggregate = client_for(&server.url(), 5).analytics().await.unwrap();

  let brands: Vec<_> = aggregate.brand_counts.iter().map(|(label, _)| label).collect();
  assert_eq!(brands, vec!["IKEA", "Ashley"]);
  let bins: Vec<_> = aggregate.price_bins.iter().map(|(label, _)| label).collect();
  assert_eq!(
    bins,
    vec!["(0, 100]", "(100, 500]", "(500, 1000]", "(1000, 5000]", "(5000, 10000]", "(10000, 50000]"]
  );
  assert!(aggregate.category_counts.is_empty());
}

#[tokio::test]
async fn test_analytics_error_body() {
  let mut server = mockito::Server::new_async().await;
  let _mock = server
    .mock("GET", "/analytics")
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(r#"{"error": "No such file: data/intern_data_ikarus.csv"}"#)
    .create_async()
    .await;

  let err = client_for(&server.url(), 5).analytics().await.unwrap_err();
  assert!(matches!(err, RequestError::Backend { .. }));
  assert_eq!(err.endpoint(), "/analytics");
}

#[tokio::test]
async fn test_health_check_returns_message() {
  let mut server = mockito::Server::new_async().await;
  let _mock = server
    .mock("GET", "/")
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(r#"{"message": " Backend is running successfully!"}"#)
    .create_async()
    .await;

  let message = client_for(&server.url(), 5).health_check().await.unwrap();
  assert_eq!(message, "Backend is running successfully!");
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
  let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
  let url = format!("http://{}", listener.local_addr().unwrap());
  drop(listener);

  let err = client_for(&url, 5).recommend(&request("desk")).await.unwrap_err();
  assert!(matches!(err, RequestError::Transport { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_silent_backend_times_out() {
  // Accepts connections at the socket level but never answers.
  let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
  let url = format!("http://{}", listener.local_addr().unwrap());

  let err = client_for(&url, 1).analytics().await.unwrap_err();
  assert!(matches!(err, RequestError::Timeout { secs: 1, .. }), "got {err:?}");

  drop(listener);
}
