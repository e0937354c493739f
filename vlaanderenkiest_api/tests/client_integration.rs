use std::time::Duration;

use vlaanderenkiest_api::{Client, Endpoints, Error};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn client_for(server: &MockServer) -> Client {
    Client::with_endpoints(Endpoints::with_base_url(&server.uri()), Duration::from_secs(5))
        .unwrap()
}

#[tokio::test]
async fn fetch_party_lists_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("party_lists.json");

    Mock::given(method("GET"))
        .and(path("/11001/entiteitLijsten.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.fetch(&client.endpoints().party_lists("11001")).await;
    assert!(result.is_ok());
    assert_eq!(result.unwrap(), body);
}

#[tokio::test]
async fn candidate_list_url_hits_party_path() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("candidate_list.json");

    Mock::given(method("GET"))
        .and(path("/11001/1/lijst.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .fetch(&client.endpoints().candidate_list("11001", 1))
        .await
        .unwrap();
    assert!(result.contains("Janssens Anna"));
}

#[tokio::test]
async fn candidate_results_url_hits_party_path() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("candidate_results.json");

    Mock::given(method("GET"))
        .and(path("/11001/1/uitslag.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .fetch(&client.endpoints().candidate_results("11001", 1))
        .await
        .unwrap();
    assert!(result.contains("\"kd\""));
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/11001/entiteitLijsten.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.fetch(&client.endpoints().party_lists("11001")).await;
    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_json_is_returned_unparsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/11001/entiteitLijsten.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.fetch(&client.endpoints().party_lists("11001")).await;
    assert_eq!(result.unwrap(), "{not valid json}");
}

#[tokio::test]
async fn invalid_url_is_rejected() {
    let client = Client::with_endpoints(Endpoints::new(), Duration::from_secs(5)).unwrap();
    let result = client.fetch("not a url").await;
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}
