//! Overlapping requests: out-of-order responses must never overwrite state
//! for a newer key, and overlapping adds must not duplicate an entry.
#![allow(clippy::unwrap_used)]
#![allow(clippy::future_not_send)]
#![allow(clippy::indexing_slicing)]

use std::rc::Rc;
use std::time::Duration;

use reelview_api::catalog::{CatalogClient, ContentId, LocalCatalogApi, Profile, ProfileId};
use reelview_api::mock::MockCatalog;
use reelview_core::{HomeView, ListAction, SearchUnit};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Rc<CatalogClient> {
    Rc::new(
        CatalogClient::builder()
            .base_url(Url::parse(&server.uri()).unwrap())
            .user_agent("reelview-test/0.1")
            .build()
            .unwrap(),
    )
}

fn items_json(id: u32, title: &str) -> String {
    format!(
        r#"[{{"id": {id}, "title": "{title}", "image": "{id}.jpg", "type": "series", "year": "2023", "genre": []}}]"#
    )
}

fn profile(id: &str, name: &str) -> Profile {
    Profile {
        id: ProfileId::from(id),
        name: String::from(name),
        avatar: String::new(),
        is_kids: false,
    }
}

async fn mount_delayed(server: &MockServer, url_path: &str, body: String, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_slow_earlier_search_does_not_replace_later_results() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/content/search"))
        .and(query_param("q", "stranger"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(items_json(25, "Stranger Things"))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/content/search"))
        .and(query_param("q", "witcher"))
        .respond_with(ResponseTemplate::new(200).set_body_string(items_json(1, "The Witcher")))
        .expect(1)
        .mount(&server)
        .await;
    let unit = SearchUnit::new(client_for(&server));

    // Act
    let later = async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        unit.search("witcher").await;
    };
    futures::join!(unit.search("stranger"), later);

    // Assert
    let state = unit.state();
    assert_eq!(state.query, "witcher");
    assert_eq!(state.results.len(), 1);
    assert_eq!(state.results[0].title, "The Witcher");
    assert!(!state.loading);
}

#[tokio::test]
async fn test_slow_profile_response_does_not_replace_newer_profile() {
    // Arrange
    let server = MockServer::start().await;
    mount_delayed(&server, "/api/users/1/my-list", items_json(25, "Stranger Things"), 300).await;
    mount_delayed(&server, "/api/users/1/continue-watching", items_json(8, "The Crown"), 300).await;
    mount_delayed(&server, "/api/users/2/my-list", items_json(9, "Ozark"), 0).await;
    mount_delayed(&server, "/api/users/2/continue-watching", items_json(12, "Money Heist"), 0).await;
    let view = HomeView::new(client_for(&server), Vec::<String>::new());

    // Act
    let switch = async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        view.select_profile(profile("2", "Sarah")).await;
    };
    futures::join!(view.select_profile(profile("1", "John")), switch);

    // Assert
    assert_eq!(view.current_profile().unwrap().name, "Sarah");
    let my_list = view.my_list().data().unwrap();
    assert_eq!(my_list.len(), 1);
    assert_eq!(my_list[0].title, "Ozark");
    let watching = view.continue_watching().data().unwrap();
    assert_eq!(watching.len(), 1);
    assert_eq!(watching[0].title, "Money Heist");
}

#[tokio::test]
async fn test_overlapping_adds_send_one_request() {
    // Arrange
    let server = MockServer::start().await;
    mount_delayed(&server, "/api/users/1/my-list", String::from("[]"), 0).await;
    mount_delayed(&server, "/api/users/1/continue-watching", String::from("[]"), 0).await;
    Mock::given(method("POST"))
        .and(path("/api/users/1/my-list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"message": "Added to my list successfully"}"#)
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let view = HomeView::new(client_for(&server), Vec::<String>::new());
    view.select_profile(profile("1", "John")).await;
    let witcher = MockCatalog::seeded()
        .content_details(&ContentId::from(1))
        .await
        .unwrap()
        .unwrap();

    // Act
    let (first, second) = futures::join!(
        view.add_to_my_list(&witcher),
        view.add_to_my_list(&witcher),
    );

    // Assert
    assert_eq!(first, ListAction::Added);
    assert_eq!(second, ListAction::AlreadyListed);
    let posts = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.method.as_str() == "POST")
        .count();
    assert_eq!(posts, 1);
}
