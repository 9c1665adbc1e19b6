use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use talk_graph::adapters::mediawiki::MediaWikiClient;
use talk_graph::adapters::persistence::{GraphFiles, PageArchive};
use talk_graph::adapters::ui::progress::NoProgress;
use talk_graph::domain::PageClass;
use talk_graph::usecases::ScrapeService;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_wiki(server: &MockServer) {
    Mock::given(method("GET"))
        .and(query_param("list", "categorymembers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"categorymembers": [
                {"pageid": 1, "ns": 1, "title": "Talk:HIV"},
                {"pageid": 2, "ns": 1, "title": "Talk:Measles"}
            ]}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("list", "allpages"))
        .and(query_param("apprefix", "HIV/Archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"allpages": [{"pageid": 9, "ns": 1, "title": "Talk:HIV/Archive 1"}]}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("list", "allpages"))
        .and(query_param("apprefix", "Measles/Archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"allpages": []}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("prop", "revisions"))
        .and(query_param("titles", "Talk:HIV|Talk:Measles|Talk:HIV/Archive 1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": {
                "1": {"pageid": 1, "ns": 1, "title": "Talk:HIV", "revisions": [
                    {"slots": {"main": {"*": "Agree --[[User:Alice|Alice]]\n\nNo. [[User:Bob]]"}}}
                ]},
                "2": {"pageid": 2, "ns": 1, "title": "Talk:Measles", "revisions": [
                    {"slots": {"main": {"*": "Sources? [[User:Alice]] ([[User talk:Alice|talk]])"}}}
                ]},
                "9": {"pageid": 9, "ns": 1, "title": "Talk:HIV/Archive 1", "revisions": [
                    {"slots": {"main": {"*": "Old thread [[User:Carol|C]]"}}}
                ]}
            }}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("prop", "revisions"))
        .and(query_param("titles", "HIV|Measles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": {
                "11": {"pageid": 11, "ns": 0, "title": "HIV", "revisions": [
                    {"slots": {"main": {"*": "'''HIV'''"}}}
                ]},
                "12": {"pageid": 12, "ns": 0, "title": "Measles", "revisions": [
                    {"slots": {"main": {"*": "'''Measles'''"}}}
                ]}
            }}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_scrape_and_save_end_to_end() {
    let server = MockServer::start().await;
    mount_wiki(&server).await;
    let out = tempfile::tempdir().unwrap();

    let wiki = MediaWikiClient::new(
        format!("{}/w/api.php", server.uri()),
        "talk-graph-test/1.0",
        Duration::ZERO,
        0,
    )
    .unwrap();
    let archive = PageArchive::new(out.path().join("pages"));
    let service = ScrapeService::new(Arc::new(wiki), Arc::new(NoProgress), 50, 4)
        .with_archive(Arc::new(archive));
    let repo = GraphFiles::new(out.path());

    let (report, paths) = service
        .scrape_and_save(&["Category:Epidemics".to_string()], &repo)
        .await
        .unwrap();

    assert_eq!(report.info.titles, vec!["Talk:HIV", "Talk:Measles"]);
    assert_eq!(report.info.archive_titles, vec!["Talk:HIV/Archive 1"]);
    assert_eq!(report.user_link_count, 4);
    assert_eq!(report.articles.len(), 2);

    let graph = &report.graph;
    assert_eq!(graph.class_of("User:Alice"), Some(PageClass::User));
    assert_eq!(graph.class_of("Measles"), Some(PageClass::Page));
    assert!(graph.has_edge("User:Carol", "Talk:HIV"));
    assert!(graph.has_edge("User:Alice", "Talk:Measles"));
    assert!(!graph.contains("User talk:Alice"));

    let summary = graph.summary(1);
    assert_eq!(summary.users, 3);
    assert_eq!(summary.top_users, vec![("User:Alice".to_string(), 2)]);

    assert_eq!(paths.len(), 4);
    let csv = std::fs::read_to_string(out.path().join("edges.csv")).unwrap();
    assert!(csv.contains("User:Bob,Talk:HIV,posts_on"));

    let archived = PageArchive::new(out.path().join("pages"))
        .load_pages("talk")
        .await
        .unwrap();
    assert_eq!(archived.len(), 3);
}
