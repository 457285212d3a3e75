//! 内容客户端集成测试：缓存、重试、查询参数与健康检查（wiremock 模拟后端）

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tokio_util::sync::CancellationToken;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use folio::content::{
        ApiStatus, ClientOptions, ContentClient, ContentError, FetchPolicy, HealthMonitor,
        ProjectFilter, QueryKind,
    };

    fn policy() -> FetchPolicy {
        FetchPolicy {
            retry_delay: Duration::ZERO,
            ..FetchPolicy::default()
        }
    }

    fn client(server: &MockServer, policy: FetchPolicy) -> ContentClient {
        ContentClient::new(ClientOptions::new(server.uri()).policy(policy)).unwrap()
    }

    fn profile_body() -> serde_json::Value {
        json!({
            "full_name": "Ada Lovelace",
            "title": "Backend Developer",
            "tagline": "Building reliable services",
            "github_url": "https://github.com/ada"
        })
    }

    fn project_body(name: &str, featured: bool) -> serde_json::Value {
        json!({
            "github_id": name,
            "name": name,
            "display_name": name,
            "github_url": format!("https://github.com/ada/{name}"),
            "primary_language": "Rust",
            "is_featured": featured,
            "stars_count": 3
        })
    }

    #[tokio::test]
    async fn test_fresh_entry_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/portfolio/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, policy());
        let first = client.profile().await.unwrap();
        let second = client.profile().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second.full_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_stale_entry_is_refetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/portfolio/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_projects": 4,
                "total_stars": 10
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(
            &server,
            FetchPolicy {
                short_stale: Duration::ZERO,
                ..policy()
            },
        );
        client.stats().await.unwrap();
        client.stats().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/portfolio/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server, policy());
        client.profile().await.unwrap();
        client.invalidate_all().await;
        assert!(client.cache().is_empty().await);
        client.profile().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalidate_kind_keeps_other_queries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/portfolio/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/portfolio/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projects": [],
                "total_count": 0
            })))
            .expect(4)
            .mount(&server)
            .await;

        let client = client(&server, policy());
        let all = ProjectFilter::default();
        let featured = ProjectFilter::default().featured_only();
        client.profile().await.unwrap();
        client.projects(&all).await.unwrap();
        client.projects(&featured).await.unwrap();

        assert_eq!(client.invalidate_kind(QueryKind::Projects).await, 2);
        assert_eq!(client.cache().len().await, 1);
        client.profile().await.unwrap();
        client.projects(&all).await.unwrap();
        client.projects(&featured).await.unwrap();
    }

    #[tokio::test]
    async fn test_single_failure_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/portfolio/experience"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/portfolio/experience"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "company_name": "Analytical Engines",
                "role_title": "Engineer",
                "start_date": "2021-03-01",
                "is_current": true
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, policy());
        let experience = client.experience().await.unwrap();
        assert_eq!(experience.len(), 1);
        assert_eq!(experience[0].company_name, "Analytical Engines");
    }

    #[tokio::test]
    async fn test_second_failure_surfaces_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/portfolio/profile"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server, policy());
        let err = client.profile().await.unwrap_err();
        assert!(matches!(err, ContentError::Status { status: 500, .. }));
        assert!(client.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/portfolio/certificates"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server, policy());
        let err = client.certificates().await.unwrap_err();
        assert!(matches!(err, ContentError::Decode(_)));
    }

    #[tokio::test]
    async fn test_project_filter_becomes_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/portfolio/projects"))
            .and(query_param("featured_only", "true"))
            .and(query_param("category", "backend"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projects": [project_body("relay", true)],
                "total_count": 1,
                "featured_count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, policy());
        let filter = ProjectFilter::default().category("backend").featured_only();
        let list = client.projects(&filter).await.unwrap();
        assert_eq!(list.total_count, 1);
        assert!(list.projects[0].is_featured);
        // 同一过滤条件命中缓存
        client.projects(&filter).await.unwrap();
    }

    #[tokio::test]
    async fn test_featured_projects_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/portfolio/projects/featured"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([project_body("folio", true), project_body("relay", true)])),
            )
            .mount(&server)
            .await;

        let client = client(&server, policy());
        let featured = client.featured_projects().await.unwrap();
        let names: Vec<_> = featured.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["folio", "relay"]);
    }

    #[tokio::test]
    async fn test_health_is_served_from_origin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "healthy",
                "version": "1.2.0",
                "database": "connected"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = ContentClient::new(
            ClientOptions::new(format!("{}/api/v1", server.uri())).policy(policy()),
        )
        .unwrap();
        // 健康检查不走缓存
        assert!(client.health().await.unwrap().is_healthy());
        assert_eq!(client.health().await.unwrap().version, "1.2.0");
    }

    #[tokio::test]
    async fn test_health_monitor_reports_connected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "healthy",
                "version": "2.0.1"
            })))
            .mount(&server)
            .await;

        let client = Arc::new(client(&server, policy()));
        let shutdown = CancellationToken::new();
        let monitor = HealthMonitor::spawn(client, Duration::from_secs(30), shutdown.clone());
        let mut rx = monitor.subscribe();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.is_connected()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(monitor.status().label(), "Connected • v2.0.1");

        shutdown.cancel();
        monitor.join().await;
    }

    #[tokio::test]
    async fn test_health_monitor_reports_offline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = Arc::new(client(&server, policy()));
        let shutdown = CancellationToken::new();
        let monitor = HealthMonitor::spawn(client, Duration::from_secs(30), shutdown.clone());
        let mut rx = monitor.subscribe();
        tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| *s == ApiStatus::Offline),
        )
        .await
        .unwrap()
        .unwrap();

        shutdown.cancel();
        monitor.join().await;
    }
}
