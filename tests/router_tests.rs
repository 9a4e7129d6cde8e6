//! Black-box scenarios against the public [`switchyard::Router`] façade, covering the
//! testable properties and end-to-end scenarios in the accompanying specification.

use http::{HeaderMap, Method, StatusCode};
use switchyard::{GroupScope, HandlerSpec, Request, Response, Router, RouterConfig};

fn ajax_get(path: &str) -> Request {
    let mut headers = HeaderMap::new();
    headers.insert("x-requested-with", "XMLHttpRequest".parse().unwrap());
    Request::new(Method::GET, path, headers, Vec::new())
}

// S1
#[test]
fn ping_returns_pong() {
    let mut router = Router::new();
    router
        .get("/ping", HandlerSpec::callable(|_, _, _| Response::text("pong")))
        .unwrap();

    let resp = router.dispatch(&Request::get("/ping")).unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body(), b"pong");
}

// S2
#[test]
fn constrained_segment_rejects_non_matching_path() {
    let mut router = Router::new();
    router
        .get(
            "/users/{id}",
            HandlerSpec::callable(|_, matched, _| {
                Response::text(matched.named("id").unwrap_or("").to_string())
            }),
        )
        .unwrap()
        .where_("id", r"\d+", None)
        .unwrap();

    let ok = router.dispatch(&Request::get("/users/42")).unwrap();
    assert_eq!(ok.body(), b"42");

    let not_found = router.dispatch(&Request::get("/users/abc")).unwrap();
    assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
}

// S3
#[test]
fn method_negotiation_reports_allow_in_declaration_order() {
    let mut router = Router::new();
    router
        .post("/items", HandlerSpec::callable(|_, _, _| Response::text("created")))
        .unwrap();
    router
        .get("/items", HandlerSpec::callable(|_, _, _| Response::text("listed")))
        .unwrap();

    let resp = router
        .dispatch(&Request::new(
            Method::DELETE,
            "/items",
            HeaderMap::new(),
            Vec::new(),
        ))
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        resp.headers().get(http::header::ALLOW).unwrap(),
        "POST, GET, HEAD"
    );

    let preflight = router
        .dispatch(&Request::new(
            Method::OPTIONS,
            "/items",
            HeaderMap::new(),
            Vec::new(),
        ))
        .unwrap();
    assert_eq!(preflight.status(), StatusCode::OK);
    assert_eq!(
        preflight.headers().get(http::header::ALLOW).unwrap(),
        "POST, GET, HEAD"
    );
}

// S4
#[test]
fn group_middleware_short_circuits_before_the_handler_runs() {
    use switchyard::{Middleware, Next};

    struct RejectingAuth;
    impl Middleware for RejectingAuth {
        fn handle(
            &self,
            _request: &Request,
            _matched: &switchyard::MatchResult,
            _next: Next<'_>,
        ) -> Response {
            Response::empty(StatusCode::UNAUTHORIZED)
        }
    }

    let mut router = Router::new();
    router.middlewares_mut().register("auth", RejectingAuth);
    router.group(
        GroupScope::new().prefix("/api").middleware(vec!["auth".to_string()]),
        |r| {
            r.get(
                "/me",
                HandlerSpec::callable(|_, _, _| panic!("handler must not run")),
            )
            .unwrap();
        },
    );

    let resp = router.dispatch(&Request::get("/api/me")).unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// S5
#[test]
fn optional_segment_is_absent_or_present_depending_on_the_path() {
    let mut router = Router::new();
    router
        .get(
            "/search/{?q}",
            HandlerSpec::callable(|_, matched, _| match matched.named("q") {
                Some(q) => Response::text(q.to_string()),
                None => Response::text("absent"),
            }),
        )
        .unwrap();

    let absent = router.dispatch(&Request::get("/search")).unwrap();
    assert_eq!(absent.body(), b"absent");

    let present = router.dispatch(&Request::get("/search/hello")).unwrap();
    assert_eq!(present.body(), b"hello");
}

// S6
#[test]
fn earlier_declaration_wins_when_templates_collide() {
    let mut router = Router::new();
    router
        .get("/posts/{id}", HandlerSpec::callable(|_, _, _| Response::text("first")))
        .unwrap();
    router
        .get(
            "/posts/{id}",
            HandlerSpec::callable(|_, _, _| panic!("second handler must never run")),
        )
        .unwrap();

    let resp = router.dispatch(&Request::get("/posts/1")).unwrap();
    assert_eq!(resp.body(), b"first");
}

#[test]
fn nested_groups_fold_prefix_namespace_constraints_and_middleware() {
    let mut router = Router::new();
    router.group(GroupScope::new().prefix("/api"), |outer| {
        outer.group(GroupScope::new().prefix("/v1"), |inner| {
            inner
                .get("/users", HandlerSpec::callable(|_, _, _| Response::text("ok")))
                .unwrap();
        });
    });

    assert_eq!(router.routes()[0].uri(), "/api/v1/users");
    let resp = router.dispatch(&Request::get("/api/v1/users")).unwrap();
    assert_eq!(resp.body(), b"ok");
}

#[test]
fn unmatched_path_is_404_and_ajax_requests_get_json() {
    let router = Router::new();

    let plain = router.dispatch(&Request::get("/missing")).unwrap();
    assert_eq!(plain.status(), StatusCode::NOT_FOUND);
    assert_eq!(plain.body(), b"Not found.");

    let ajax = router.dispatch(&ajax_get("/missing")).unwrap();
    assert_eq!(ajax.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_slice(ajax.body()).unwrap();
    assert_eq!(body["status"], 404);
    assert_eq!(body["ok"], false);
}

#[test]
fn case_insensitive_config_folds_literal_segments() {
    let mut router = Router::with_config(RouterConfig {
        case_sensitive: false,
        ..RouterConfig::default()
    });
    router
        .get("/Reports", HandlerSpec::callable(|_, _, _| Response::text("ok")))
        .unwrap();

    assert_eq!(router.dispatch(&Request::get("/reports")).unwrap().body(), b"ok");
    assert_eq!(router.dispatch(&Request::get("/REPORTS")).unwrap().body(), b"ok");
}

#[test]
fn explicit_options_route_is_not_overridden_by_the_auto_preflight() {
    let mut router = Router::new();
    router
        .get("/widgets", HandlerSpec::callable(|_, _, _| Response::text("listed")))
        .unwrap();
    router
        .options(
            "/widgets",
            HandlerSpec::callable(|_, _, _| Response::text("custom-preflight")),
        )
        .unwrap();

    let resp = router
        .dispatch(&Request::new(
            Method::OPTIONS,
            "/widgets",
            HeaderMap::new(),
            Vec::new(),
        ))
        .unwrap();
    assert_eq!(resp.body(), b"custom-preflight");
}
