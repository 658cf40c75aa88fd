use docroot::http::request::{Method, Request};
use std::collections::HashMap;

fn request(method: Method, path: &str) -> Request {
    Request {
        method,
        path: path.to_string(),
        version: "HTTP/1.1".to_string(),
        headers: HashMap::new(),
    }
}

#[test]
fn test_request_header_retrieval() {
    let mut headers = HashMap::new();
    headers.insert("Host".to_string(), "example.com".to_string());
    headers.insert("Accept".to_string(), "text/html".to_string());

    let req = Request {
        method: Method::GET,
        path: "/".to_string(),
        version: "HTTP/1.1".to_string(),
        headers,
    };

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("Accept"), Some("text/html"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_header_lookup_is_exact() {
    let mut req = request(Method::GET, "/");
    req.headers.insert("Host".to_string(), "example.com".to_string());

    assert_eq!(req.header("host"), None);
}

#[test]
fn test_method_parse_known() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
    ];

    for (name, expected) in methods {
        let method = Method::parse(name);
        assert_eq!(method, expected);
        assert_eq!(method.as_str(), name);
    }
}

#[test]
fn test_method_parse_is_case_sensitive() {
    assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    assert_eq!(Method::parse("get").to_string(), "get");
}

#[test]
fn test_is_get() {
    let get = request(Method::GET, "/");
    let head = request(Method::HEAD, "/");

    assert!(get.is_get());
    assert!(!head.is_get());
}

#[test]
fn test_other_method_is_not_get() {
    let req = request(Method::Other("BREW".to_string()), "/pot");

    assert!(!req.is_get());
    assert_eq!(req.method.to_string(), "BREW");
}
