//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use serde::Deserialize;

    use crate::parser::{
        decode_body, parse_query_string, parse_request_line, read_body, read_headers,
        read_request_line, urldecode_plus, Body, Error, Headers, HttpRequest, HttpVersion, Method,
    };

    fn save(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_request_line_method_target_version() {
        let line = parse_request_line(b"GET /foo HTTP/1.1").unwrap();
        assert_eq!(line.method, Method::GET);
        assert_eq!(line.path, "/foo");
        assert_eq!(line.query_string, "");
        assert_eq!(line.version, HttpVersion { major: 1, minor: 1 });
    }

    #[test]
    fn test_parse_request_line_splits_query_on_first_question_mark() {
        let line = parse_request_line(b"POST /a/b?x=1?y=2 HTTP/1.0\r\n").unwrap();
        assert_eq!(line.path, "/a/b");
        assert_eq!(line.query_string, "x=1?y=2");
        assert_eq!(line.version, HttpVersion::HTTP_10);
    }

    #[test]
    fn test_parse_request_line_empty() {
        assert!(matches!(parse_request_line(b""), Err(Error::EmptyRequest)));
        assert!(matches!(parse_request_line(b"\r\n"), Err(Error::EmptyRequest)));
    }

    #[test]
    fn test_parse_request_line_bad_method() {
        let result = parse_request_line(b"GOT / HTTP/1.0");
        assert!(matches!(result, Err(Error::InvalidMethod(ref m)) if m == "GOT"));
        assert!(parse_request_line(b"get / HTTP/1.0").is_err());
    }

    #[test]
    fn test_parse_request_line_bad_version() {
        for raw in [&b"GET / HTTP/"[..], b"GET / HTTP/1", b"GET / HTTP/.1", b"GET / HTTP/1.", b"GET / FTP/1.0", b"GET / HTTP/+1.0"] {
            assert!(
                matches!(parse_request_line(raw), Err(Error::InvalidVersion(_))),
                "{:?} should be rejected",
                String::from_utf8_lossy(raw)
            );
        }
    }

    #[test]
    fn test_parse_request_line_any_numeric_version() {
        let line = parse_request_line(b"GET / HTTP/9.9").unwrap();
        assert_eq!(line.version, HttpVersion { major: 9, minor: 9 });
        assert_eq!(line.version.to_string(), "HTTP/9.9");
    }

    #[test]
    fn test_parse_request_line_no_target() {
        assert!(matches!(parse_request_line(b"GET HTTP/1.1"), Err(Error::MalformedRequestLine(_))));
        assert!(matches!(parse_request_line(b"GET  HTTP/1.1"), Err(Error::InvalidPath)));
    }

    #[test]
    fn test_parse_request_line_bad_spaces() {
        assert!(parse_request_line(b"GET /  HTTP/1.1").is_err());
        assert!(parse_request_line(b"GET  / HTTP/1.1").is_err());
        assert!(parse_request_line(b" / HTTP/1.1").is_err());
        assert!(parse_request_line(b"GET / ").is_err());
        assert!(parse_request_line(b"\t\t").is_err());
    }

    #[test]
    fn test_parse_request_line_wrong_token_count() {
        assert!(matches!(parse_request_line(b"GET"), Err(Error::MalformedRequestLine(_))));
        assert!(matches!(parse_request_line(b"GET /"), Err(Error::MalformedRequestLine(_))));
        assert!(matches!(
            parse_request_line(b"GET / HTTP/1.0 extra"),
            Err(Error::MalformedRequestLine(_))
        ));
    }

    #[test]
    fn test_parse_request_line_invalid_utf8() {
        assert!(matches!(
            parse_request_line(b"GET /\xff HTTP/1.0"),
            Err(Error::MalformedRequestLine(_))
        ));
    }

    #[tokio::test]
    async fn test_read_request_line_skips_blank_lines() {
        let mut input: &[u8] = b"\n\r\n\r\n\nGET /?a=a HTTP/1.1\r\nHost: x\r\n\r\n";
        let line = read_request_line(&mut input, 1024).await.unwrap();
        assert_eq!(line.method, Method::GET);
        assert_eq!(line.path, "/");
        assert_eq!(line.query_string, "a=a");
        // The header block is left unread.
        assert_eq!(input, b"Host: x\r\n\r\n");
    }

    #[tokio::test]
    async fn test_read_request_line_at_end_of_stream() {
        let mut input: &[u8] = b"";
        let result = read_request_line(&mut input, 1024).await;
        assert!(matches!(result, Err(Error::EmptyRequest)));
    }

    #[tokio::test]
    async fn test_read_request_line_too_long() {
        let mut input: &[u8] = b"GET /aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa HTTP/1.0\r\n";
        let result = read_request_line(&mut input, 16).await;
        assert!(matches!(result, Err(Error::LineTooLong(16))));
    }

    #[tokio::test]
    async fn test_read_headers_simple() {
        let mut input: &[u8] = b"Host: google.com\r\n\r\n";
        let headers = read_headers(&mut input, &save(&["Host"]), 1024).await.unwrap();
        assert_eq!(headers.get("Host").unwrap(), "google.com");
    }

    #[tokio::test]
    async fn test_read_headers_trims_values() {
        let mut input: &[u8] = b"Host:\t  google.com   \r\nEmpty:\r\n\r\n";
        let headers = read_headers(&mut input, &save(&["host", "empty"]), 1024).await.unwrap();
        assert_eq!(headers.get("host").unwrap(), "google.com");
        assert_eq!(headers.get("empty").unwrap(), "");
    }

    #[tokio::test]
    async fn test_read_headers_filters_by_save_list() {
        let mut input: &[u8] =
            b"Host: google.com\r\nJunk: you    blah\r\nContent-type:      file\r\n\r\nBODY";
        let headers = read_headers(&mut input, &save(&["Host", "Content-Type"]), 1024)
            .await
            .unwrap();

        let mut expected = Headers::new();
        expected.insert("Host".to_string(), "google.com".to_string());
        expected.insert("Content-Type".to_string(), "file".to_string());
        assert_eq!(headers, expected);
        assert_eq!(input, b"BODY");
    }

    #[tokio::test]
    async fn test_read_headers_last_value_wins() {
        let mut input: &[u8] = b"X-Token: one\r\nx-token: two\r\n\r\n";
        let headers = read_headers(&mut input, &save(&["X-Token"]), 1024).await.unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-Token").unwrap(), "two");
    }

    #[tokio::test]
    async fn test_read_headers_accepts_bare_lf() {
        let mut input: &[u8] = b"Host: a\n\n";
        let headers = read_headers(&mut input, &save(&["Host"]), 1024).await.unwrap();
        assert_eq!(headers.get("Host").unwrap(), "a");
    }

    #[tokio::test]
    async fn test_read_headers_missing_colon() {
        let mut input: &[u8] = b"InvalidHeader\r\n\r\n";
        let result = read_headers(&mut input, &[], 1024).await;
        assert!(matches!(result, Err(Error::InvalidHeaderFormat)));
    }

    #[tokio::test]
    async fn test_read_headers_truncated_stream() {
        let mut input: &[u8] = b"Host: a\r\n";
        let result = read_headers(&mut input, &[], 1024).await;
        assert!(matches!(result, Err(Error::InvalidHeaderFormat)));
    }

    #[test]
    fn test_urldecode_plus() {
        let runs = [
            ("abc%20def", "abc def"),
            ("abc%%20def", "abc% def"),
            ("%%%", "%%%"),
            ("%20%20", "  "),
            ("abc", "abc"),
            ("a%25%25%25c", "a%%%c"),
            ("a++b", "a  b"),
            ("+%25+", " % "),
            ("+%2B+", " + "),
            ("%20+%2B+%41", "  + A"),
            ("trailing%", "trailing%"),
            ("short%4", "short%4"),
            ("%zz", "%zz"),
            ("caf%C3%A9", "café"),
        ];
        for (input, expected) in runs {
            assert_eq!(urldecode_plus(input), expected, "decoding {input:?}");
        }
    }

    #[test]
    fn test_parse_query_string() {
        let runs: [(&str, &[(&str, &str)]); 7] = [
            ("k1=v2", &[("k1", "v2")]),
            ("k1=v2&k11=v11", &[("k1", "v2"), ("k11", "v11")]),
            ("k1=v2&k11=", &[("k1", "v2"), ("k11", "")]),
            ("k1=+%20", &[("k1", "  ")]),
            ("%6b1=+%20", &[("k1", "  ")]),
            ("k1=%3d1", &[("k1", "=1")]),
            ("11=22%26&%3d=%3d", &[("11", "22&"), ("=", "=")]),
        ];
        for (input, pairs) in runs {
            let expected: HashMap<String, String> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            assert_eq!(parse_query_string(input), expected, "parsing {input:?}");
        }
    }

    #[test]
    fn test_parse_query_string_key_without_value() {
        let parsed = parse_query_string("flag&x=1&");
        assert_eq!(parsed.get("flag").unwrap(), "");
        assert_eq!(parsed.get("x").unwrap(), "1");
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_decode_body_by_content_type() {
        let json = decode_body(Some("application/json; charset=utf-8"), br#"{"a":1}"#.to_vec()).unwrap();
        assert_eq!(json, Body::Json(serde_json::json!({"a": 1})));

        let form = decode_body(Some("application/x-www-form-urlencoded"), b"a=1&b=x+y".to_vec()).unwrap();
        let Body::Form(fields) = form else { panic!("expected form body") };
        assert_eq!(fields.get("b").unwrap(), "x y");

        let raw = decode_body(Some("text/plain"), b"hello".to_vec()).unwrap();
        assert_eq!(raw, Body::Raw(b"hello".to_vec()));

        let untyped = decode_body(None, b"hello".to_vec()).unwrap();
        assert_eq!(untyped, Body::Raw(b"hello".to_vec()));
    }

    #[test]
    fn test_decode_body_invalid_json() {
        let result = decode_body(Some("application/json"), b"{not json".to_vec());
        assert!(matches!(result, Err(Error::JsonError(_))));
    }

    fn body_headers(length: &str, content_type: &str) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Length".to_string(), length.to_string());
        headers.insert("Content-Type".to_string(), content_type.to_string());
        headers
    }

    #[tokio::test]
    async fn test_read_body_exact_length() {
        let mut input: &[u8] = b"{\"name\":\"x\"}TRAILING";
        let headers = body_headers("12", "application/json");
        let body = read_body(&mut input, &headers, 1024).await.unwrap();
        assert_eq!(body, Body::Json(serde_json::json!({"name": "x"})));
        assert_eq!(input, b"TRAILING");
    }

    #[tokio::test]
    async fn test_read_body_too_large() {
        let mut input: &[u8] = b"0123456789";
        let headers = body_headers("10", "text/plain");
        let result = read_body(&mut input, &headers, 4).await;
        assert!(matches!(result, Err(Error::PayloadTooLarge { size: 10, limit: 4 })));
    }

    #[tokio::test]
    async fn test_read_body_invalid_length() {
        let mut input: &[u8] = b"";
        let headers = body_headers("ten", "text/plain");
        let result = read_body(&mut input, &headers, 1024).await;
        assert!(matches!(result, Err(Error::InvalidContentLength(_))));
    }

    #[tokio::test]
    async fn test_read_body_incomplete() {
        let mut input: &[u8] = b"abc";
        let headers = body_headers("8", "text/plain");
        let result = read_body(&mut input, &headers, 1024).await;
        assert!(matches!(result, Err(Error::IncompleteBody { expected: 8, received: 3 })));
    }

    #[tokio::test]
    async fn test_read_body_without_content_length() {
        let mut input: &[u8] = b"ignored";
        let body = read_body(&mut input, &Headers::new(), 1024).await.unwrap();
        assert_eq!(body, Body::Empty);
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct User {
        name: String,
        age: u32,
    }

    #[test]
    fn test_request_helpers() {
        let line = parse_request_line(b"POST /users?page=2&q=a+b HTTP/1.0").unwrap();
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let mut request = HttpRequest::new(line, headers);
        request.body = Body::Json(serde_json::json!({"name": "Ada", "age": 36}));
        request.path_params = vec![("uid".to_string(), "7".to_string())];

        assert!(request.has_header("content-type"));
        assert_eq!(request.get_header("CONTENT-TYPE").unwrap(), "application/json");
        assert!(!request.has_header("Host"));
        assert_eq!(request.get_query_param("q").unwrap(), "a b");
        assert!(request.has_query_param("page"));
        assert_eq!(request.path_param("uid"), Some("7"));
        assert!(request.is_json());
        assert_eq!(request.json::<User>().unwrap(), User { name: "Ada".to_string(), age: 36 });
        assert!(request.form().is_none());
    }

    #[test]
    fn test_request_json_without_body() {
        let line = parse_request_line(b"GET / HTTP/1.0").unwrap();
        let request = HttpRequest::new(line, Headers::new());
        assert!(matches!(request.json::<User>(), Err(Error::InvalidBody(_))));
    }

    #[test]
    fn test_unimplemented_methods() {
        assert!(Method::CONNECT.is_unimplemented());
        assert!(Method::OPTIONS.is_unimplemented());
        assert!(Method::TRACE.is_unimplemented());
        assert!(!Method::GET.is_unimplemented());
        assert_eq!(Method::PATCH.to_string(), "PATCH");
    }
}
