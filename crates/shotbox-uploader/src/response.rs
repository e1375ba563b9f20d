//! Service-specific success markers and locator extraction.

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::result::FailureCause;

/// How a backend signals success and where it puts the resulting URL.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseRule {
    /// The body is the URL of the uploaded file and nothing else.
    PlainUrl,
    /// A JSON document. Pointers use RFC 6901 syntax (`/data/url`).
    Json {
        /// Field that must equal `success_value` for the upload to count.
        #[serde(default)]
        success_pointer: Option<String>,
        #[serde(default)]
        success_value: Option<Value>,
        location_pointer: String,
        #[serde(default)]
        direct_link_pointer: Option<String>,
    },
}

/// Absolute URLs extracted from a successful reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub location: String,
    pub direct_link: String,
}

impl ResponseRule {
    /// Pointers that must be valid JSON pointers, for load-time validation.
    pub(crate) fn pointers(&self) -> Vec<&str> {
        match self {
            ResponseRule::PlainUrl => Vec::new(),
            ResponseRule::Json {
                success_pointer,
                location_pointer,
                direct_link_pointer,
                ..
            } => std::iter::once(location_pointer.as_str())
                .chain(success_pointer.as_deref())
                .chain(direct_link_pointer.as_deref())
                .collect(),
        }
    }

    /// Turn a raw reply into a locator, or classify why it is not a success.
    ///
    /// Relative URLs are resolved against `endpoint`.
    pub fn parse(
        &self,
        status: StatusCode,
        body: &str,
        endpoint: &Url,
    ) -> Result<Locator, FailureCause> {
        if !status.is_success() {
            return Err(FailureCause::HttpStatus(status.as_u16()));
        }

        match self {
            ResponseRule::PlainUrl => {
                let url = absolute_http_url(body.trim()).ok_or_else(|| {
                    FailureCause::MalformedResponse("body is not a URL".to_string())
                })?;
                Ok(Locator {
                    location: url.to_string(),
                    direct_link: url.to_string(),
                })
            }
            ResponseRule::Json {
                success_pointer,
                success_value,
                location_pointer,
                direct_link_pointer,
            } => {
                let document: Value = serde_json::from_str(body).map_err(|_| {
                    FailureCause::MalformedResponse("response is not JSON".to_string())
                })?;

                if let Some(pointer) = success_pointer {
                    let marker = document.pointer(pointer);
                    let accepted = match (marker, success_value) {
                        (Some(found), Some(expected)) => found == expected,
                        (Some(found), None) => !found.is_null() && found != &Value::Bool(false),
                        (None, _) => false,
                    };
                    if !accepted {
                        return Err(FailureCause::MalformedResponse(format!(
                            "success marker {} not set",
                            pointer
                        )));
                    }
                }

                let location = resolve_at(&document, location_pointer, endpoint)?;
                let direct_link = match direct_link_pointer {
                    Some(pointer) => resolve_at(&document, pointer, endpoint)?,
                    None => location.clone(),
                };

                Ok(Locator {
                    location,
                    direct_link,
                })
            }
        }
    }
}

fn absolute_http_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

fn resolve_at(document: &Value, pointer: &str, endpoint: &Url) -> Result<String, FailureCause> {
    let raw = document
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| FailureCause::MalformedResponse(format!("{} missing", pointer)))?;

    let url = endpoint
        .join(raw.trim())
        .map_err(|_| FailureCause::MalformedResponse(format!("{} is not a URL", pointer)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FailureCause::MalformedResponse(format!(
            "{} is not an http URL",
            pointer
        )));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoint() -> Url {
        Url::parse("http://localhost:3000/upload").unwrap()
    }

    fn local_rule() -> ResponseRule {
        ResponseRule::Json {
            success_pointer: Some("/ok".to_string()),
            success_value: Some(json!(true)),
            location_pointer: "/url".to_string(),
            direct_link_pointer: None,
        }
    }

    #[test]
    fn test_plain_url() {
        let locator = ResponseRule::PlainUrl
            .parse(StatusCode::OK, "https://files.example/abc.png\n", &endpoint())
            .unwrap();
        assert_eq!(locator.location, "https://files.example/abc.png");
        assert_eq!(locator.direct_link, locator.location);
    }

    #[test]
    fn test_plain_url_rejects_other_bodies() {
        for body in ["", "error: quota exceeded", "ftp://host/file"] {
            let result = ResponseRule::PlainUrl.parse(StatusCode::OK, body, &endpoint());
            assert!(
                matches!(result, Err(FailureCause::MalformedResponse(_))),
                "{:?}",
                body
            );
        }
    }

    #[test]
    fn test_non_success_status() {
        let result = local_rule().parse(StatusCode::PAYLOAD_TOO_LARGE, "{}", &endpoint());
        assert_eq!(result, Err(FailureCause::HttpStatus(413)));
    }

    #[test]
    fn test_relative_location_is_resolved() {
        let body = r#"{"ok":true,"filename":"a.png","url":"/uploads/a.png","size":10,"mime":"image/png"}"#;
        let locator = local_rule().parse(StatusCode::OK, body, &endpoint()).unwrap();
        assert_eq!(locator.location, "http://localhost:3000/uploads/a.png");
        assert_eq!(locator.direct_link, locator.location);
    }

    #[test]
    fn test_success_marker_must_match() {
        let body = r#"{"ok":false,"error":"unsupported file type"}"#;
        assert!(matches!(
            local_rule().parse(StatusCode::OK, body, &endpoint()),
            Err(FailureCause::MalformedResponse(_))
        ));

        let rule = ResponseRule::Json {
            success_pointer: Some("/status".to_string()),
            success_value: Some(json!("ok")),
            location_pointer: "/data/downloadPage".to_string(),
            direct_link_pointer: None,
        };
        let body = r#"{"status":"error-rateLimit","data":{}}"#;
        assert!(rule.parse(StatusCode::OK, body, &endpoint()).is_err());
    }

    #[test]
    fn test_separate_direct_link() {
        let rule = ResponseRule::Json {
            success_pointer: None,
            success_value: None,
            location_pointer: "/page".to_string(),
            direct_link_pointer: Some("/raw".to_string()),
        };
        let body = r#"{"page":"https://host/v/1","raw":"https://cdn.host/1.png"}"#;
        let locator = rule.parse(StatusCode::OK, body, &endpoint()).unwrap();
        assert_eq!(locator.location, "https://host/v/1");
        assert_eq!(locator.direct_link, "https://cdn.host/1.png");
    }

    #[test]
    fn test_json_problems_are_malformed() {
        let rule = local_rule();
        for body in ["<html>busy</html>", r#"{"ok":true}"#, r#"{"ok":true,"url":42}"#] {
            assert!(
                matches!(
                    rule.parse(StatusCode::OK, body, &endpoint()),
                    Err(FailureCause::MalformedResponse(_))
                ),
                "{}",
                body
            );
        }
    }
}
