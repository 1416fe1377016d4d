use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::model::{Catalog, ErrorReply, SignupReply};

/// Backend calls the board makes. Futures are polled on the single UI thread,
/// so none of them need to be `Send`.
#[allow(async_fn_in_trait)]
pub trait ActivityApi {
    async fn fetch_catalog(&self) -> Result<Catalog, ApiError>;

    /// Returns the backend's confirmation text.
    async fn signup(&self, activity: &str, email: &str) -> Result<String, ApiError>;

    async fn unregister(&self, activity: &str, email: &str) -> Result<(), ApiError>;
}

pub fn catalog_url(base: &str) -> String {
    format!("{base}/activities")
}

pub fn signup_url(base: &str, activity: &str, email: &str) -> String {
    format!(
        "{base}/activities/{}/signup?email={}",
        urlencoding::encode(activity),
        urlencoding::encode(email)
    )
}

pub fn unregister_url(base: &str, activity: &str, email: &str) -> String {
    format!(
        "{base}/activities/{}/participants?email={}",
        urlencoding::encode(activity),
        urlencoding::encode(email)
    )
}

/// `ActivityApi` over the browser's fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpApi {
    base: String,
}

impl HttpApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl ActivityApi for HttpApi {
    async fn fetch_catalog(&self) -> Result<Catalog, ApiError> {
        let resp = Request::get(&catalog_url(&self.base)).send().await?;
        let body = ok_body(resp).await?;
        decode(&body)
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<String, ApiError> {
        let url = signup_url(&self.base, activity, email);
        let resp = Request::post(&url).send().await?;
        let body = ok_body(resp).await?;
        let reply: SignupReply = decode(&body)?;
        Ok(reply.message)
    }

    async fn unregister(&self, activity: &str, email: &str) -> Result<(), ApiError> {
        let url = unregister_url(&self.base, activity, email);
        let resp = Request::delete(&url).send().await?;
        ok_body(resp).await?;
        Ok(())
    }
}

/// Body of a 2xx response, or the rejection built from a non-2xx one.
async fn ok_body(resp: Response) -> Result<String, ApiError> {
    if resp.ok() {
        return Ok(resp.text().await?);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(rejection(status, &body))
}

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// A non-2xx answer. `detail` is only kept when the body is JSON with a
/// string `detail`; anything else leaves the caller to its fallback text.
pub fn rejection(status: u16, body: &str) -> ApiError {
    let detail = serde_json::from_str::<ErrorReply>(body).ok().and_then(|r| r.detail);
    ApiError::Rejected { status, detail }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signup_url_targets_activity_and_email() {
        assert_eq!(
            signup_url("", "Chess Club", "a@b.com"),
            "/activities/Chess%20Club/signup?email=a%40b.com"
        );
    }

    #[test]
    fn unregister_url_targets_participants() {
        assert_eq!(
            unregister_url("https://school.example", "Art & Craft", "x+y@b.com"),
            "https://school.example/activities/Art%20%26%20Craft/participants?email=x%2By%40b.com"
        );
    }

    #[test]
    fn path_separators_are_escaped() {
        let url = signup_url("", "a/b?c", "e");
        assert_eq!(url, "/activities/a%2Fb%3Fc/signup?email=e");
    }

    #[test]
    fn rejection_keeps_string_detail() {
        assert_eq!(
            rejection(404, r#"{"detail": "Already removed"}"#),
            ApiError::Rejected { status: 404, detail: Some("Already removed".into()) }
        );
    }

    #[test]
    fn rejection_without_usable_detail_falls_back() {
        for body in [
            "<html>502 Bad Gateway</html>",
            "",
            r#"{"detail": 5}"#,
            r#"{"detail": [{"loc": ["query", "email"], "msg": "field required"}]}"#,
            r#"{"error": "nope"}"#,
        ] {
            let err = rejection(422, body);
            assert_eq!(err, ApiError::Rejected { status: 422, detail: None }, "{body}");
            assert_eq!(err.user_detail(), None);
        }
    }

    #[test]
    fn signup_reply_without_message_is_decode_error() {
        let err = decode::<SignupReply>(r#"{"detail": "ok"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(!err.is_rejection());

        let reply: SignupReply = decode(r#"{"message": "Signed up!"}"#).unwrap();
        assert_eq!(reply.message, "Signed up!");
    }

    #[test]
    fn catalog_body_must_be_an_object() {
        assert!(matches!(decode::<Catalog>("[]"), Err(ApiError::Decode(_))));
        assert_eq!(decode::<Catalog>("{}").unwrap(), Catalog::default());
    }

    #[test]
    fn catalog_url_uses_base() {
        assert_eq!(catalog_url(""), "/activities");
        assert_eq!(catalog_url("http://localhost:8000"), "http://localhost:8000/activities");
    }
}
