//! Batch-RPC framing for the translate call

use rand::Rng;
use serde_json::json;
use url::form_urlencoded;

use super::session::SessionToken;
use crate::core::errors::{Result, TranslationError};
use crate::core::transport::HttpRequest;

/// RPC id of the translate method
pub const RPC_ID: &str = "MkEWBc";

const BATCH_PATH: &str = "/_/TranslateWebserverUi/data/batchexecute";

const HEADERS: &[(&str, &str)] = &[
    ("Sec-Ch-Ua", r#""Google Chrome";v="95", "Chromium";v="95", ";Not A Brand";v="99""#),
    ("Content-Type", "application/x-www-form-urlencoded;charset=UTF-8"),
    ("X-Same-Domain", "1"),
    ("Sec-Ch-Ua-Mobile", "?1"),
    ("User-Agent", "Mozilla/5.0 (Linux; Android 8.0.0; Pixel 2 XL Build/OPD1.170816.004) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/95.0.4638.69 Mobile Safari/537.36"),
    ("Sec-Ch-Ua-Platform", r#""Android""#),
    ("Accept", "*/*"),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("Origin", "https://translate.google.com"),
    ("Sec-Fetch-Site", "same-origin"),
    ("Sec-Fetch-Mode", "cors"),
    ("Sec-Fetch-Dest", "empty"),
    ("Accept-Language", "en-US,en;q=0.9"),
];

/// A framed translate call, built once and sent once
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub req_id: u32,
    pub url: String,
    /// Form-encoded body carrying `f.req`
    pub body: String,
}

impl BatchRequest {
    pub fn build(
        base_url: &str,
        session: &SessionToken,
        text: &str,
        from: &str,
        to: &str,
        req_id: u32,
    ) -> Result<Self> {
        let req_id_str = req_id.to_string();
        let url = url::Url::parse_with_params(
            &format!("{}{}", base_url, BATCH_PATH),
            &[
                ("rpcids", RPC_ID),
                ("f.sid", session.session_id.as_str()),
                ("bl", session.build_label.as_str()),
                ("hl", "en-US"),
                ("soc-app", "1"),
                ("soc-platform", "1"),
                ("soc-device", "1"),
                ("_reqid", req_id_str.as_str()),
                ("rt", "c"),
            ],
        )
        .map_err(|e| TranslationError::ConfigError {
            message: format!("invalid base url {}: {}", base_url, e),
        })?;

        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("f.req", &frame_payload(text, from, to)?);
        if let Some(at) = session.at.as_deref().filter(|at| !at.is_empty()) {
            form.append_pair("at", at);
        }

        Ok(Self {
            req_id,
            url: url.to_string(),
            body: form.finish(),
        })
    }

    pub fn into_http(self, proxy_url: &str) -> HttpRequest {
        HttpRequest::post(self.url, self.body)
            .headers(HEADERS)
            .proxy(proxy_url)
    }
}

/// The `f.req` value: the translate tuple, JSON-encoded, wrapped as a string
pub fn frame_payload(text: &str, from: &str, to: &str) -> Result<String> {
    let inner = serde_json::to_string(&json!([[text, from, to, true], [null]]))?;
    Ok(serde_json::to_string(&json!([[[RPC_ID, inner, null, "generic"]]]))?)
}

/// Request id in `[100000, 109000)`
pub fn random_req_id() -> u32 {
    100000 + rand::thread_rng().gen_range(0..9000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;

    fn session() -> SessionToken {
        SessionToken {
            session_id: "-295138".to_string(),
            build_label: "boq_translate".to_string(),
            at: None,
        }
    }

    #[test]
    fn test_frame_payload() {
        let framed = frame_payload("Halo \"Dunia\"", "id", "en").unwrap();
        assert_eq!(
            framed,
            r#"[[["MkEWBc","[[\"Halo \\\"Dunia\\\"\",\"id\",\"en\",true],[null]]",null,"generic"]]]"#
        );

        let outer: serde_json::Value = serde_json::from_str(&framed).unwrap();
        let inner: serde_json::Value =
            serde_json::from_str(outer[0][0][1].as_str().unwrap()).unwrap();
        assert_json_eq!(inner, json!([["Halo \"Dunia\"", "id", "en", true], [null]]));
    }

    #[test]
    fn test_req_id_range() {
        for _ in 0..1000 {
            let id = random_req_id();
            assert!((100000..109000).contains(&id));
        }
    }

    #[test]
    fn test_build_query_and_body() {
        let request =
            BatchRequest::build("https://translate.google.com", &session(), "Hello", "en", "id", 104321)
                .unwrap();

        let url = url::Url::parse(&request.url).unwrap();
        assert_eq!(url.path(), "/_/TranslateWebserverUi/data/batchexecute");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("rpcids".to_string(), "MkEWBc".to_string())));
        assert!(query.contains(&("f.sid".to_string(), "-295138".to_string())));
        assert!(query.contains(&("bl".to_string(), "boq_translate".to_string())));
        assert!(query.contains(&("_reqid".to_string(), "104321".to_string())));
        assert!(query.contains(&("soc-app".to_string(), "1".to_string())));
        assert!(query.contains(&("rt".to_string(), "c".to_string())));

        let form: Vec<(String, String)> = form_urlencoded::parse(request.body.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(form.len(), 1);
        assert_eq!(form[0].0, "f.req");
        assert_eq!(form[0].1, frame_payload("Hello", "en", "id").unwrap());
    }

    #[test]
    fn test_at_forwarded_when_present() {
        let mut session = session();
        session.at = Some("AFk2".to_string());
        let request =
            BatchRequest::build("https://translate.google.com", &session, "Hello", "en", "id", 100000)
                .unwrap();
        assert!(request.body.ends_with("&at=AFk2"));
    }
}
