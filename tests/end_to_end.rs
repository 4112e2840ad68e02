//! End-to-end translate calls against recorded provider responses

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use gtranslate::core::decoder::decode_body;
use gtranslate::core::transport::Method;
use gtranslate::{
    CancellationToken, DeepL, ErrorKind, GoogleTranslate, HttpRequest, HttpResponse, HttpTransport,
    Result, TranslateParams, TranslationError, TranslationMethod, Translator, TranslatorRegistry,
};

const GOOGLE_LANDING: &str = include_str!("fixtures/google_landing.html");
const GOOGLE_ZH_EN: &str = include_str!("fixtures/google_zh_en.txt");
const DEEPL_PLAIN: &str = include_str!("fixtures/deepl_response.json");
const DEEPL_GZIP: &[u8] = include_bytes!("fixtures/deepl_response.json.gz");

/// Replays canned responses in order and keeps every request it saw
#[derive(Debug)]
struct Scripted {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl Scripted {
    fn new(responses: Vec<HttpResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for Scripted {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| TranslationError::NetworkError {
                message: "no scripted response left".to_string(),
            })
    }
}

fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[test]
fn gzip_fixture_decodes_to_plaintext() {
    let decoded = decode_body(Some("gzip"), DEEPL_GZIP).unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), DEEPL_PLAIN);
}

#[tokio::test]
async fn google_translates_recorded_sentence_pair() {
    let transport = Scripted::new(vec![
        HttpResponse::new(200, GOOGLE_LANDING),
        HttpResponse::new(200, GOOGLE_ZH_EN),
    ]);
    let google = GoogleTranslate::new().with_transport(transport.clone());

    let result = google
        .translate(&CancellationToken::new(), "这是第一句话。这是第二句话。", "zh-cn", "en")
        .await
        .unwrap();

    assert_eq!(result.text, "This is the first sentence. This is the second sentence.");
    assert_eq!(result.from.language.iso, "zh-CN");
    assert_eq!(result.method, TranslationMethod::Google);
    assert!(result.alternatives.is_empty());
    assert!(!result.from.text.auto_corrected);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[0].url, "https://translate.google.com");

    let batch = &requests[1];
    assert_eq!(batch.method, Method::Post);
    assert!(batch.url.starts_with("https://translate.google.com/_/TranslateWebserverUi/data/batchexecute?"));
    assert!(batch.url.contains("f.sid=-3120847263511937408"));
    assert!(batch.url.contains("bl=boq_translate-webserver_20240214.08_p0"));
    assert_eq!(
        header(batch, "content-type"),
        Some("application/x-www-form-urlencoded;charset=UTF-8")
    );
    let body = String::from_utf8(batch.body.clone().unwrap()).unwrap();
    assert!(body.starts_with("f.req="));
}

#[tokio::test]
async fn google_registry_convenience_call() {
    let transport = Scripted::new(vec![
        HttpResponse::new(200, GOOGLE_LANDING),
        HttpResponse::new(200, GOOGLE_ZH_EN),
    ]);
    let registry = TranslatorRegistry::new(Arc::new(
        GoogleTranslate::new().with_host("google.co.id").with_transport(transport.clone()),
    ));

    let params = TranslateParams::new("这是第一句话。这是第二句话。", "en").with_from("zh-cn");
    let result = registry
        .translate_with_params(&CancellationToken::new(), &params)
        .await
        .unwrap();
    assert_eq!(result.text, "This is the first sentence. This is the second sentence.");
    assert_eq!(transport.requests()[0].url, "https://translate.google.co.id");
}

#[tokio::test]
async fn google_session_unavailable_stops_before_translate() {
    let transport = Scripted::new(vec![HttpResponse::new(200, "<html>no tokens here</html>")]);
    let google = GoogleTranslate::new().with_transport(transport.clone());

    let err = google
        .translate(&CancellationToken::new(), "Hello", "en", "id")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SessionUnavailable);
    assert_eq!(transport.requests().len(), 1);
}

/// Frame `inner` the way batchexecute does
fn batch_body(inner: &serde_json::Value) -> String {
    let envelope = serde_json::json!([["wrb.fr", "MkEWBc", inner.to_string(), null, null, null, "generic"]]);
    format!(")]}}'\n\n{}\n{}\n", envelope.to_string().len(), envelope)
}

#[tokio::test]
async fn google_undetectable_source_still_reports_iso() {
    let inner = serde_json::json!([null, [[[null, null, null, null, null, [["Hello"]]]]]]);
    let transport = Scripted::new(vec![
        HttpResponse::new(200, GOOGLE_LANDING),
        HttpResponse::new(200, batch_body(&inner)),
    ]);
    let google = GoogleTranslate::new().with_transport(transport);

    let result = google
        .translate(&CancellationToken::new(), "1234", "", "en")
        .await
        .unwrap();
    assert_eq!(result.text, "Hello");
    assert_eq!(result.from.language.iso, "auto");
}

#[tokio::test]
async fn google_rate_limited() {
    let transport = Scripted::new(vec![
        HttpResponse::new(200, GOOGLE_LANDING),
        HttpResponse::new(429, "Too Many Requests"),
    ]);
    let google = GoogleTranslate::new().with_transport(transport);

    let err = google
        .translate(&CancellationToken::new(), "Hello", "en", "id")
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn google_uses_proxy_setting() {
    let transport = Scripted::new(vec![
        HttpResponse::new(200, GOOGLE_LANDING),
        HttpResponse::new(200, GOOGLE_ZH_EN),
    ]);
    let google = GoogleTranslate::new()
        .with_proxy_url("http://proxy:8080")
        .with_transport(transport.clone());

    google
        .translate(&CancellationToken::new(), "这是第一句话。这是第二句话。", "auto", "en")
        .await
        .unwrap();
    for request in transport.requests() {
        assert_eq!(request.proxy_url.as_deref(), Some("http://proxy:8080"));
    }
}

#[tokio::test]
async fn deepl_translates_gzip_response() {
    let transport = Scripted::new(vec![
        HttpResponse::new(200, DEEPL_GZIP).with_header("Content-Encoding", "gzip")
    ]);
    let deepl = DeepL::new().with_transport(transport.clone());

    let result = deepl
        .translate(&CancellationToken::new(), "Hello World", "en", "id")
        .await
        .unwrap();

    assert_eq!(result.text, "Halo Dunia");
    assert_eq!(result.alternatives, vec!["Halo dunia", "Halo, Dunia"]);
    assert_eq!(result.from.language.iso, "EN");
    assert_eq!(result.method, TranslationMethod::Free);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://www2.deepl.com/jsonrpc");
    assert_eq!(header(&requests[0], "cookie"), None);

    let body = String::from_utf8(requests[0].body.clone().unwrap()).unwrap();
    // the method-spacing splice is still valid JSON
    let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(payload["method"], "LMT_handle_texts");
    assert_eq!(payload["params"]["lang"]["source_lang_user_selected"], "EN");
    assert_eq!(payload["params"]["lang"]["target_lang"], "ID");
    // "Hello World" has no i, so the timestamp is the raw clock
    assert!(payload["params"]["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn deepl_pro_sends_session_cookie() {
    let transport = Scripted::new(vec![HttpResponse::new(200, DEEPL_PLAIN)]);
    let deepl = DeepL::new()
        .with_dl_session("abc-123")
        .with_transport(transport.clone());

    let result = deepl
        .translate(&CancellationToken::new(), "Hello World", "en", "id")
        .await
        .unwrap();
    assert_eq!(result.method, TranslationMethod::Pro);
    assert_eq!(header(&transport.requests()[0], "cookie"), Some("dl_session=abc-123"));
}

#[tokio::test]
async fn deepl_corrupt_gzip_is_transport_error() {
    let transport = Scripted::new(vec![
        HttpResponse::new(200, DEEPL_PLAIN).with_header("Content-Encoding", "gzip")
    ]);
    let deepl = DeepL::new().with_transport(transport);

    let err = deepl
        .translate(&CancellationToken::new(), "Hello World", "en", "id")
        .await
        .unwrap_err();
    assert!(matches!(err, TranslationError::DecodeError { .. }));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn deepl_blocked_ip() {
    let transport = Scripted::new(vec![HttpResponse::new(429, "")]);
    let registry = TranslatorRegistry::default();
    registry.use_deepl(DeepL::new().with_transport(transport));

    let err = registry
        .manual_translate(&CancellationToken::new(), "Hello World", "en", "id")
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn deepl_missing_translation_is_provider_failure() {
    let transport = Scripted::new(vec![HttpResponse::new(
        200,
        r#"{"jsonrpc":"2.0","result":{"texts":[]}}"#,
    )]);
    let deepl = DeepL::new().with_transport(transport);

    let err = deepl
        .translate(&CancellationToken::new(), "Hello World", "en", "id")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderTranslationFailure);
}

#[tokio::test]
async fn validation_happens_before_any_request() {
    let transport = Scripted::new(Vec::new());
    let registry = TranslatorRegistry::new(Arc::new(DeepL::new().with_transport(transport.clone())));
    let ctx = CancellationToken::new();

    let err = registry.translate(&ctx, "", "en").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = registry.translate(&ctx, "hi", "not-a-lang").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn cancelled_context_returns_no_result() {
    let transport = Scripted::new(vec![HttpResponse::new(200, DEEPL_PLAIN)]);
    let deepl = DeepL::new().with_transport(transport.clone());
    let ctx = CancellationToken::new();
    ctx.cancel();

    let err = deepl.translate(&ctx, "Hello World", "en", "id").await.unwrap_err();
    assert!(matches!(err, TranslationError::Cancelled));
    assert!(transport.requests().is_empty());
}
