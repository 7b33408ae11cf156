use crate::{
    bot::{Bot, Followup},
    platform::Platform,
};
use ed25519_dalek::{Signature, Verifier};
use http_body_util::{BodyExt, Full};
use hyper::{
    body::{Body, Bytes},
    header::{HeaderValue, CONTENT_TYPE},
    HeaderMap, Method, Request, Response, StatusCode,
};
use store::SessionStore;

pub use ed25519_dalek::VerifyingKey as PublicKey;

/// Decodes the hex-encoded application public key from the developer portal.
pub fn parse_public_key(hex: &str) -> Option<PublicKey> {
    let mut bytes = [0; 32];
    hex::decode_to_slice(hex, &mut bytes).ok()?;
    PublicKey::from_bytes(&bytes).ok()
}

/// Checks the Ed25519 signature that Discord attaches to every interaction.
pub fn verify(headers: &HeaderMap, body: &[u8], public: &PublicKey) -> Result<(), StatusCode> {
    // Retrieve security headers
    let maybe_sig = headers.get("X-Signature-Ed25519");
    let maybe_time = headers.get("X-Signature-Timestamp");
    let (sig, timestamp) = maybe_sig.zip(maybe_time).ok_or(StatusCode::UNAUTHORIZED)?;

    let mut signature = [0; 64];
    hex::decode_to_slice(sig, &mut signature).map_err(|_| StatusCode::BAD_REQUEST)?;
    let signature = Signature::from_bytes(&signature);

    // Append body after the timestamp
    let mut message = timestamp.as_bytes().to_vec();
    message.extend_from_slice(body);

    // Validate the challenge
    public.verify(&message, &signature).map_err(|_| StatusCode::UNAUTHORIZED)
}

/// Answers a signed interaction request. The returned [`Followup`], if any,
/// must be run once the response has been sent.
pub async fn try_respond<B, P, S>(
    req: Request<B>,
    public: &PublicKey,
    bot: &Bot<P, S>,
) -> Result<(Response<Full<Bytes>>, Option<Followup>), StatusCode>
where
    B: Body,
    P: Platform,
    S: SessionStore,
{
    // Disable all non-`POST` requests
    if req.method() != Method::POST {
        return Err(StatusCode::METHOD_NOT_ALLOWED);
    }

    // For now, we only allow requests from the root endpoint.
    if req.uri().path() != "/" {
        return Err(StatusCode::NOT_FOUND);
    }

    let (parts, body) = req.into_parts();
    let payload = body.collect().await.map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?.to_bytes();
    verify(&parts.headers, &payload, public)?;

    // Parse incoming interaction
    let interaction = serde_json::from_slice(&payload).map_err(|_| StatusCode::BAD_REQUEST)?;
    drop(payload);

    // Construct new body
    let reply = bot.on_interaction(interaction);
    let bytes = serde_json::to_vec(&reply.response).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut res = Response::new(Full::new(Bytes::from(bytes)));
    assert!(res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json")).is_none());
    Ok((res, reply.followup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::Fake;
    use ed25519_dalek::{Signer, SigningKey};
    use store::MemoryStore;

    const TIMESTAMP: &str = "1700000000";
    const PING: &str = r#"{"id":"1","application_id":"2","type":1,"token":"token"}"#;

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7; 32])
    }

    fn signed_request(method: Method, uri: &str, body: &str, key: &SigningKey) -> Request<Full<Bytes>> {
        let message = [TIMESTAMP.as_bytes(), body.as_bytes()].concat();
        let signature = hex::encode(key.sign(&message).to_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header("X-Signature-Ed25519", signature)
            .header("X-Signature-Timestamp", TIMESTAMP)
            .body(Full::new(Bytes::from(body.to_owned())))
            .unwrap()
    }

    fn bot() -> Bot<Fake, MemoryStore> {
        Bot::new(Fake::default(), MemoryStore::default(), crate::DEFAULT_STAFF_CHANNEL.into())
    }

    #[test]
    fn parses_public_key() {
        let public = signing_key().verifying_key();
        let encoded = hex::encode(public.as_bytes());
        assert_eq!(parse_public_key(&encoded), Some(public));
        assert!(parse_public_key("abcd").is_none());
        assert!(parse_public_key("not hex at all").is_none());
    }

    #[test]
    fn accepts_valid_signature() {
        let key = signing_key();
        let req = signed_request(Method::POST, "/", PING, &key);
        assert_eq!(verify(req.headers(), PING.as_bytes(), &key.verifying_key()), Ok(()));
    }

    #[test]
    fn rejects_tampered_body() {
        let key = signing_key();
        let req = signed_request(Method::POST, "/", PING, &key);
        let tampered = PING.replace("token", "other");
        assert_eq!(verify(req.headers(), tampered.as_bytes(), &key.verifying_key()), Err(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn rejects_foreign_key() {
        let req = signed_request(Method::POST, "/", PING, &signing_key());
        let other = SigningKey::from_bytes(&[8; 32]).verifying_key();
        assert_eq!(verify(req.headers(), PING.as_bytes(), &other), Err(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        let public = signing_key().verifying_key();
        assert_eq!(verify(&HeaderMap::new(), PING.as_bytes(), &public), Err(StatusCode::UNAUTHORIZED));

        let mut headers = HeaderMap::new();
        headers.insert("x-signature-ed25519", HeaderValue::from_static("zz"));
        headers.insert("x-signature-timestamp", HeaderValue::from_static(TIMESTAMP));
        assert_eq!(verify(&headers, PING.as_bytes(), &public), Err(StatusCode::BAD_REQUEST));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn answers_ping_with_pong() {
        let key = signing_key();
        let req = signed_request(Method::POST, "/", PING, &key);
        let (res, followup) = try_respond(req, &key.verifying_key(), &bot()).await.unwrap();
        assert!(followup.is_none());
        assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), "application/json");

        let body = res.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["type"], 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rejects_wrong_method_and_path() {
        let key = signing_key();
        let public = key.verifying_key();

        let req = signed_request(Method::GET, "/", PING, &key);
        assert_eq!(try_respond(req, &public, &bot()).await.err(), Some(StatusCode::METHOD_NOT_ALLOWED));

        let req = signed_request(Method::POST, "/interactions", PING, &key);
        assert_eq!(try_respond(req, &public, &bot()).await.err(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rejects_signed_garbage() {
        let key = signing_key();
        let req = signed_request(Method::POST, "/", "{not json", &key);
        assert_eq!(try_respond(req, &key.verifying_key(), &bot()).await.err(), Some(StatusCode::BAD_REQUEST));
    }
}
