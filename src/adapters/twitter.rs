//! X/Twitter publisher
//!
//! OAuth1-signed v1.1 calls for media upload and credential verification,
//! v2 for tweet creation. Posting failures return None so callers branch
//! without error plumbing; only credential verification is load-bearing.

use crate::config::TwitterConfig;
use crate::error::{PickcastError, Result};
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use sha1::Sha1;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const API_BASE: &str = "https://api.twitter.com";
const UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";

type HmacSha1 = Hmac<Sha1>;

/// Publisher client
#[derive(Clone)]
pub struct TwitterClient {
    config: TwitterConfig,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    screen_name: String,
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: TweetData,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
}

impl TwitterClient {
    pub fn new(config: TwitterConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PickcastError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Must pass before any non-dry-run posting
    pub async fn verify_credentials(&self) -> bool {
        let url = format!("{}/1.1/account/verify_credentials.json", API_BASE);
        let auth = self.oauth_header("GET", &url, &[]);

        let response = match self
            .http
            .get(&url)
            .header("Authorization", auth)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!("Credential verification request failed: {}", e);
                return false;
            }
        };

        if !response.status().is_success() {
            error!("Credential verification rejected: {}", response.status());
            return false;
        }

        match response.json::<VerifyResponse>().await {
            Ok(user) => {
                info!("Authenticated as @{}", user.screen_name);
                true
            }
            Err(e) => {
                error!("Credential verification parse failed: {}", e);
                false
            }
        }
    }

    /// Upload an image; missing or unreadable files yield None
    pub async fn upload_media(&self, image_path: &str) -> Option<String> {
        if !Path::new(image_path).exists() {
            warn!("Image file not found: {}", image_path);
            return None;
        }
        let bytes = match std::fs::read(image_path) {
            Ok(b) => b,
            Err(e) => {
                warn!("Could not read image {}: {}", image_path, e);
                return None;
            }
        };

        // Multipart body params are excluded from the OAuth1 signature
        let auth = self.oauth_header("POST", UPLOAD_URL, &[]);
        let part = reqwest::multipart::Part::bytes(bytes).file_name(
            Path::new(image_path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string()),
        );
        let form = reqwest::multipart::Form::new().part("media", part);

        let response = match self
            .http
            .post(UPLOAD_URL)
            .header("Authorization", auth)
            .multipart(form)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Media upload request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Media upload rejected: {} - {}", status, body);
            return None;
        }

        match response.json::<MediaUploadResponse>().await {
            Ok(media) => {
                debug!("Uploaded media id {}", media.media_id_string);
                Some(media.media_id_string)
            }
            Err(e) => {
                warn!("Media upload parse failed: {}", e);
                None
            }
        }
    }

    /// Post a tweet, optionally with media and as a reply. Failure is None.
    pub async fn post_tweet(
        &self,
        text: &str,
        media_id: Option<&str>,
        reply_to: Option<&str>,
    ) -> Option<String> {
        let url = format!("{}/2/tweets", API_BASE);
        let auth = self.oauth_header("POST", &url, &[]);

        let mut body = json!({ "text": text });
        if let Some(id) = media_id {
            body["media"] = json!({ "media_ids": [id] });
        }
        if let Some(id) = reply_to {
            body["reply"] = json!({ "in_reply_to_tweet_id": id });
        }

        let response = match self
            .http
            .post(&url)
            .header("Authorization", auth)
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!("Tweet request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Tweet rejected: {} - {}", status, body);
            return None;
        }

        match response.json::<TweetResponse>().await {
            Ok(tweet) => {
                info!("Tweet posted, id {}", tweet.data.id);
                Some(tweet.data.id)
            }
            Err(e) => {
                error!("Tweet response parse failed: {}", e);
                None
            }
        }
    }

    /// Post a reply chain. Each tweet replies to the previous one; the
    /// chain stops at the first failure and returns what succeeded.
    pub async fn post_thread(
        &self,
        texts: &[String],
        image_paths: &[Option<String>],
    ) -> Vec<String> {
        let mut posted = Vec::new();
        let mut reply_to: Option<String> = None;

        for (i, text) in texts.iter().enumerate() {
            let media_id = match image_paths.get(i).and_then(|p| p.as_deref()) {
                Some(path) => self.upload_media(path).await,
                None => None,
            };

            match self
                .post_tweet(text, media_id.as_deref(), reply_to.as_deref())
                .await
            {
                Some(id) => {
                    reply_to = Some(id.clone());
                    posted.push(id);
                }
                None => {
                    error!("Thread stopped after {} of {} tweets", i, texts.len());
                    break;
                }
            }
        }

        posted
    }

    /// Build the OAuth1 Authorization header for a request. `extra_params`
    /// carries query parameters that take part in the signature.
    fn oauth_header(&self, method: &str, url: &str, extra_params: &[(&str, &str)]) -> String {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let oauth_params: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", self.config.api_key.as_str()),
            ("oauth_nonce", nonce.as_str()),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.config.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let signature = sign_request(
            method,
            url,
            &oauth_params,
            extra_params,
            &self.config.api_secret,
            &self.config.access_token_secret,
        );

        let mut header_params: Vec<(&str, String)> = oauth_params
            .iter()
            .map(|(k, v)| (*k, v.to_string()))
            .collect();
        header_params.push(("oauth_signature", signature));
        header_params.sort_by(|a, b| a.0.cmp(b.0));

        let joined = header_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {}", joined)
    }
}

/// HMAC-SHA1 signature over the canonical base string
fn sign_request(
    method: &str,
    url: &str,
    oauth_params: &[(&str, &str)],
    extra_params: &[(&str, &str)],
    consumer_secret: &str,
    token_secret: &str,
) -> String {
    let mut pairs: Vec<(String, String)> = oauth_params
        .iter()
        .chain(extra_params.iter())
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    pairs.sort();

    let param_string = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        urlencoding::encode(url),
        urlencoding::encode(&param_string)
    );

    let signing_key = format!(
        "{}&{}",
        urlencoding::encode(consumer_secret),
        urlencoding::encode(token_secret)
    );

    let mut mac =
        HmacSha1::new_from_slice(signing_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(base_string.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_rfc5849_reference() {
        // Worked example from RFC 5849 §3.4.1.1 (with its published
        // signature for the example client credentials).
        let oauth_params = [
            ("oauth_consumer_key", "9djdj82h48djs9d2"),
            ("oauth_nonce", "7d8f3e4a"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "137131201"),
            ("oauth_token", "kkk9d7dh3k39sjv7"),
        ];
        let extra = [("b5", "=%3D"), ("a3", "a"), ("c@", ""), ("a2", "r b"), ("c2", ""), ("a3", "2 q")];
        let sig = sign_request(
            "POST",
            "http://example.com/request",
            &oauth_params,
            &extra,
            "j49sk3j29djd",
            "dh893hdasih9",
        );
        assert_eq!(sig, "r6/TJjbCOr97/+UU0NsvSne7s5g=");
    }

    #[test]
    fn header_is_well_formed() {
        let client = TwitterClient::new(TwitterConfig {
            api_key: "key".into(),
            api_secret: "secret".into(),
            access_token: "token".into(),
            access_token_secret: "token_secret".into(),
            timeout_secs: 10,
        })
        .unwrap();

        let header = client.oauth_header("POST", "https://api.twitter.com/2/tweets", &[]);
        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_consumer_key=\"key\""));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_signature=\""));
    }
}
