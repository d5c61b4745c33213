//! S3 blob-store backend.
//!
//! Talks to S3 directly over blocking HTTP with AWS Signature Version 4
//! request signing. Only the two operations the vault needs are
//! implemented: GET and PUT of a single object. A 404 maps to
//! [`StoreError::NotFound`]; every other failure is reported as
//! [`StoreError::Unavailable`].
//!
//! Object keys produced by the vault are limited to URI-unreserved
//! characters plus `/`, so the canonical URI needs no percent-encoding. A
//! configured bucket prefix must stick to the same character set.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use keep_core::{BlobStore, StoreError};

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "s3";

pub struct S3Store {
    client: reqwest::blocking::Client,
    bucket: String,
    prefix: Option<String>,
    region: String,
    access_key: String,
    secret_key: String,
}

impl S3Store {
    pub fn new(
        access_key: String,
        secret_key: String,
        bucket: String,
        prefix: Option<String>,
        region: String,
    ) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            bucket,
            prefix,
            region,
            access_key,
            secret_key,
        }
    }

    fn object_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => {
                format!("{}/{}", prefix.trim_matches('/'), key)
            }
            _ => key.to_string(),
        }
    }

    fn host(&self) -> String {
        format!("{}.{}.{}.amazonaws.com", self.bucket, SERVICE, self.region)
    }

    fn send(
        &self,
        method: &str,
        key: &str,
        body: &[u8],
    ) -> Result<reqwest::blocking::Response, StoreError> {
        let object_key = self.object_key(key);
        let host = self.host();
        let url = format!("https://{}/{}", host, object_key);
        let now = Utc::now();

        let payload_hash = hex::encode(Sha256::digest(body));
        let (amz_date, authorization) =
            self.sign(method, &object_key, &host, &payload_hash, now)?;

        let request = match method {
            "PUT" => self.client.put(&url).body(body.to_vec()),
            _ => self.client.get(&url),
        };

        // reqwest derives the Host header from the URL; it matches the
        // signed value because the URL is built from the same host string.
        request
            .header("x-amz-date", &amz_date)
            .header("x-amz-content-sha256", &payload_hash)
            .header("authorization", authorization)
            .send()
            .map_err(|e| StoreError::Unavailable(format!("S3 request failed: {}", e)))
    }

    /// Produce the `x-amz-date` header value and the `Authorization` header
    /// for a request, per the Signature Version 4 process.
    fn sign(
        &self,
        method: &str,
        object_key: &str,
        host: &str,
        payload_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, String), StoreError> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();

        let canonical_headers = format!(
            "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            host, payload_hash, amz_date
        );
        let signed_headers = "host;x-amz-content-sha256;x-amz-date";
        // Empty canonical query string: object GET/PUT carries no parameters.
        let canonical_request = format!(
            "{}\n/{}\n\n{}\n{}\n{}",
            method, object_key, canonical_headers, signed_headers, payload_hash
        );

        let scope = format!("{}/{}/{}/aws4_request", date, self.region, SERVICE);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = signing_key(&self.secret_key, &date, &self.region)?;
        let signature = hex::encode(hmac(&signing_key, string_to_sign.as_bytes())?);

        let authorization = format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.access_key, scope, signed_headers, signature
        );
        Ok((amz_date, authorization))
    }
}

/// The SigV4 key derivation chain: date, region, service, terminator.
fn signing_key(secret_key: &str, date: &str, region: &str) -> Result<Vec<u8>, StoreError> {
    let secret = format!("AWS4{}", secret_key);
    let key = hmac(secret.as_bytes(), date.as_bytes())?;
    let key = hmac(&key, region.as_bytes())?;
    let key = hmac(&key, SERVICE.as_bytes())?;
    hmac(&key, b"aws4_request")
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, StoreError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|_| StoreError::Unavailable("failed to initialize HMAC".to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl BlobStore for S3Store {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let response = self.send("GET", key, &[])?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "S3 GET returned {}",
                status
            )));
        }
        response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|e| StoreError::Unavailable(format!("failed to read S3 response: {}", e)))
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let response = self.send("PUT", key, data)?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "S3 PUT returned {}",
                status
            )));
        }
        Ok(())
    }
}
