use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::models::Profile;

const REST_PATH: &str = "/rest/v1";
const AUTH_PATH: &str = "/auth/v1";
const STORAGE_PATH: &str = "/storage/v1";

// PostgREST error code for "zero rows where exactly one was requested"
const PGRST_NO_ROWS: &str = "PGRST116";

// Storage buckets this project reads and writes
pub const MODELS_BUCKET: &str = "nft-models";
pub const THUMBNAILS_BUCKET: &str = "thumbnails";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("row not found")]
    RowNotFound,
    #[error("backend returned {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: Profile,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RecoverRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Clone)]
pub struct Backend {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl Backend {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Backend {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: None,
        }
    }

    // Requests carry the user's token once signed in, the project key before
    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }

    async fn into_api_error(response: Response) -> BackendError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if let Ok(err) = serde_json::from_str::<PostgrestError>(&body) {
            if err.code.as_deref() == Some(PGRST_NO_ROWS) {
                return BackendError::RowNotFound;
            }
            if let Some(message) = err.message {
                return BackendError::Api { status, message };
            }
        }
        BackendError::Api {
            status,
            message: body,
        }
    }

    async fn ensure_ok(response: Response) -> Result<Response, BackendError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::into_api_error(response).await)
        }
    }

    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, BackendError> {
        debug!("GET {}/{} {:?}", REST_PATH, table, query);
        let response = self
            .client
            .get(format!("{}{}/{}", self.base_url, REST_PATH, table))
            .query(query)
            .header("apikey", &self.api_key)
            .bearer_auth(self.bearer())
            .send()
            .await?;

        let response = Self::ensure_ok(response).await?;
        Ok(response.json().await?)
    }

    // Exactly-one-row read; zero rows surface as RowNotFound
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BackendError> {
        let response = self
            .client
            .get(format!("{}{}/{}", self.base_url, REST_PATH, table))
            .query(query)
            .header("apikey", &self.api_key)
            .header("Accept", "application/vnd.pgrst.object+json")
            .bearer_auth(self.bearer())
            .send()
            .await?;

        let response = Self::ensure_ok(response).await?;
        Ok(response.json().await?)
    }

    pub async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<R, BackendError> {
        let response = self
            .client
            .post(format!("{}{}/{}", self.base_url, REST_PATH, table))
            .header("apikey", &self.api_key)
            .header("Accept", "application/vnd.pgrst.object+json")
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer())
            .json(row)
            .send()
            .await?;

        let response = Self::ensure_ok(response).await?;
        Ok(response.json().await?)
    }

    pub async fn update(
        &self,
        table: &str,
        filters: &[(&str, &str)],
        patch: &Value,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .patch(format!("{}{}/{}", self.base_url, REST_PATH, table))
            .query(filters)
            .header("apikey", &self.api_key)
            .bearer_auth(self.bearer())
            .json(patch)
            .send()
            .await?;

        Self::ensure_ok(response).await?;
        Ok(())
    }

    pub async fn rpc<T: DeserializeOwned>(
        &self,
        function: &str,
        args: &Value,
    ) -> Result<T, BackendError> {
        debug!("RPC {}", function);
        let response = self
            .client
            .post(format!("{}{}/rpc/{}", self.base_url, REST_PATH, function))
            .header("apikey", &self.api_key)
            .bearer_auth(self.bearer())
            .json(args)
            .send()
            .await?;

        let response = Self::ensure_ok(response).await?;
        Ok(response.json().await?)
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, BackendError> {
        let response = self
            .client
            .post(format!("{}{}/token", self.base_url, AUTH_PATH))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        let response = Self::ensure_ok(response).await?;
        let session: Session = response.json().await?;
        self.access_token = Some(session.access_token.clone());
        Ok(session)
    }

    // Re-reads the signed-in user from the auth service
    pub async fn profile(&self) -> Result<Profile, BackendError> {
        let response = self
            .client
            .get(format!("{}{}/user", self.base_url, AUTH_PATH))
            .header("apikey", &self.api_key)
            .bearer_auth(self.bearer())
            .send()
            .await?;

        let response = Self::ensure_ok(response).await?;
        Ok(response.json().await?)
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .post(format!("{}{}/recover", self.base_url, AUTH_PATH))
            .header("apikey", &self.api_key)
            .json(&RecoverRequest { email })
            .send()
            .await?;

        Self::ensure_ok(response).await?;
        Ok(())
    }

    pub async fn download_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BackendError> {
        let response = self
            .client
            .get(format!(
                "{}{}/object/{}/{}",
                self.base_url,
                STORAGE_PATH,
                bucket,
                urlencoding::encode(key)
            ))
            .header("apikey", &self.api_key)
            .bearer_auth(self.bearer())
            .send()
            .await?;

        let response = Self::ensure_ok(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .post(format!(
                "{}{}/object/{}/{}",
                self.base_url,
                STORAGE_PATH,
                bucket,
                urlencoding::encode(key)
            ))
            .header("apikey", &self.api_key)
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .bearer_auth(self.bearer())
            .body(bytes)
            .send()
            .await?;

        Self::ensure_ok(response).await?;
        Ok(())
    }

    pub fn public_object_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}{}/object/public/{}/{}",
            self.base_url,
            STORAGE_PATH,
            bucket,
            urlencoding::encode(key)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_urls_encode_the_object_key() {
        let backend = Backend::new("https://proj.supabase.co/", "anon-key");
        let url = backend.public_object_url(THUMBNAILS_BUCKET, "harbor lion.png");
        assert_eq!(
            url,
            "https://proj.supabase.co/storage/v1/object/public/thumbnails/harbor%20lion.png"
        );
    }

    #[test]
    fn no_rows_error_code_maps_to_row_not_found() {
        let body = r#"{"code":"PGRST116","details":"Results contain 0 rows","message":"JSON object requested, multiple (or no) rows returned"}"#;
        let err: PostgrestError = serde_json::from_str(body).unwrap();
        assert_eq!(err.code.as_deref(), Some(PGRST_NO_ROWS));
    }
}
