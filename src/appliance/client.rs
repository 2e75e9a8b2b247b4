// appliance/client.rs
// ApplianceClient struct definition and the raw request plumbing

use crate::error::ApiError;
use crate::settings::Settings;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// How requests authenticate against the management API
#[derive(Debug, Clone)]
pub enum ApiAuth {
    Basic { user: String, password: String },
    ApiKey(String),
}

/// Status and raw body of one management API call
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub method: Method,
    pub path: String,
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// Fail with the response body attached unless the API answered 200
    pub fn ensure_ok(self) -> Result<Self, ApiError> {
        if self.status == StatusCode::OK {
            Ok(self)
        } else {
            Err(ApiError::UnexpectedStatus {
                method: self.method.to_string(),
                path: self.path,
                status: self.status.as_u16(),
                body: self.body,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|source| ApiError::Decode {
            path: self.path.clone(),
            body: self.body.clone(),
            source,
        })
    }
}

/// Typed client for the appliance REST management API
#[derive(Clone)]
pub struct ApplianceClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) auth: ApiAuth,
}

impl ApplianceClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(settings.http_timeout())
            // appliances ship with self-signed certificates
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(ApiError::Client)?;

        let auth = match &settings.api_key {
            Some(key) => ApiAuth::ApiKey(key.clone()),
            None => ApiAuth::Basic {
                user: settings.user.clone(),
                password: settings.password.clone(),
            },
        };

        Ok(ApplianceClient {
            http,
            base_url: settings.api_base_url(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request = match &self.auth {
            ApiAuth::Basic { user, password } => request.basic_auth(user, Some(password)),
            ApiAuth::ApiKey(key) => request.bearer_auth(key),
        };

        let transport = |source| ApiError::Transport {
            method: method.to_string(),
            path: path.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        tracing::debug!(%method, path, status = status.as_u16(), "management API call");

        Ok(ApiResponse {
            method,
            path: path.to_string(),
            status,
            body: text,
        })
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send::<()>(Method::GET, path, &[], None).await
    }

    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, ApiError> {
        self.send::<()>(Method::GET, path, query, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::DELETE, path, &[], body).await
    }
}
