#![forbid(unsafe_code)]

//! Thin JSON-over-HTTP client shared by the resource services.
//!
//! Every request carries the static authorization token. Non-success
//! statuses become [`GatewayError::Status`] before any body handling;
//! bodies that fail to parse become [`GatewayError::Decode`]; everything
//! that keeps the response from arriving at all is
//! [`GatewayError::Transport`].

use reqwest::Response;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;

use waymark_model::{GatewayError, GatewayResult};

/// Base URL, token, and connection pool for the itinerary service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl ApiClient {
    #[must_use]
    pub fn new(http: reqwest::Client, base: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            http,
            base,
            token: token.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let response = self
            .http
            .get(self.endpoint(path))
            .header(AUTHORIZATION, self.token.as_str())
            .send()
            .await
            .map_err(GatewayError::transport)?;
        decode(path, response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(path))
            .header(AUTHORIZATION, self.token.as_str())
            .json(body)
            .send()
            .await
            .map_err(GatewayError::transport)?;
        decode(path, response).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .put(self.endpoint(path))
            .header(AUTHORIZATION, self.token.as_str())
            .json(body)
            .send()
            .await
            .map_err(GatewayError::transport)?;
        decode(path, response).await
    }

    pub async fn delete(&self, path: &str) -> GatewayResult<()> {
        let response = self
            .http
            .delete(self.endpoint(path))
            .header(AUTHORIZATION, self.token.as_str())
            .send()
            .await
            .map_err(GatewayError::transport)?;
        check_status(path, response)?;
        Ok(())
    }
}

fn check_status(path: &str, response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::debug!(path, status = status.as_u16(), "service rejected request");
        Err(GatewayError::Status {
            status: status.as_u16(),
        })
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> GatewayResult<T> {
    let response = check_status(path, response)?;
    response.json::<T>().await.map_err(|err| {
        if err.is_decode() {
            GatewayError::decode(err)
        } else {
            GatewayError::transport(err)
        }
    })
}
