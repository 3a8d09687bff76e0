// src/api/client.rs
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::{DashboardError, Result},
    log_debug,
};

use super::{
    types::NextRunsResponse, ControllerApi, ControllerConfig, NextRunTable, QueueSnapshot,
    Schedule, SimulationRequest, StatusSnapshot, ValveAction, ValveDetail,
};

/// Error body shapes the controller uses (`detail` from the framework,
/// `error` from handlers).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpControllerApi {
    client: Client,
    base_url: Url,
}

impl HttpControllerApi {
    pub fn new(base_url: &str, request_timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let trimmed = base_url.trim_end_matches('/');
        let base_url = Url::parse(trimmed)
            .map_err(|e| DashboardError::Runtime(format!("Invalid API URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::Runtime(format!("Invalid API URL '{}'", trimmed)));
        }

        Ok(Self { client, base_url })
    }

    /// Appends path segments, percent-encoding each (valve names may hold
    /// spaces).
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        log_debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let fallback = status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail.or(body.error).unwrap_or(fallback),
            Err(_) => fallback,
        };

        Err(DashboardError::Application {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let response = self.request(Method::GET, segments).send().await?;
        let body = Self::check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        let response = builder.send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ControllerApi for HttpControllerApi {
    async fn status(&self) -> Result<StatusSnapshot> {
        self.get_json(&["status"]).await
    }

    async fn queue(&self) -> Result<QueueSnapshot> {
        self.get_json(&["queue"]).await
    }

    async fn next_runs(&self) -> Result<NextRunTable> {
        let response: NextRunsResponse = self.get_json(&["next-runs"]).await?;
        Ok(response.next_runs)
    }

    async fn config(&self) -> Result<ControllerConfig> {
        self.get_json(&["config"]).await
    }

    async fn valve_action(&self, valve: &str, action: ValveAction) -> Result<()> {
        let mut builder = self.request(Method::POST, &["valves", valve, action.path_segment()]);
        if let ValveAction::Queue { duration_minutes } = action {
            builder = builder.query(&[("duration_minutes", duration_minutes)]);
        }
        self.send_empty(builder).await
    }

    async fn valve_detail(&self, valve: &str) -> Result<ValveDetail> {
        self.get_json(&["valves", valve]).await
    }

    async fn create_schedule(&self, valve: &str, schedule: &Schedule) -> Result<()> {
        let builder = self
            .request(Method::POST, &["valves", valve, "schedules"])
            .json(schedule);
        self.send_empty(builder).await
    }

    async fn update_schedule(&self, valve: &str, index: usize, schedule: &Schedule) -> Result<()> {
        let index = index.to_string();
        let builder = self
            .request(Method::PUT, &["valves", valve, "schedules", &index])
            .json(schedule);
        self.send_empty(builder).await
    }

    async fn delete_schedule(&self, valve: &str, index: usize) -> Result<()> {
        let index = index.to_string();
        let builder = self.request(Method::DELETE, &["valves", valve, "schedules", &index]);
        self.send_empty(builder).await
    }

    async fn simulate(&self, request: &SimulationRequest) -> Result<String> {
        let response = self
            .request(Method::POST, &["simulate"])
            .query(&request.query_pairs())
            .send()
            .await?;
        Ok(Self::check(response).await?.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_valve_names() {
        let api = HttpControllerApi::new("http://controller.local:8000/api/", None).unwrap();
        let url = api.endpoint(&["valves", "Front Lawn", "start-manual"]);
        assert_eq!(
            url.as_str(),
            "http://controller.local:8000/api/valves/Front%20Lawn/start-manual"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(HttpControllerApi::new("not a url", None).is_err());
        assert!(HttpControllerApi::new("mailto:ops@example.com", None).is_err());
    }

    #[tokio::test]
    async fn unreachable_controller_is_a_transport_error() {
        let api = HttpControllerApi::new("http://127.0.0.1:9/api", Some(Duration::from_millis(500))).unwrap();
        let err = api.status().await.unwrap_err();
        assert!(err.is_transport());
    }
}
