//! Clinic backend client
//!
//! Read-only REST client for the clinic directory, appointments and queue
//! counts. Every call returns a [`BackendResult`]; handlers turn failures into
//! "no data" replies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::settings::BackendConfig;
use crate::models::{Appointment, AppointmentSummary, Clinic, ClinicSummary, QueueCount};
use crate::utils::errors::{BackendError, BackendResult, HappySmileError, Result};

/// Data source consumed by the flow handlers
#[async_trait]
pub trait ClinicBackend: Send + Sync {
    /// All clinics, or the clinics near `postal` when given
    async fn list_clinics(&self, postal: Option<&str>) -> BackendResult<Vec<ClinicSummary>>;

    async fn get_clinic(&self, clinic_id: &str) -> BackendResult<Clinic>;

    async fn upcoming_appointments(&self, nric: &str) -> BackendResult<Vec<AppointmentSummary>>;

    async fn get_appointment(&self, appt_id: &str) -> BackendResult<Appointment>;

    async fn queue_count(&self, clinic_id: &str) -> BackendResult<QueueCount>;
}

/// HTTP implementation of [`ClinicBackend`]
#[derive(Clone, Debug)]
pub struct BackendService {
    client: Client,
    base_url: Url,
}

impl BackendService {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(HappySmileError::Http)?;

        // Relative joins need the trailing slash to keep the last path segment
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, param: Option<&str>) -> BackendResult<Url> {
        let relative = match param {
            Some(param) => format!("{}{}", path, urlencoding::encode(param)),
            None => path.to_string(),
        };
        self.base_url
            .join(&relative)
            .map_err(|e| BackendError::RequestFailed(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> BackendResult<T> {
        debug!(url = %url, "Making backend request");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout
            } else if e.is_connect() {
                BackendError::ServiceUnavailable
            } else {
                BackendError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status { status: status.as_u16() });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ClinicBackend for BackendService {
    async fn list_clinics(&self, postal: Option<&str>) -> BackendResult<Vec<ClinicSummary>> {
        let url = self.endpoint("api/clinic/get/all/", postal)?;
        self.get_json(url).await
    }

    async fn get_clinic(&self, clinic_id: &str) -> BackendResult<Clinic> {
        let url = self.endpoint("api/clinic/get/", Some(clinic_id))?;
        self.get_json(url).await
    }

    async fn upcoming_appointments(&self, nric: &str) -> BackendResult<Vec<AppointmentSummary>> {
        let url = self.endpoint("api/appointment/get/all/upcoming/nric/", Some(nric))?;
        self.get_json(url).await
    }

    async fn get_appointment(&self, appt_id: &str) -> BackendResult<Appointment> {
        let url = self.endpoint("api/appointment/get/", Some(appt_id))?;
        self.get_json(url).await
    }

    async fn queue_count(&self, clinic_id: &str) -> BackendResult<QueueCount> {
        let url = self.endpoint("api/queue/get/count/", Some(clinic_id))?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> BackendConfig {
        BackendConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
            user_agent: "HappySmile-Bot/test".to_string(),
        }
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let service = BackendService::new(&config("https://example.com/dhrms")).unwrap();
        let url = service.endpoint("api/clinic/get/", Some("12")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/dhrms/api/clinic/get/12");

        let all = service.endpoint("api/clinic/get/all/", None).unwrap();
        assert_eq!(all.as_str(), "https://example.com/dhrms/api/clinic/get/all/");
    }

    #[test]
    fn test_endpoint_encodes_parameter() {
        let service = BackendService::new(&config("https://example.com/")).unwrap();
        let url = service.endpoint("api/clinic/get/", Some("1/../x")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/clinic/get/1%2F..%2Fx");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(BackendService::new(&config("not a url")).is_err());
    }
}
