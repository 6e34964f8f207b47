//! Scripted clinic backend
//!
//! Unknown keys answer with HTTP 404, like the real backend does for an
//! unknown NRIC or clinic id.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use HappySmile::models::{Appointment, AppointmentSummary, Clinic, ClinicSummary, QueueCount};
use HappySmile::services::ClinicBackend;
use HappySmile::utils::errors::{BackendError, BackendResult};

#[derive(Default)]
pub struct StubBackend {
    pub clinics: Vec<ClinicSummary>,
    pub clinics_by_postal: HashMap<String, Vec<ClinicSummary>>,
    pub clinic_records: HashMap<String, Clinic>,
    pub appointments_by_nric: HashMap<String, Vec<AppointmentSummary>>,
    pub appointment_records: HashMap<String, Appointment>,
    pub queues: HashMap<String, QueueCount>,
    /// Every call fails with 503
    pub unavailable: bool,
    calls: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Calls made so far, as `"operation:argument"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> BackendResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.unavailable {
            return Err(BackendError::Status { status: 503 });
        }
        Ok(())
    }
}

fn found<T: Clone>(value: Option<&T>) -> BackendResult<T> {
    value.cloned().ok_or(BackendError::Status { status: 404 })
}

#[async_trait]
impl ClinicBackend for StubBackend {
    async fn list_clinics(&self, postal: Option<&str>) -> BackendResult<Vec<ClinicSummary>> {
        self.record(format!("list_clinics:{}", postal.unwrap_or("all")))?;
        match postal {
            Some(postal) => Ok(self.clinics_by_postal.get(postal).cloned().unwrap_or_default()),
            None => Ok(self.clinics.clone()),
        }
    }

    async fn get_clinic(&self, clinic_id: &str) -> BackendResult<Clinic> {
        self.record(format!("get_clinic:{}", clinic_id))?;
        found(self.clinic_records.get(clinic_id))
    }

    async fn upcoming_appointments(&self, nric: &str) -> BackendResult<Vec<AppointmentSummary>> {
        self.record(format!("upcoming_appointments:{}", nric))?;
        found(self.appointments_by_nric.get(nric))
    }

    async fn get_appointment(&self, appt_id: &str) -> BackendResult<Appointment> {
        self.record(format!("get_appointment:{}", appt_id))?;
        found(self.appointment_records.get(appt_id))
    }

    async fn queue_count(&self, clinic_id: &str) -> BackendResult<QueueCount> {
        self.record(format!("queue_count:{}", clinic_id))?;
        found(self.queues.get(clinic_id))
    }
}
