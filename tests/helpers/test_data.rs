//! Test data fixtures

use HappySmile::models::{
    Appointment, AppointmentSummary, Clinic, ClinicSummary, InboundEvent, MessageHandle, QueueCount,
    Sender,
};

use super::StubBackend;

pub const CHAT_ID: i64 = 424242;
pub const NRIC: &str = "S1234567D";
pub const POSTAL: &str = "520001";

pub fn sender() -> Sender {
    Sender {
        id: CHAT_ID,
        first_name: "Mei".to_string(),
    }
}

pub fn text(chat_id: i64, text: &str) -> InboundEvent {
    InboundEvent::text(chat_id, Some(sender()), text)
}

/// Button tap on the message with id `message_id`
pub fn tap(chat_id: i64, data: &str, message_id: i32) -> InboundEvent {
    InboundEvent::callback(
        chat_id,
        Some(sender()),
        data,
        Some(MessageHandle { chat_id, message_id }),
    )
}

pub fn clinic_summary(id: &str, name: &str) -> ClinicSummary {
    ClinicSummary {
        clinic_id: id.to_string(),
        clinic_name: name.to_string(),
    }
}

pub fn clinic(id: &str, name: &str) -> Clinic {
    Clinic {
        clinic_id: id.to_string(),
        clinic_name: name.to_string(),
        clinic_address: "1 Tampines Ave. 4".to_string(),
        clinic_postal: POSTAL.to_string(),
        clinic_unit: "01-23".to_string(),
        clinic_email: "hello_there@smile.sg".to_string(),
        clinic_sub_email: None,
        clinic_phone: "61234567".to_string(),
        clinic_sub_phone: None,
    }
}

pub fn appointment_summary(id: &str, start: &str) -> AppointmentSummary {
    AppointmentSummary {
        appt_id: id.to_string(),
        start_date_time: start.to_string(),
        first_name: "Mei".to_string(),
        last_name: "Tan".to_string(),
    }
}

pub fn appointment(status: &str) -> Appointment {
    Appointment {
        start_date_time: "05/03/2023 14:30".to_string(),
        status: status.to_string(),
        clinic_name: "Bright Smiles (Tampines)".to_string(),
        clinic_address: "1 Tampines Ave. 4".to_string(),
        clinic_unit: "01-23".to_string(),
        clinic_postal: POSTAL.to_string(),
        clinic_email: "hello@bright.sg".to_string(),
        clinic_sub_email: Some("care@bright.sg".to_string()),
        clinic_phone: "61234567".to_string(),
        clinic_sub_phone: Some("69876543".to_string()),
    }
}

/// A backend with two clinics, one patient and one queue
pub fn populated_backend() -> StubBackend {
    let clinics = vec![
        clinic_summary("1", "Bright Smiles"),
        clinic_summary("2", "Happy Teeth"),
    ];

    let mut backend = StubBackend::default();
    backend.clinics = clinics.clone();
    backend.clinics_by_postal.insert(POSTAL.to_string(), vec![clinics[0].clone()]);
    backend.clinic_records.insert("1".to_string(), clinic("1", "Bright Smiles"));
    backend.clinic_records.insert("2".to_string(), clinic("2", "Happy Teeth"));
    backend.appointments_by_nric.insert(
        NRIC.to_string(),
        vec![
            appointment_summary("42", "05/03/2023 14:30"),
            appointment_summary("43", "12/03/2023 09:00"),
        ],
    );
    backend.appointment_records.insert("42".to_string(), appointment("Upcoming"));
    backend.queues.insert(
        "1".to_string(),
        QueueCount {
            clinic_name: "Bright Smiles".to_string(),
            count: 12,
        },
    );
    backend
}
