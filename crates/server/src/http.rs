//! HTTP surface
//!
//! One handler per operation; the wire field names (`fingerprintID`,
//! `rollNumber`, ...) match what the scanner firmware and the admin
//! frontend already send. Business errors map onto status codes here:
//! validation and conflicts are 400, an unknown scan is 403, a missing
//! record is 404, anything storage-shaped is 500.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use biopass_business::{
    Admission, AdmissionService, BusinessError, EnrollmentService, Notifier, RosterService,
    ServiceContext,
};
use biopass_core::{AttendanceEvent, FingerprintId, NewStudent, Student, StudentUpdate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub ctx: ServiceContext,
    pub notifier: Arc<dyn Notifier>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/enroll", post(enroll))
        .route("/check-enrollment-requests", get(check_enrollment_requests))
        .route("/register-student", post(register_student))
        .route("/attendance", post(mark_attendance).get(list_all_attendance))
        .route("/attendance/{fingerprint_id}", get(list_attendance_for))
        .route("/students", get(list_students))
        .route(
            "/students/{fingerprint_id}",
            delete(delete_student).put(update_student),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ScanRequest {
    #[serde(rename = "fingerprintID")]
    fingerprint_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterStudentRequest {
    #[serde(rename = "fingerprintID")]
    fingerprint_id: i64,
    name: String,
    roll_number: String,
    email: String,
    mobile: String,
    parent_name: String,
    parent_email: String,
    address: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UpdateStudentRequest {
    name: Option<String>,
    roll_number: Option<String>,
    email: Option<String>,
    mobile: Option<String>,
    parent_name: Option<String>,
    parent_email: Option<String>,
    address: Option<String>,
}

impl From<UpdateStudentRequest> for StudentUpdate {
    fn from(req: UpdateStudentRequest) -> Self {
        StudentUpdate {
            name: req.name,
            roll_number: req.roll_number,
            email: req.email,
            mobile: req.mobile,
            parent_name: req.parent_name,
            parent_email: req.parent_email,
            address: req.address,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StudentDto {
    #[serde(rename = "fingerprintID")]
    fingerprint_id: FingerprintId,
    name: String,
    roll_number: String,
    email: String,
    mobile: String,
    parent_name: String,
    parent_email: String,
    address: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Student> for StudentDto {
    fn from(student: Student) -> Self {
        StudentDto {
            fingerprint_id: student.fingerprint_id,
            name: student.name,
            roll_number: student.roll_number,
            email: student.email,
            mobile: student.mobile,
            parent_name: student.parent_name,
            parent_email: student.parent_email,
            address: student.address,
            created_at: student.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct AttendanceEventDto {
    #[serde(rename = "fingerprintID")]
    fingerprint_id: FingerprintId,
    timestamp: chrono::DateTime<chrono::Utc>,
    status: biopass_core::AttendanceStatus,
}

impl From<AttendanceEvent> for AttendanceEventDto {
    fn from(event: AttendanceEvent) -> Self {
        AttendanceEventDto {
            fingerprint_id: event.fingerprint_id,
            timestamp: event.timestamp,
            status: event.status,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn enroll(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> (StatusCode, Json<Value>) {
    let service = EnrollmentService::new(&state.ctx);
    match service.request_enrollment(req.fingerprint_id).await {
        Ok(slot) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Fingerprint enrollment initiated",
                "fingerprintID": slot,
            })),
        ),
        Err(err) => error_response(err, "Failed to enroll fingerprint"),
    }
}

async fn check_enrollment_requests(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let service = EnrollmentService::new(&state.ctx);
    match service.claim_oldest_pending().await {
        Ok(Some(slot)) => (StatusCode::OK, Json(json!({ "fingerprintID": slot }))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "No pending enrollment requests" })),
        ),
        Err(err) => error_response(err, "Failed to fetch enrollment requests"),
    }
}

async fn register_student(
    State(state): State<AppState>,
    Json(req): Json<RegisterStudentRequest>,
) -> (StatusCode, Json<Value>) {
    let slot = match FingerprintId::new(req.fingerprint_id) {
        Ok(slot) => slot,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Invalid Fingerprint ID" })),
            )
        }
    };

    let new_student = NewStudent {
        fingerprint_id: slot,
        name: req.name,
        roll_number: req.roll_number,
        email: req.email,
        mobile: req.mobile,
        parent_name: req.parent_name,
        parent_email: req.parent_email,
        address: req.address,
    };

    let service = EnrollmentService::new(&state.ctx);
    match service.finalize_enrollment(new_student).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Student registered successfully" })),
        ),
        Err(err) => error_response(err, "Failed to register student"),
    }
}

async fn mark_attendance(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> (StatusCode, Json<Value>) {
    let service = AdmissionService::new(&state.ctx, state.notifier.clone());
    match service.admit(req.fingerprint_id).await {
        Ok(Admission::Granted(student)) => (
            StatusCode::OK,
            Json(json!({
                "message": "Attendance marked",
                "student": StudentDto::from(student),
            })),
        ),
        Ok(Admission::Denied) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "message": "Not Allowed",
                "fingerprintID": req.fingerprint_id,
            })),
        ),
        Err(err) => error_response(err, "Failed to mark attendance"),
    }
}

async fn list_students(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let service = RosterService::new(&state.ctx);
    match service.list_students().await {
        Ok(students) => {
            let dtos: Vec<StudentDto> = students.into_iter().map(StudentDto::from).collect();
            (StatusCode::OK, Json(json!(dtos)))
        }
        Err(err) => error_response(err, "Failed to fetch students"),
    }
}

async fn list_all_attendance(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let service = RosterService::new(&state.ctx);
    match service.list_events(None).await {
        Ok(events) => (StatusCode::OK, Json(json!(to_event_dtos(events)))),
        Err(err) => error_response(err, "Failed to fetch attendance logs"),
    }
}

async fn list_attendance_for(
    State(state): State<AppState>,
    Path(fingerprint_id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    // An out-of-range slot can own no events; an empty list, not an error
    let slot = match FingerprintId::new(fingerprint_id) {
        Ok(slot) => slot,
        Err(_) => return (StatusCode::OK, Json(json!([]))),
    };

    let service = RosterService::new(&state.ctx);
    match service.list_events(Some(slot)).await {
        Ok(events) => (StatusCode::OK, Json(json!(to_event_dtos(events)))),
        Err(err) => error_response(err, "Failed to fetch attendance records"),
    }
}

async fn delete_student(
    State(state): State<AppState>,
    Path(fingerprint_id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    let deleted = json!({ "message": "Student deleted successfully" });

    // Nothing outside the slot range can be registered; already gone
    let slot = match FingerprintId::new(fingerprint_id) {
        Ok(slot) => slot,
        Err(_) => return (StatusCode::OK, Json(deleted)),
    };

    let service = RosterService::new(&state.ctx);
    match service.delete_student(slot).await {
        Ok(()) => (StatusCode::OK, Json(deleted)),
        Err(err) => error_response(err, "Failed to delete student"),
    }
}

async fn update_student(
    State(state): State<AppState>,
    Path(fingerprint_id): Path<i64>,
    Json(req): Json<UpdateStudentRequest>,
) -> (StatusCode, Json<Value>) {
    let not_found = (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Student not found" })),
    );

    let slot = match FingerprintId::new(fingerprint_id) {
        Ok(slot) => slot,
        Err(_) => return not_found,
    };

    let service = RosterService::new(&state.ctx);
    match service.update_student(slot, req.into()).await {
        Ok(student) => (StatusCode::OK, Json(json!(StudentDto::from(student)))),
        Err(err) => error_response(err, "Failed to update student"),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn to_event_dtos(events: Vec<AttendanceEvent>) -> Vec<AttendanceEventDto> {
    events.into_iter().map(AttendanceEventDto::from).collect()
}

/// Map a business error onto a status code and client-facing message.
fn error_response(err: anyhow::Error, fallback: &str) -> (StatusCode, Json<Value>) {
    let (status, message) = match err.downcast_ref::<BusinessError>() {
        Some(e) if e.is_validation() => {
            (StatusCode::BAD_REQUEST, "Invalid Fingerprint ID".to_string())
        }
        Some(BusinessError::AlreadyBound(_)) => (
            StatusCode::BAD_REQUEST,
            "Fingerprint ID already exists".to_string(),
        ),
        Some(BusinessError::AlreadyPending(_)) => (
            StatusCode::BAD_REQUEST,
            "Enrollment request already exists for this Fingerprint ID".to_string(),
        ),
        Some(BusinessError::DuplicateRollNumber(_)) => (
            StatusCode::BAD_REQUEST,
            "Roll number already exists".to_string(),
        ),
        Some(e) if e.is_not_found() => {
            (StatusCode::NOT_FOUND, "Student not found".to_string())
        }
        _ => {
            tracing::error!(error = ?err, "request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, fallback.to_string())
        }
    };
    (status, Json(json!({ "message": message })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use biopass_core::AttendanceStatus;
    use chrono::Utc;

    #[test]
    fn test_student_dto_wire_field_names() {
        let dto = StudentDto {
            fingerprint_id: FingerprintId::new(5).unwrap(),
            name: "Alice".to_string(),
            roll_number: "R1".to_string(),
            email: "alice@example.com".to_string(),
            mobile: "555-0100".to_string(),
            parent_name: "Bob".to_string(),
            parent_email: "bob@example.com".to_string(),
            address: "1 Main St".to_string(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["fingerprintID"], 5);
        assert_eq!(value["rollNumber"], "R1");
        assert_eq!(value["parentEmail"], "bob@example.com");
    }

    #[test]
    fn test_event_dto_wire_shape() {
        let dto = AttendanceEventDto {
            fingerprint_id: FingerprintId::new(5).unwrap(),
            timestamp: Utc::now(),
            status: AttendanceStatus::Entry,
        };
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["fingerprintID"], 5);
        assert_eq!(value["status"], "entry");
    }

    #[test]
    fn test_register_request_accepts_frontend_payload() {
        let req: RegisterStudentRequest = serde_json::from_value(serde_json::json!({
            "fingerprintID": 5,
            "name": "Alice",
            "rollNumber": "R1",
            "email": "alice@example.com",
            "mobile": "555-0100",
            "parentName": "Bob",
            "parentEmail": "bob@example.com",
            "address": "1 Main St",
        }))
        .unwrap();
        assert_eq!(req.fingerprint_id, 5);
        assert_eq!(req.roll_number, "R1");
    }
}
