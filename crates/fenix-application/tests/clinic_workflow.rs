use std::sync::Arc;

use fenix_application::ClinicService;
use fenix_core::FenixError;
use fenix_core::field_update::FieldUpdate;
use fenix_core::document::StorageDocument;
use fenix_core::patient::{PatientInput, PatientPatch};
use fenix_core::session::{Session, SessionInput};
use fenix_infrastructure::{
    EphemeralDocumentStore, FenixConfig, FenixPaths, InMemoryDocumentStore, open_document_store,
};
use serde_json::json;
use tempfile::TempDir;

fn in_memory() -> ClinicService {
    ClinicService::from_store(Arc::new(InMemoryDocumentStore::new()))
}

#[tokio::test]
async fn test_patient_with_session_then_cascade_delete() {
    let service = in_memory();

    let patient = service
        .create_patient(PatientInput {
            full_name: "Jane Roe".to_string(),
            age: 7,
            parents_names: "Roe Family".to_string(),
            reason: None,
        })
        .await
        .unwrap();

    let session = service
        .create_session(
            &patient.id,
            SessionInput {
                title: "Initial assessment".to_string(),
                date: "2024-01-15".to_string(),
                notes: None,
                progress: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(
        service.list_sessions_by_patient(&patient.id).await.unwrap(),
        vec![session]
    );

    assert!(service.delete_patient(&patient.id).await.unwrap());
    assert!(service.list_sessions_by_patient(&patient.id).await.unwrap().is_empty());
    assert!(service.get_patient(&patient.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_form_flow_create_edit_overview() {
    let service = in_memory();

    let patient = service
        .submit_new_patient(&json!({
            "fullName": "Mateo Cruz",
            "age": 9,
            "parentsNames": "Ana y Luis Cruz",
            "reason": "Attention difficulties at school"
        }))
        .await
        .unwrap();

    for (title, date) in [
        ("Intake", "2024-01-10"),
        ("Third visit", "2024-03-02"),
        ("Second visit", "2024-02-05"),
    ] {
        service
            .submit_new_session(&patient.id, &json!({"title": title, "date": date, "notes": ""}))
            .await
            .unwrap();
    }

    // Blank reason on edit clears the stored reason.
    let edited = service
        .submit_patient_edit(
            &patient.id,
            &json!({"fullName": "Mateo Cruz", "age": 10, "parentsNames": "Ana y Luis Cruz", "reason": ""}),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.age, 10);
    assert!(edited.reason.is_none());
    assert!(edited.updated_at > patient.updated_at);

    let overview = service.patient_overview(&patient.id).await.unwrap();
    assert_eq!(overview.patient, edited);
    let dates: Vec<_> = overview.sessions.iter().map(|s| s.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-03-02", "2024-02-05", "2024-01-10"]);
    assert!(overview.sessions.iter().all(|s| s.notes.is_none()));
}

#[tokio::test]
async fn test_session_edit_validation_and_missing_ids() {
    let service = in_memory();
    let patient = service
        .submit_new_patient(&json!({"fullName": "Jane Roe", "age": 7, "parentsNames": "Roe Family"}))
        .await
        .unwrap();
    let session = service
        .submit_new_session(&patient.id, &json!({"title": "Intake", "date": "2024-01-15"}))
        .await
        .unwrap();

    let err = service
        .submit_session_edit(&session.id, &json!({"title": "Intake", "date": "2024-13-40"}))
        .await
        .unwrap_err();
    match err {
        FenixError::Validation(errors) => assert_eq!(errors[0].field, "date"),
        other => panic!("unexpected error: {other:?}"),
    }

    let edited = service
        .submit_session_edit(
            &session.id,
            &json!({"title": "Intake", "date": "2024-01-16", "progress": "Named five colours"}),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.patient_id, patient.id);
    assert_eq!(edited.progress.as_deref(), Some("Named five colours"));

    assert!(service
        .submit_session_edit("missing", &json!({"title": "Intake", "date": "2024-01-16"}))
        .await
        .unwrap()
        .is_none());
    assert!(service
        .update_patient("missing", PatientPatch { reason: FieldUpdate::Clear, ..Default::default() })
        .await
        .unwrap()
        .is_none());
    assert!(service.patient_overview("missing").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_backup_restores_into_fresh_file_store() {
    let source_dir = TempDir::new().unwrap();
    let target_dir = TempDir::new().unwrap();

    let open = |dir: &TempDir| {
        let paths = FenixPaths::new(Some(dir.path()));
        ClinicService::from_store(open_document_store(&FenixConfig::default(), &paths))
    };

    let source = open(&source_dir);
    let patient = source
        .submit_new_patient(&json!({"fullName": "Jane Roe", "age": 7, "parentsNames": "Roe Family"}))
        .await
        .unwrap();
    source
        .submit_new_session(&patient.id, &json!({"title": "Intake", "date": "2024-01-15"}))
        .await
        .unwrap();
    let backup = source.export_document().await.unwrap();

    let target = open(&target_dir);
    assert!(target.import_document(&backup).await.unwrap());
    drop(target);

    // A new service over the same directory sees the restored records.
    let reopened = open(&target_dir);
    assert_eq!(reopened.list_patients().await.unwrap(), vec![patient.clone()]);
    assert_eq!(
        reopened.list_sessions_by_patient(&patient.id).await.unwrap(),
        source.list_sessions_by_patient(&patient.id).await.unwrap()
    );
    assert!(target_dir.path().join("fenix_clinic_v1.json").exists());
}

#[tokio::test]
async fn test_ephemeral_store_keeps_nothing() {
    let service = ClinicService::from_store(Arc::new(EphemeralDocumentStore));
    let patient = service
        .submit_new_patient(&json!({"fullName": "Jane Roe", "age": 7, "parentsNames": "Roe Family"}))
        .await
        .unwrap();

    assert!(!patient.id.is_empty());
    assert!(service.list_patients().await.unwrap().is_empty());
    assert_eq!(
        service.export_document().await.unwrap(),
        "{\n  \"patients\": [],\n  \"sessions\": []\n}"
    );
}

#[tokio::test]
async fn test_orphan_sessions_stay_listable_until_pruned() {
    let mut document = StorageDocument::new();
    for date in ["2024-01-10", "2024-02-05"] {
        document.sessions.push(Session::new(
            "gone",
            SessionInput {
                title: "Left behind".to_string(),
                date: date.to_string(),
                notes: None,
                progress: None,
            },
        ));
    }
    let service = ClinicService::from_store(Arc::new(InMemoryDocumentStore::with_document(document)));

    assert_eq!(service.list_sessions_by_patient("gone").await.unwrap().len(), 2);
    assert!(service.patient_overview("gone").await.unwrap_err().is_not_found());

    assert_eq!(service.remove_orphan_sessions().await.unwrap(), 2);
    assert!(service.list_sessions_by_patient("gone").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unvalidated_records_survive_backup_round_trip() {
    let service = in_memory();
    let patient = service
        .create_patient(PatientInput {
            full_name: "Al".to_string(),
            age: 200,
            parents_names: "Bo".to_string(),
            reason: None,
        })
        .await
        .unwrap();
    let backup = service.export_document().await.unwrap();

    let restored = in_memory();
    assert!(restored.import_document(&backup).await.unwrap());
    assert_eq!(restored.list_patients().await.unwrap(), vec![patient]);
}

#[tokio::test]
async fn test_unusable_data_file_degrades_to_empty_records() {
    let temp_dir = TempDir::new().unwrap();
    let data_file = temp_dir.path().join("records.json");
    std::fs::create_dir(&data_file).unwrap();

    let config = FenixConfig::default().with_data_file(Some(data_file.clone()));
    let paths = FenixPaths::new(Some(temp_dir.path()));
    let service = ClinicService::from_store(open_document_store(&config, &paths));

    assert!(service.list_patients().await.unwrap().is_empty());
    let patient = service
        .submit_new_patient(&json!({"fullName": "Jane Roe", "age": 7, "parentsNames": "Roe Family"}))
        .await
        .unwrap();
    assert!(service.get_patient(&patient.id).await.unwrap().is_none());
    assert!(data_file.is_dir());
}
