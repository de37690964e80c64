//! Integration tests for equipment and project repositories.

use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;
use yardline_core::error::YardlineError;
use yardline_core::models::equipment::{
    ComplianceStatus, CreateEquipment, EquipmentStatus, UpdateEquipment,
};
use yardline_core::models::project::{CreateProject, ProjectStatus, UpdateProject};
use yardline_core::repository::{EquipmentRepository, Pagination, ProjectRepository};
use yardline_db::repository::{SurrealEquipmentRepository, SurrealProjectRepository};

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    yardline_db::run_migrations(&db).await.unwrap();
    db
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn excavator(tenant_id: Uuid) -> CreateEquipment {
    CreateEquipment {
        tenant_id,
        project_id: None,
        name: "CAT 320 Excavator".into(),
        category: "Earthmoving".into(),
        serial_number: Some("CAT0320X1".into()),
        status: EquipmentStatus::Available,
        last_maintenance: Some(date(2025, 1, 10)),
        next_maintenance: Some(date(2025, 7, 10)),
        certification_required: true,
        certification_expiry: Some(date(2026, 1, 1)),
        last_inspection: None,
        next_inspection: Some(date(2025, 9, 1)),
        compliance_status: ComplianceStatus::Compliant,
    }
}

#[tokio::test]
async fn equipment_roundtrips_dates() {
    let db = setup().await;
    let repo = SurrealEquipmentRepository::new(db);
    let tenant_id = Uuid::new_v4();

    let created = repo.create(excavator(tenant_id)).await.unwrap();
    assert_eq!(created.next_maintenance, Some(date(2025, 7, 10)));
    assert_eq!(created.certification_expiry, Some(date(2026, 1, 1)));
    assert!(created.last_inspection.is_none());
    assert!(created.certification_required);

    let fetched = repo.get_by_id(tenant_id, created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn equipment_is_tenant_scoped() {
    let db = setup().await;
    let repo = SurrealEquipmentRepository::new(db);
    let tenant_id = Uuid::new_v4();

    let created = repo.create(excavator(tenant_id)).await.unwrap();
    let other = repo.get_by_id(Uuid::new_v4(), created.id).await;
    assert!(matches!(other, Err(YardlineError::NotFound { .. })));

    // Deleting from the wrong tenant leaves the record in place.
    repo.delete(Uuid::new_v4(), created.id).await.unwrap();
    assert!(repo.get_by_id(tenant_id, created.id).await.is_ok());
}

#[tokio::test]
async fn update_equipment_sets_and_clears_dates() {
    let db = setup().await;
    let repo = SurrealEquipmentRepository::new(db);
    let tenant_id = Uuid::new_v4();
    let created = repo.create(excavator(tenant_id)).await.unwrap();

    let updated = repo
        .update(
            tenant_id,
            created.id,
            UpdateEquipment {
                next_maintenance: Some(Some(date(2025, 8, 1))),
                next_inspection: Some(None),
                status: Some(EquipmentStatus::InUse),
                certification_required: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.next_maintenance, Some(date(2025, 8, 1)));
    assert!(updated.next_inspection.is_none());
    assert_eq!(updated.status, EquipmentStatus::InUse);
    assert!(!updated.certification_required);
    assert_eq!(updated.name, created.name);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn unparsable_stored_date_reads_as_absent() {
    let db = setup().await;
    let repo = SurrealEquipmentRepository::new(db.clone());
    let tenant_id = Uuid::new_v4();
    let created = repo.create(excavator(tenant_id)).await.unwrap();

    db.query("UPDATE type::record('equipment', $id) SET next_maintenance = 'next week'")
        .bind(("id", created.id.to_string()))
        .await
        .unwrap();

    let fetched = repo.get_by_id(tenant_id, created.id).await.unwrap();
    assert!(fetched.next_maintenance.is_none());
    assert_eq!(fetched.next_inspection, Some(date(2025, 9, 1)));
}

#[tokio::test]
async fn snapshot_is_ordered_by_id() {
    let db = setup().await;
    let repo = SurrealEquipmentRepository::new(db);
    let tenant_id = Uuid::new_v4();

    for _ in 0..4 {
        repo.create(excavator(tenant_id)).await.unwrap();
    }
    repo.create(excavator(Uuid::new_v4())).await.unwrap();

    let snapshot = repo.snapshot(tenant_id).await.unwrap();
    assert_eq!(snapshot.len(), 4);
    assert!(snapshot.windows(2).all(|w| w[0].id < w[1].id));

    let page = repo
        .list_by_tenant(
            tenant_id,
            Pagination {
                offset: 0,
                limit: 3,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.items.len(), 3);
}

#[tokio::test]
async fn project_crud() {
    let db = setup().await;
    let repo = SurrealProjectRepository::new(db);
    let tenant_id = Uuid::new_v4();

    let project = repo
        .create(CreateProject {
            tenant_id,
            name: "Riverside Bridge".into(),
            description: "Deck replacement".into(),
            location: Some("Pier 4".into()),
            status: ProjectStatus::Planning,
            start_date: Some(date(2025, 3, 1)),
            end_date: None,
        })
        .await
        .unwrap();
    assert_eq!(project.start_date, Some(date(2025, 3, 1)));

    let updated = repo
        .update(
            tenant_id,
            project.id,
            UpdateProject {
                status: Some(ProjectStatus::Active),
                end_date: Some(Some(date(2025, 12, 1))),
                location: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, ProjectStatus::Active);
    assert_eq!(updated.end_date, Some(date(2025, 12, 1)));
    assert!(updated.location.is_none());

    let list = repo
        .list_by_tenant(tenant_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(list.total, 1);

    repo.delete(tenant_id, project.id).await.unwrap();
    assert!(repo.get_by_id(tenant_id, project.id).await.is_err());
}
