//! Integration tests for the compliance service.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use tokio::task::JoinSet;
use uuid::Uuid;
use yardline_compliance::{ComplianceConfig, ComplianceService};
use yardline_core::error::YardlineError;
use yardline_core::models::alert::{AlertPriority, AlertStatus, AlertType};
use yardline_core::models::equipment::{
    ComplianceStatus, CreateEquipment, EquipmentStatus, UpdateEquipment,
};
use yardline_core::repository::{EquipmentRepository, NotificationRepository};
use yardline_db::repository::{
    SurrealAlertRepository, SurrealEquipmentRepository, SurrealNotificationRepository,
};

type Service = ComplianceService<
    SurrealEquipmentRepository<Db>,
    SurrealAlertRepository<Db>,
    SurrealNotificationRepository<Db>,
>;

struct Fixture {
    service: Service,
    equipment: SurrealEquipmentRepository<Db>,
    notifications: SurrealNotificationRepository<Db>,
    tenant_id: Uuid,
}

async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    yardline_db::run_migrations(&db).await.unwrap();

    let service = ComplianceService::new(
        SurrealEquipmentRepository::new(db.clone()),
        SurrealAlertRepository::new(db.clone()),
        SurrealNotificationRepository::new(db.clone()),
        ComplianceConfig::default(),
    );

    Fixture {
        service,
        equipment: SurrealEquipmentRepository::new(db.clone()),
        notifications: SurrealNotificationRepository::new(db),
        tenant_id: Uuid::new_v4(),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn days(n: i64) -> NaiveDate {
    today() + Duration::days(n)
}

fn machine(tenant_id: Uuid, name: &str, next_maintenance: Option<NaiveDate>) -> CreateEquipment {
    CreateEquipment {
        tenant_id,
        project_id: None,
        name: name.into(),
        category: "Earthmoving".into(),
        serial_number: None,
        status: EquipmentStatus::InUse,
        last_maintenance: None,
        next_maintenance,
        certification_required: false,
        certification_expiry: None,
        last_inspection: None,
        next_inspection: None,
        compliance_status: ComplianceStatus::Unknown,
    }
}

#[tokio::test]
async fn overdue_equipment_raises_critical_alert_and_notification() {
    let f = setup().await;
    f.equipment
        .create(machine(f.tenant_id, "Wheel loader", Some(days(-1))))
        .await
        .unwrap();

    let outcome = f.service.refresh_at(f.tenant_id, today()).await.unwrap();
    assert!(outcome.recomputed);
    assert_eq!(outcome.alerts.len(), 1);
    assert_eq!(outcome.alerts[0].alert_type, AlertType::Maintenance);
    assert_eq!(outcome.alerts[0].priority, AlertPriority::Critical);
    assert_eq!(outcome.alerts[0].status, AlertStatus::Open);
    assert_eq!(outcome.notifications_emitted, 1);

    let notifications = f.notifications.list(f.tenant_id, false).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].priority, AlertPriority::Critical);
    assert_eq!(notifications[0].alert_id, Some(outcome.alerts[0].id));
}

#[tokio::test]
async fn unchanged_snapshot_skips_recomputation() {
    let f = setup().await;
    f.equipment
        .create(machine(f.tenant_id, "Wheel loader", Some(days(10))))
        .await
        .unwrap();

    let first = f.service.refresh_at(f.tenant_id, today()).await.unwrap();
    assert!(first.recomputed);
    assert_eq!(first.alerts[0].priority, AlertPriority::High);

    let second = f.service.refresh_at(f.tenant_id, today()).await.unwrap();
    assert!(!second.recomputed);
    assert_eq!(second.notifications_emitted, 0);
    let first_ids: Vec<_> = first.alerts.iter().map(|a| a.id).collect();
    let second_ids: Vec<_> = second.alerts.iter().map(|a| a.id).collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn day_rollover_recomputes_with_same_identity() {
    let f = setup().await;
    f.equipment
        .create(machine(f.tenant_id, "Wheel loader", Some(days(1))))
        .await
        .unwrap();

    let first = f.service.refresh_at(f.tenant_id, today()).await.unwrap();
    let later = f
        .service
        .refresh_at(f.tenant_id, days(2))
        .await
        .unwrap();

    assert!(later.recomputed);
    assert_eq!(later.alerts.len(), 1);
    assert_eq!(later.alerts[0].id, first.alerts[0].id);
    assert_eq!(later.alerts[0].priority, AlertPriority::Critical);
    // Already notified when it was first raised.
    assert_eq!(later.notifications_emitted, 0);
}

#[tokio::test]
async fn acknowledged_alert_survives_equipment_edits() {
    let f = setup().await;
    let loader = f
        .equipment
        .create(machine(f.tenant_id, "Wheel loader", Some(days(-3))))
        .await
        .unwrap();

    let outcome = f.service.refresh_at(f.tenant_id, today()).await.unwrap();
    let alert_id = outcome.alerts[0].id;
    let acked = f.service.acknowledge(f.tenant_id, alert_id).await.unwrap();
    assert_eq!(acked.status, AlertStatus::Acknowledged);

    // Touch an unrelated field so the snapshot changes.
    f.equipment
        .update(
            f.tenant_id,
            loader.id,
            UpdateEquipment {
                serial_number: Some(Some("WL-9".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = f.service.refresh_at(f.tenant_id, today()).await.unwrap();
    assert!(after.recomputed);
    assert_eq!(after.alerts.len(), 1);
    assert_eq!(after.alerts[0].id, alert_id);
    assert_eq!(after.alerts[0].status, AlertStatus::Acknowledged);
    assert_eq!(after.notifications_emitted, 0);
}

#[tokio::test]
async fn resolved_alert_leaves_active_list() {
    let f = setup().await;
    f.equipment
        .create(machine(f.tenant_id, "Wheel loader", Some(days(-1))))
        .await
        .unwrap();
    f.equipment
        .create(machine(f.tenant_id, "Skid steer", Some(days(4))))
        .await
        .unwrap();

    let outcome = f.service.refresh_at(f.tenant_id, today()).await.unwrap();
    assert_eq!(outcome.alerts.len(), 2);
    let overdue = outcome
        .alerts
        .iter()
        .find(|a| a.priority == AlertPriority::Critical)
        .unwrap();

    let resolved = f.service.resolve(f.tenant_id, overdue.id).await.unwrap();
    assert_eq!(resolved.status, AlertStatus::Resolved);
    assert!(resolved.resolved_at.is_some());

    let active = f.service.active_alerts(f.tenant_id).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_ne!(active[0].id, overdue.id);

    let all = f.service.all_alerts(f.tenant_id).await.unwrap();
    assert_eq!(all.len(), 2);

    let summary = f.service.summary(f.tenant_id).await.unwrap();
    assert_eq!(summary.critical, 0);
    assert_eq!(summary.high, 1);
    assert_eq!(summary.open, 1);
    assert_eq!(summary.resolved, 1);

    // Two "raised" notifications plus one Low "resolved" notification.
    let notifications = f.notifications.list(f.tenant_id, false).await.unwrap();
    assert_eq!(notifications.len(), 3);
    assert!(
        notifications
            .iter()
            .any(|n| n.priority == AlertPriority::Low && n.alert_id == Some(overdue.id))
    );
}

#[tokio::test]
async fn resolved_alerts_cannot_move_again() {
    let f = setup().await;
    f.equipment
        .create(machine(f.tenant_id, "Wheel loader", Some(days(-1))))
        .await
        .unwrap();
    let outcome = f.service.refresh_at(f.tenant_id, today()).await.unwrap();
    let id = outcome.alerts[0].id;

    f.service.acknowledge(f.tenant_id, id).await.unwrap();
    let again = f.service.acknowledge(f.tenant_id, id).await;
    assert!(matches!(again, Err(YardlineError::InvalidTransition { .. })));

    f.service.resolve(f.tenant_id, id).await.unwrap();
    let reopen = f.service.acknowledge(f.tenant_id, id).await;
    assert!(matches!(reopen, Err(YardlineError::InvalidTransition { .. })));
    let twice = f.service.resolve(f.tenant_id, id).await;
    assert!(matches!(twice, Err(YardlineError::InvalidTransition { .. })));
}

#[tokio::test]
async fn unknown_alert_is_not_found() {
    let f = setup().await;
    let result = f.service.acknowledge(f.tenant_id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(YardlineError::NotFound { .. })));
}

#[tokio::test]
async fn far_future_dates_raise_nothing() {
    let f = setup().await;
    f.equipment
        .create(machine(f.tenant_id, "Wheel loader", Some(days(45))))
        .await
        .unwrap();
    f.equipment
        .create(machine(f.tenant_id, "Plate compactor", None))
        .await
        .unwrap();

    let outcome = f.service.refresh_at(f.tenant_id, today()).await.unwrap();
    assert!(outcome.recomputed);
    assert!(outcome.alerts.is_empty());
    assert_eq!(outcome.notifications_emitted, 0);
}

#[tokio::test]
async fn equipment_compliance_reports_date_status() {
    let f = setup().await;
    f.equipment
        .create(machine(f.tenant_id, "Wheel loader", Some(days(-2))))
        .await
        .unwrap();
    f.equipment
        .create(machine(f.tenant_id, "Skid steer", Some(days(60))))
        .await
        .unwrap();

    let report = f
        .service
        .equipment_compliance(f.tenant_id, today())
        .await
        .unwrap();
    assert_eq!(report.len(), 2);

    let loader = report.iter().find(|r| r.name == "Wheel loader").unwrap();
    assert_eq!(loader.recorded, ComplianceStatus::Unknown);
    assert_eq!(loader.assessed, ComplianceStatus::NonCompliant);
    let steer = report.iter().find(|r| r.name == "Skid steer").unwrap();
    assert_eq!(steer.assessed, ComplianceStatus::Compliant);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_refreshes_recompute_once() {
    let f = setup().await;
    f.equipment
        .create(machine(f.tenant_id, "Wheel loader", Some(days(-1))))
        .await
        .unwrap();

    let service = Arc::new(f.service);
    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let tenant_id = f.tenant_id;
        tasks.spawn(async move { service.refresh_at(tenant_id, today()).await });
    }

    let mut recomputed = 0;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.unwrap().unwrap();
        assert_eq!(outcome.alerts.len(), 1);
        if outcome.recomputed {
            recomputed += 1;
        }
    }
    assert_eq!(recomputed, 1);

    let notifications = f.notifications.list(f.tenant_id, false).await.unwrap();
    assert_eq!(notifications.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn acknowledge_racing_a_refresh_is_kept() {
    let f = setup().await;
    let loader = f
        .equipment
        .create(machine(f.tenant_id, "Wheel loader", Some(days(-3))))
        .await
        .unwrap();
    let outcome = f.service.refresh_at(f.tenant_id, today()).await.unwrap();
    let alert_id = outcome.alerts[0].id;

    f.equipment
        .update(
            f.tenant_id,
            loader.id,
            UpdateEquipment {
                serial_number: Some(Some("WL-9".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let (refreshed, acked) = tokio::join!(
        f.service.refresh_at(f.tenant_id, today()),
        f.service.acknowledge(f.tenant_id, alert_id),
    );
    refreshed.unwrap();
    assert_eq!(acked.unwrap().status, AlertStatus::Acknowledged);

    let active = f.service.active_alerts(f.tenant_id).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, alert_id);
    assert_eq!(active[0].status, AlertStatus::Acknowledged);
}
