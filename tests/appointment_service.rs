//! Integration tests for `AppointmentService`: pricing on create, month
//! windows, upcoming appointments and the future/past paginated listing.

mod common;

use catalog_backend::dtos::appointment::{AppointmentInput, Dataset};
use catalog_backend::dtos::pagination::PageRequest;
use catalog_backend::dtos::product::ProductInput;
use catalog_backend::error::AppError;
use catalog_backend::models::appointment::AppointmentStatus;
use catalog_backend::models::tariff::Tariff;
use catalog_backend::services::{AppointmentService, CrudService, ProductService};
use chrono::NaiveDate;
use common::{d, days_after, db_today, product};
use sqlx::PgPool;

async fn seed_product(pool: &PgPool) -> i64 {
    let input = ProductInput {
        tariffs: Some(vec![Tariff {
            start_date: Some(d("2024-06-01")),
            end_date: Some(d("2024-06-30")),
            price: 15.0,
            status: None,
        }]),
        ..product("Guided tasting", "TST-1", 10.0)
    };
    ProductService::new(pool.clone()).create(input).await.unwrap().id
}

fn booking(product_id: i64, date: NaiveDate) -> AppointmentInput {
    AppointmentInput {
        product_id: Some(product_id),
        date: Some(date),
        total: Some(0.0),
        ..Default::default()
    }
}

fn with_status(product_id: i64, date: NaiveDate, status: AppointmentStatus) -> AppointmentInput {
    AppointmentInput {
        status: Some(status),
        ..booking(product_id, date)
    }
}

// ---------------------------------------------------------------------------
// Create / update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_prices_from_tariff_when_total_omitted(pool: PgPool) {
    let product_id = seed_product(&pool).await;
    let service = AppointmentService::new(pool);

    let in_tariff = service
        .create(AppointmentInput {
            product_id: Some(product_id),
            date: Some(d("2024-06-10")),
            units: Some(3),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(in_tariff.total, 45.0);
    assert_eq!(in_tariff.status, AppointmentStatus::Pending);

    let base_price = service
        .create(AppointmentInput {
            product_id: Some(product_id),
            date: Some(d("2024-07-10")),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(base_price.units, 1);
    assert_eq!(base_price.total, 10.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_validates_before_writing(pool: PgPool) {
    let service = AppointmentService::new(pool);

    let err = service.create(AppointmentInput::default()).await.unwrap_err();
    match err {
        AppError::Validation(errors) => {
            let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
            assert_eq!(fields, vec!["product_id", "date"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let missing_product = service.create(booking(999_999, d("2024-06-10"))).await;
    assert!(matches!(missing_product, Err(AppError::Validation(_))));

    let unpriced_missing_product = service
        .create(AppointmentInput {
            total: None,
            ..booking(999_999, d("2024-06-10"))
        })
        .await;
    assert!(matches!(unpriced_missing_product, Err(AppError::Validation(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_deleted_product_cannot_be_booked(pool: PgPool) {
    let product_id = seed_product(&pool).await;
    let other_id = ProductService::new(pool.clone())
        .create(product("Cellar tour", "CEL-1", 25.0))
        .await
        .unwrap()
        .id;
    let service = AppointmentService::new(pool.clone());
    let existing = service.create(booking(other_id, d("2024-06-10"))).await.unwrap();

    assert!(ProductService::new(pool).delete(product_id).await.unwrap());

    let explicit_total = service
        .create(AppointmentInput {
            total: Some(40.0),
            ..booking(product_id, d("2024-06-10"))
        })
        .await;
    match explicit_total {
        Err(AppError::Validation(errors)) => assert_eq!(errors[0].field, "product_id"),
        other => panic!("expected validation error, got {other:?}"),
    }

    let repointed = service
        .update(
            existing.id,
            AppointmentInput {
                product_id: Some(product_id),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(repointed, Err(AppError::Validation(_))));
    let unchanged = service.get_by_id(existing.id).await.unwrap().unwrap();
    assert_eq!(unchanged.product_id, other_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_applies_partial_fields(pool: PgPool) {
    let product_id = seed_product(&pool).await;
    let service = AppointmentService::new(pool);
    let created = service.create(booking(product_id, d("2024-06-10"))).await.unwrap();

    let updated = service
        .update(
            created.id,
            AppointmentInput {
                status: Some(AppointmentStatus::Confirmed),
                notes: Some(Some("Window seat".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, AppointmentStatus::Confirmed);
    assert_eq!(updated.notes.as_deref(), Some("Window seat"));
    assert_eq!(updated.date, d("2024-06-10"));

    let bad_units = service
        .update(
            created.id,
            AppointmentInput {
                units: Some(0),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(bad_units, Err(AppError::Validation(_))));

    let missing = service.update(999_999, AppointmentInput::default()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_is_physical(pool: PgPool) {
    let product_id = seed_product(&pool).await;
    let service = AppointmentService::new(pool);
    let created = service.create(booking(product_id, d("2024-06-10"))).await.unwrap();

    assert!(service.delete(created.id).await.unwrap());
    assert!(service.get_by_id(created.id).await.unwrap().is_none());
    assert!(!service.delete(created.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Month view
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_get_by_month_includes_both_bounds(pool: PgPool) {
    let product_id = seed_product(&pool).await;
    let service = AppointmentService::new(pool);
    for date in ["2024-01-31", "2024-02-01", "2024-02-15", "2024-02-29", "2024-03-01"] {
        service.create(booking(product_id, d(date))).await.unwrap();
    }

    let february = service.get_by_month(2, 2024).await.unwrap();
    let dates: Vec<_> = february.iter().map(|a| a.appointment.date).collect();
    assert_eq!(dates, vec![d("2024-02-01"), d("2024-02-15"), d("2024-02-29")]);

    let summary = february[0].product.as_ref().expect("product info is joined");
    assert_eq!(summary.name, "Guided tasting");
    assert_eq!(summary.price, 10.0);

    assert!(matches!(
        service.get_by_month(13, 2024).await,
        Err(AppError::Validation(_))
    ));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_by_month_names_the_invalid_field(pool: PgPool) {
    let service = AppointmentService::new(pool);

    let field = |result: Result<_, AppError>| match result {
        Err(AppError::Validation(errors)) => errors[0].field.clone(),
        other => panic!("expected validation error, got {other:?}"),
    };
    assert_eq!(field(service.get_by_month(0, 2024).await), "month");
    assert_eq!(field(service.get_by_month(6, i32::MAX).await), "year");
}

// ---------------------------------------------------------------------------
// Upcoming / paginated
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_get_future_keeps_open_statuses_in_date_order(pool: PgPool) {
    let product_id = seed_product(&pool).await;
    let today = db_today(&pool).await;
    let service = AppointmentService::new(pool);

    let later = service
        .create(with_status(product_id, days_after(today, 10), AppointmentStatus::Confirmed))
        .await
        .unwrap();
    let sooner = service
        .create(with_status(product_id, days_after(today, 3), AppointmentStatus::Pending))
        .await
        .unwrap();
    let farthest = service
        .create(with_status(product_id, days_after(today, 20), AppointmentStatus::Pending))
        .await
        .unwrap();
    service
        .create(with_status(product_id, days_after(today, 5), AppointmentStatus::Cancelled))
        .await
        .unwrap();
    service
        .create(with_status(product_id, days_after(today, 6), AppointmentStatus::Completed))
        .await
        .unwrap();
    service
        .create(with_status(product_id, days_after(today, -4), AppointmentStatus::Pending))
        .await
        .unwrap();

    let ids: Vec<_> = service
        .get_future(10)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.appointment.id)
        .collect();
    assert_eq!(ids, vec![sooner.id, later.id, farthest.id]);

    let capped = service.get_future(2).await.unwrap();
    assert_eq!(capped.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_paginated_partitions_around_today(pool: PgPool) {
    let product_id = seed_product(&pool).await;
    let today = db_today(&pool).await;
    let service = AppointmentService::new(pool);

    for offset in [7, -2, 14, -30, 3, -9, 21] {
        service
            .create(booking(product_id, days_after(today, offset)))
            .await
            .unwrap();
    }

    let future = service
        .get_paginated(Dataset::Future, PageRequest::new(1, 10))
        .await
        .unwrap();
    let dates: Vec<_> = future.data.iter().map(|a| a.appointment.date).collect();
    assert_eq!(
        dates,
        vec![days_after(today, 3), days_after(today, 7), days_after(today, 14), days_after(today, 21)]
    );
    assert_eq!(future.count, 4);

    let past = service
        .get_paginated(Dataset::Past, PageRequest::new(1, 2))
        .await
        .unwrap();
    let dates: Vec<_> = past.data.iter().map(|a| a.appointment.date).collect();
    assert_eq!(dates, vec![days_after(today, -2), days_after(today, -9)]);
    assert_eq!(past.count, 3);

    let past_second_page = service
        .get_paginated(Dataset::Past, PageRequest::new(2, 2))
        .await
        .unwrap();
    assert_eq!(past_second_page.data.len(), 1);
    assert_eq!(past_second_page.data[0].appointment.date, days_after(today, -30));
    assert_eq!(past_second_page.count, 3);
}
