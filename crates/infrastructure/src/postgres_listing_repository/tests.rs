use rentline_application::ListingRepository;
use rentline_core::UserId;
use rentline_domain::{ListingChanges, ListingDraft, ListingFilter, NewListing, PageRequest};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresListingRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres listing tests: {error}");
    }

    Some(pool)
}

async fn ensure_profile(pool: &PgPool, user_id: UserId, role: &str) {
    let insert = sqlx::query(
        r#"
            INSERT INTO profiles (id, role)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
    )
    .bind(user_id.as_uuid())
    .bind(role)
    .execute(pool)
    .await;

    assert!(insert.is_ok());
}

fn draft(title: &str, property_type: &str, bedrooms: Option<i32>, price: f64) -> ListingDraft {
    ListingDraft {
        title: title.to_owned(),
        description: None,
        address: "12 Harbor Street".to_owned(),
        city: "Portland".to_owned(),
        state: "OR".to_owned(),
        zip_code: "97201".to_owned(),
        neighborhood: None,
        price,
        property_type: property_type.to_owned(),
        bedrooms,
        bathrooms: Some(1.5),
        square_footage: None,
        parking: false,
        parking_fee: 0,
        pet_friendly: true,
        pet_deposit: 250,
        utilities: vec!["water".to_owned()],
        utilities_cost: 0,
        security_deposit: None,
        minimum_lease: Some(12),
        available_date: None,
        application_fee: None,
        amenities: vec!["dishwasher".to_owned(), "balcony".to_owned()],
        image_urls: Vec::new(),
        property_manager: None,
        contact_phone: None,
        contact_email: Some("leasing@example.com".to_owned()),
        latitude: None,
        longitude: None,
        nearby_transportation: Vec::new(),
    }
}

#[tokio::test]
async fn insert_update_and_moderate_round_trip() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresListingRepository::new(pool.clone());
    let owner_id = UserId::new();
    ensure_profile(&pool, owner_id, "agent").await;

    let created = repository
        .insert(NewListing {
            owner_id,
            approved: false,
            draft: draft("Sunny loft", "loft", Some(1), 1850.0),
        })
        .await;
    assert!(created.is_ok());
    let created = created.unwrap_or_else(|_| unreachable!());
    assert!(!created.approved);
    assert_eq!(created.details.amenities.len(), 2);

    let updated = repository
        .update(
            created.id,
            ListingChanges {
                price: Some(1900.0),
                description: Some("Top floor with river views".to_owned()),
                ..ListingChanges::default()
            },
        )
        .await
        .unwrap_or_default();
    let updated = updated.unwrap_or_else(|| unreachable!());
    assert!((updated.details.price - 1900.0).abs() < f64::EPSILON);
    assert_eq!(updated.details.title, "Sunny loft");
    assert_eq!(updated.owner_id, owner_id);

    let moderated = repository
        .set_moderation(created.id, true, true)
        .await
        .unwrap_or_default()
        .unwrap_or_else(|| unreachable!());
    assert!(moderated.approved && moderated.featured);

    assert!(repository.delete(created.id).await.unwrap_or_default());
    assert!(!repository.delete(created.id).await.unwrap_or(true));
}

#[tokio::test]
async fn list_applies_filter_and_window() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresListingRepository::new(pool.clone());
    let owner_id = UserId::new();
    ensure_profile(&pool, owner_id, "agent").await;

    for (title, bedrooms, price, approved) in [
        ("Garden studio", None, 1200.0, true),
        ("Two bed flat", Some(2), 2100.0, true),
        ("Three bed house", Some(3), 3200.0, true),
        ("Pending duplex", Some(4), 2500.0, false),
    ] {
        let inserted = repository
            .insert(NewListing {
                owner_id,
                approved,
                draft: draft(title, "house", bedrooms, price),
            })
            .await;
        assert!(inserted.is_ok());
    }

    let filter = ListingFilter {
        owner_id: Some(owner_id),
        min_bedrooms: Some(2),
        max_price: Some(3000.0),
        ..ListingFilter::public()
    };
    let page = repository
        .list(&filter, PageRequest::new(Some(10), Some(0)))
        .await;
    assert!(page.is_ok());
    let page = page.unwrap_or_else(|_| unreachable!());
    assert_eq!(page.total, 1);
    assert_eq!(
        page.listings.first().map(|listing| listing.details.title.as_str()),
        Some("Two bed flat")
    );

    let owned = repository
        .list(&ListingFilter::owned_by(owner_id), PageRequest::new(Some(2), Some(0)))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(owned.total, 4);
    assert_eq!(owned.listings.len(), 2);
}
