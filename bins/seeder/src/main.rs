//! Database seeder for Arrenda development and testing.
//!
//! Seeds one active rental with its security deposit and six monthly
//! installments, so the ledger endpoints are exercisable right after
//! `migrator up`.
//!
//! Usage: cargo run --bin seeder

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use arrenda_db::entities::{
    deposits, monthly_installments, rentals,
    sea_orm_active_enums::{InstallmentState, RentalState},
};

/// Test rental ID (consistent for all seeds)
const TEST_RENTAL_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Test deposit ID (consistent for all seeds)
const TEST_DEPOSIT_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Test property ID (lives in the external property service)
const TEST_PROPERTY_ID: &str = "00000000-0000-0000-0000-000000000003";

/// Monthly rent for the seeded rental.
const MONTHLY_AMOUNT: i64 = 100_000;
/// Deposit cap for the seeded rental.
const DEPOSIT_TOTAL: i64 = 500_000;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = arrenda_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding test rental...");
    seed_test_rental(&db).await;

    println!("Seeding test deposit...");
    seed_test_deposit(&db).await;

    println!("Seeding monthly installments...");
    seed_installments(&db).await;

    println!("Seeding complete!");
}

fn test_rental_id() -> Uuid {
    Uuid::parse_str(TEST_RENTAL_ID).unwrap()
}

fn test_deposit_id() -> Uuid {
    Uuid::parse_str(TEST_DEPOSIT_ID).unwrap()
}

/// Seeds an active rental for development.
async fn seed_test_rental(db: &DatabaseConnection) {
    if rentals::Entity::find_by_id(test_rental_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Test rental already exists, skipping...");
        return;
    }

    let now = chrono::Utc::now().into();
    let rental = rentals::ActiveModel {
        id: Set(test_rental_id()),
        property_id: Set(Uuid::parse_str(TEST_PROPERTY_ID).unwrap()),
        monthly_amount: Set(Decimal::new(MONTHLY_AMOUNT, 0)),
        payment_day: Set(5),
        state: Set(RentalState::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = rental.insert(db).await {
        eprintln!("Failed to insert test rental: {e}");
    } else {
        println!("  Created test rental: {TEST_RENTAL_ID}");
    }
}

/// Seeds the rental's security deposit.
async fn seed_test_deposit(db: &DatabaseConnection) {
    if deposits::Entity::find_by_id(test_deposit_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Test deposit already exists, skipping...");
        return;
    }

    let now = chrono::Utc::now().into();
    let deposit = deposits::ActiveModel {
        id: Set(test_deposit_id()),
        rental_id: Set(test_rental_id()),
        total: Set(Decimal::new(DEPOSIT_TOTAL, 0)),
        current_balance: Set(Decimal::ZERO),
        returned_amount: Set(None),
        penalty_amount: Set(None),
        return_description: Set(None),
        penalty_description: Set(None),
        return_date: Set(None),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = deposit.insert(db).await {
        eprintln!("Failed to insert test deposit: {e}");
    } else {
        println!("  Created test deposit: {TEST_DEPOSIT_ID}");
    }
}

/// Seeds six pending monthly installments starting January 2026.
async fn seed_installments(db: &DatabaseConnection) {
    let existing = monthly_installments::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        println!("  Installments already exist, skipping...");
        return;
    }

    let now = chrono::Utc::now().into();
    for month in 1..=6u32 {
        let period_start = NaiveDate::from_ymd_opt(2026, month, 1).unwrap();
        let period_end = NaiveDate::from_ymd_opt(2026, month + 1, 1)
            .unwrap()
            .pred_opt()
            .unwrap();

        let installment = monthly_installments::ActiveModel {
            id: Set(Uuid::new_v4()),
            rental_id: Set(test_rental_id()),
            identifier: Set(format!("2026-{month:02}")),
            period_start: Set(period_start),
            period_end: Set(period_end),
            amount_total: Set(Decimal::new(MONTHLY_AMOUNT, 0)),
            amount_paid: Set(Decimal::ZERO),
            payment_date: Set(None),
            state: Set(InstallmentState::Pending),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if let Err(e) = installment.insert(db).await {
            eprintln!("Failed to insert installment 2026-{month:02}: {e}");
        } else {
            println!("  Created installment 2026-{month:02}");
        }
    }
}
