//! Initial database migration.
//!
//! Creates the rental ledger tables: rentals, deposits, monthly
//! installments, payments, annulment records, rental cancellations, and
//! the expense ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: RENTAL LEDGER
        // ============================================================
        db.execute_unprepared(RENTALS_SQL).await?;
        db.execute_unprepared(DEPOSITS_SQL).await?;
        db.execute_unprepared(MONTHLY_INSTALLMENTS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(PAYMENT_ANNULMENTS_SQL).await?;
        db.execute_unprepared(RENTAL_CANCELLATIONS_SQL).await?;

        // ============================================================
        // PART 3: EXPENSE LEDGER
        // ============================================================
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(EXPENSE_ANNULMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Rental contract lifecycle
CREATE TYPE rental_state AS ENUM (
    'active',
    'finished',
    'cancelled'
);

-- Monthly installment state; 'reversed' is recognized by the finalization
-- gate but never produced by any ledger operation
CREATE TYPE installment_state AS ENUM (
    'pending',
    'paid',
    'reversed'
);

-- Payment state
CREATE TYPE payment_state AS ENUM (
    'active',
    'annulled'
);

-- Expense state
CREATE TYPE expense_state AS ENUM (
    'active',
    'annulled'
);

-- Expense classification
CREATE TYPE expense_kind AS ENUM (
    'service',
    'maintenance'
);
";

const RENTALS_SQL: &str = r"
-- Rental contracts. Property/client CRUD lives outside this service, so
-- property_id is an opaque reference with no FK constraint.
CREATE TABLE rentals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    property_id UUID NOT NULL,
    monthly_amount NUMERIC(19, 4) NOT NULL CHECK (monthly_amount > 0),
    payment_day SMALLINT NOT NULL CHECK (payment_day BETWEEN 1 AND 31),
    state rental_state NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_rentals_property ON rentals(property_id);
CREATE INDEX idx_rentals_state ON rentals(state);
";

const DEPOSITS_SQL: &str = r"
-- Security deposits: one per rental, version column for optimistic locking
CREATE TABLE deposits (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    rental_id UUID NOT NULL UNIQUE REFERENCES rentals(id) ON DELETE CASCADE,
    total NUMERIC(19, 4) NOT NULL CHECK (total >= 0),
    current_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    returned_amount NUMERIC(19, 4),
    penalty_amount NUMERIC(19, 4),
    return_description TEXT,
    penalty_description TEXT,
    return_date DATE,
    version BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const MONTHLY_INSTALLMENTS_SQL: &str = r"
-- One row per month of rent due, version column for optimistic locking
CREATE TABLE monthly_installments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    rental_id UUID NOT NULL REFERENCES rentals(id) ON DELETE CASCADE,
    identifier VARCHAR(32) NOT NULL,
    period_start DATE NOT NULL,
    period_end DATE NOT NULL,
    amount_total NUMERIC(19, 4) NOT NULL CHECK (amount_total > 0),
    amount_paid NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (amount_paid >= 0),
    payment_date DATE,
    state installment_state NOT NULL DEFAULT 'pending',
    version BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_period_order CHECK (period_end >= period_start),
    CONSTRAINT uq_installment_identifier UNIQUE (rental_id, identifier)
);

CREATE INDEX idx_installments_rental ON monthly_installments(rental_id, period_start);
CREATE INDEX idx_installments_state ON monthly_installments(rental_id, state);
";

const PAYMENTS_SQL: &str = r"
-- Payments target exactly one balance record
CREATE TABLE payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    payment_date DATE NOT NULL,
    state payment_state NOT NULL DEFAULT 'active',
    method VARCHAR(32),
    account VARCHAR(64),
    bank VARCHAR(128),
    reference VARCHAR(128),
    description TEXT,
    deposit_id UUID REFERENCES deposits(id) ON DELETE CASCADE,
    installment_id UUID REFERENCES monthly_installments(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_exactly_one_target CHECK (num_nonnulls(deposit_id, installment_id) = 1)
);

CREATE INDEX idx_payments_deposit ON payments(deposit_id) WHERE deposit_id IS NOT NULL;
CREATE INDEX idx_payments_installment ON payments(installment_id) WHERE installment_id IS NOT NULL;
CREATE INDEX idx_payments_state ON payments(state);
";

const PAYMENT_ANNULMENTS_SQL: &str = r"
-- Immutable reversal records: at most one per payment, enforced by UNIQUE
CREATE TABLE payment_annulments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    payment_id UUID NOT NULL UNIQUE REFERENCES payments(id) ON DELETE CASCADE,
    motive VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    original_amount NUMERIC(19, 4) NOT NULL,
    final_amount NUMERIC(19, 4) NOT NULL,
    annulled_at TIMESTAMPTZ NOT NULL,
    actor_user_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const RENTAL_CANCELLATIONS_SQL: &str = r"
-- Terminal cancellation record: at most one per rental
CREATE TABLE rental_cancellations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    rental_id UUID NOT NULL UNIQUE REFERENCES rentals(id) ON DELETE CASCADE,
    motive VARCHAR(255) NOT NULL,
    returned_amount NUMERIC(19, 4) NOT NULL CHECK (returned_amount >= 0),
    penalty_amount NUMERIC(19, 4) NOT NULL CHECK (penalty_amount >= 0),
    return_motive TEXT,
    penalty_motive TEXT,
    cancelled_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const EXPENSES_SQL: &str = r"
-- Operating expenses. Building/service/property/user CRUD lives outside
-- this service, so those columns are opaque references.
CREATE TABLE expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    kind expense_kind NOT NULL,
    concept VARCHAR(255) NOT NULL,
    description TEXT,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    expense_date DATE NOT NULL,
    state expense_state NOT NULL DEFAULT 'active',
    service_id UUID,
    property_id UUID,
    building_id UUID NOT NULL,
    actor_user_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_service_ref CHECK (
        (kind = 'service' AND service_id IS NOT NULL)
        OR (kind = 'maintenance' AND service_id IS NULL)
    )
);

CREATE INDEX idx_expenses_building ON expenses(building_id, expense_date DESC);
CREATE INDEX idx_expenses_state ON expenses(state);
CREATE INDEX idx_expenses_kind ON expenses(kind);
";

const EXPENSE_ANNULMENTS_SQL: &str = r"
-- Immutable reversal records: at most one per expense, enforced by UNIQUE
CREATE TABLE expense_annulments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    expense_id UUID NOT NULL UNIQUE REFERENCES expenses(id) ON DELETE CASCADE,
    motive VARCHAR(255) NOT NULL,
    description TEXT,
    original_amount NUMERIC(19, 4) NOT NULL,
    final_amount NUMERIC(19, 4) NOT NULL,
    annulled_at TIMESTAMPTZ NOT NULL,
    actor_user_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS expense_annulments CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS rental_cancellations CASCADE;
DROP TABLE IF EXISTS payment_annulments CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS monthly_installments CASCADE;
DROP TABLE IF EXISTS deposits CASCADE;
DROP TABLE IF EXISTS rentals CASCADE;
DROP TYPE IF EXISTS expense_kind;
DROP TYPE IF EXISTS expense_state;
DROP TYPE IF EXISTS payment_state;
DROP TYPE IF EXISTS installment_state;
DROP TYPE IF EXISTS rental_state;
";
