use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

use crate::application::reporting::DailyReportRow;
use crate::domain::{
    Car, Minor, Package, Payment, PaymentSource, ServiceRecord, ServiceRecordDetail,
};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying the business ledger: cars,
/// packages, service records and payments.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Car operations
    // ========================

    /// Save a new car to the database.
    pub async fn save_car(&self, car: &Car) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cars (plate_number, car_type, car_size, driver_name, phone_number)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&car.plate_number)
        .bind(&car.car_type)
        .bind(&car.car_size)
        .bind(&car.driver_name)
        .bind(&car.phone_number)
        .execute(&self.pool)
        .await
        .context("Failed to save car")?;
        Ok(())
    }

    /// Check whether a car with the given plate number exists.
    pub async fn car_exists(&self, plate_number: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM cars WHERE plate_number = ?)",
        )
        .bind(plate_number)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check car existence")?;
        Ok(exists)
    }

    /// List all registered cars.
    pub async fn list_cars(&self) -> Result<Vec<Car>> {
        let rows = sqlx::query(
            r#"
            SELECT plate_number, car_type, car_size, driver_name, phone_number
            FROM cars
            ORDER BY plate_number
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list cars")?;

        rows.iter().map(Self::row_to_car).collect()
    }

    // ========================
    // Package operations
    // ========================

    /// Save a new package to the database.
    /// The package number is assigned by the store and written back.
    pub async fn save_package(&self, package: &mut Package) -> Result<()> {
        let row = sqlx::query(
            r#"
            INSERT INTO packages (package_name, package_description, package_price)
            VALUES (?, ?, ?)
            RETURNING package_number
            "#,
        )
        .bind(&package.package_name)
        .bind(&package.package_description)
        .bind(package.package_price)
        .fetch_one(&self.pool)
        .await
        .context("Failed to save package")?;

        package.package_number = row.get("package_number");
        Ok(())
    }

    /// Get a package by number.
    pub async fn get_package(&self, package_number: i64) -> Result<Option<Package>> {
        let row = sqlx::query(
            r#"
            SELECT package_number, package_name, package_description, package_price
            FROM packages
            WHERE package_number = ?
            "#,
        )
        .bind(package_number)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch package")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_package(&row)?)),
            None => Ok(None),
        }
    }

    /// Check whether a package with the given number exists.
    pub async fn package_exists(&self, package_number: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM packages WHERE package_number = ?)",
        )
        .bind(package_number)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check package existence")?;
        Ok(exists)
    }

    /// List all packages in catalog order.
    pub async fn list_packages(&self) -> Result<Vec<Package>> {
        let rows = sqlx::query(
            r#"
            SELECT package_number, package_name, package_description, package_price
            FROM packages
            ORDER BY package_number
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list packages")?;

        rows.iter().map(Self::row_to_package).collect()
    }

    /// Update a package's catalog price. Returns false if the package
    /// doesn't exist. Recorded payments keep their snapshotted amounts.
    pub async fn update_package_price(&self, package_number: i64, new_price: Minor) -> Result<bool> {
        let result = sqlx::query("UPDATE packages SET package_price = ? WHERE package_number = ?")
            .bind(new_price)
            .bind(package_number)
            .execute(&self.pool)
            .await
            .context("Failed to update package price")?;

        Ok(result.rows_affected() > 0)
    }

    // ========================
    // Service record operations
    // ========================

    /// Save a new service record to the database.
    /// The record number is assigned by the store and written back.
    pub async fn save_service_record(&self, record: &mut ServiceRecord) -> Result<()> {
        let row = sqlx::query(
            r#"
            INSERT INTO service_records (plate_number, package_number, service_date)
            VALUES (?, ?, ?)
            RETURNING record_number
            "#,
        )
        .bind(&record.plate_number)
        .bind(record.package_number)
        .bind(record.service_date.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .context("Failed to save service record")?;

        record.record_number = row.get("record_number");
        Ok(())
    }

    /// Get a service record by number.
    pub async fn get_service_record(&self, record_number: i64) -> Result<Option<ServiceRecord>> {
        let row = sqlx::query(
            r#"
            SELECT record_number, plate_number, package_number, service_date
            FROM service_records
            WHERE record_number = ?
            "#,
        )
        .bind(record_number)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch service record")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_service_record(&row)?)),
            None => Ok(None),
        }
    }

    /// List all service records joined with the car and package
    /// attributes shown at the counter.
    pub async fn list_service_record_details(&self) -> Result<Vec<ServiceRecordDetail>> {
        let rows = sqlx::query(
            r#"
            SELECT
                sr.record_number,
                sr.plate_number,
                c.driver_name,
                c.car_type,
                sr.package_number,
                p.package_name,
                p.package_price,
                sr.service_date
            FROM service_records sr
            JOIN cars c ON c.plate_number = sr.plate_number
            JOIN packages p ON p.package_number = sr.package_number
            ORDER BY sr.record_number
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list service records")?;

        rows.iter().map(Self::row_to_service_record_detail).collect()
    }

    /// Re-point a service record's car and package references.
    /// The service date is left untouched.
    pub async fn update_service_record_refs(
        &self,
        record_number: i64,
        plate_number: &str,
        package_number: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE service_records
            SET plate_number = ?, package_number = ?
            WHERE record_number = ?
            "#,
        )
        .bind(plate_number)
        .bind(package_number)
        .bind(record_number)
        .execute(&self.pool)
        .await
        .context("Failed to update service record")?;
        Ok(())
    }

    /// Delete a service record. Returns false if it didn't exist.
    pub async fn delete_service_record(&self, record_number: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM service_records WHERE record_number = ?")
            .bind(record_number)
            .execute(&self.pool)
            .await
            .context("Failed to delete service record")?;

        Ok(result.rows_affected() > 0)
    }

    /// Count payments referencing a service record.
    pub async fn count_payments_for_record(&self, record_number: i64) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments WHERE record_number = ?")
                .bind(record_number)
                .fetch_one(&self.pool)
                .await
                .context("Failed to count payments for service record")?;
        Ok(count)
    }

    // ========================
    // Payment operations
    // ========================

    /// Record a payment resolved through the given reference.
    ///
    /// The price lookup and the insert run in a single transaction so a
    /// concurrent catalog reprice cannot be observed mid-operation.
    /// Returns None when the referenced service record or package does
    /// not exist.
    pub async fn create_payment(
        &self,
        source: PaymentSource,
        paid_at: DateTime<Utc>,
    ) -> Result<Option<Payment>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin payment transaction")?;

        // Resolve the amount from whichever reference was supplied.
        let resolved = match source {
            PaymentSource::ServiceRecord(record_number) => sqlx::query(
                r#"
                SELECT sr.record_number, sr.package_number, p.package_price
                FROM service_records sr
                JOIN packages p ON p.package_number = sr.package_number
                WHERE sr.record_number = ?
                "#,
            )
            .bind(record_number)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to resolve payment price via service record")?
            .map(|row| {
                (
                    Some(row.get::<i64, _>("record_number")),
                    Some(row.get::<i64, _>("package_number")),
                    row.get::<i64, _>("package_price"),
                )
            }),
            PaymentSource::Package(package_number) => sqlx::query(
                r#"
                SELECT package_number, package_price
                FROM packages
                WHERE package_number = ?
                "#,
            )
            .bind(package_number)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to resolve payment price via package")?
            .map(|row| {
                (
                    None,
                    Some(row.get::<i64, _>("package_number")),
                    row.get::<i64, _>("package_price"),
                )
            }),
        };

        let Some((record_number, package_number, amount_paid)) = resolved else {
            return Ok(None);
        };

        let row = sqlx::query(
            r#"
            INSERT INTO payments (record_number, package_number, amount_paid, payment_date)
            VALUES (?, ?, ?, ?)
            RETURNING payment_number
            "#,
        )
        .bind(record_number)
        .bind(package_number)
        .bind(amount_paid)
        .bind(paid_at.to_rfc3339())
        .fetch_one(&mut *tx)
        .await
        .context("Failed to save payment")?;

        let payment_number = row.get("payment_number");

        tx.commit()
            .await
            .context("Failed to commit payment transaction")?;

        Ok(Some(Payment {
            payment_number,
            record_number,
            package_number,
            amount_paid,
            payment_date: paid_at,
        }))
    }

    /// List all payments, newest first.
    pub async fn list_payments(&self) -> Result<Vec<Payment>> {
        let rows = sqlx::query(
            r#"
            SELECT payment_number, record_number, package_number, amount_paid, payment_date
            FROM payments
            ORDER BY payment_number DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list payments")?;

        rows.iter().map(Self::row_to_payment).collect()
    }

    // ========================
    // Reporting
    // ========================

    /// Revenue rows for the inclusive date window, newest first.
    ///
    /// Left joins keep every payment in the result even when its
    /// service record link is broken; the package is resolved through
    /// the service record when present, else through the payment's own
    /// package reference.
    pub async fn daily_revenue(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyReportRow>> {
        let rows = sqlx::query(
            r#"
            SELECT
                py.payment_number,
                c.plate_number,
                p.package_name,
                p.package_description,
                py.amount_paid,
                py.payment_date
            FROM payments py
            LEFT JOIN service_records sr ON py.record_number = sr.record_number
            LEFT JOIN cars c ON sr.plate_number = c.plate_number
            LEFT JOIN packages p
                ON COALESCE(sr.package_number, py.package_number) = p.package_number
            WHERE date(py.payment_date) BETWEEN date(?) AND date(?)
            ORDER BY py.payment_date DESC
            "#,
        )
        .bind(start_date.format("%Y-%m-%d").to_string())
        .bind(end_date.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to query daily revenue")?;

        rows.iter()
            .map(|row| {
                Ok(DailyReportRow {
                    payment_number: row.get("payment_number"),
                    plate_number: row.get("plate_number"),
                    package_name: row.get("package_name"),
                    package_description: row.get("package_description"),
                    amount_paid: row.get("amount_paid"),
                    payment_date: Self::parse_timestamp(row.get("payment_date"))?,
                })
            })
            .collect()
    }

    // ========================
    // Row mappers
    // ========================

    fn row_to_car(row: &sqlx::sqlite::SqliteRow) -> Result<Car> {
        Ok(Car {
            plate_number: row.get("plate_number"),
            car_type: row.get("car_type"),
            car_size: row.get("car_size"),
            driver_name: row.get("driver_name"),
            phone_number: row.get("phone_number"),
        })
    }

    fn row_to_package(row: &sqlx::sqlite::SqliteRow) -> Result<Package> {
        Ok(Package {
            package_number: row.get("package_number"),
            package_name: row.get("package_name"),
            package_description: row.get("package_description"),
            package_price: row.get("package_price"),
        })
    }

    fn row_to_service_record(row: &sqlx::sqlite::SqliteRow) -> Result<ServiceRecord> {
        Ok(ServiceRecord {
            record_number: row.get("record_number"),
            plate_number: row.get("plate_number"),
            package_number: row.get("package_number"),
            service_date: Self::parse_timestamp(row.get("service_date"))?,
        })
    }

    fn row_to_service_record_detail(row: &sqlx::sqlite::SqliteRow) -> Result<ServiceRecordDetail> {
        Ok(ServiceRecordDetail {
            record_number: row.get("record_number"),
            plate_number: row.get("plate_number"),
            driver_name: row.get("driver_name"),
            car_type: row.get("car_type"),
            package_number: row.get("package_number"),
            package_name: row.get("package_name"),
            package_price: row.get("package_price"),
            service_date: Self::parse_timestamp(row.get("service_date"))?,
        })
    }

    fn row_to_payment(row: &sqlx::sqlite::SqliteRow) -> Result<Payment> {
        Ok(Payment {
            payment_number: row.get("payment_number"),
            record_number: row.get("record_number"),
            package_number: row.get("package_number"),
            amount_paid: row.get("amount_paid"),
            payment_date: Self::parse_timestamp(row.get("payment_date"))?,
        })
    }

    fn parse_timestamp(value: String) -> Result<DateTime<Utc>> {
        Ok(DateTime::parse_from_rfc3339(&value)
            .context("Invalid timestamp")?
            .with_timezone(&Utc))
    }
}
