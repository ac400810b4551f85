use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::{
    Car, Minor, Package, Payment, PaymentSource, ServiceRecord, ServiceRecordDetail,
};
use crate::storage::Repository;

use super::reporting::DailyReport;
use super::AppError;

/// Application service providing high-level operations for the wash
/// ledger. This is the primary interface for any client (CLI, API, ...).
pub struct WashService {
    repo: Repository,
}

/// Input for registering a car.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCar {
    pub plate_number: String,
    pub car_type: String,
    pub car_size: String,
    pub driver_name: String,
    pub phone_number: String,
}

/// Input for adding a package to the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPackage {
    pub package_name: String,
    pub package_description: String,
    pub package_price: Minor,
}

/// Input for recording a service event.
#[derive(Debug, Clone, Deserialize)]
pub struct NewServiceRecord {
    pub plate_number: String,
    pub package_number: i64,
}

/// Input for recording a payment. Exactly one of the two references
/// must be supplied; the amount is always resolved from the referenced
/// package price, never taken from the caller. `paid_at` defaults to
/// the time of recording.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentRequest {
    pub record_number: Option<i64>,
    pub package_number: Option<i64>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl WashService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Car registry
    // ========================

    /// Register a new car. The plate number must be unique.
    pub async fn register_car(&self, input: NewCar) -> Result<Car, AppError> {
        require_non_blank(&input.plate_number, "plate number")?;

        if self.repo.car_exists(&input.plate_number).await? {
            return Err(AppError::CarAlreadyRegistered(input.plate_number));
        }

        let car = Car::new(
            input.plate_number,
            input.car_type,
            input.car_size,
            input.driver_name,
            input.phone_number,
        );
        self.repo.save_car(&car).await?;

        tracing::info!(plate = %car.plate_number, "registered car");
        Ok(car)
    }

    /// List all registered cars.
    pub async fn list_cars(&self) -> Result<Vec<Car>, AppError> {
        Ok(self.repo.list_cars().await?)
    }

    // ========================
    // Package catalog
    // ========================

    /// Add a package to the catalog.
    pub async fn add_package(&self, input: NewPackage) -> Result<Package, AppError> {
        require_non_blank(&input.package_name, "package name")?;
        require_non_blank(&input.package_description, "package description")?;
        if input.package_price < 0 {
            return Err(AppError::Validation(
                "package price must be a non-negative amount in minor units".to_string(),
            ));
        }

        let mut package = Package::new(
            input.package_name,
            input.package_description,
            input.package_price,
        );
        self.repo.save_package(&mut package).await?;
        Ok(package)
    }

    /// List all packages.
    pub async fn list_packages(&self) -> Result<Vec<Package>, AppError> {
        Ok(self.repo.list_packages().await?)
    }

    /// Change a package's catalog price. Payments already recorded keep
    /// the amount they snapshotted at payment time.
    pub async fn reprice_package(
        &self,
        package_number: i64,
        new_price: Minor,
    ) -> Result<Package, AppError> {
        if new_price < 0 {
            return Err(AppError::Validation(
                "package price must be a non-negative amount in minor units".to_string(),
            ));
        }

        if !self.repo.update_package_price(package_number, new_price).await? {
            return Err(AppError::PackageNotFound(package_number));
        }

        self.repo
            .get_package(package_number)
            .await?
            .ok_or(AppError::PackageNotFound(package_number))
    }

    // ========================
    // Service ledger
    // ========================

    /// Record a car undergoing a package service, dated now.
    /// Both references must resolve to existing rows.
    pub async fn create_service_record(
        &self,
        input: NewServiceRecord,
    ) -> Result<ServiceRecord, AppError> {
        if !self.repo.car_exists(&input.plate_number).await? {
            return Err(AppError::CarNotFound(input.plate_number));
        }
        if !self.repo.package_exists(input.package_number).await? {
            return Err(AppError::PackageNotFound(input.package_number));
        }

        let mut record = ServiceRecord::new(input.plate_number, input.package_number);
        self.repo.save_service_record(&mut record).await?;
        Ok(record)
    }

    /// List service records with their car and package details.
    pub async fn list_service_records(&self) -> Result<Vec<ServiceRecordDetail>, AppError> {
        Ok(self.repo.list_service_record_details().await?)
    }

    /// Re-point a service record at a different car and/or package.
    /// The service date is unchanged.
    pub async fn update_service_record(
        &self,
        record_number: i64,
        plate_number: String,
        package_number: i64,
    ) -> Result<ServiceRecord, AppError> {
        let mut record = self
            .repo
            .get_service_record(record_number)
            .await?
            .ok_or(AppError::ServiceRecordNotFound(record_number))?;

        if !self.repo.car_exists(&plate_number).await? {
            return Err(AppError::CarNotFound(plate_number));
        }
        if !self.repo.package_exists(package_number).await? {
            return Err(AppError::PackageNotFound(package_number));
        }

        self.repo
            .update_service_record_refs(record_number, &plate_number, package_number)
            .await?;

        record.plate_number = plate_number;
        record.package_number = package_number;
        Ok(record)
    }

    /// Delete a service record. Rejected while payments reference it:
    /// recorded payments must keep their context row.
    pub async fn delete_service_record(&self, record_number: i64) -> Result<(), AppError> {
        let payment_count = self.repo.count_payments_for_record(record_number).await?;
        if payment_count > 0 {
            tracing::warn!(record_number, payment_count, "refusing to delete paid-for service record");
            return Err(AppError::ServiceRecordHasPayments {
                record_number,
                payment_count,
            });
        }

        if !self.repo.delete_service_record(record_number).await? {
            return Err(AppError::ServiceRecordNotFound(record_number));
        }
        Ok(())
    }

    // ========================
    // Payment ledger
    // ========================

    /// Record a payment. The amount is resolved from the referenced
    /// service record's package, or from the package itself, inside one
    /// transaction with the insert. Payments are append-only.
    pub async fn record_payment(&self, request: PaymentRequest) -> Result<Payment, AppError> {
        let source = match (request.record_number, request.package_number) {
            (Some(record_number), None) => PaymentSource::ServiceRecord(record_number),
            (None, Some(package_number)) => PaymentSource::Package(package_number),
            _ => return Err(AppError::AmbiguousPaymentReference),
        };

        let paid_at = request.paid_at.unwrap_or_else(Utc::now);

        let payment = self
            .repo
            .create_payment(source, paid_at)
            .await?
            .ok_or(match source {
                PaymentSource::ServiceRecord(record_number) => {
                    AppError::ServiceRecordNotFound(record_number)
                }
                PaymentSource::Package(package_number) => {
                    AppError::PackageNotFound(package_number)
                }
            })?;

        tracing::info!(
            payment_number = payment.payment_number,
            amount_paid = payment.amount_paid,
            "recorded payment"
        );
        Ok(payment)
    }

    /// List all payments, newest first.
    pub async fn list_payments(&self) -> Result<Vec<Payment>, AppError> {
        Ok(self.repo.list_payments().await?)
    }

    // ========================
    // Reporting
    // ========================

    /// Revenue report over an inclusive date window. Omitted bounds
    /// default to the trailing 30 days through today. Date-only
    /// comparison; rows ordered by payment date descending.
    pub async fn daily_report(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<DailyReport, AppError> {
        let today = Utc::now().date_naive();
        let start_date = start_date.unwrap_or(today - Duration::days(30));
        let end_date = end_date.unwrap_or(today);

        let data = self.repo.daily_revenue(start_date, end_date).await?;

        Ok(DailyReport {
            start_date,
            end_date,
            count: data.len(),
            data,
        })
    }
}

fn require_non_blank(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}
