// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tempfile::TempDir;
use washdesk::application::{NewCar, NewPackage, NewServiceRecord, WashService};

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(WashService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = WashService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Helper to parse a date string into NaiveDate (report windows)
pub fn parse_day(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: standard cars and catalog
pub struct StandardSetup;

impl StandardSetup {
    /// Register two cars: RAB123A (sedan) and RAC456B (SUV)
    pub async fn register_cars(service: &WashService) -> Result<()> {
        service
            .register_car(NewCar {
                plate_number: "RAB123A".into(),
                car_type: "Sedan".into(),
                car_size: "Medium".into(),
                driver_name: "Jane Doe".into(),
                phone_number: "0788000001".into(),
            })
            .await?;
        service
            .register_car(NewCar {
                plate_number: "RAC456B".into(),
                car_type: "SUV".into(),
                car_size: "Large".into(),
                driver_name: "John Smith".into(),
                phone_number: "0788000002".into(),
            })
            .await?;
        Ok(())
    }

    /// Stock two packages: #1 Basic (500000) and #2 Deluxe (1500000)
    pub async fn stock_packages(service: &WashService) -> Result<()> {
        service
            .add_package(NewPackage {
                package_name: "Basic".into(),
                package_description: "Exterior wash".into(),
                package_price: 500000,
            })
            .await?;
        service
            .add_package(NewPackage {
                package_name: "Deluxe".into(),
                package_description: "Wax+wash".into(),
                package_price: 1500000,
            })
            .await?;
        Ok(())
    }

    /// Cars, packages, and one service record (RAB123A with package #1)
    pub async fn with_one_service(service: &WashService) -> Result<i64> {
        Self::register_cars(service).await?;
        Self::stock_packages(service).await?;
        let record = service
            .create_service_record(NewServiceRecord {
                plate_number: "RAB123A".into(),
                package_number: 1,
            })
            .await?;
        Ok(record.record_number)
    }
}
