use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::application::{NewCar, NewPackage, NewServiceRecord, PaymentRequest, WashService};
use crate::domain::{format_minor, parse_minor};

/// Washdesk - Car Wash Business Ledger
#[derive(Parser)]
#[command(name = "washdesk")]
#[command(about = "A local-first ledger for a car wash business: cars, packages, services, payments and revenue reports")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "washdesk.db", env = "WASHDESK_DB")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Car registry commands
    #[command(subcommand)]
    Car(CarCommands),

    /// Package catalog commands
    #[command(subcommand)]
    Package(PackageCommands),

    /// Service record commands
    #[command(subcommand)]
    Record(RecordCommands),

    /// Payment ledger commands
    #[command(subcommand)]
    Payment(PaymentCommands),

    /// Generate the revenue report for a date window
    Report {
        /// Start of the window (YYYY-MM-DD, defaults to 30 days ago)
        #[arg(long)]
        start_date: Option<String>,

        /// End of the window (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        end_date: Option<String>,

        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum CarCommands {
    /// Register a new car
    Register {
        /// Plate number (must be unique)
        plate: String,

        /// Vehicle type (e.g., Sedan, SUV)
        #[arg(short = 't', long = "type")]
        car_type: String,

        /// Vehicle size (e.g., Small, Medium, Large)
        #[arg(short = 's', long = "size")]
        car_size: String,

        /// Driver name
        #[arg(long)]
        driver: String,

        /// Driver phone number
        #[arg(long)]
        phone: String,
    },

    /// List registered cars
    List,
}

#[derive(Subcommand)]
pub enum PackageCommands {
    /// Add a package to the catalog
    Add {
        /// Package name
        name: String,

        /// Package description
        #[arg(short, long)]
        description: String,

        /// Price (e.g., "5000.00" or "5000")
        #[arg(short, long)]
        price: String,
    },

    /// List packages
    List,

    /// Change a package's catalog price (never retroactive)
    Reprice {
        /// Package number
        number: i64,

        /// New price (e.g., "5000.00" or "5000")
        price: String,
    },
}

#[derive(Subcommand)]
pub enum RecordCommands {
    /// Record a car undergoing a package service
    Add {
        /// Plate number of a registered car
        plate: String,

        /// Package number from the catalog
        package: i64,
    },

    /// List service records with car and package details
    List,

    /// Re-point a service record's car and package references
    Update {
        /// Record number
        number: i64,

        /// New plate number
        #[arg(long)]
        plate: String,

        /// New package number
        #[arg(long)]
        package: i64,
    },

    /// Delete a service record (rejected while payments reference it)
    Delete {
        /// Record number
        number: i64,
    },
}

#[derive(Subcommand)]
pub enum PaymentCommands {
    /// Record a payment for a service record or a package
    Add {
        /// Service record number to pay for
        #[arg(long)]
        record: Option<i64>,

        /// Package number to pay for directly
        #[arg(long)]
        package: Option<i64>,
    },

    /// List payments, newest first
    List,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                WashService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Car(car_cmd) => {
                let service = WashService::connect(&self.database).await?;
                run_car_command(&service, car_cmd).await?;
            }

            Commands::Package(package_cmd) => {
                let service = WashService::connect(&self.database).await?;
                run_package_command(&service, package_cmd).await?;
            }

            Commands::Record(record_cmd) => {
                let service = WashService::connect(&self.database).await?;
                run_record_command(&service, record_cmd).await?;
            }

            Commands::Payment(payment_cmd) => {
                let service = WashService::connect(&self.database).await?;
                run_payment_command(&service, payment_cmd).await?;
            }

            Commands::Report {
                start_date,
                end_date,
                json,
            } => {
                let service = WashService::connect(&self.database).await?;

                let start_date = start_date
                    .map(|s| parse_cli_date(&s))
                    .transpose()
                    .context("Invalid start date. Use YYYY-MM-DD")?;
                let end_date = end_date
                    .map(|s| parse_cli_date(&s))
                    .transpose()
                    .context("Invalid end date. Use YYYY-MM-DD")?;

                let report = service.daily_report(start_date, end_date).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!(
                        "Revenue report {} .. {} ({} payment(s))",
                        report.start_date, report.end_date, report.count
                    );
                    for row in &report.data {
                        println!(
                            "  #{} {} {} - {} [{}]",
                            row.payment_number,
                            row.payment_date.format("%Y-%m-%d"),
                            format_minor(row.amount_paid),
                            row.package_name.as_deref().unwrap_or("(unknown package)"),
                            row.plate_number.as_deref().unwrap_or("-"),
                        );
                    }
                    println!("Total: {}", format_minor(report.total()));
                }
            }
        }

        Ok(())
    }
}

async fn run_car_command(service: &WashService, command: CarCommands) -> Result<()> {
    match command {
        CarCommands::Register {
            plate,
            car_type,
            car_size,
            driver,
            phone,
        } => {
            let car = service
                .register_car(NewCar {
                    plate_number: plate,
                    car_type,
                    car_size,
                    driver_name: driver,
                    phone_number: phone,
                })
                .await?;
            println!("Registered car: {} ({})", car.plate_number, car.driver_name);
        }

        CarCommands::List => {
            let cars = service.list_cars().await?;
            if cars.is_empty() {
                println!("No cars registered.");
                return Ok(());
            }
            for car in cars {
                println!(
                    "{} - {} {} - {} ({})",
                    car.plate_number, car.car_size, car.car_type, car.driver_name, car.phone_number
                );
            }
        }
    }
    Ok(())
}

async fn run_package_command(service: &WashService, command: PackageCommands) -> Result<()> {
    match command {
        PackageCommands::Add {
            name,
            description,
            price,
        } => {
            let price = parse_minor(&price).context("Invalid price format. Use '5000.00' or '5000'")?;
            let package = service
                .add_package(NewPackage {
                    package_name: name,
                    package_description: description,
                    package_price: price,
                })
                .await?;
            println!(
                "Added package #{}: {} ({})",
                package.package_number,
                package.package_name,
                format_minor(package.package_price)
            );
        }

        PackageCommands::List => {
            let packages = service.list_packages().await?;
            if packages.is_empty() {
                println!("No packages in catalog.");
                return Ok(());
            }
            for package in packages {
                println!(
                    "#{} {} - {} ({})",
                    package.package_number,
                    package.package_name,
                    package.package_description,
                    format_minor(package.package_price)
                );
            }
        }

        PackageCommands::Reprice { number, price } => {
            let price = parse_minor(&price).context("Invalid price format. Use '5000.00' or '5000'")?;
            let package = service.reprice_package(number, price).await?;
            println!(
                "Repriced package #{} to {}",
                package.package_number,
                format_minor(package.package_price)
            );
        }
    }
    Ok(())
}

async fn run_record_command(service: &WashService, command: RecordCommands) -> Result<()> {
    match command {
        RecordCommands::Add { plate, package } => {
            let record = service
                .create_service_record(NewServiceRecord {
                    plate_number: plate,
                    package_number: package,
                })
                .await?;
            println!(
                "Recorded service #{}: {} with package #{}",
                record.record_number, record.plate_number, record.package_number
            );
        }

        RecordCommands::List => {
            let records = service.list_service_records().await?;
            if records.is_empty() {
                println!("No service records.");
                return Ok(());
            }
            for record in records {
                println!(
                    "#{} {} - {} {} - {} ({})",
                    record.record_number,
                    record.service_date.format("%Y-%m-%d"),
                    record.plate_number,
                    record.driver_name,
                    record.package_name,
                    format_minor(record.package_price)
                );
            }
        }

        RecordCommands::Update {
            number,
            plate,
            package,
        } => {
            let record = service.update_service_record(number, plate, package).await?;
            println!(
                "Updated service #{}: {} with package #{}",
                record.record_number, record.plate_number, record.package_number
            );
        }

        RecordCommands::Delete { number } => {
            service.delete_service_record(number).await?;
            println!("Deleted service record #{}", number);
        }
    }
    Ok(())
}

async fn run_payment_command(service: &WashService, command: PaymentCommands) -> Result<()> {
    match command {
        PaymentCommands::Add { record, package } => {
            let payment = service
                .record_payment(PaymentRequest {
                    record_number: record,
                    package_number: package,
                    paid_at: None,
                })
                .await?;
            println!(
                "Recorded payment #{}: {}",
                payment.payment_number,
                format_minor(payment.amount_paid)
            );
        }

        PaymentCommands::List => {
            let payments = service.list_payments().await?;
            if payments.is_empty() {
                println!("No payments recorded.");
                return Ok(());
            }
            for payment in payments {
                let reference = match (payment.record_number, payment.package_number) {
                    (Some(record), _) => format!("record #{}", record),
                    (None, Some(package)) => format!("package #{}", package),
                    (None, None) => "(no reference)".to_string(),
                };
                println!(
                    "#{} {} - {} ({})",
                    payment.payment_number,
                    payment.payment_date.format("%Y-%m-%d"),
                    format_minor(payment.amount_paid),
                    reference
                );
            }
        }
    }
    Ok(())
}

fn parse_cli_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'", input))
}
