mod common;

use anyhow::Result;
use common::{parse_date, parse_day, test_service, StandardSetup};
use washdesk::application::PaymentRequest;

#[tokio::test]
async fn test_report_filters_inclusive_date_window() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let record_number = StandardSetup::with_one_service(&service).await?;

    for day in ["2023-12-31", "2024-01-01", "2024-01-15", "2024-01-31", "2024-02-01"] {
        service
            .record_payment(PaymentRequest {
                record_number: Some(record_number),
                package_number: None,
                paid_at: Some(parse_date(day)),
            })
            .await?;
    }

    let report = service
        .daily_report(Some(parse_day("2024-01-01")), Some(parse_day("2024-01-31")))
        .await?;

    // Both window edges are included, the days outside are not
    assert_eq!(report.count, 3);
    assert_eq!(report.data.len(), 3);
    let days: Vec<String> = report
        .data
        .iter()
        .map(|row| row.payment_date.format("%Y-%m-%d").to_string())
        .collect();
    assert_eq!(days, vec!["2024-01-31", "2024-01-15", "2024-01-01"]);

    Ok(())
}

#[tokio::test]
async fn test_report_orders_by_payment_date_descending() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let record_number = StandardSetup::with_one_service(&service).await?;

    // Recorded out of order on purpose
    for day in ["2024-01-15", "2024-01-02", "2024-01-20"] {
        service
            .record_payment(PaymentRequest {
                record_number: Some(record_number),
                package_number: None,
                paid_at: Some(parse_date(day)),
            })
            .await?;
    }

    let report = service
        .daily_report(Some(parse_day("2024-01-01")), Some(parse_day("2024-01-31")))
        .await?;

    for pair in report.data.windows(2) {
        assert!(pair[0].payment_date >= pair[1].payment_date);
    }

    Ok(())
}

#[tokio::test]
async fn test_report_rows_carry_joined_attributes() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let record_number = StandardSetup::with_one_service(&service).await?;

    service
        .record_payment(PaymentRequest {
            record_number: Some(record_number),
            package_number: None,
            paid_at: Some(parse_date("2024-01-10")),
        })
        .await?;

    let report = service
        .daily_report(Some(parse_day("2024-01-01")), Some(parse_day("2024-01-31")))
        .await?;

    assert_eq!(report.count, 1);
    let row = &report.data[0];
    assert_eq!(row.plate_number.as_deref(), Some("RAB123A"));
    assert_eq!(row.package_name.as_deref(), Some("Basic"));
    assert_eq!(row.package_description.as_deref(), Some("Exterior wash"));
    assert_eq!(row.amount_paid, 500000);

    Ok(())
}

#[tokio::test]
async fn test_report_keeps_package_only_payments() -> Result<()> {
    let (service, _temp) = test_service().await?;

    StandardSetup::stock_packages(&service).await?;

    // Paid directly for package #2, no service record involved
    service
        .record_payment(PaymentRequest {
            record_number: None,
            package_number: Some(2),
            paid_at: Some(parse_date("2024-01-10")),
        })
        .await?;

    let report = service
        .daily_report(Some(parse_day("2024-01-01")), Some(parse_day("2024-01-31")))
        .await?;

    // No car to join through, but the payment is never dropped and the
    // package still resolves through the payment's own reference
    assert_eq!(report.count, 1);
    let row = &report.data[0];
    assert_eq!(row.plate_number, None);
    assert_eq!(row.package_name.as_deref(), Some("Deluxe"));
    assert_eq!(row.amount_paid, 1500000);

    Ok(())
}

#[tokio::test]
async fn test_report_empty_window_is_empty_not_an_error() -> Result<()> {
    let (service, _temp) = test_service().await?;

    StandardSetup::stock_packages(&service).await?;
    service
        .record_payment(PaymentRequest {
            package_number: Some(1),
            paid_at: Some(parse_date("2023-06-15")),
            ..Default::default()
        })
        .await?;

    let report = service
        .daily_report(Some(parse_day("2024-01-01")), Some(parse_day("2024-01-31")))
        .await?;

    assert_eq!(report.count, 0);
    assert!(report.data.is_empty());
    assert_eq!(report.start_date, parse_day("2024-01-01"));
    assert_eq!(report.end_date, parse_day("2024-01-31"));

    Ok(())
}

#[tokio::test]
async fn test_report_defaults_to_trailing_thirty_days() -> Result<()> {
    let (service, _temp) = test_service().await?;

    StandardSetup::stock_packages(&service).await?;

    // A payment recorded now falls inside the default window
    service
        .record_payment(PaymentRequest {
            package_number: Some(1),
            ..Default::default()
        })
        .await?;

    let report = service.daily_report(None, None).await?;

    assert_eq!(report.count, 1);
    assert_eq!(report.end_date - report.start_date, chrono::Duration::days(30));

    Ok(())
}

#[tokio::test]
async fn test_report_total_sums_the_window() -> Result<()> {
    let (service, _temp) = test_service().await?;

    StandardSetup::stock_packages(&service).await?;

    for (package, day) in [(1, "2024-01-05"), (2, "2024-01-06")] {
        service
            .record_payment(PaymentRequest {
                package_number: Some(package),
                paid_at: Some(parse_date(day)),
                ..Default::default()
            })
            .await?;
    }

    let report = service
        .daily_report(Some(parse_day("2024-01-01")), Some(parse_day("2024-01-31")))
        .await?;

    assert_eq!(report.total(), 2000000);
    Ok(())
}
