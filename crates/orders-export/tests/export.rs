//! Tests for spreadsheet and document export.

use chrono::{NaiveDate, NaiveDateTime};
use orders_export::{
    DocumentExport, ExportError, ExportHandle, ExportKind, Exporter, SpreadsheetExport,
    export_store, scoped,
};
use orders_ingest::LocaleContext;
use orders_model::{ConfigurationError, Order, PageDescriptor, RecordStore, ShipAddress};

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn sample_store() -> RecordStore<Order> {
    RecordStore::new(vec![
        Order {
            order_id: 10248,
            customer_id: "VINET".to_string(),
            employee_id: Some(5),
            order_date: date(1996, 7, 4),
            required_date: date(1996, 8, 1),
            shipped_date: date(1996, 7, 16),
            ship_via: Some(3),
            freight: Some(32.38),
            ship_name: "Vins et alcools Chevalier".to_string(),
            ship_address: ShipAddress::default(),
            details: Vec::new(),
        },
        Order {
            order_id: 10249,
            customer_id: "TOMSP".to_string(),
            employee_id: None,
            order_date: None,
            required_date: None,
            shipped_date: None,
            ship_via: None,
            freight: None,
            ship_name: "Toms, Spezialitäten".to_string(),
            ship_address: ShipAddress::default(),
            details: Vec::new(),
        },
        Order {
            order_id: 10250,
            customer_id: "HANAR".to_string(),
            employee_id: Some(4),
            order_date: date(1996, 7, 8),
            required_date: None,
            shipped_date: date(1996, 7, 12),
            ship_via: Some(2),
            freight: Some(1234.5),
            ship_name: "Hanari Carnes".to_string(),
            ship_address: ShipAddress::default(),
            details: Vec::new(),
        },
    ])
}

#[test]
fn spreadsheet_contains_the_whole_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.csv");

    let report = export_store(&SpreadsheetExport::new(&path), &sample_store()).unwrap();
    assert_eq!(report.kind, ExportKind::Spreadsheet);
    assert_eq!(report.rows, 3);
    assert_eq!(report.path, path);

    let written = std::fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(written, @r#"
    customerID,orderDate,shipName,freight,shippedDate,employeeID,ID
    VINET,1996-07-04T00:00:00,Vins et alcools Chevalier,32.38,1996-07-16T00:00:00,5,10248
    TOMSP,,"Toms, Spezialitäten",,,,10249
    HANAR,1996-07-08T00:00:00,Hanari Carnes,1234.5,1996-07-12T00:00:00,4,10250
    "#);
}

#[test]
fn document_renders_one_page_in_the_locale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.txt");
    let locale = LocaleContext::new("es-ES").unwrap();
    let export = DocumentExport::new(&path, locale, PageDescriptor::new(2, 2)).with_margin(1);

    let report = export_store(&export, &sample_store()).unwrap();
    assert_eq!(report.kind, ExportKind::Document);
    assert_eq!(report.rows, 1);

    let written = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "");
    assert_eq!(lines[1], " Pedidos");
    assert!(lines[3].starts_with(" | ID    | customerID |"), "{}", lines[3]);
    assert!(lines[3].ends_with("| employeeID |"), "{}", lines[3]);
    assert!(lines[5].starts_with(" | 10250 | HANAR      |"), "{}", lines[5]);
    assert!(lines[5].ends_with("|          4 |"), "{}", lines[5]);
    assert!(written.contains("lunes, 8 de julio de 1996"));
    assert!(written.contains("1234,5"));
    assert!(!written.contains("VINET"));
    assert_eq!(lines[lines.len() - 2], " Página 2");
}

#[test]
fn scoped_handle_saves_repeatedly_before_release() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("twice.csv");
    let store = sample_store();

    let (saved, report) = scoped(&SpreadsheetExport::new(&path), |handle| {
        let first = handle.save(&store)?;
        let second = handle.save(&store)?;
        Ok(first + second)
    })
    .unwrap();
    assert_eq!(saved, 6);
    assert_eq!(report.rows, 6);

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), 7);
}

#[test]
fn scoped_work_errors_propagate_and_leave_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("failed.csv");
    let export = SpreadsheetExport::new(&path);

    let result: Result<((), _), _> = scoped(&export, |handle| {
        handle.save(&sample_store())?;
        Err(ExportError::Configuration(ConfigurationError::UnknownField(
            "nope".to_string(),
        )))
    });
    assert!(matches!(result, Err(ExportError::Configuration(_))));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn unreleased_handles_keep_the_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.txt");
    std::fs::write(&path, "previous export\n").unwrap();
    let locale = LocaleContext::new("en-US").unwrap();
    let export = DocumentExport::new(&path, locale, PageDescriptor::new(0, 2));

    let mut handle = export.acquire().unwrap();
    assert_eq!(handle.save(&sample_store()).unwrap(), 2);
    drop(handle);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous export\n");

    let report = export_store(&export, &sample_store()).unwrap();
    assert_eq!(report.rows, 2);
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("VINET"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn acquire_reports_unwritable_paths() {
    let dir = tempfile::tempdir().unwrap();
    let export = SpreadsheetExport::new(dir.path().join("missing").join("orders.csv"));
    assert!(matches!(export.acquire(), Err(ExportError::Io { .. })));
}
