use libro_diario::core::{JournalStore, validate};
use libro_diario::import::{ImportError, csv, json};
use rust_decimal::Decimal;
use std::fs::write;

fn dec(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    write(&path, content).unwrap();
    path
}

#[test]
fn csv_rows_group_into_entries() {
    let data = "entry,date,description,account_code,account_name,debit,credit\n\
                1,2024-03-01,compra,600,Compras,2000.00,\n\
                1,2024-03-01,compra,472,IVA soportado,420.00,\n\
                1,2024-03-01,compra,572,Bancos,,1210.00\n\
                1,2024-03-01,compra,400,Proveedores,,1210.00\n\
                2,2024-03-02,venta,430,Clientes,500.00,\n\
                2,2024-03-02,venta,700,Ventas,,500.00\n";
    let path = write_temp("asientos.csv", data);
    let entries = csv::parse(&path).unwrap();
    let _ = std::fs::remove_file(path);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].lines.len(), 4);
    assert_eq!(entries[0].description, "compra");
    assert_eq!(entries[0].lines[0].debit, dec(200000));
    assert_eq!(entries[1].lines.len(), 2);
    for entry in &entries {
        validate(&entry.lines).unwrap();
    }
}

#[test]
fn csv_bad_amount_rejects_the_record() {
    let data = "entry,date,description,account_code,account_name,debit,credit\n\
                1,2024-03-01,compra,600,Compras,dos mil,\n";
    let path = write_temp("mal.csv", data);
    let err = csv::parse(&path).unwrap_err();
    let _ = std::fs::remove_file(path);
    assert!(matches!(err, ImportError::Parse(_)));
}

#[test]
fn csv_bad_date_rejects_the_record() {
    let data = "entry,date,description,account_code,account_name,debit,credit\n\
                1,01/03/2024,compra,600,Compras,2000.00,\n";
    let path = write_temp("fecha.csv", data);
    let err = csv::parse(&path).unwrap_err();
    let _ = std::fs::remove_file(path);
    assert!(matches!(err, ImportError::Parse(_)));
}

#[test]
fn json_entries_parse_with_string_amounts() {
    let data = r#"[
        {
            "date": "2024-03-02",
            "description": "venta",
            "lines": [
                {"account_code": "430", "account_name": "Clientes", "debit": "500.00"},
                {"account_code": "700", "account_name": "Ventas", "credit": "500.00"}
            ]
        }
    ]"#;
    let entries = json::parse_str(data).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].lines[0].debit, dec(50000));
    assert_eq!(entries[0].lines[0].credit, Decimal::ZERO);
    assert_eq!(entries[0].lines[1].credit, dec(50000));
}

#[test]
fn json_bad_amount_rejects_the_record() {
    let data = r#"[
        {
            "date": "2024-03-02",
            "description": "venta",
            "lines": [
                {"account_code": "430", "account_name": "Clientes", "debit": "NaN euros"}
            ]
        }
    ]"#;
    assert!(matches!(
        json::parse_str(data),
        Err(ImportError::Parse(_))
    ));
}

#[test]
fn imported_entries_still_pass_through_the_validator() {
    let data = r#"[
        {
            "date": "2024-03-02",
            "description": "descuadrado",
            "lines": [
                {"account_code": "430", "account_name": "Clientes", "debit": "100.00"},
                {"account_code": "700", "account_name": "Ventas", "credit": "90.00"}
            ]
        }
    ]"#;
    let entries = json::parse_str(data).unwrap();
    let mut store = JournalStore::default();
    assert!(store.create("ana", entries[0].clone()).is_err());
    assert!(store.entries_for("ana", None).is_empty());
}
