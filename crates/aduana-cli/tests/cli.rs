use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const DECLARATION: &str = "\
DECLARACION 1 DE 2024
NIT 900123456
NOMBRE TECNICO DEL PRODUCTO: FILTRO DE ACEITE, MARCA: ACME, ESTADO: nuevo,
PAIS ORIGEN: CHINA - 399. CANT (6) UND //
MARCA: SIN NOMBRE //
";

const INVOICE: &str = r#"{
  "pages": [
    {
      "text": "",
      "tables": [
        [
          ["Qty", "Description", "Unit Price"],
          ["2", "Widget", "3,50"],
          [null, "SUBTOTAL", "7,00"]
        ]
      ]
    }
  ]
}"#;

fn aduana() -> Command {
    Command::cargo_bin("aduana").unwrap()
}

#[test]
fn products_to_csv_stdout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("decl.txt");
    fs::write(&input, DECLARATION).unwrap();

    aduana()
        .arg("products")
        .arg(input.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Producto"))
        .stdout(predicate::str::contains("FILTRO DE ACEITE"))
        .stdout(predicate::str::contains("ACME"))
        .stdout(predicate::str::contains("SIN NOMBRE").not());
}

#[test]
fn products_to_json_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("decl.txt");
    let output = dir.path().join("out").join("products.json");
    fs::write(&input, DECLARATION).unwrap();

    aduana()
        .args(["products", input.to_str().unwrap(), "--format", "json", "--output"])
        .arg(&output)
        .assert()
        .success();

    let rows: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Archivo"], "decl.txt");
    assert_eq!(rows[0]["Marca"], "ACME");
    assert_eq!(rows[0]["Cantidad"], "6");
}

#[test]
fn declarations_output_requires_template() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("decl.txt");
    fs::write(&input, DECLARATION).unwrap();

    aduana()
        .args(["products", input.to_str().unwrap(), "--declarations-output"])
        .arg(dir.path().join("decl.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--template"));
}

#[test]
fn missing_input_fails() {
    let dir = tempdir().unwrap();
    let pattern = dir.path().join("*.txt");

    aduana()
        .args(["products", pattern.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn invoices_generic_table() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("factura.json");
    fs::write(&input, INVOICE).unwrap();

    aduana()
        .args(["invoices", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archivo,Parser,Quantity,Description,Unit_Price,Total"))
        .stdout(predicate::str::contains("factura.json,universal,2,Widget"))
        .stdout(predicate::str::contains("SUBTOTAL").not());
}

#[test]
fn invoices_continue_on_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a_broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("b_factura.json"), INVOICE).unwrap();
    let pattern = dir.path().join("*.json");

    aduana()
        .args(["invoices", pattern.to_str().unwrap()])
        .assert()
        .failure();

    aduana()
        .args(["invoices", pattern.to_str().unwrap(), "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("b_factura.json,universal"))
        .stderr(predicate::str::contains("Failed files:"));
}

#[test]
fn config_init_and_get() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    aduana()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    aduana()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    aduana()
        .arg("--config")
        .arg(&path)
        .args(["config", "get", "declarations.terminal_delimiter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DO  LAC"));
}

#[test]
fn config_set_rejects_invalid_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    aduana()
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "invoices.parsers", "[]"])
        .assert()
        .failure();
    assert!(!path.exists());

    aduana()
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "declarations.min_product_len", "5"])
        .assert()
        .success();

    aduana()
        .arg("--config")
        .arg(&path)
        .args(["config", "get", "declarations.min_product_len"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5"));
}

#[test]
fn compare_invoices_against_declarations() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("decl.txt"),
        "DECLARACION 1 DE 2024\nPRODUCTO: BOMBA DE AGUA, REFERENCIA: a1/x, CANTIDAD: 4 UND //\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("factura.json"),
        r#"{"pages": [{"text": "", "tables": [[
            ["Code", "Description", "Qty", "Unit Price"],
            ["A1", "Bomba", "6", "2,00"],
            ["B2", "Reten", "1", "1,00"]
        ]]}]}"#,
    )
    .unwrap();

    aduana()
        .arg("compare")
        .arg("--declarations")
        .arg(dir.path().join("*.txt"))
        .arg("--invoices")
        .arg(dir.path().join("*.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Referencia,Description,Cant_Fact,Cant_Decl,Diff_Cant,Valor_Total,Estado",
        ))
        .stdout(predicate::str::contains("A1,Bomba,6,4,2,12,Sobra Fact (2)"))
        .stdout(predicate::str::contains("B2,Reten,1,0,1,1,No en Decl"));
}
