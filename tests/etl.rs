//! End-to-end ETL runs against a local HTTP server and a scratch database.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

use chrono::NaiveDate;
use tibc_etl::app::pipeline::{EtlStatus, run_etl};
use tibc_etl::domain::EtlConfig;
use tibc_etl::store::read_rate_records;

const CSV: &str = "RESOLUCION,FECHA_RESOLUCION,VIGENCIA_DESDE,VIGENCIA_HASTA,INTERES_BANCARIO_CORRIENTE,MODALIDAD\n\
2359,22/12/2014,01/01/2015,31/03/2015,19.21%,Consumo y ordinario\n\
0369,26/03/2015,01/04/2015,,19.37%,Consumo y ordinario\n\
0528,30/06/2015,01/07/2015,30/09/2015,\"33,95%\",Microcrédito\n";

/// Serve the same CSV body for `requests` consecutive connections.
fn serve_csv(body: &'static str, requests: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for _ in 0..requests {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: text/csv\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
    });
    format!("http://{addr}/rows.csv")
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[test]
fn three_rows_with_one_missing_validity_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = EtlConfig {
        source_url: serve_csv(CSV, 1),
        database: dir.path().join("tibc_data.db"),
        table: "tasas_interes_bancario".into(),
    };

    let status = run_etl(&config);
    assert!(matches!(status, EtlStatus::Loaded { rows: 3 }), "{status:?}");

    let records = read_rate_records(&config.database, &config.table).unwrap();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].vigencia_hasta, date(2015, 3, 31));
    assert_eq!(records[1].vigencia_hasta, None);
    assert_eq!(records[2].vigencia_hasta, date(2015, 9, 30));

    assert_eq!(records[0].resolucion_id.as_deref(), Some("2359"));
    assert_eq!(records[1].fecha_resolucion, date(2015, 3, 26));
    assert_eq!(records[2].tasa_interes_ea, Some(33.95));
    assert_eq!(records[2].tipo_credito_nombre.as_deref(), Some("Microcrédito"));
}

#[test]
fn running_twice_replaces_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = EtlConfig {
        source_url: serve_csv(CSV, 2),
        database: dir.path().join("tibc_data.db"),
        table: "tasas_interes_bancario".into(),
    };

    run_etl(&config);
    let first = read_rate_records(&config.database, &config.table).unwrap();
    run_etl(&config);
    let second = read_rate_records(&config.database, &config.table).unwrap();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}
