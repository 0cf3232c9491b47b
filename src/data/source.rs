//! HTTP download of the published TIBC CSV.

use reqwest::blocking::Client;
use tracing::info;

use crate::domain::Table;
use crate::error::EtlError;
use crate::io::ingest::parse_csv;

pub struct CsvSource {
    client: Client,
}

impl CsvSource {
    /// A client without a request timeout. reqwest's blocking default would
    /// cut the download off after 30 seconds.
    pub fn new() -> Result<Self, EtlError> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(EtlError::Client)?;
        Ok(Self { client })
    }

    /// GET `url` and parse the body as CSV.
    ///
    /// One attempt, no retry. Transport failures, non-2xx statuses, empty
    /// bodies and malformed CSV are all reported as `EtlError`.
    pub fn fetch_table(&self, url: &str) -> Result<Table, EtlError> {
        let body = self.fetch_body(url)?;
        let table = parse_csv(&body)?;
        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            "parsed CSV"
        );
        Ok(table)
    }

    fn fetch_body(&self, url: &str) -> Result<String, EtlError> {
        let transport = |source| EtlError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EtlError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.text().map_err(transport)?;
        if body.trim().is_empty() {
            return Err(EtlError::EmptyBody {
                url: url.to_string(),
            });
        }
        info!(bytes = body.len(), "downloaded CSV");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    use super::*;

    /// Serve exactly one HTTP response on an ephemeral localhost port.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        serve_after(Duration::ZERO, status_line, body)
    }

    /// Like `serve_once`, but wait `delay` after reading the request.
    fn serve_after(delay: Duration, status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            // Drain request headers.
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            thread::sleep(delay);
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: text/csv\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/rows.csv")
    }

    #[test]
    fn fetches_and_parses_csv() {
        let url = serve_once(
            "200 OK",
            "RESOLUCION,INTERES_BANCARIO_CORRIENTE\n2359,19.21%\n0528,19.37%\n",
        );

        let table = CsvSource::new().unwrap().fetch_table(&url).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.column_names(),
            vec!["RESOLUCION", "INTERES_BANCARIO_CORRIENTE"]
        );
    }

    #[test]
    fn slow_response_is_awaited() {
        let url = serve_after(
            Duration::from_secs(2),
            "200 OK",
            "RESOLUCION,MODALIDAD\n2359,Consumo\n",
        );

        let table = CsvSource::new().unwrap().fetch_table(&url).unwrap();

        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn non_success_status_is_reported() {
        let url = serve_once("404 Not Found", "missing");

        let err = CsvSource::new().unwrap().fetch_table(&url).unwrap_err();

        match err {
            EtlError::HttpStatus { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_body_is_reported() {
        let url = serve_once("200 OK", "  \n");

        let err = CsvSource::new().unwrap().fetch_table(&url).unwrap_err();

        assert!(matches!(err, EtlError::EmptyBody { .. }));
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let err = CsvSource::new()
            .unwrap()
            .fetch_table(&format!("http://127.0.0.1:{port}/rows.csv"))
            .unwrap_err();

        assert!(matches!(err, EtlError::Transport { .. }));
    }
}
