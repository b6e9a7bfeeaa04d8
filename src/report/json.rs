use crate::domain::model::{Host, ScanResults};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    host_count: usize,
    open_ports: usize,
    hosts: &'a [Host],
}

pub fn render_json(results: &ScanResults, generated_at: DateTime<Utc>) -> Result<String> {
    let report = JsonReport {
        generated_at,
        host_count: results.len(),
        open_ports: results.open_port_count(),
        hosts: results.hosts(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub async fn write_json<S: Storage>(
    storage: &S,
    file_name: &str,
    results: &ScanResults,
) -> Result<String> {
    let body = render_json(results, Utc::now())?;
    storage.write_file(file_name, body.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AddressFamily, Port, PortStatus};
    use chrono::TimeZone;

    #[test]
    fn test_json_report_shape() {
        let mut host = Host::new("2001:db8::1", AddressFamily::Ipv6);
        host.add_port(Port::new(22, PortStatus::Open, "ssh"));
        host.add_port(Port::new(25, PortStatus::Filtered, ""));
        let results = ScanResults::from_hosts(vec![host]);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&render_json(&results, at).unwrap()).unwrap();

        assert_eq!(value["generated_at"], "2024-05-01T12:00:00Z");
        assert_eq!(value["host_count"], 1);
        assert_eq!(value["open_ports"], 1);
        assert_eq!(value["hosts"][0]["addr_type"], "ipv6");
        assert_eq!(value["hosts"][0]["ports"][1]["status"], "filtered");
    }
}
