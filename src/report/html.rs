use crate::domain::model::ScanResults;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

pub const DEFAULT_HTML_REPORT: &str = "scan-report.html";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders a self-contained page: one heading and one port table per host.
pub fn render_html(results: &ScanResults, generated_at: DateTime<Utc>) -> String {
    let mut page = String::from("<html><body>");

    for host in results.hosts() {
        let hostnames = host
            .hostnames
            .iter()
            .map(|h| escape_html(h))
            .collect::<Vec<_>>()
            .join(", ");
        // Writing into a String cannot fail.
        let _ = write!(
            page,
            "<h2>Host {}={} {}</h2>",
            host.addr_type,
            escape_html(&host.addr),
            hostnames
        );
        page.push_str(
            "<table style=\"border: 1px solid;\"><tr><th>Port</th><th>Status</th>\
             <th>Service</th><th>Product</th><th>Version</th></tr>",
        );
        for port in &host.ports {
            let _ = write!(
                page,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                port.num,
                escape_html(port.status.as_str()),
                escape_html(&port.service),
                escape_html(&port.product),
                escape_html(&port.version)
            );
        }
        page.push_str("</table>");
    }

    let _ = write!(
        page,
        "<p><small>Generated {}</small></p></body></html>",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    page
}

/// Writes the HTML report through `storage`, overwriting any earlier report,
/// and returns where it landed.
pub async fn write_html<S: Storage>(
    storage: &S,
    file_name: &str,
    results: &ScanResults,
) -> Result<String> {
    let page = render_html(results, Utc::now());
    tracing::debug!("Writing HTML report ({} bytes) to {}", page.len(), file_name);
    storage.write_file(file_name, page.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AddressFamily, Host, Port, PortStatus};
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_single_host_single_row() {
        let mut host = Host::new("example.com", AddressFamily::Hostname);
        host.add_port(Port::new(443, PortStatus::Open, "https"));
        let page = render_html(&ScanResults::from_hosts(vec![host]), fixed_time());

        assert_eq!(page.matches("<h2>").count(), 1);
        assert_eq!(page.matches("<table").count(), 1);
        // header row + one data row
        assert_eq!(page.matches("<tr>").count(), 2);
        assert!(page.contains(
            "<tr><td>443</td><td>open</td><td>https</td><td></td><td></td></tr>"
        ));
        assert!(page.contains("<h2>Host hostname=example.com </h2>"));
    }

    #[test]
    fn test_hostnames_joined_in_heading() {
        let mut host = Host::new("93.184.216.34", AddressFamily::Ipv4);
        host.add_hostname("example.com");
        host.add_hostname("www.example.com");
        let page = render_html(&ScanResults::from_hosts(vec![host]), fixed_time());

        assert!(page.contains("<h2>Host ipv4=93.184.216.34 example.com, www.example.com</h2>"));
    }

    #[test]
    fn test_interpolated_text_is_escaped() {
        let mut host = Host::new("<script>", AddressFamily::Hostname);
        host.add_port(
            Port::new(80, PortStatus::Open, "http").with_product("Foo & \"Bar\"", "1<2"),
        );
        let page = render_html(&ScanResults::from_hosts(vec![host]), fixed_time());

        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("<td>Foo &amp; &quot;Bar&quot;</td><td>1&lt;2</td>"));
    }

    #[test]
    fn test_empty_results_still_valid_document() {
        let page = render_html(&ScanResults::default(), fixed_time());
        assert!(page.starts_with("<html><body>"));
        assert!(page.ends_with("</body></html>"));
        assert!(page.contains("Generated 2024-05-01T12:00:00Z"));
        assert_eq!(page.matches("<h2>").count(), 0);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a'b"), "a&#39;b");
        assert_eq!(escape_html("plain"), "plain");
    }
}
