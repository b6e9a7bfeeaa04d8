use crate::domain::model::ScanResults;
use std::io::{self, Write};

/// Writes the plain-text summary: a header, then every host with one
/// tab-indented line per port.
pub fn write_console<W: Write>(results: &ScanResults, out: &mut W) -> io::Result<()> {
    writeln!(out, "\n-> Results:")?;
    for host in results.hosts() {
        writeln!(out, "{}", host.addr)?;
        for port in &host.ports {
            writeln!(
                out,
                "\t {} {} {} {} {}",
                port.num, port.status, port.service, port.product, port.version
            )?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AddressFamily, Host, Port, PortStatus};

    fn render(results: &ScanResults) -> String {
        let mut buf = Vec::new();
        write_console(results, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_console_lists_hosts_and_ports() {
        let mut host = Host::new("10.0.0.1", AddressFamily::Ipv4);
        host.add_port(Port::new(22, PortStatus::Open, "ssh").with_product("OpenSSH", "9.6"));
        host.add_port(Port::new(80, PortStatus::Closed, "http"));
        let results = ScanResults::from_hosts(vec![host]);

        let lines: Vec<String> = render(&results).lines().map(String::from).collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "-> Results:");
        assert_eq!(lines[2], "10.0.0.1");
        assert_eq!(lines[3], "\t 22 open ssh OpenSSH 9.6");
        assert_eq!(lines[4].trim_end(), "\t 80 closed http");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_console_empty_results_has_header_only() {
        let output = render(&ScanResults::default());
        assert_eq!(output, "\n-> Results:\n");
    }
}
