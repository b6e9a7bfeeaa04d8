use crate::domain::model::{AddressFamily, Host, Port, PortStatus, ScanResults};
use crate::utils::error::{Result, ScanError};
use roxmltree::{Document, Node};
use std::path::Path;

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn required_attr<'a>(path: &Path, node: Node<'a, '_>, attr: &str) -> Result<&'a str> {
    node.attribute(attr).ok_or_else(|| {
        ScanError::malformed(
            path,
            format!("<{}> has no '{}' attribute", node.tag_name().name(), attr),
        )
    })
}

/// Parses one XML report into hosts, in document order. The file is left untouched.
pub fn parse_report(path: &Path) -> Result<Vec<Host>> {
    let content = std::fs::read_to_string(path)?;
    parse_report_str(path, &content)
}

/// Parses report text; `path` is only used in error messages.
pub fn parse_report_str(path: &Path, content: &str) -> Result<Vec<Host>> {
    let doc = Document::parse(content).map_err(|source| ScanError::XmlError {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hosts = Vec::new();
    for host_node in children(doc.root_element(), "host") {
        hosts.push(parse_host(path, host_node)?);
    }
    Ok(hosts)
}

fn parse_host(path: &Path, node: Node) -> Result<Host> {
    let address = child(node, "address")
        .ok_or_else(|| ScanError::malformed(path, "<host> has no <address> element"))?;
    let addr = required_attr(path, address, "addr")?;
    let addr_type: AddressFamily = required_attr(path, address, "addrtype")?
        .parse()
        .map_err(|reason: String| ScanError::malformed(path, reason))?;

    let mut host = Host::new(addr, addr_type);

    if let Some(hostnames) = child(node, "hostnames") {
        for hostname in children(hostnames, "hostname") {
            host.add_hostname(required_attr(path, hostname, "name")?);
        }
    }

    if let Some(ports) = child(node, "ports") {
        for port in children(ports, "port") {
            host.add_port(parse_port(path, port)?);
        }
    }

    Ok(host)
}

fn parse_port(path: &Path, node: Node) -> Result<Port> {
    let portid = required_attr(path, node, "portid")?;
    let num: u16 = portid
        .parse()
        .map_err(|_| ScanError::malformed(path, format!("invalid portid '{portid}'")))?;

    let state = child(node, "state").ok_or_else(|| {
        ScanError::malformed(path, format!("port {num} has no <state> element"))
    })?;
    let status: PortStatus = required_attr(path, state, "state")?
        .parse()
        .map_err(|reason: String| ScanError::malformed(path, reason))?;

    // <service> is absent when the scanner could not name the service.
    let service = child(node, "service");
    let service_attr = |attr: &str| {
        service
            .and_then(|s| s.attribute(attr))
            .unwrap_or_default()
            .to_string()
    };

    Ok(Port {
        num,
        status,
        service: service_attr("name"),
        product: service_attr("product"),
        version: service_attr("version"),
    })
}

/// Parses every report in order and deletes each file once it parsed cleanly.
///
/// On the first failure the offending file stays on disk and the error is
/// returned; the reports after it are discarded unread. Hosts are appended as
/// found; two reports naming the same address produce two hosts.
pub fn parse_reports<P: AsRef<Path>>(paths: &[P]) -> Result<ScanResults> {
    let mut hosts = Vec::new();
    for (i, path) in paths.iter().enumerate() {
        if let Err(e) = consume_report(path.as_ref(), &mut hosts) {
            discard_reports(&paths[i + 1..]);
            return Err(e);
        }
    }
    Ok(ScanResults::from_hosts(hosts))
}

fn consume_report(path: &Path, hosts: &mut Vec<Host>) -> Result<()> {
    let parsed = parse_report(path)?;
    tracing::debug!("Parsed {} hosts from {}", parsed.len(), path.display());
    std::fs::remove_file(path)?;
    hosts.extend(parsed);
    Ok(())
}

/// Removes reports an aborted run will never parse.
pub fn discard_reports<P: AsRef<Path>>(paths: &[P]) {
    for path in paths {
        let path = path.as_ref();
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!("Discarded unparsed report {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Could not remove report {}: {}", path.display(), e),
        }
    }
}
