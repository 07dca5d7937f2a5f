//! `proctree dispatch` and `proctree routes`

use crate::error::ProctreeResult;
use crate::router::RouteTable;
use std::io::Write;

/// Dispatch one request and print the response body
pub fn run_dispatch(
    table: &RouteTable,
    verb: &str,
    path: &str,
    out: &mut dyn Write,
) -> ProctreeResult<()> {
    let body = table.dispatch(verb, path);
    writeln!(out, "{body}")?;
    Ok(())
}

/// Print one `VERB path` line per registered route
pub fn run_routes(table: &RouteTable, out: &mut dyn Write) -> ProctreeResult<()> {
    for (verb, path) in table.routes() {
        writeln!(out, "{:<6} {}", verb.as_str(), path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::demo_routes;

    #[test]
    fn test_dispatch_writes_body() {
        let mut out = Vec::new();
        run_dispatch(&demo_routes(), "post", "/submit", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Form submitted successfully!\n");

        let mut out = Vec::new();
        run_dispatch(&demo_routes(), "PUT", "/update", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "404 Not Found\n");
    }

    #[test]
    fn test_routes_listing() {
        let mut out = Vec::new();
        run_routes(&demo_routes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "GET    /");
        assert_eq!(lines[3], "DELETE /resource");
    }
}
