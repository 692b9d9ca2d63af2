//! Renders the `-a` annotated listing: one row per resolved `ByteCode`
//! (`addr  code  line  source`), followed by a `Defined labels` section
//! sorted by defining line.

use crate::ir::Label;
use crate::pass2::Pass2Output;
use std::fmt::Write;

pub fn render(output: &Pass2Output) -> String {
    let mut out = String::new();
    for line in &output.lines {
        let code = line
            .words
            .iter()
            .map(|w| format!("{:04X}", w))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "{:04X}  {:<14}{:>5}  {}", line.address, code, line.line, line.text);
    }

    let _ = writeln!(out, "\nDefined labels");
    let mut labels: Vec<&Label> = output.symtab.labels().collect();
    labels.sort_by_key(|label| label.line);
    for label in labels {
        let scope = if label.scope.is_empty() { "global" } else { label.scope.as_str() };
        let _ = writeln!(out, "{} ({})  {:04X}", label.name, scope, label.address);
    }

    out
}
