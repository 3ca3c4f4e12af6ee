use iterown::{
    decision_table, explain, make_query, Batch, BatchReport, ContainerKind, ElementCapability,
    EntryStatus, IterationForm, ParseError, ResolverConfig,
};
use miette::{IntoDiagnostic, Result};
use serde_json::json;
use std::fmt::Write;
use std::path::Path;
use std::str::FromStr;

/// Accept either a form name (`reference_iterator`) or a surface spelling
/// (`for x in &v`)
pub fn parse_form(text: &str) -> Result<IterationForm, ParseError> {
    IterationForm::from_str(text)
        .ok()
        .or_else(|| IterationForm::from_surface(text))
        .ok_or_else(|| ParseError::UnknownName {
            kind: "iteration form",
            name: text.to_string(),
        })
}

pub struct ResolveArgs {
    pub container: ContainerKind,
    pub element: ElementCapability,
    pub form: IterationForm,
    pub mutable_binding: bool,
    pub explain: bool,
    pub json: bool,
}

pub fn resolve(config: &ResolverConfig, args: &ResolveArgs) -> Result<String> {
    let query = make_query(args.container, args.element, args.form, args.mutable_binding)?;
    let outcome = config.resolver().resolve(&query);

    if args.json {
        let mut value = json!({ "query": query, "outcome": outcome });
        if args.explain {
            value["explanation"] = serde_json::to_value(explain(&query, &outcome)).into_diagnostic()?;
        }
        return serde_json::to_string_pretty(&value).into_diagnostic();
    }

    let mut out = format!("{} ({})", outcome, outcome.encode());
    if args.explain {
        write!(out, "\n{}", explain(&query, &outcome)).into_diagnostic()?;
    }
    Ok(out)
}

pub fn table(config: &ResolverConfig, as_json: bool) -> Result<String> {
    let rows = decision_table(config.rule_set);
    if as_json {
        return serde_json::to_string_pretty(&rows).into_diagnostic();
    }

    let mut out = format!(
        "{:<28} {:<14} {:<12} {:<16} {:<8} {}\n",
        "form", "container", "element", "mode", "mutates", "usable after"
    );
    for row in rows {
        writeln!(
            out,
            "{:<28} {:<14} {:<12} {:<16} {:<8} {}",
            row.form.to_string(),
            row.container.to_string(),
            row.element.to_string(),
            row.outcome.ownership_mode.to_string(),
            row.outcome.mutates_elements,
            row.outcome.container_usable_after
        )
        .into_diagnostic()?;
    }
    Ok(out)
}

pub fn batch(config: &ResolverConfig, path: &Path, as_json: bool) -> Result<(String, BatchReport)> {
    let report = Batch::new(config).run_file(path)?;
    if as_json {
        let text = serde_json::to_string_pretty(&report).into_diagnostic()?;
        return Ok((text, report));
    }

    let mut out = String::new();
    for entry in &report.entries {
        let site = entry.site.as_deref().unwrap_or("-");
        let status = match &entry.status {
            EntryStatus::Resolved { outcome, .. } => outcome.encode(),
            EntryStatus::Invalid { message } => format!("invalid: {message}"),
            EntryStatus::Malformed { message } => format!("malformed: {message}"),
        };
        let flag = if report.findings.contains(&entry.line) {
            " [denied move]"
        } else {
            ""
        };
        writeln!(out, "{:>4}  {site}  {status}{flag}", entry.line).into_diagnostic()?;
    }
    write!(
        out,
        "{} resolved, {} invalid, {} malformed, {} findings",
        report.resolved,
        report.invalid,
        report.malformed,
        report.findings.len()
    )
    .into_diagnostic()?;
    Ok((out, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use iterown::RuleSet;

    fn args(form: IterationForm, mutable_binding: bool) -> ResolveArgs {
        ResolveArgs {
            container: ContainerKind::Growable,
            element: ElementCapability::Duplicable,
            form,
            mutable_binding,
            explain: false,
            json: false,
        }
    }

    #[test]
    fn test_parse_form_by_name_or_surface() {
        assert_eq!(parse_form("owning_iterator").unwrap(), IterationForm::OwningIterator);
        assert_eq!(
            parse_form("for n in &numbers").unwrap(),
            IterationForm::BySharedReference
        );
        assert!(matches!(
            parse_form("v.drain(..)"),
            Err(ParseError::UnknownName { .. })
        ));
    }

    #[test]
    fn test_resolve_text() {
        let out = resolve(&ResolverConfig::default(), &args(IterationForm::ByValue, false)).unwrap();
        assert_eq!(out, "{move, mutates: false, usable after: false} (move:0:0:1)");
    }

    #[test]
    fn test_resolve_rejects_immutable_iter_mut() {
        let err = resolve(
            &ResolverConfig::default(),
            &args(IterationForm::MutableReferenceIterator, false),
        )
        .unwrap_err();
        assert!(err.to_string().contains("immutable growable binding"));
    }

    #[test]
    fn test_resolve_json_with_explanation() {
        let mut resolve_args = args(IterationForm::ReferenceIterator, false);
        resolve_args.json = true;
        resolve_args.explain = true;
        let out = resolve(&ResolverConfig::default(), &resolve_args).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["outcome"]["ownership_mode"], "borrow");
        assert!(value["explanation"]["summary"]
            .as_str()
            .unwrap()
            .starts_with("`c.iter()`"));
    }

    #[test]
    fn test_table_has_header_and_all_rows() {
        let config = ResolverConfig {
            rule_set: RuleSet::Legacy2018,
            deny_moves: false,
        };
        let out = table(&config, false).unwrap();
        assert_eq!(out.lines().count(), 1 + 24);
        assert!(out.starts_with("form"));
    }
}
