//! Parameter usage report for a controller.
//!
//! Flags declarations that bind, but probably not the way the author meant:
//! a tag that relies on the declared parameter name, an optional scalar that
//! silently becomes a zero value, a required parameter that can never bind.

use std::fmt;

use crate::binding::spec::{ParamKind, ParameterSpec};
use crate::discovery::ControllerType;

/// Findings for one controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub controller: String,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} warning(s), {} error(s)",
            self.controller,
            self.warnings.len(),
            self.errors.len()
        )?;
        for error in &self.errors {
            writeln!(f, "  error: {error}")?;
        }
        for warning in &self.warnings {
            writeln!(f, "  warning: {warning}")?;
        }
        Ok(())
    }
}

/// Check every parameter of every member of `controller`.
pub fn validate_controller(controller: &ControllerType) -> ValidationReport {
    let mut report = ValidationReport {
        controller: controller.name().to_string(),
        ..ValidationReport::default()
    };

    for member in controller.members() {
        for param in member.params() {
            check_param(member.name(), param, &mut report);
        }
    }

    if !report.is_clean() {
        tracing::debug!(
            controller = %report.controller,
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            "Parameter validation findings"
        );
    }
    report
}

fn check_param(member: &str, param: &ParameterSpec, report: &mut ValidationReport) {
    let name = &param.declared_name;

    if let ParamKind::Unsupported(type_name) = param.kind {
        if param.required {
            report.errors.push(format!(
                "{member}({name}): required parameter of type {type_name} can never be bound"
            ));
        }
        return;
    }

    if param.tagged && !param.explicit_name {
        report.warnings.push(format!(
            "{member}({name}): tag has neither an explicit name nor an alias; binding uses the declared name"
        ));
    }

    if let ParamKind::Scalar(ty) = param.kind {
        if !param.required && !param.optional_type && param.default_value.is_none() {
            report.warnings.push(format!(
                "{member}({name}): optional {ty} without a default value binds to {} when absent",
                ty.zero().into_json()
            ));
        }
    }
}
