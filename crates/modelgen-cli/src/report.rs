use colored::Colorize;
use modelgen_common::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};
use modelgen_model::TypeGraph;
use modelgen_resolver::{Builder, DerivedUnionSubsets};
use serde::Serialize;

/// What the resolver decided for one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supertype: Option<String>,
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
    pub builder_class_name: String,
    pub variable_name: String,
    pub own_attributes: Vec<String>,
    pub super_attributes: Vec<String>,
    pub own_associations: Vec<String>,
    pub super_associations: Vec<String>,
    /// Builder whose association code this type reuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ancestor_association_builder: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub derived_unions: Vec<DerivedUnionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedUnionReport {
    pub union: String,
    pub union_inverse: String,
    pub subsets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub types: Vec<TypeReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

impl TypeReport {
    pub fn from_builder(graph: &TypeGraph, builder: &Builder) -> Self {
        let names = builder.names();
        Self {
            name: builder.name().to_string(),
            supertype: builder.supertype_builder().map(|b| b.name().to_string()),
            class_name: names.class_name.clone(),
            interface_name: names.interface_name.clone(),
            builder_class_name: names.builder_class_name.clone(),
            variable_name: names.variable_name.clone(),
            own_attributes: builder
                .own_attributes()
                .iter()
                .map(|&id| graph.attribute(id).name.clone())
                .collect(),
            super_attributes: builder
                .super_attributes()
                .iter()
                .map(|&id| graph.qualified_attribute_name(id))
                .collect(),
            own_associations: builder
                .own_associations()
                .iter()
                .map(|&id| graph.association(id).name.clone())
                .collect(),
            super_associations: builder
                .super_associations_by_name()
                .values()
                .map(|&id| graph.qualified_association_name(id))
                .collect(),
            ancestor_association_builder: builder
                .nearest_ancestor_builder_with_associations()
                .map(|b| b.names().builder_class_name.clone()),
            derived_unions: builder
                .derived_union_subsets()
                .iter()
                .map(|subsets| DerivedUnionReport::new(graph, subsets))
                .collect(),
        }
    }
}

impl DerivedUnionReport {
    fn new(graph: &TypeGraph, subsets: &DerivedUnionSubsets) -> Self {
        Self {
            union: graph.qualified_association_name(subsets.union),
            union_inverse: graph.qualified_association_name(subsets.union_inverse),
            subsets: subsets
                .subsets
                .iter()
                .map(|&id| graph.qualified_association_name(id))
                .collect(),
        }
    }
}

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, report: &RunReport) -> String {
        let mut out = String::new();
        for ty in &report.types {
            out.push_str(&self.format_type(ty));
            out.push('\n');
        }
        for diagnostic in &report.diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }
        out
    }

    pub fn format_type(&self, ty: &TypeReport) -> String {
        let mut output = if self.color {
            ty.name.bold().to_string()
        } else {
            ty.name.clone()
        };
        if let Some(supertype) = &ty.supertype {
            output.push_str(" extends ");
            output.push_str(supertype);
        }
        output.push_str(&format!(
            " ({}, {})",
            ty.class_name, ty.builder_class_name
        ));
        if let Some(interface) = &ty.interface_name {
            output.push_str(&format!(" published as {interface}"));
        }

        let mut line = |label: &str, values: &[String]| {
            if !values.is_empty() {
                output.push_str(&format!("\n  {}: {}", self.label(label), values.join(", ")));
            }
        };
        line("attributes", &ty.own_attributes);
        line("inherited attributes", &ty.super_attributes);
        line("associations", &ty.own_associations);
        line("inherited associations", &ty.super_associations);
        if let Some(builder) = &ty.ancestor_association_builder {
            line("reuses associations of", std::slice::from_ref(builder));
        }
        for union in &ty.derived_unions {
            let value = format!("{} <- {}", union.union, union.subsets.join(", "));
            line("derived union", std::slice::from_ref(&value));
        }
        output
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = format!(
            "{} - {} {}: {}",
            diagnostic.element,
            self.format_category(diagnostic.category),
            self.format_code(diagnostic.code),
            diagnostic.message_text
        );
        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
        }
        output
    }

    fn format_related(&self, related: &DiagnosticRelatedInformation) -> String {
        format!(
            "{}: {} - {}",
            self.label("  Related"),
            related.element,
            related.message_text
        )
    }

    fn label(&self, label: &str) -> String {
        if self.color {
            label.dimmed().to_string()
        } else {
            label.to_string()
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("MG{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

#[cfg(test)]
#[path = "../tests/report_tests.rs"]
mod report_tests;
