use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const CYCLIC_HIERARCHY: u32 = 1001;
    pub const HIERARCHY_TOO_DEEP: u32 = 1002;
    pub const MISSING_INVERSE_ASSOCIATION: u32 = 2001;
    pub const DANGLING_SUBSET_REFERENCE: u32 = 2002;
    pub const MISSING_SHARED_HOST: u32 = 2003;
    pub const CYCLIC_SUBSET_CHAIN: u32 = 2004;
}

pub mod diagnostic_messages {
    pub const CYCLIC_HIERARCHY: &str = "Type '{0}' is part of a cyclic supertype chain.";
    pub const HIERARCHY_TOO_DEEP: &str =
        "Supertype chain of type '{0}' is longer than the {1} types of the model.";
    pub const MISSING_INVERSE_ASSOCIATION: &str =
        "Composition '{0}' has no inverse association and is skipped.";
    pub const DANGLING_SUBSET_REFERENCE: &str =
        "Association '{0}' subsets '{1}', which is not a derived union.";
    pub const MISSING_SHARED_HOST: &str =
        "Shared association '{0}' has no host association and is skipped.";
    pub const CYCLIC_SUBSET_CHAIN: &str =
        "Association '{0}' subsets '{1}', which leads back into its own subset chain.";
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::CYCLIC_HIERARCHY,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::CYCLIC_HIERARCHY,
    },
    DiagnosticMessage {
        code: diagnostic_codes::HIERARCHY_TOO_DEEP,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::HIERARCHY_TOO_DEEP,
    },
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_INVERSE_ASSOCIATION,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::MISSING_INVERSE_ASSOCIATION,
    },
    DiagnosticMessage {
        code: diagnostic_codes::DANGLING_SUBSET_REFERENCE,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::DANGLING_SUBSET_REFERENCE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_SHARED_HOST,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::MISSING_SHARED_HOST,
    },
    DiagnosticMessage {
        code: diagnostic_codes::CYCLIC_SUBSET_CHAIN,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::CYCLIC_SUBSET_CHAIN,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Qualified name of the related model element (`Type` or `Type.member`).
    pub element: String,
    pub message_text: String,
}

/// A diagnostic attached to a model element.
///
/// Model elements are addressed by their qualified name, so a diagnostic on
/// association `parent` of type `Coverage` carries `element = "Coverage.parent"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub element: String,
    pub message_text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(element: impl Into<String>, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            element: element.into(),
            message_text: message.into(),
            related_information: Vec::new(),
        }
    }

    pub fn warning(element: impl Into<String>, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            ..Self::error(element, message, code)
        }
    }

    /// Build a diagnostic from a registered code, filling the message template with `args`.
    ///
    /// Unknown codes fall back to an error with the joined arguments as text.
    pub fn from_code(element: impl Into<String>, code: u32, args: &[&str]) -> Self {
        match lookup_message(code) {
            Some(entry) => Self {
                category: entry.category,
                code,
                element: element.into(),
                message_text: format_message(entry.message, args),
                related_information: Vec::new(),
            },
            None => Self::error(element, args.join(" "), code),
        }
    }

    pub fn with_related(mut self, element: impl Into<String>, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            code: 0,
            element: element.into(),
            message_text: message.into(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Display code in the `MG1234` form used by reports.
    pub fn code_label(&self) -> String {
        format!("MG{}", self.code)
    }
}

pub fn lookup_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    lookup_message(code).map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
