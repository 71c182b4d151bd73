use serde::{Deserialize, Serialize};

/// Generator configuration that shapes `Builder` metadata.
///
/// These values come from the generator's settings, never from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorSettings {
    /// Generate a published interface next to each implementation class.
    pub published_interfaces: bool,
    /// Prefix of published interface names (`IPolicy`).
    pub interface_prefix: String,
    /// Suffix of implementation class names, e.g. `Impl`.
    pub implementation_suffix: String,
    /// Suffix of generated builder class names (`PolicyBuilder`).
    pub builder_class_suffix: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            published_interfaces: false,
            interface_prefix: "I".to_string(),
            implementation_suffix: String::new(),
            builder_class_suffix: "Builder".to_string(),
        }
    }
}

impl GeneratorSettings {
    pub fn with_published_interfaces(mut self, published: bool) -> Self {
        self.published_interfaces = published;
        self
    }

    pub fn class_name(&self, type_name: &str) -> String {
        format!("{type_name}{}", self.implementation_suffix)
    }

    pub fn interface_name(&self, type_name: &str) -> Option<String> {
        self.published_interfaces
            .then(|| format!("{}{type_name}", self.interface_prefix))
    }

    pub fn builder_class_name(&self, type_name: &str) -> String {
        format!("{type_name}{}", self.builder_class_suffix)
    }
}

/// `HomePolicy` -> `homePolicy`, `URLLink` -> `urlLink`.
pub fn variable_name(type_name: &str) -> String {
    let chars: Vec<char> = type_name.chars().collect();
    let upper_run = chars.iter().take_while(|c| c.is_uppercase()).count();
    // Keep the last capital of an acronym when a lowercase word follows it.
    let lower_count = match upper_run {
        0 => 0,
        n if n == chars.len() => n,
        1 => 1,
        n => n - 1,
    };
    chars
        .iter()
        .enumerate()
        .flat_map(|(i, c)| {
            let lowered: Vec<char> = if i < lower_count {
                c.to_lowercase().collect()
            } else {
                vec![*c]
            };
            lowered
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/settings_tests.rs"]
mod settings_tests;
