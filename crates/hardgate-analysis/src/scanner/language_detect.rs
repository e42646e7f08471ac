//! Language detection from file extension and scanner-supplied names.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

/// Languages the engine recognizes in a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Java,
    CSharp,
    Go,
    Rust,
    Ruby,
    Php,
    Kotlin,
    Cpp,
    C,
    Swift,
    Scala,
    Html,
    Css,
    Scss,
    Vue,
    Svelte,
    Shell,
    Terraform,
    Dockerfile,
    Yaml,
    Json,
    Xml,
    Sql,
    Markdown,
}

/// Technology family a language belongs to, used for share computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFamily {
    /// Markup, browser script, and style languages.
    Frontend,
    /// General-purpose compiled/interpreted languages.
    Backend,
    /// Deployment and provisioning descriptors.
    Infra,
    /// Data and documentation formats; counted in totals only.
    Other,
}

impl Language {
    pub const ALL: &'static [Language] = &[
        Language::TypeScript,
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::CSharp,
        Language::Go,
        Language::Rust,
        Language::Ruby,
        Language::Php,
        Language::Kotlin,
        Language::Cpp,
        Language::C,
        Language::Swift,
        Language::Scala,
        Language::Html,
        Language::Css,
        Language::Scss,
        Language::Vue,
        Language::Svelte,
        Language::Shell,
        Language::Terraform,
        Language::Dockerfile,
        Language::Yaml,
        Language::Json,
        Language::Xml,
        Language::Sql,
        Language::Markdown,
    ];

    /// Detect language from a file extension string.
    pub fn from_extension(ext: Option<&str>) -> Option<Language> {
        match ext?.to_ascii_lowercase().as_str() {
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "py" | "pyi" => Some(Language::Python),
            "java" => Some(Language::Java),
            "cs" => Some(Language::CSharp),
            "go" => Some(Language::Go),
            "rs" => Some(Language::Rust),
            "rb" | "rake" | "gemspec" => Some(Language::Ruby),
            "php" => Some(Language::Php),
            "kt" | "kts" => Some(Language::Kotlin),
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => Some(Language::Cpp),
            "c" | "h" => Some(Language::C),
            "swift" => Some(Language::Swift),
            "scala" | "sc" => Some(Language::Scala),
            "html" | "htm" => Some(Language::Html),
            "css" => Some(Language::Css),
            "scss" | "sass" | "less" => Some(Language::Scss),
            "vue" => Some(Language::Vue),
            "svelte" => Some(Language::Svelte),
            "sh" | "bash" | "zsh" => Some(Language::Shell),
            "tf" | "tfvars" | "hcl" => Some(Language::Terraform),
            "yml" | "yaml" => Some(Language::Yaml),
            "json" => Some(Language::Json),
            "xml" => Some(Language::Xml),
            "sql" => Some(Language::Sql),
            "md" | "markdown" => Some(Language::Markdown),
            _ => None,
        }
    }

    /// Detect language from a path, including extension-less well-known files.
    pub fn from_path(path: &Path) -> Option<Language> {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if file_name == "Dockerfile" || file_name.starts_with("Dockerfile.") {
            return Some(Language::Dockerfile);
        }
        Self::from_extension(path.extension().and_then(|e| e.to_str()))
    }

    /// Parse a language name as reported by an external scanner.
    /// Accepts canonical names, display names, and common aliases.
    pub fn from_name(name: &str) -> Option<Language> {
        let lowered = name.trim().to_ascii_lowercase();
        let language = match lowered.as_str() {
            "typescript" | "ts" | "tsx" => Language::TypeScript,
            "javascript" | "js" | "jsx" | "node" => Language::JavaScript,
            "python" | "py" => Language::Python,
            "java" => Language::Java,
            "csharp" | "c#" | "cs" => Language::CSharp,
            "go" | "golang" => Language::Go,
            "rust" | "rs" => Language::Rust,
            "ruby" | "rb" => Language::Ruby,
            "php" => Language::Php,
            "kotlin" | "kt" => Language::Kotlin,
            "cpp" | "c++" => Language::Cpp,
            "c" => Language::C,
            "swift" => Language::Swift,
            "scala" => Language::Scala,
            "html" => Language::Html,
            "css" => Language::Css,
            "scss" | "sass" | "less" => Language::Scss,
            "vue" => Language::Vue,
            "svelte" => Language::Svelte,
            "shell" | "bash" | "sh" => Language::Shell,
            "terraform" | "hcl" => Language::Terraform,
            "dockerfile" | "docker" => Language::Dockerfile,
            "yaml" | "yml" => Language::Yaml,
            "json" => Language::Json,
            "xml" => Language::Xml,
            "sql" => Language::Sql,
            "markdown" | "md" => Language::Markdown,
            _ => return None,
        };
        Some(language)
    }

    /// Returns the display name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Ruby => "Ruby",
            Language::Php => "PHP",
            Language::Kotlin => "Kotlin",
            Language::Cpp => "C++",
            Language::C => "C",
            Language::Swift => "Swift",
            Language::Scala => "Scala",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Scss => "SCSS",
            Language::Vue => "Vue",
            Language::Svelte => "Svelte",
            Language::Shell => "Shell",
            Language::Terraform => "Terraform",
            Language::Dockerfile => "Dockerfile",
            Language::Yaml => "YAML",
            Language::Json => "JSON",
            Language::Xml => "XML",
            Language::Sql => "SQL",
            Language::Markdown => "Markdown",
        }
    }

    /// The technology family used by the characteristics analyzer.
    ///
    /// JavaScript and TypeScript count as frontend: most repositories that
    /// carry them ship a browser bundle.
    pub fn family(&self) -> LanguageFamily {
        match self {
            Language::TypeScript
            | Language::JavaScript
            | Language::Html
            | Language::Css
            | Language::Scss
            | Language::Vue
            | Language::Svelte => LanguageFamily::Frontend,
            Language::Python
            | Language::Java
            | Language::CSharp
            | Language::Go
            | Language::Rust
            | Language::Ruby
            | Language::Php
            | Language::Kotlin
            | Language::Cpp
            | Language::C
            | Language::Swift
            | Language::Scala => LanguageFamily::Backend,
            Language::Shell | Language::Terraform | Language::Dockerfile | Language::Yaml => {
                LanguageFamily::Infra
            }
            Language::Json | Language::Xml | Language::Sql | Language::Markdown => {
                LanguageFamily::Other
            }
        }
    }

    /// True for languages whose files hold executable program logic.
    pub fn is_code(&self) -> bool {
        match self.family() {
            LanguageFamily::Backend => true,
            LanguageFamily::Frontend => {
                !matches!(self, Language::Html | Language::Css | Language::Scss)
            }
            LanguageFamily::Infra => matches!(self, Language::Shell),
            LanguageFamily::Other => false,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Deserialize an optional language leniently: names the engine does not
/// know (e.g. "text", "unknown") become `None` instead of an error.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Language>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Language::from_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_and_name_agree() {
        assert_eq!(Language::from_extension(Some("TSX")), Some(Language::TypeScript));
        assert_eq!(Language::from_name("C#"), Some(Language::CSharp));
        assert_eq!(Language::from_name("c++"), Some(Language::Cpp));
        assert_eq!(Language::from_name("text"), None);
    }

    #[test]
    fn dockerfile_detected_by_name() {
        assert_eq!(
            Language::from_path(Path::new("deploy/Dockerfile")),
            Some(Language::Dockerfile)
        );
        assert_eq!(Language::from_path(Path::new("README")), None);
    }

    #[test]
    fn families() {
        assert_eq!(Language::Java.family(), LanguageFamily::Backend);
        assert_eq!(Language::Scss.family(), LanguageFamily::Frontend);
        assert_eq!(Language::Terraform.family(), LanguageFamily::Infra);
        assert_eq!(Language::Markdown.family(), LanguageFamily::Other);
        assert!(Language::Python.is_code());
        assert!(Language::TypeScript.is_code());
        assert!(!Language::Css.is_code());
        assert!(!Language::Yaml.is_code());
    }
}
