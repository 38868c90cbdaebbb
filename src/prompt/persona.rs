//! File-extension to developer-persona inference for prompt framing.

use std::path::Path;

/// Human-readable language label per (lower-cased) file extension.
const EXTENSION_LABELS: &[(&[&str], &str)] = &[
    (&[".js", ".jsx", ".mjs", ".cjs", ".mjsx", ".cjsx"], "JavaScript"),
    (&[".ts", ".tsx", ".mts", ".cts", ".mtsx", ".ctsx"], "TypeScript"),
    (&[".py"], "Python"),
    (&[".java", ".jsp"], "Java"),
    (&[".scala", ".sc"], "Scala"),
    (&[".kt", ".kts"], "Kotlin"),
    (&[".groovy", ".gvy", ".gy", ".gsh"], "Groovy"),
    (&[".rb"], "Ruby"),
    (&[".php", ".phtml"], "PHP"),
    (&[".r"], "R-Lang"),
    (&[".c"], "C"),
    (&[".cs"], "C#"),
    (&[".cpp", ".cc", ".cxx", ".h", ".hpp"], "C++"),
    (&[".go"], "Go"),
    (&[".aspx", ".ascx", ".cshtml"], "ASP.NET"),
    (&[".sh", ".bash", ".bat", ".ps1", ".cmd"], "Shell or batch scripts"),
    (
        &[
            ".html", ".htm", ".css", ".less", ".scss", ".sass", ".styl", ".stylus",
            ".vue", ".ejs",
        ],
        "Frontend",
    ),
    (&[".rs"], "Rust"),
    (&[".sql"], "SQL"),
];

/// Infer a reviewer persona from a file name's extension.
///
/// Known extensions yield "expert <language> developer"; everything else
/// falls back to "expert programmer". Pure lookup, extended by adding rows
/// to the table.
pub fn developer_persona(file_name: &str) -> String {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    for (extensions, label) in EXTENSION_LABELS {
        if extensions.contains(&extension.as_str()) {
            return format!("expert {label} developer");
        }
    }

    "expert programmer".to_string()
}
