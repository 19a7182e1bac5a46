//! Node colour classification.
//!
//! Resolution walks a fixed priority order: special directory names first,
//! then the directory default, then the file extension table with a neutral
//! fallback. The tables are plain data and can be replaced wholesale, e.g.
//! from a JSON document shipped next to the app.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::model::{DirectoryNode, NodeKind};

const SPECIAL_DIRECTORIES: &[(&str, &str)] = &[
	("exe_history", "rgba(255, 99, 71, 0.8)"),
	("frontend", "rgba(255, 165, 0, 0.8)"),
	("backend", "rgba(230, 130, 255, 0.8)"),
	("middleware", "rgba(0, 255, 127, 0.8)"),
	("docs", "rgba(138, 43, 226, 0.8)"),
	("tests", "rgba(255, 20, 147, 0.8)"),
	("resources", "rgba(0, 191, 255, 0.8)"),
	("database", "rgba(255, 215, 0, 0.8)"),
	("logs", "rgba(169, 169, 169, 0.8)"),
	("locales", "rgba(0, 250, 154, 0.8)"),
	("meta", "rgba(255, 215, 0, 1)"),
];

const EXTENSIONS: &[(&str, &str)] = &[
	("js", "rgba(255, 165, 0, 0.8)"),
	("jsx", "rgba(255, 165, 0, 0.8)"),
	("ts", "rgba(255, 140, 0, 0.8)"),
	("tsx", "rgba(255, 69, 0, 0.8)"),
	("css", "rgba(0, 220, 255, 0.8)"),
	("scss", "rgba(0, 220, 255, 0.8)"),
	("html", "rgba(255, 100, 0, 0.8)"),
	("json", "rgba(150, 150, 150, 0.8)"),
	("md", "rgba(100, 255, 100, 0.8)"),
	("py", "rgba(230, 130, 255, 0.8)"),
	("rb", "rgba(255, 45, 85, 0.8)"),
	("php", "rgba(255, 69, 58, 0.8)"),
	("java", "rgba(255, 105, 97, 0.8)"),
	("go", "rgba(255, 55, 95, 0.8)"),
	("rs", "rgba(255, 85, 85, 0.8)"),
	("sql", "rgba(255, 99, 71, 0.8)"),
	("sh", "rgba(255, 69, 0, 0.8)"),
	("bash", "rgba(255, 69, 0, 0.8)"),
	("yml", "rgba(203, 23, 30, 0.8)"),
	("yaml", "rgba(203, 23, 30, 0.8)"),
	("dockerfile", "rgba(0, 128, 0, 0.8)"),
];

/// Neutral translucent colour for directories without a special name.
pub const DEFAULT_DIRECTORY_COLOR: &str = "rgba(0, 150, 255, 0.8)";
/// Neutral colour for files whose extension is not in the table.
pub const DEFAULT_FILE_COLOR: &str = "rgba(200, 200, 200, 0.8)";

/// Rule tables consulted by [`ColorResolver`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRules {
	/// Exact directory name to colour.
	pub special_directories: HashMap<String, String>,
	/// Lower-cased file extension to colour.
	pub extensions: HashMap<String, String>,
	pub directory_default: String,
	pub file_default: String,
}

impl Default for ColorRules {
	fn default() -> Self {
		let table = |entries: &[(&str, &str)]| -> HashMap<String, String> {
			entries
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect()
		};
		Self {
			special_directories: table(SPECIAL_DIRECTORIES),
			extensions: table(EXTENSIONS),
			directory_default: DEFAULT_DIRECTORY_COLOR.into(),
			file_default: DEFAULT_FILE_COLOR.into(),
		}
	}
}

impl ColorRules {
	/// Parses rules from JSON. Missing fields keep the built-in values.
	pub fn from_json(json: &str) -> serde_json::Result<Self> {
		serde_json::from_str(json)
	}
}

/// Pure, total mapping from `(kind, name, extension)` to an RGBA string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorResolver {
	rules: ColorRules,
}

impl ColorResolver {
	pub fn new(rules: ColorRules) -> Self {
		Self { rules }
	}

	/// Resolves a colour. `extension` must already be lower-cased; `None`
	/// and `""` are unmapped. Kind decides the branch before any name or
	/// extension matching happens.
	pub fn resolve(&self, kind: NodeKind, name: &str, extension: Option<&str>) -> &str {
		match kind {
			NodeKind::Directory => self
				.rules
				.special_directories
				.get(name)
				.map(String::as_str)
				.unwrap_or(&self.rules.directory_default),
			NodeKind::File => extension
				.filter(|ext| !ext.is_empty())
				.and_then(|ext| self.rules.extensions.get(ext))
				.map(String::as_str)
				.unwrap_or(&self.rules.file_default),
		}
	}

	/// Resolves the colour of a tree entry, deriving the extension from its name.
	pub fn resolve_entry(&self, entry: &DirectoryNode) -> &str {
		match entry.kind {
			NodeKind::Directory => self.resolve(entry.kind, &entry.name, None),
			NodeKind::File => {
				let ext = file_extension(&entry.name);
				self.resolve(entry.kind, &entry.name, Some(&ext))
			}
		}
	}
}

/// Lower-cased text after the last `.`. A name without a dot is its own
/// extension, which is how `Dockerfile` finds its table entry.
pub fn file_extension(name: &str) -> String {
	name.rsplit('.').next().unwrap_or_default().to_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn special_directory_wins_over_default() {
		let resolver = ColorResolver::default();
		assert_eq!(
			resolver.resolve(NodeKind::Directory, "logs", None),
			"rgba(169, 169, 169, 0.8)"
		);
		assert_eq!(
			resolver.resolve(NodeKind::Directory, "src", None),
			DEFAULT_DIRECTORY_COLOR
		);
	}

	#[test]
	fn special_names_are_exact_matches() {
		let resolver = ColorResolver::default();
		assert_eq!(
			resolver.resolve(NodeKind::Directory, "Logs", None),
			DEFAULT_DIRECTORY_COLOR
		);
		assert_eq!(
			resolver.resolve(NodeKind::Directory, "logs_old", None),
			DEFAULT_DIRECTORY_COLOR
		);
	}

	#[test]
	fn unknown_extension_falls_back() {
		let resolver = ColorResolver::default();
		assert_eq!(
			resolver.resolve(NodeKind::File, "data.xyz123", Some("xyz123")),
			DEFAULT_FILE_COLOR
		);
		assert_eq!(resolver.resolve(NodeKind::File, "x", None), DEFAULT_FILE_COLOR);
		assert_eq!(resolver.resolve(NodeKind::File, "x.", Some("")), DEFAULT_FILE_COLOR);
	}

	#[test]
	fn directory_named_like_an_extension_uses_directory_branch() {
		let resolver = ColorResolver::default();
		assert_eq!(
			resolver.resolve(NodeKind::Directory, "py", Some("py")),
			DEFAULT_DIRECTORY_COLOR
		);
		// and a file named like a special directory uses the file branch
		assert_eq!(
			resolver.resolve(NodeKind::File, "logs", Some("logs")),
			DEFAULT_FILE_COLOR
		);
	}

	#[test]
	fn entry_extension_is_lower_cased() {
		let resolver = ColorResolver::default();
		let entry = DirectoryNode::file("f1", "Main.RS");
		assert_eq!(resolver.resolve_entry(&entry), "rgba(255, 85, 85, 0.8)");
		let docker = DirectoryNode::file("f2", "Dockerfile");
		assert_eq!(resolver.resolve_entry(&docker), "rgba(0, 128, 0, 0.8)");
		let archive = DirectoryNode::file("f3", "backup.tar.GZ");
		assert_eq!(resolver.resolve_entry(&archive), DEFAULT_FILE_COLOR);
	}

	#[test]
	fn file_extension_edge_cases() {
		assert_eq!(file_extension("a.b.C"), "c");
		assert_eq!(file_extension("README"), "readme");
		assert_eq!(file_extension("trailing."), "");
		assert_eq!(file_extension(".gitignore"), "gitignore");
	}

	#[test]
	fn resolution_is_total_over_odd_inputs() {
		let resolver = ColorResolver::default();
		let names = ["", ".", "..", "ファイル.md", "a b.PY", "\u{0}"];
		for kind in [NodeKind::File, NodeKind::Directory] {
			for name in names {
				let ext = file_extension(name);
				assert!(!resolver.resolve(kind, name, Some(&ext)).is_empty());
				assert!(!resolver.resolve(kind, name, None).is_empty());
			}
		}
	}

	#[test]
	fn injected_tables_replace_builtins() {
		let rules = ColorRules::from_json(
			r#"{
				"special_directories": { "vendor": "rgba(1, 2, 3, 1)" },
				"extensions": { "toml": "rgba(4, 5, 6, 1)" }
			}"#,
		)
		.unwrap();
		let resolver = ColorResolver::new(rules);
		assert_eq!(
			resolver.resolve(NodeKind::Directory, "vendor", None),
			"rgba(1, 2, 3, 1)"
		);
		assert_eq!(
			resolver.resolve(NodeKind::Directory, "logs", None),
			DEFAULT_DIRECTORY_COLOR
		);
		assert_eq!(
			resolver.resolve(NodeKind::File, "Cargo.toml", Some("toml")),
			"rgba(4, 5, 6, 1)"
		);
		assert_eq!(
			resolver.resolve(NodeKind::File, "main.rs", Some("rs")),
			DEFAULT_FILE_COLOR
		);
	}

	#[test]
	fn synthetic_fallbacks_are_used() {
		let resolver = ColorResolver::new(ColorRules {
			special_directories: HashMap::new(),
			extensions: HashMap::new(),
			directory_default: "dir".into(),
			file_default: "file".into(),
		});
		assert_eq!(resolver.resolve(NodeKind::Directory, "logs", None), "dir");
		assert_eq!(resolver.resolve(NodeKind::File, "a.rs", Some("rs")), "file");
	}
}
