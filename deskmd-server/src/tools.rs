//! The three Markdown tools and the path confinement they share.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const COUNT_MD_FILES: &str = "count_md_files";
pub const LIST_MD_FILES: &str = "list_md_files";
pub const READ_MD_FILE: &str = "read_md_file";

pub const DEFAULT_MAX_CHARS: i64 = 20_000;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("filename must not be empty")]
    EmptyFilename,
    #[error("illegal path: {0}")]
    IllegalPath(String),
    #[error("only .md files can be read: {0}")]
    NotMarkdown(String),
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    fn io(path: &Path, source: io::Error) -> Self {
        ToolError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReadArgs {
    filename: String,
    #[serde(default = "default_max_chars")]
    max_chars: i64,
}

fn default_max_chars() -> i64 {
    DEFAULT_MAX_CHARS
}

fn parse_args<T: for<'de> Deserialize<'de>>(
    tool: &str,
    arguments: Map<String, Value>,
) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments)).map_err(|err| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: err.to_string(),
    })
}

/// One directory whose `*.md` files are served. Nothing outside it is ever
/// opened.
#[derive(Debug, Clone)]
pub struct MdDirectory {
    root: PathBuf,
}

impl MdDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Tool definitions in `tools/list` form.
    pub fn definitions(&self) -> Vec<Value> {
        vec![
            json!({
                "name": COUNT_MD_FILES,
                "description": "Count the number of .md files in the served directory.",
                "inputSchema": {"type": "object", "properties": {}, "additionalProperties": false},
            }),
            json!({
                "name": LIST_MD_FILES,
                "description": "Get a list of all .md filenames in the served directory.",
                "inputSchema": {"type": "object", "properties": {}, "additionalProperties": false},
            }),
            json!({
                "name": READ_MD_FILE,
                "description": "Read a .md file from the served directory by filename (supports truncation via max_chars).",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "filename": {"type": "string"},
                        "max_chars": {"type": "integer", "default": DEFAULT_MAX_CHARS},
                    },
                    "required": ["filename"],
                    "additionalProperties": false,
                },
            }),
        ]
    }

    /// Run a tool by name and return its text output.
    pub fn call(&self, name: &str, arguments: Map<String, Value>) -> Result<String, ToolError> {
        debug!(tool = name, ?arguments, "Dispatching tool");
        match name {
            COUNT_MD_FILES => {
                parse_args::<NoArgs>(name, arguments)?;
                Ok(self.count()?.to_string())
            }
            LIST_MD_FILES => {
                parse_args::<NoArgs>(name, arguments)?;
                self.list_text()
            }
            READ_MD_FILE => {
                let args: ReadArgs = parse_args(name, arguments)?;
                self.read(&args.filename, args.max_chars)
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    pub fn count(&self) -> Result<usize, ToolError> {
        Ok(self.md_files()?.len())
    }

    /// Sorted names of the `*.md` entries directly inside the directory.
    pub fn list(&self) -> Result<Vec<String>, ToolError> {
        let mut names: Vec<String> = self
            .md_files()?
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    fn list_text(&self) -> Result<String, ToolError> {
        let names = self.list()?;
        let dir = self.root.display();
        if names.is_empty() {
            return Ok(format!("No .md files found in {dir}."));
        }
        let mut text = format!("Found {} .md files in {dir}:", names.len());
        for name in names {
            text.push_str("\n- ");
            text.push_str(&name);
        }
        Ok(text)
    }

    /// Read one file, keeping at most `max_chars` characters. A non-positive
    /// limit returns the whole file.
    pub fn read(&self, filename: &str, max_chars: i64) -> Result<String, ToolError> {
        let path = self.resolve(filename)?;
        let bytes = fs::read(&path).map_err(|err| ToolError::io(&path, err))?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(truncate(&content, max_chars))
    }

    /// Map a requested filename to a file inside the directory.
    ///
    /// Only the final path component is used, so `../x.md` and `/etc/x.md`
    /// both name `x.md` inside the directory. The resolved path must still
    /// sit inside the canonical root after symlinks are followed.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, ToolError> {
        let requested = filename.trim();
        if requested.is_empty() {
            return Err(ToolError::EmptyFilename);
        }
        let base = Path::new(requested)
            .file_name()
            .ok_or_else(|| ToolError::IllegalPath(requested.to_string()))?;

        let root = self
            .root
            .canonicalize()
            .map_err(|err| ToolError::io(&self.root, err))?;
        let candidate = root.join(base);
        if !has_md_extension(&candidate) {
            return Err(ToolError::NotMarkdown(requested.to_string()));
        }

        let resolved = match candidate.canonicalize() {
            Ok(path) => path,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ToolError::NotFound(candidate));
            }
            Err(err) => return Err(ToolError::io(&candidate, err)),
        };
        if resolved == root || !resolved.starts_with(&root) {
            return Err(ToolError::IllegalPath(requested.to_string()));
        }
        if !resolved.is_file() {
            return Err(ToolError::NotFound(candidate));
        }
        Ok(resolved)
    }

    fn md_files(&self) -> Result<Vec<PathBuf>, ToolError> {
        let pattern = format!(
            "{}/*.md",
            glob::Pattern::escape(&self.root.to_string_lossy())
        );
        Ok(glob::glob(&pattern)?
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .collect())
    }
}

fn has_md_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("md"))
}

fn truncate(content: &str, max_chars: i64) -> String {
    let Ok(limit) = usize::try_from(max_chars) else {
        return content.to_string();
    };
    if limit == 0 {
        return content.to_string();
    }
    match content.char_indices().nth(limit) {
        Some((cut, _)) => format!(
            "{}\n\n[content truncated: showing first {limit} characters]",
            &content[..cut]
        ),
        None => content.to_string(),
    }
}
