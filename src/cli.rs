//! Minimal CLI: model response → (digest html | markdown summary)
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::{LogFormat, LogLevel, Settings, Theme};
use crate::envelope;
use crate::markdown;
use crate::node::DocumentNode;
use crate::render::{RenderedDocument, Renderer};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// render language-model email analyses as HTML digests
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(flatten)]
    common: CommonSettings,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// render JSON-mode analyses into a full document plus per-section breakdown
    Render(RenderOut),
    /// clean a Markdown-mode summary and convert it to HTML
    Markdown(MarkdownOut),
}

#[derive(Args, Debug, Clone)]
struct CommonSettings {
    /// TOML settings file ([renderer] and [logging] tables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// style theme (overrides the settings file)
    #[arg(long, global = true, value_enum)]
    theme: Option<Theme>,

    /// log level (overrides the settings file; RUST_LOG wins over both)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// log format (overrides the settings file)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /data/analysis)
    #[arg(long)]
    json_pointer: Option<String>,

    /// inputs are raw model responses; unwrap candidates[0].content.parts[0].text first
    #[arg(long, default_value_t = false)]
    envelope: bool,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct RenderOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// top-level key never rendered (repeatable; adds to the settings file)
    #[arg(long = "ignore-key")]
    ignore_keys: Vec<String>,

    /// output directory, one `<stem>.html` per input (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// also emit the per-section breakdown as JSON
    #[arg(long, default_value_t = false)]
    breakdown: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct MarkdownOut {
    /// Markdown summary file, or '-' for stdin
    #[arg(long, short)]
    input: String,

    /// input is a raw model response; unwrap the candidate text first
    #[arg(long, default_value_t = false)]
    envelope: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// emit the cleaned Markdown instead of HTML
    #[arg(long, default_value_t = false)]
    cleaned_only: bool,
}

struct LoadedInput {
    path: PathBuf,
    node: DocumentNode,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommonSettings {
    fn resolve(&self) -> Result<Settings> {
        let mut settings = match self.config.as_ref() {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(theme) = self.theme {
            settings.renderer.theme = theme;
        }
        if let Some(level) = self.log_level {
            settings.logging.level = level;
        }
        if let Some(format) = self.log_format {
            settings.logging.format = format;
        }
        Ok(settings)
    }
}

impl InputSettings {
    fn load(&self) -> Result<Vec<LoadedInput>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        source_paths
            .into_iter()
            .map(|path| {
                let node = self.load_one(&path)
                    .with_context(|| format!("failed to load {}", path.display()))?;
                Ok(LoadedInput { path, node })
            })
            .collect()
    }

    fn load_one(&self, path: &Path) -> Result<DocumentNode> {
        let source = std::fs::read_to_string(path)?;
        let value = serde_json::from_str::<serde_json::Value>(&source)?;
        let value = match self.json_pointer.as_deref() {
            None => value,
            Some(ptr) => value
                .pointer(ptr)
                .cloned()
                .ok_or_else(|| anyhow!("JSON pointer {ptr} matched nothing"))?,
        };
        if self.envelope {
            Ok(envelope::document_from_response(&value)?)
        } else {
            Ok(DocumentNode::from(value))
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        let settings = self.common.resolve()?;
        crate::logging::init(&settings.logging)?;
        match &self.cmd {
            Command::Render(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let mut config = settings.renderer;
                config.ignored_keys.extend(target.ignore_keys.iter().cloned());
                let renderer = Renderer::new(config);

                let inputs = target.input_settings.load()?;
                info!(inputs = inputs.len(), "rendering digests");

                let rendered: Vec<(PathBuf, RenderedDocument)> = inputs
                    .into_par_iter()
                    .map(|input| {
                        let doc = renderer.render(&input.node);
                        (input.path, doc)
                    })
                    .collect();

                for (path, doc) in &rendered {
                    if doc.breakdown.is_empty() {
                        warn!(input = %path.display(), "no renderable sections");
                    }
                    target.write(path, doc)?;
                }
                Ok(())
            }
            Command::Markdown(target) => {
                let raw = read_input(&target.input)?;
                let raw = if target.envelope {
                    let value = serde_json::from_str::<serde_json::Value>(&raw)?;
                    envelope::candidate_text(&value)?.to_string()
                } else {
                    raw
                };
                let styles = settings.renderer.theme.style_sheet();
                let (html, cleaned) = markdown::summarize(&raw, &styles);
                let output = if target.cleaned_only { cleaned } else { html };
                write_or_print(target.out.as_deref(), &output)
            }
        }
    }
}

impl RenderOut {
    fn write(&self, source: &Path, doc: &RenderedDocument) -> Result<()> {
        let Some(out_dir) = self.out.as_ref() else {
            if self.breakdown {
                println!("{}", serde_json::to_string_pretty(doc)?);
            } else {
                println!("{}", doc.full_html);
            }
            return Ok(());
        };
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "digest".to_string());
        write_or_print(Some(out_dir.join(format!("{stem}.html")).as_path()), &doc.full_html)?;
        if self.breakdown {
            let json = serde_json::to_string_pretty(&doc.breakdown)?;
            write_or_print(Some(out_dir.join(format!("{stem}.breakdown.json")).as_path()), &json)?;
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
    }
}

fn write_or_print(out: Option<&Path>, contents: &str) -> Result<()> {
    match out {
        None => {
            println!("{contents}");
            Ok(())
        }
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_render_flags() {
        let cli = CommandLineInterface::try_parse_from([
            "email-digest", "--theme", "email", "render",
            "-i", "a.json", "b.json", "--ignore-key", "audioScript", "--breakdown",
        ]).unwrap();
        let settings = cli.common.resolve().unwrap();
        assert_eq!(settings.renderer.theme, Theme::Email);
        match cli.cmd {
            Command::Render(r) => {
                assert_eq!(r.input_settings.input, ["a.json", "b.json"]);
                assert_eq!(r.ignore_keys, ["audioScript"]);
                assert!(r.breakdown);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn literal_paths_pass_through_and_empty_globs_fail() {
        let paths = resolve_file_path_patterns(["some/file.json"]).unwrap();
        assert_eq!(paths, [PathBuf::from("some/file.json")]);
        assert!(resolve_file_path_patterns(["/definitely/not/here/*.json"]).is_err());
    }
}
