//! Template lookup and rendering, backed by Tera.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tera::{Context, Tera};

use crate::error::{Error, IoResultExt as _, Result};

/// Templates whose name ends with one of these, in any case, escape
/// interpolated values.
const AUTOESCAPE_SUFFIXES: [&str; 2] = [".html", ".xml"];

#[derive(Debug)]
pub struct TemplateEngine {
    dir: PathBuf,
    /// Same templates, autoescape on for everything.
    escaped: Tera,
    /// Same templates, autoescape off.
    raw: Tera,
    /// Files that failed to read or parse, or that extend/import one that did.
    /// Only reported when a job asks for them.
    unusable: HashMap<String, Arc<tera::Error>>,
}

/// A template that parsed on its own.
struct Source {
    content: String,
    parent: Option<String>,
    imports: Vec<String>,
}

impl Source {
    fn read(name: &str, path: &Path) -> tera::Result<Self> {
        let content = fs::read(path)
            .map_err(|e| tera::Error::chain(format!("Failed to read template '{name}'"), e))
            .and_then(|bytes| {
                String::from_utf8(bytes).map_err(|e| {
                    tera::Error::chain(format!("Failed to read template '{name}'"), e)
                })
            })?;

        let template = tera::Template::new(name, None, &content)?;

        Ok(Self {
            parent: template.parent,
            imports: template
                .imported_macro_files
                .into_iter()
                .map(|(file, _namespace)| file)
                .collect(),
            content,
        })
    }

    fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.parent.iter().chain(&self.imports).map(String::as_str)
    }
}

impl TemplateEngine {
    /// Load the files under `dir`. Templates are named by their path
    /// relative to `dir`, e.g. `blog/post.html`.
    ///
    /// A missing `dir` gives an empty engine, so every lookup fails later
    /// with [`Error::TemplateNotFound`].
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        let mut sources = HashMap::new();
        let mut unusable = HashMap::new();

        if dir.is_dir() {
            let mut files = Vec::new();
            collect_files(&dir, "", &mut files)?;

            for (name, path) in files {
                match Source::read(&name, &path) {
                    Ok(source) => {
                        sources.insert(name, source);
                    }
                    Err(err) => {
                        log::debug!("skip template {name}: {err}");
                        unusable.insert(name, Arc::new(err));
                    }
                }
            }
        } else {
            log::warn!("template dir `{}` not found", dir.display());
        }

        drop_broken_dependents(&mut sources, &mut unusable);

        let mut escaped = Tera::default();
        escaped
            .add_raw_templates(
                sources
                    .iter()
                    .map(|(name, source)| (name, &source.content)),
            )
            .map_err(|source| Error::TemplateLoad {
                dir: dir.clone(),
                source,
            })?;

        let mut raw = escaped.clone();
        raw.autoescape_on(Vec::new());
        // the empty suffix matches every name
        escaped.autoescape_on(vec![""]);

        log::debug!(
            "loaded {} templates from {}",
            sources.len(),
            dir.display()
        );

        Ok(Self {
            dir,
            escaped,
            raw,
            unusable,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Render `name` with `context`.
    ///
    /// A top-level variable missing from `context` renders as an empty
    /// string. Attribute lookups on a missing variable are still an error.
    pub fn render(
        &self,
        name: &str,
        context: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<String> {
        if let Some(source) = self.unusable.get(name) {
            return Err(Error::TemplateInvalid {
                name: name.to_string(),
                source: Arc::clone(source),
            });
        }

        let render_err = |source: tera::Error| Error::Render {
            name: name.to_string(),
            source,
        };

        let tera = if autoescapes(name) {
            &self.escaped
        } else {
            &self.raw
        };

        let mut context = context.clone();
        loop {
            let tera_context = Context::from_serialize(&context).map_err(render_err)?;

            let err = match tera.render(name, &tera_context) {
                Ok(rendered) => return Ok(rendered),
                Err(err) => err,
            };

            if matches!(err.kind, tera::ErrorKind::TemplateNotFound(_)) {
                return Err(Error::TemplateNotFound {
                    name: name.to_string(),
                    source: err,
                });
            }

            match undefined_variable(&err) {
                Some(var) if !var.contains('.') && !context.contains_key(&var) => {
                    log::debug!("`{var}` is undefined in {name}, render it empty");
                    context.insert(var, serde_json::Value::String(String::new()));
                }
                _ => return Err(render_err(err)),
            }
        }
    }
}

fn autoescapes(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    AUTOESCAPE_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Name of the variable Tera failed to look up, if that is what `err` is.
fn undefined_variable(err: &tera::Error) -> Option<String> {
    let err: &(dyn std::error::Error + 'static) = err;

    std::iter::successors(Some(err), |e| e.source()).find_map(|e| {
        let msg = e.to_string();
        let rest = msg.strip_prefix("Variable `")?;
        let (var, _) = rest.split_once('`')?;
        Some(var.to_string())
    })
}

/// Move templates whose parent or macro imports are not loadable into
/// `unusable`, until nothing changes.
fn drop_broken_dependents(
    sources: &mut HashMap<String, Source>,
    unusable: &mut HashMap<String, Arc<tera::Error>>,
) {
    loop {
        let broken: Vec<(String, String)> = sources
            .iter()
            .filter_map(|(name, source)| {
                source
                    .dependencies()
                    .find(|dep| !sources.contains_key(*dep))
                    .map(|dep| (name.clone(), dep.to_string()))
            })
            .collect();

        if broken.is_empty() {
            return;
        }

        for (name, dep) in broken {
            log::debug!("skip template {name}: depends on {dep}");
            sources.remove(&name);
            let err = tera::Error::msg(format!(
                "Template '{name}' depends on '{dep}', which doesn't exist or isn't loadable"
            ));
            unusable.insert(name, Arc::new(err));
        }
    }
}

/// Every file under `dir`, named by its `/`-separated path relative to it.
fn collect_files(dir: &Path, prefix: &str, files: &mut Vec<(String, PathBuf)>) -> Result<()> {
    for entry in fs::read_dir(dir).at(dir)? {
        let entry = entry.at(dir)?;
        let path = entry.path();

        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            log::debug!("skip non utf-8 file name: {}", path.display());
            continue;
        };
        let name = if prefix.is_empty() {
            file_name
        } else {
            format!("{prefix}/{file_name}")
        };

        if path.is_dir() {
            collect_files(&path, &name, files)?;
        } else {
            files.push((name, path));
        }
    }

    Ok(())
}
