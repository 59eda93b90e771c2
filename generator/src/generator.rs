use std::{
    fs,
    io::Write as _,
    path::{Component, Path, PathBuf},
};

use crate::{
    config::{self, Config, Job},
    error::{Error, IoResultExt as _, Result},
    static_dir,
    templates::TemplateEngine,
};

pub struct Generator {
    src_dir: PathBuf,
    dst_dir: PathBuf,
}

impl Generator {
    pub fn new(src_dir: impl Into<PathBuf>, dst_dir: impl Into<PathBuf>) -> Result<Self> {
        let src_dir = src_dir.into();
        let dst_dir = dst_dir.into();

        if !src_dir.is_dir() {
            return Err(Error::InputNotFound { path: src_dir });
        }

        if dst_dir.try_exists().at(&dst_dir)? {
            return Err(Error::OutputExists { path: dst_dir });
        }

        Ok(Self { src_dir, dst_dir })
    }

    /// Render every job in config order, then copy `static/`.
    ///
    /// Stops at the first error. Whatever was written before it stays on disk.
    pub fn build(self) -> Result<()> {
        log::info!("create dest dir: {}", self.dst_dir.display());
        fs::create_dir_all(&self.dst_dir).at(&self.dst_dir)?;

        log::debug!("input_dir={}", self.src_dir.display());
        log::debug!("output_dir={}", self.dst_dir.display());

        let config_file = Config::path_in(&self.src_dir);
        log::info!("read config from: {}", config_file.display());
        let config = Config::from_file(&config_file)?;

        let templates = TemplateEngine::load(self.src_dir.join(config::TEMPLATES_DIR))?;

        for (index, job) in config.jobs.iter().enumerate() {
            self.render_job(&templates, index, job)?;
        }

        log::info!("copy static dir: {}", config::STATIC_DIR);
        static_dir::copy_static_dir_to(self.src_dir.join(config::STATIC_DIR), &self.dst_dir)?;

        Ok(())
    }

    fn render_job(&self, templates: &TemplateEngine, index: usize, job: &Job) -> Result<()> {
        let name = job.template(index)?;
        let url = job.url(index)?;

        log::info!(
            "build page: {} -> {url}",
            templates.dir().join(name).display()
        );
        let rendered = templates.render(name, job.context(index)?)?;

        let output_path = self.dst_dir.join(url_to_html_path(url)?);
        write_page(&output_path, rendered.as_bytes())
    }
}

/// `/` -> `index.html`
/// `/blog/first` -> `blog/first/index.html`
/// `/feed.xml` -> `feed.xml/index.html`
///
/// Every leading separator is dropped, so the result is always relative.
pub fn url_to_html_path(url: &str) -> Result<PathBuf> {
    let mut path = PathBuf::new();

    for component in Path::new(url.trim_start_matches(std::path::is_separator)).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            // `..` or a drive prefix would leave the output dir
            _ => {
                return Err(Error::InvalidUrl {
                    url: url.to_string(),
                });
            }
        }
    }

    path.push(config::PAGE_FILE);
    Ok(path)
}

fn write_page(output_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent_dir) = output_path.parent() {
        fs::create_dir_all(parent_dir).at(parent_dir)?;
    }

    fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(output_path)
        .and_then(|mut file| file.write_all(content))
        .at(output_path)
}
