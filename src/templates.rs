use actix_web::HttpResponse;
use dashmap::DashMap;
use notify::{RecursiveMode, Watcher, event::{ModifyKind, EventKind}};
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use std::{
    fs,
    io,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use crate::models::{Session, Theme};
use crate::pages::menu_for;

pub type TemplateCache = Arc<DashMap<String, String>>;

pub const TEMPLATE_FILES: &[&str] = &[
    "login.html",
    "dashboard.html",
    "products.html",
    "style.css",
];

/// Name under which `path` is cached, if it is one of the served files lying
/// directly in `root`.
fn cached_name<'a>(root: &Path, path: &'a Path) -> Option<&'a str> {
    if path.parent() != Some(root) {
        return None;
    }
    let name = path.file_name()?.to_str()?;
    TEMPLATE_FILES.contains(&name).then_some(name)
}

/// Reads every served page and the stylesheet from `dir`. A missing file is
/// fatal at start.
pub fn load_templates(dir: &Path) -> io::Result<TemplateCache> {
    let cache: TemplateCache = Arc::new(DashMap::new());
    for name in TEMPLATE_FILES {
        let path = dir.join(name);
        let content = fs::read_to_string(&path).map_err(|e| {
            tracing::error!("Cannot read page template {}: {}", path.display(), e);
            io::Error::new(e.kind(), format!("missing page template {}", path.display()))
        })?;
        cache.insert(name.to_string(), content);
    }
    tracing::info!("Loaded {} templates from {}", cache.len(), dir.display());
    Ok(cache)
}

/// Re-reads the served files among `paths` and returns how many were
/// refreshed. A failed read keeps the cached copy.
pub fn refresh_templates<'a>(
    cache: &TemplateCache,
    root: &Path,
    paths: impl IntoIterator<Item = &'a PathBuf>,
) -> usize {
    let mut refreshed = 0;
    for path in paths {
        let Some(name) = cached_name(root, path) else {
            continue;
        };
        match fs::read_to_string(path) {
            Ok(content) => {
                cache.insert(name.to_string(), content);
                refreshed += 1;
                tracing::info!("Refreshed template {}", name);
            }
            Err(e) => tracing::warn!("Keeping cached {}, re-read failed: {}", name, e),
        }
    }
    refreshed
}

/// Keeps the cache in step with edits under `dir` until the task is dropped.
pub async fn watch_templates(cache: TemplateCache, dir: PathBuf) -> notify::Result<()> {
    let root = if dir.is_absolute() {
        dir
    } else {
        std::env::current_dir()?.join(dir)
    };
    let handler_root = root.clone();

    let mut debouncer = new_debouncer(
        Duration::from_secs(1),
        None,
        move |res: DebounceEventResult| match res {
            Ok(events) => {
                let touched = events
                    .iter()
                    .filter(|e| {
                        matches!(e.kind, EventKind::Modify(ModifyKind::Data(_)) | EventKind::Create(_))
                    })
                    .flat_map(|e| e.paths.iter());
                refresh_templates(&cache, &handler_root, touched);
            }
            Err(errors) => {
                for error in errors {
                    tracing::error!("Template watch error: {:?}", error);
                }
            }
        },
    )?;
    debouncer.watcher().watch(&root, RecursiveMode::NonRecursive)?;
    debouncer.cache().add_root(&root, RecursiveMode::NonRecursive);
    tracing::info!("Watching {} for template edits", root.display());

    // dropping the debouncer ends the watch
    std::future::pending::<()>().await;
    Ok(())
}

/// Cached content of `filename`, or a 404 response when it is not served.
pub fn get_template_content(
    cache: &TemplateCache,
    filename: &str,
) -> Result<String, HttpResponse> {
    match cache.get(filename) {
        Some(content) => Ok(content.value().clone()),
        None => {
            tracing::error!("Template not found in cache: {}", filename);
            Err(HttpResponse::NotFound().body(format!("Template {} not found", filename)))
        }
    }
}

/// Fills the page placeholders. `{nav}` and `{role}` are built from static
/// strings; the email is user data and gets escaped.
pub fn render_page(template: &str, session: Option<&Session>, theme: Theme) -> String {
    let (email, role, nav) = match session {
        Some(session) => (
            ammonia::clean_text(&session.email),
            session.role.label(),
            menu_for(session.role)
                .iter()
                .map(|item| format!("<a href=\"{}\">{}</a>", item.path, item.label))
                .collect::<Vec<_>>()
                .join(""),
        ),
        None => (String::new(), String::new(), String::new()),
    };
    template
        .replace("{theme}", theme.as_str())
        .replace("{email}", &email)
        .replace("{role}", &role)
        .replace("{nav}", &nav)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn render_escapes_email_and_builds_nav() {
        let session = Session {
            token: "t".into(),
            role: Role::StoreKeeper,
            email: "<b>keeper</b>@example.com".into(),
        };
        let html = render_page(
            "<html class=\"{theme}\">{email}|{role}|{nav}</html>",
            Some(&session),
            Theme::Dark,
        );
        assert!(html.contains("class=\"dark\""));
        assert!(!html.contains("<b>"));
        assert!(html.contains("store keeper"));
        assert!(html.contains("<a href=\"/products\">Products</a>"));
        assert!(!html.contains("/dashboard"));
    }

    #[test]
    fn missing_template_is_404() {
        let cache: TemplateCache = Arc::new(DashMap::new());
        let response = get_template_content(&cache, "nope.html").unwrap_err();
        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn bundled_templates_load() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates");
        let cache = load_templates(&dir).unwrap();
        assert_eq!(cache.len(), TEMPLATE_FILES.len());
    }

    #[test]
    fn refresh_only_touches_served_files_in_the_root() {
        let root = std::env::temp_dir().join(format!("slooze-templates-{}", std::process::id()));
        let nested = root.join("drafts");
        fs::create_dir_all(&nested).unwrap();
        let css = root.join("style.css");
        let other = root.join("notes.txt");
        let draft = nested.join("login.html");
        fs::write(&css, "body {}").unwrap();
        fs::write(&other, "ignored").unwrap();
        fs::write(&draft, "ignored").unwrap();

        let cache: TemplateCache = Arc::new(DashMap::new());
        let refreshed = refresh_templates(&cache, &root, [&css, &other, &draft]);
        assert_eq!(refreshed, 1);
        assert_eq!(cache.get("style.css").map(|c| c.value().clone()).as_deref(), Some("body {}"));
        assert!(cache.get("login.html").is_none());

        let _ = fs::remove_dir_all(&root);
    }
}
