use crate::error::Result;
use crate::models::Theme;
use crate::storage::{PersistentStorage, THEME_KEY};

/// Stored preference, or the default when nothing usable is stored.
pub async fn load_theme(storage: &dyn PersistentStorage) -> Result<Theme> {
    let stored = storage.get_item(THEME_KEY).await?;
    Ok(match stored.as_deref().map(Theme::parse) {
        Some(Some(theme)) => theme,
        Some(None) => {
            tracing::warn!("Ignoring unknown theme value {:?}", stored);
            Theme::default()
        }
        None => Theme::default(),
    })
}

pub async fn save_theme(storage: &dyn PersistentStorage, theme: Theme) -> Result<()> {
    storage.set_item(THEME_KEY, theme.as_str().to_string()).await
}
