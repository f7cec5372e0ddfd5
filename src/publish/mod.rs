//! Publisher (spec §4.8): creates-or-replaces the named playlist, sets its
//! summary, and uploads a generated cover image.

pub mod cover;

use crate::client::LibraryClient;
use crate::core::errors::EngineError;
use crate::domain::{SeedMode, Track};
use chrono::Local;

pub struct Publisher<'a> {
    client: &'a dyn LibraryClient,
}

impl<'a> Publisher<'a> {
    pub fn new(client: &'a dyn LibraryClient) -> Self {
        Self { client }
    }

    /// Computes the default title: `custom_title` if given, else
    /// `"Playlist Creator • {mode_title} ({yy-mm-dd})"` (spec §4.8).
    pub fn compute_title(custom_title: Option<&str>, mode: SeedMode) -> String {
        if let Some(title) = custom_title {
            return title.to_string();
        }
        let date = Local::now().format("%y-%m-%d");
        format!("Playlist Creator • {} ({date})", mode.title())
    }

    pub async fn publish(
        &self,
        custom_title: Option<&str>,
        mode: SeedMode,
        tracks: &[Track],
    ) -> Result<String, EngineError> {
        let title = Self::compute_title(custom_title, mode);

        let existing = self
            .client
            .list_playlists()
            .await
            .map_err(|e| EngineError::Publish(e.to_string()))?;

        if existing.iter().any(|p| p == &title) {
            self.client
                .replace_playlist_items(&title, tracks)
                .await
                .map_err(|e| EngineError::Publish(e.to_string()))?;
        } else {
            self.client
                .create_playlist(&title, tracks)
                .await
                .map_err(|e| EngineError::Publish(e.to_string()))?;
        }

        let summary = format!(
            "Generated {}. Mode: {}. Tracks: {}.",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            mode.as_str(),
            tracks.len()
        );
        self.client
            .set_playlist_summary(&title, &summary)
            .await
            .map_err(|e| EngineError::Publish(e.to_string()))?;

        let cover_path = cover::generate_cover(&title)
            .map_err(|e| EngineError::Publish(format!("cover generation failed: {e}")))?;
        let upload_result = self
            .client
            .upload_playlist_poster(&title, &cover_path)
            .await
            .map_err(|e| EngineError::Publish(e.to_string()));
        let _ = std::fs::remove_file(&cover_path);
        upload_result?;

        Ok(title)
    }
}
