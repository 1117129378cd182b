//! Detail pane rendering.

use std::fmt;

use dua_model::{Dua, DuaId};

pub const NO_SELECTION: &str = "Select a dua to view its details.";
pub const NAME_PLACEHOLDER: &str = "Name not available";
pub const TRANSLATION_PLACEHOLDER: &str = "Translation not available";
pub const REFERENCE_PLACEHOLDER: &str = "Reference not available";
pub const ARABIC_PLACEHOLDER: &str = "Arabic text not available";
pub const TRANSLITERATION_PLACEHOLDER: &str = "Transliteration not available";

/// What the detail pane shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Empty,
    Dua(DuaDetail),
}

/// Display text for one dua, with every absent field already replaced by
/// its placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuaDetail {
    pub id: DuaId,
    pub title: String,
    pub translation: String,
    pub reference: String,
    pub arabic: String,
    pub transliteration: String,
    /// Present only when the dua has an audio recording.
    pub audio_url: Option<String>,
}

/// Render the selected dua, or the empty prompt when nothing is selected.
pub fn render_detail(selected: Option<&Dua>) -> DetailView {
    let Some(dua) = selected else {
        return DetailView::Empty;
    };

    let name = or_placeholder(dua.name_en.as_deref(), NAME_PLACEHOLDER);
    DetailView::Dua(DuaDetail {
        id: dua.id,
        title: format!("{}. {}", dua.id, name),
        translation: or_placeholder(dua.translation_en.as_deref(), TRANSLATION_PLACEHOLDER),
        reference: or_placeholder(dua.reference_en.as_deref(), REFERENCE_PLACEHOLDER),
        arabic: or_placeholder(dua.arabic_text.as_deref(), ARABIC_PLACEHOLDER),
        transliteration: or_placeholder(
            dua.transliteration_en.as_deref(),
            TRANSLITERATION_PLACEHOLDER,
        ),
        audio_url: dua
            .audio_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map(str::to_string),
    })
}

/// Blank strings count as absent.
fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    value
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "{NO_SELECTION}"),
            Self::Dua(detail) => write!(f, "{detail}"),
        }
    }
}

impl fmt::Display for DuaDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Translation")?;
        writeln!(f, "  {}", self.translation)?;
        writeln!(f, "Reference")?;
        writeln!(f, "  {}", self.reference)?;
        writeln!(f)?;
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  {}", self.arabic)?;
        write!(f, "  {}", self.transliteration)?;
        if let Some(url) = &self.audio_url {
            write!(f, "\n  Audio: {url}")?;
        }
        Ok(())
    }
}
