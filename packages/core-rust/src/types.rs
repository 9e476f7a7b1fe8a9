//! Movie record types and the field-by-field patch merge.

use serde::{Deserialize, Serialize, Serializer};

/// A movie record as held by the store and returned to clients.
///
/// Every `Movie` in a store has passed full schema validation. The `id`
/// is assigned once, when the record is created, and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Opaque unique identifier (server-generated).
    pub id: String,
    pub title: String,
    /// Release year.
    pub year: u16,
    pub director: String,
    /// Running time in minutes.
    pub duration: u32,
    /// Poster image URL.
    pub poster: String,
    /// At least one genre label.
    pub genre: Vec<String>,
    /// Rating on a 0 to 10 scale.
    #[serde(serialize_with = "serialize_rate")]
    pub rate: f64,
}

/// Writes a whole rating as a JSON integer, so `9` is echoed as `9`, not
/// `9.0`.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_rate<S: Serializer>(rate: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if rate.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(rate) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = *rate as u8;
        serializer.serialize_u8(whole)
    } else {
        serializer.serialize_f64(*rate)
    }
}

impl Movie {
    /// Returns `true` if any of this movie's genres equals `genre`,
    /// ignoring case.
    #[must_use]
    pub fn has_genre(&self, genre: &str) -> bool {
        let needle = genre.to_lowercase();
        self.genre.iter().any(|g| g.to_lowercase() == needle)
    }

    /// Merges `patch` onto this record.
    ///
    /// Precedence: a field set in the patch replaces the current value, a
    /// field absent from the patch keeps it. `MoviePatch` has no `id`, so
    /// the identifier is never touched.
    pub fn apply_patch(&mut self, patch: &MoviePatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(director) = &patch.director {
            self.director.clone_from(director);
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(poster) = &patch.poster {
            self.poster.clone_from(poster);
        }
        if let Some(genre) = &patch.genre {
            self.genre.clone_from(genre);
        }
        if let Some(rate) = patch.rate {
            self.rate = rate;
        }
    }
}

/// A fully validated movie payload that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDraft {
    pub title: String,
    pub year: u16,
    pub director: String,
    pub duration: u32,
    pub poster: String,
    pub genre: Vec<String>,
    pub rate: f64,
}

impl MovieDraft {
    /// Attaches an identifier, producing a storable record.
    #[must_use]
    pub fn into_movie(self, id: impl Into<String>) -> Movie {
        Movie {
            id: id.into(),
            title: self.title,
            year: self.year,
            director: self.director,
            duration: self.duration,
            poster: self.poster,
            genre: self.genre,
            rate: self.rate,
        }
    }
}

/// A validated partial update. Every present field already satisfies the
/// same rule it would under full validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoviePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

impl MoviePatch {
    /// Returns `true` if the patch sets no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
