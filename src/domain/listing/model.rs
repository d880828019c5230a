//! Listing domain entity

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Number of slider ratings every listing carries.
pub const SLIDER_COUNT: usize = 4;

/// Photo slot a stored image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoKind {
    Top,
    Sub,
    Calendar,
}

impl PhotoKind {
    pub const ALL: [PhotoKind; 3] = [PhotoKind::Top, PhotoKind::Sub, PhotoKind::Calendar];

    /// Multipart field name the upload arrives under.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Top => "topPhoto",
            Self::Sub => "subPhotos",
            Self::Calendar => "calendarPhotos",
        }
    }

    /// Maximum number of files accepted for this slot.
    pub fn max_files(&self) -> usize {
        match self {
            Self::Top => 1,
            Self::Sub => 5,
            Self::Calendar => 3,
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.field_name() == name)
    }
}

impl std::fmt::Display for PhotoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Sub => write!(f, "sub"),
            Self::Calendar => write!(f, "calendar"),
        }
    }
}

/// Stored (compressed) photo file names of a listing, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPhotos {
    pub top: Option<String>,
    pub sub: Vec<String>,
    pub calendar: Vec<String>,
}

impl ListingPhotos {
    pub fn get(&self, kind: PhotoKind) -> Vec<String> {
        match kind {
            PhotoKind::Top => self.top.iter().cloned().collect(),
            PhotoKind::Sub => self.sub.clone(),
            PhotoKind::Calendar => self.calendar.clone(),
        }
    }

    pub fn set(&mut self, kind: PhotoKind, files: Vec<String>) {
        match kind {
            PhotoKind::Top => self.top = files.into_iter().next(),
            PhotoKind::Sub => self.sub = files,
            PhotoKind::Calendar => self.calendar = files,
        }
    }

    pub fn all_files(&self) -> Vec<String> {
        PhotoKind::ALL.iter().flat_map(|k| self.get(*k)).collect()
    }
}

/// A club listing as shown to visitors. The access secret never leaves
/// the repository layer.
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: i32,
    pub name: String,
    pub comment: Option<String>,
    pub main_genre: String,
    pub sub_genre: Option<String>,
    pub other: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub admission_fee: Option<i32>,
    pub annual_fee: Option<i32>,
    pub location: Option<String>,
    pub instagram: Option<String>,
    pub sliders: [i32; SLIDER_COUNT],
    pub photos: ListingPhotos,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable content of a listing, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFields {
    pub name: String,
    pub comment: Option<String>,
    pub main_genre: String,
    pub sub_genre: Option<String>,
    pub other: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub admission_fee: Option<i32>,
    pub annual_fee: Option<i32>,
    pub location: Option<String>,
    pub instagram: Option<String>,
    pub sliders: [i32; SLIDER_COUNT],
}

/// Data for inserting a new listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub fields: ListingFields,
    pub photos: ListingPhotos,
    pub secret_hash: String,
    pub created_by: Option<String>,
}

/// Changes applied by an edit. `None` photo slots keep the stored files.
#[derive(Debug, Clone)]
pub struct ListingUpdate {
    pub fields: ListingFields,
    pub photos: Vec<(PhotoKind, Vec<String>)>,
    pub secret_hash: Option<String>,
}

/// Raw text values of a create/edit form, before validation.
#[derive(Debug, Clone, Default)]
pub struct ListingSubmission {
    pub name: Option<String>,
    pub main_genre: Option<String>,
    pub secret: Option<String>,
    pub sub_genre: Option<String>,
    pub comment: Option<String>,
    pub other: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub admission_fee: Option<String>,
    pub annual_fee: Option<String>,
    pub location: Option<String>,
    pub instagram: Option<String>,
    pub sliders: [Option<String>; SLIDER_COUNT],
}

impl ListingSubmission {
    /// Assigns a named form field. Returns `false` for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "circleName" => &mut self.name,
            "mainGenre" => &mut self.main_genre,
            "password" => &mut self.secret,
            "subGenre" => &mut self.sub_genre,
            "comment" => &mut self.comment,
            "other" => &mut self.other,
            "description" => &mut self.description,
            "admissionFee" => &mut self.admission_fee,
            "annualFee" => &mut self.annual_fee,
            "location" => &mut self.location,
            "instagram" => &mut self.instagram,
            "tag" | "tag[]" => {
                self.tags.push(value);
                return true;
            }
            "slider1" => &mut self.sliders[0],
            "slider2" => &mut self.sliders[1],
            "slider3" => &mut self.sliders[2],
            "slider4" => &mut self.sliders[3],
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Validates the submission, returning the listing fields and the
    /// plaintext secret (if one was supplied).
    pub fn into_fields(self) -> DomainResult<(ListingFields, Option<String>)> {
        let name = non_blank(self.name)
            .ok_or_else(|| DomainError::Validation("circleName is required".into()))?;
        let main_genre = non_blank(self.main_genre)
            .ok_or_else(|| DomainError::Validation("mainGenre is required".into()))?;

        let mut sliders = [0; SLIDER_COUNT];
        for (slot, raw) in sliders.iter_mut().zip(self.sliders.iter()) {
            *slot = parse_number(raw.as_deref()).unwrap_or(0);
        }

        let fields = ListingFields {
            name,
            comment: non_blank(self.comment),
            main_genre,
            sub_genre: non_blank(self.sub_genre),
            other: non_blank(self.other),
            tags: normalize_tags(self.tags),
            description: non_blank(self.description),
            admission_fee: parse_number(self.admission_fee.as_deref()),
            annual_fee: parse_number(self.annual_fee.as_deref()),
            location: non_blank(self.location),
            instagram: non_blank(self.instagram),
            sliders,
        };

        let secret = self.secret.filter(|s| !s.is_empty());
        Ok((fields, secret))
    }
}

/// Splits comma-joined values, trims, drops empties and duplicates while
/// keeping first-seen order.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<String> = Vec::new();
    for value in raw {
        for tag in value.as_ref().split(',') {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
    }
    tags
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number(value: Option<&str>) -> Option<i32> {
    value.and_then(|v| v.trim().parse::<i32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ListingSubmission {
        let mut s = ListingSubmission::default();
        s.set_field("circleName", "Chess Club".into());
        s.set_field("mainGenre", "Culture".into());
        s.set_field("password", "hunter2".into());
        s
    }

    #[test]
    fn tags_are_split_trimmed_and_deduplicated() {
        let tags = normalize_tags(["beginner, weekly", "beginner", " ", "online"]);
        assert_eq!(tags, vec!["beginner", "weekly", "online"]);
    }

    #[test]
    fn required_fields_are_enforced() {
        let mut s = ListingSubmission::default();
        s.set_field("mainGenre", "Sports".into());
        assert!(matches!(s.into_fields(), Err(DomainError::Validation(_))));

        let mut s = ListingSubmission::default();
        s.set_field("circleName", "Runners".into());
        s.set_field("mainGenre", "   ".into());
        assert!(matches!(s.into_fields(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn numbers_are_parsed_leniently() {
        let mut s = submission();
        s.set_field("admissionFee", "1000".into());
        s.set_field("annualFee", "free".into());
        s.set_field("slider2", "70".into());
        s.set_field("slider3", "".into());

        let (fields, secret) = s.into_fields().unwrap();
        assert_eq!(fields.admission_fee, Some(1000));
        assert_eq!(fields.annual_fee, None);
        assert_eq!(fields.sliders, [0, 70, 0, 0]);
        assert_eq!(secret.as_deref(), Some("hunter2"));
    }

    #[test]
    fn unknown_fields_are_reported() {
        let mut s = ListingSubmission::default();
        assert!(!s.set_field("isAdmin", "true".into()));
        assert!(s.set_field("tag", "a".into()));
        assert!(s.set_field("tag[]", "b".into()));
        assert_eq!(s.tags, vec!["a", "b"]);
    }

    #[test]
    fn photo_kinds_map_to_form_fields() {
        assert_eq!(PhotoKind::from_field_name("subPhotos"), Some(PhotoKind::Sub));
        assert_eq!(PhotoKind::from_field_name("avatar"), None);
        assert_eq!(PhotoKind::Top.max_files(), 1);
        assert_eq!(PhotoKind::Calendar.max_files(), 3);
    }

    #[test]
    fn photo_set_keeps_single_top_photo() {
        let mut photos = ListingPhotos::default();
        photos.set(PhotoKind::Top, vec!["a.jpg".into(), "b.jpg".into()]);
        photos.set(PhotoKind::Sub, vec!["c.jpg".into()]);
        assert_eq!(photos.top.as_deref(), Some("a.jpg"));
        assert_eq!(photos.all_files(), vec!["a.jpg", "c.jpg"]);
    }
}
