//! Portal data types shared by the API gateway, forms, filters and UI.
//!
//! Enum variants serialize to the exact strings the portal API stores
//! (`"Computer Science"`, `"Non-Teaching Staff"`, ...), so an invalid value
//! can never reach the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::Path;

use crate::error::ApiError;

/// Academic department a user belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Computer Science")]
    ComputerScience,
    Electronics,
    Mathematics,
    Commerce,
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::ComputerScience,
        Department::Electronics,
        Department::Mathematics,
        Department::Commerce,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Department::ComputerScience => "Computer Science",
            Department::Electronics => "Electronics",
            Department::Mathematics => "Mathematics",
            Department::Commerce => "Commerce",
        }
    }
}

/// Role of a user within the institution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Student,
    #[serde(rename = "Teaching Staff")]
    TeachingStaff,
    #[serde(rename = "Non-Teaching Staff")]
    NonTeachingStaff,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Admin,
        UserRole::Student,
        UserRole::TeachingStaff,
        UserRole::NonTeachingStaff,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Student => "Student",
            UserRole::TeachingStaff => "Teaching Staff",
            UserRole::NonTeachingStaff => "Non-Teaching Staff",
        }
    }
}

/// Account status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub const ALL: [Status; 2] = [Status::Active, Status::Inactive];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Inactive => "Inactive",
        }
    }
}

macro_rules! impl_choice {
    ($($t:ty),*) => {$(
        impl Display for $t {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $t {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| format!("unknown {}: {s}", stringify!($t)))
            }
        }

        impl Choice for $t {
            fn options() -> &'static [Self] {
                &Self::ALL
            }
        }
    )*};
}

impl_choice!(Department, UserRole, Status);

/// A closed set of values selectable in a form or filter.
pub trait Choice: Copy + PartialEq + Display + 'static {
    fn options() -> &'static [Self];

    /// Next option, wrapping around. `None` starts at the first option.
    fn cycle_next(current: Option<Self>) -> Self {
        let opts = Self::options();
        match current.and_then(|c| opts.iter().position(|o| *o == c)) {
            Some(i) => opts[(i + 1) % opts.len()],
            None => opts[0],
        }
    }

    /// Previous option, wrapping around. `None` starts at the last option.
    fn cycle_prev(current: Option<Self>) -> Self {
        let opts = Self::options();
        match current.and_then(|c| opts.iter().position(|o| *o == c)) {
            Some(i) => opts[(i + opts.len() - 1) % opts.len()],
            None => opts[opts.len() - 1],
        }
    }

    fn cycle(current: Option<Self>, back: bool) -> Self {
        if back {
            Self::cycle_prev(current)
        } else {
            Self::cycle_next(current)
        }
    }

    /// Next option in a filter selector where `None` ("no filter") is part of the cycle.
    fn cycle_optional(current: Option<Self>) -> Option<Self> {
        let opts = Self::options();
        match current.and_then(|c| opts.iter().position(|o| *o == c)) {
            Some(i) if i + 1 < opts.len() => Some(opts[i + 1]),
            Some(_) => None,
            None => Some(opts[0]),
        }
    }
}

/// A user as stored by the portal API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub department: Department,
    pub user_role: UserRole,
    pub status: Status,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Creation date as shown in the users table.
    pub fn created_date(&self) -> String {
        self.created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// Body returned by a successful login.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
}

/// Credentials sent to the login endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body sent to the register endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// A profile image picked from the local filesystem, ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    /// Read an image from disk. Only image extensions are accepted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ApiError::Image(format!("not a file: {}", path.display())))?;
        let mime = mime_for(path)
            .ok_or_else(|| ApiError::Image(format!("not an image file: {file_name}")))?;
        let bytes = std::fs::read(path)
            .map_err(|e| ApiError::Image(format!("cannot read {}: {e}", path.display())))?;
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    /// Short description shown in place of a visual preview.
    pub fn preview(&self) -> String {
        let kib = self.bytes.len() as f64 / 1024.0;
        format!("{} ({:.1} KiB, {})", self.file_name, kib, self.mime)
    }
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_record_reads_api_shape() {
        let raw = r#"{
            "_id": "65f0c0ffee",
            "username": "jdoe",
            "firstName": "John",
            "lastName": "Doe",
            "department": "Computer Science",
            "userRole": "Non-Teaching Staff",
            "status": "Inactive",
            "dob": "1990-04-01",
            "createdAt": "2024-03-05T10:00:00Z",
            "profileImage": "1709632800-jdoe.png"
        }"#;
        let u: UserRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(u.id, "65f0c0ffee");
        assert_eq!(u.department, Department::ComputerScience);
        assert_eq!(u.user_role, UserRole::NonTeachingStaff);
        assert_eq!(u.status, Status::Inactive);
        assert_eq!(u.created_date(), "2024-03-05");
        assert_eq!(u.profile_image.as_deref(), Some("1709632800-jdoe.png"));
    }

    #[test]
    fn user_record_tolerates_missing_optional_fields() {
        let raw = r#"{"_id":"1","username":"a","firstName":"A","lastName":"B",
            "department":"Commerce","userRole":"Admin","status":"Active"}"#;
        let u: UserRecord = serde_json::from_str(raw).unwrap();
        assert!(u.created_at.is_none());
        assert_eq!(u.created_date(), "");
        assert_eq!(u.dob, "");
    }

    #[test]
    fn unknown_department_is_rejected() {
        let raw = r#"{"_id":"1","username":"a","firstName":"A","lastName":"B",
            "department":"Physics","userRole":"Admin","status":"Active"}"#;
        assert!(serde_json::from_str::<UserRecord>(raw).is_err());
    }

    #[test]
    fn choices_parse_and_cycle() {
        assert_eq!("teaching staff".parse::<UserRole>(), Ok(UserRole::TeachingStaff));
        assert!("nobody".parse::<Status>().is_err());
        assert_eq!(Department::cycle_next(None), Department::ComputerScience);
        assert_eq!(
            Department::cycle_next(Some(Department::Commerce)),
            Department::ComputerScience
        );
        assert_eq!(Department::cycle_prev(None), Department::Commerce);
        assert_eq!(
            Department::cycle_prev(Some(Department::ComputerScience)),
            Department::Commerce
        );
        assert_eq!(
            Department::cycle(Some(Department::Mathematics), true),
            Department::Electronics
        );
        assert_eq!(Status::cycle(Some(Status::Active), false), Status::Inactive);
        assert_eq!(Status::cycle_optional(None), Some(Status::Active));
        assert_eq!(Status::cycle_optional(Some(Status::Active)), Some(Status::Inactive));
        assert_eq!(Status::cycle_optional(Some(Status::Inactive)), None);
    }

    #[test]
    fn image_load_rejects_non_images() {
        let mut p = std::env::temp_dir();
        p.push(format!("portal_not_image_{}.txt", std::process::id()));
        std::fs::write(&p, b"hello").unwrap();
        let res = ImageFile::load(&p);
        std::fs::remove_file(&p).ok();
        assert!(matches!(res, Err(ApiError::Image(_))));
    }

    #[test]
    fn image_load_reads_bytes_and_mime() {
        let mut p = std::env::temp_dir();
        p.push(format!("portal_avatar_{}.PNG", std::process::id()));
        std::fs::write(&p, [0x89, b'P', b'N', b'G']).unwrap();
        let img = ImageFile::load(&p).unwrap();
        std::fs::remove_file(&p).ok();
        assert_eq!(img.mime, "image/png");
        assert_eq!(img.bytes.len(), 4);
        assert!(img.preview().starts_with("portal_avatar_"));
    }
}
