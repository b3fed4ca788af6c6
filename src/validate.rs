//! Client-side validation rules for the portal forms.
//!
//! Each form has a rule table: a slice of `(field, check)` pairs. A check sees
//! the value being validated and a snapshot of the whole form, and returns an
//! error message or `None`. The tables are plain data so every rule can be
//! exercised on its own.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::form::{LoginForm, RegisterForm, UserDraft};

pub const REQUIRED: &str = "This field is required";
pub const NAME_CHARS: &str = "Only letters and spaces allowed";
pub const PASSWORD_LENGTH: &str = "Must be at least 8 characters";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const IMAGE_REQUIRED: &str = "Profile image is required";
pub const INVALID_EMAIL: &str = "Invalid email address";
pub const LOGIN_PASSWORD_REQUIRED: &str = "Password is required";
pub const REGISTER_PASSWORD_LENGTH: &str = "Password must be at least 8 characters";

pub const MIN_PASSWORD_LEN: usize = 8;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]+$").expect("name pattern is valid"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("email pattern is valid")
});

/// Read access to the current values of a form, by field.
pub trait FormSnapshot<F> {
    fn value(&self, field: F) -> &str;
}

/// Forms that carry a password a confirmation field is compared against.
pub trait HasPassword {
    fn password(&self) -> &str;
}

/// A validator: `(value, snapshot) -> error message`.
pub type Check<S> = fn(&str, &S) -> Option<&'static str>;

/// Fields of the user creation form, in declared (display) order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CreateField {
    Department,
    UserRole,
    FirstName,
    LastName,
    Username,
    Password,
    ConfirmPassword,
    Dob,
    Image,
}

impl CreateField {
    /// Fields with a value the user types or selects; `Image` is handled apart.
    pub const INPUTS: [CreateField; 8] = [
        CreateField::Department,
        CreateField::UserRole,
        CreateField::FirstName,
        CreateField::LastName,
        CreateField::Username,
        CreateField::Password,
        CreateField::ConfirmPassword,
        CreateField::Dob,
    ];

    /// Name of the field on the wire.
    pub fn key(self) -> &'static str {
        match self {
            CreateField::Department => "department",
            CreateField::UserRole => "userRole",
            CreateField::FirstName => "firstName",
            CreateField::LastName => "lastName",
            CreateField::Username => "username",
            CreateField::Password => "password",
            CreateField::ConfirmPassword => "confirmPassword",
            CreateField::Dob => "dob",
            CreateField::Image => "profileImage",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CreateField::Department => "Department",
            CreateField::UserRole => "User Role",
            CreateField::FirstName => "First Name",
            CreateField::LastName => "Last Name",
            CreateField::Username => "Username",
            CreateField::Password => "Password",
            CreateField::ConfirmPassword => "Confirm Password",
            CreateField::Dob => "Date of Birth",
            CreateField::Image => "Profile Image",
        }
    }
}

/// Fields of the edit form, in the order they are checked before submission.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EditField {
    FirstName,
    LastName,
    Username,
    Department,
    UserRole,
    Status,
    Dob,
}

impl EditField {
    pub const REQUIRED: [EditField; 7] = [
        EditField::FirstName,
        EditField::LastName,
        EditField::Username,
        EditField::Department,
        EditField::UserRole,
        EditField::Status,
        EditField::Dob,
    ];

    pub fn key(self) -> &'static str {
        match self {
            EditField::FirstName => "firstName",
            EditField::LastName => "lastName",
            EditField::Username => "username",
            EditField::Department => "department",
            EditField::UserRole => "userRole",
            EditField::Status => "status",
            EditField::Dob => "dob",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EditField::FirstName => "First Name",
            EditField::LastName => "Last Name",
            EditField::Username => "Username",
            EditField::Department => "Department",
            EditField::UserRole => "Role",
            EditField::Status => "Status",
            EditField::Dob => "Date of Birth",
        }
    }
}

/// Fields shared by the login and register forms.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuthField {
    Email,
    Password,
    ConfirmPassword,
}

impl AuthField {
    pub fn label(self) -> &'static str {
        match self {
            AuthField::Email => "Email",
            AuthField::Password => "Password",
            AuthField::ConfirmPassword => "Confirm Password",
        }
    }
}

pub fn required<S>(value: &str, _: &S) -> Option<&'static str> {
    value.is_empty().then_some(REQUIRED)
}

pub fn person_name<S>(value: &str, _: &S) -> Option<&'static str> {
    if value.is_empty() {
        Some(REQUIRED)
    } else if !NAME_RE.is_match(value) {
        Some(NAME_CHARS)
    } else {
        None
    }
}

pub fn password<S>(value: &str, _: &S) -> Option<&'static str> {
    if value.is_empty() {
        Some(REQUIRED)
    } else if value.chars().count() < MIN_PASSWORD_LEN {
        Some(PASSWORD_LENGTH)
    } else {
        None
    }
}

pub fn confirm_password<S: HasPassword>(value: &str, snapshot: &S) -> Option<&'static str> {
    if value.is_empty() {
        Some(REQUIRED)
    } else if value != snapshot.password() {
        Some(PASSWORD_MISMATCH)
    } else {
        None
    }
}

pub fn email<S>(value: &str, _: &S) -> Option<&'static str> {
    if value.is_empty() {
        Some(REQUIRED)
    } else if !is_valid_email(value) {
        Some(INVALID_EMAIL)
    } else {
        None
    }
}

pub fn login_password<S>(value: &str, _: &S) -> Option<&'static str> {
    value.is_empty().then_some(LOGIN_PASSWORD_REQUIRED)
}

pub fn register_password<S>(value: &str, _: &S) -> Option<&'static str> {
    (value.chars().count() < MIN_PASSWORD_LEN).then_some(REGISTER_PASSWORD_LENGTH)
}

pub fn register_confirm<S: HasPassword>(value: &str, snapshot: &S) -> Option<&'static str> {
    (value != snapshot.password()).then_some(PASSWORD_MISMATCH)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub static CREATE_RULES: &[(CreateField, Check<UserDraft>)] = &[
    (CreateField::Department, required),
    (CreateField::UserRole, required),
    (CreateField::FirstName, person_name),
    (CreateField::LastName, person_name),
    (CreateField::Username, required),
    (CreateField::Password, password),
    (CreateField::ConfirmPassword, confirm_password),
    (CreateField::Dob, required),
];

pub static LOGIN_RULES: &[(AuthField, Check<LoginForm>)] = &[
    (AuthField::Email, email),
    (AuthField::Password, login_password),
];

pub static REGISTER_RULES: &[(AuthField, Check<RegisterForm>)] = &[
    (AuthField::Email, email),
    (AuthField::Password, register_password),
    (AuthField::ConfirmPassword, register_confirm),
];

/// Run the rule registered for `field` against `value`.
///
/// Fields without a rule are always valid.
pub fn validate_field<F: Copy + PartialEq, S>(
    rules: &[(F, Check<S>)],
    field: F,
    value: &str,
    snapshot: &S,
) -> Option<&'static str> {
    rules
        .iter()
        .find(|(f, _)| *f == field)
        .and_then(|(_, check)| check(value, snapshot))
}

/// Run every rule of a table over the snapshot's current values.
pub fn validate_all<F, S>(rules: &[(F, Check<S>)], snapshot: &S) -> ValidationErrors<F>
where
    F: Copy + Ord,
    S: FormSnapshot<F>,
{
    let mut errors = ValidationErrors::default();
    for (field, check) in rules {
        errors.set(*field, check(snapshot.value(*field), snapshot));
    }
    errors
}

/// First field (in the given order) whose value is empty.
pub fn first_missing<F: Copy, S: FormSnapshot<F>>(fields: &[F], snapshot: &S) -> Option<F> {
    fields
        .iter()
        .copied()
        .find(|f| snapshot.value(*f).is_empty())
}

/// Field -> message mapping. A field without an entry is valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationErrors<F: Ord> {
    inner: BTreeMap<F, String>,
}

impl<F: Ord> Default for ValidationErrors<F> {
    fn default() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }
}

impl<F: Ord + Copy> ValidationErrors<F> {
    /// Merge a single rule result: a message sets the entry, `None` clears it.
    pub fn set(&mut self, field: F, message: Option<&str>) {
        match message {
            Some(m) if !m.is_empty() => {
                self.inner.insert(field, m.to_string());
            }
            _ => {
                self.inner.remove(&field);
            }
        }
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.inner.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}
