//! Form state for the create, edit, login and register screens.
//!
//! A form owns its current values, its validation errors and (for user
//! forms) the picked profile image. A field change updates the value and
//! re-runs only that field's rule. Submission is split in two steps so the
//! network call can run off the UI thread: `prepare_submit` validates and
//! returns the payload, `apply_result` folds the server's answer back in.

use crate::error::ApiError;
use crate::model::{
    Credentials, Department, ImageFile, LoginResponse, Registration, Status, UserRecord, UserRole,
};
use crate::notify::Notification;
use crate::session::Session;
use crate::validate::{
    self, AuthField, CreateField, EditField, FormSnapshot, HasPassword, ValidationErrors,
};

pub const IN_FLIGHT: &str = "Still waiting for the previous request";

/// Values of the user creation form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub department: Option<Department>,
    pub user_role: Option<UserRole>,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
}

impl UserDraft {
    /// Text fields in wire order, as sent in the multipart body.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        CreateField::INPUTS
            .iter()
            .map(|f| (f.key(), self.value(*f).to_string()))
            .collect()
    }

    fn text_mut(&mut self, field: CreateField) -> Option<&mut String> {
        match field {
            CreateField::FirstName => Some(&mut self.first_name),
            CreateField::LastName => Some(&mut self.last_name),
            CreateField::Username => Some(&mut self.username),
            CreateField::Password => Some(&mut self.password),
            CreateField::ConfirmPassword => Some(&mut self.confirm_password),
            CreateField::Dob => Some(&mut self.dob),
            CreateField::Department | CreateField::UserRole | CreateField::Image => None,
        }
    }
}

impl FormSnapshot<CreateField> for UserDraft {
    fn value(&self, field: CreateField) -> &str {
        match field {
            CreateField::Department => self.department.map(Department::as_str).unwrap_or(""),
            CreateField::UserRole => self.user_role.map(UserRole::as_str).unwrap_or(""),
            CreateField::FirstName => &self.first_name,
            CreateField::LastName => &self.last_name,
            CreateField::Username => &self.username,
            CreateField::Password => &self.password,
            CreateField::ConfirmPassword => &self.confirm_password,
            CreateField::Dob => &self.dob,
            CreateField::Image => "",
        }
    }
}

impl HasPassword for UserDraft {
    fn password(&self) -> &str {
        &self.password
    }
}

/// A validated creation request.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub draft: UserDraft,
    pub image: ImageFile,
}

/// The user creation form.
#[derive(Clone, Debug, Default)]
pub struct CreateForm {
    pub draft: UserDraft,
    pub errors: ValidationErrors<CreateField>,
    pub image: Option<ImageFile>,
    pub in_flight: bool,
    /// Values were thrown away while a submission was still pending.
    pub discarded: bool,
}

impl CreateForm {
    fn revalidate(&mut self, field: CreateField) {
        let value = self.draft.value(field).to_string();
        let msg = validate::validate_field(validate::CREATE_RULES, field, &value, &self.draft);
        self.errors.set(field, msg);
    }

    /// Replace a text field's value and re-check that field only.
    pub fn set_text(&mut self, field: CreateField, value: impl Into<String>) {
        if let Some(slot) = self.draft.text_mut(field) {
            *slot = value.into();
            self.revalidate(field);
        }
    }

    pub fn push_char(&mut self, field: CreateField, c: char) {
        if let Some(slot) = self.draft.text_mut(field) {
            slot.push(c);
            self.revalidate(field);
        }
    }

    pub fn pop_char(&mut self, field: CreateField) {
        if let Some(slot) = self.draft.text_mut(field) {
            slot.pop();
            self.revalidate(field);
        }
    }

    pub fn set_department(&mut self, department: Option<Department>) {
        self.draft.department = department;
        self.revalidate(CreateField::Department);
    }

    pub fn set_user_role(&mut self, role: Option<UserRole>) {
        self.draft.user_role = role;
        self.revalidate(CreateField::UserRole);
    }

    pub fn attach_image(&mut self, image: ImageFile) {
        self.image = Some(image);
        self.errors.set(CreateField::Image, None);
    }

    /// Record why a picked file could not be used.
    pub fn reject_image(&mut self, err: &ApiError) {
        self.image = None;
        self.errors.set(CreateField::Image, Some(&err.to_string()));
    }

    /// Check every field plus the image; replaces the error mapping.
    pub fn validate_form(&mut self) -> bool {
        let mut errors = validate::validate_all(validate::CREATE_RULES, &self.draft);
        if self.image.is_none() {
            errors.set(CreateField::Image, Some(validate::IMAGE_REQUIRED));
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validate and hand out the request payload, marking the form in flight.
    pub fn prepare_submit(&mut self) -> Result<NewUser, Notification> {
        if self.in_flight {
            return Err(Notification::info(IN_FLIGHT));
        }
        if !self.validate_form() {
            return Err(Notification::error("Please fix the highlighted fields"));
        }
        let image = self
            .image
            .clone()
            .ok_or_else(|| Notification::error(validate::IMAGE_REQUIRED))?;
        self.in_flight = true;
        Ok(NewUser {
            draft: self.draft.clone(),
            image,
        })
    }

    /// Fold the create call's result back in. Returns whether it succeeded.
    ///
    /// Values typed after a [`discard`](Self::discard) belong to a new entry
    /// and survive a late success.
    pub fn apply_result(&mut self, result: Result<(), ApiError>) -> (Notification, bool) {
        self.in_flight = false;
        let discarded = std::mem::take(&mut self.discarded);
        match result {
            Ok(()) => {
                if !discarded {
                    self.reset();
                }
                (Notification::success("User added successfully!"), true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "create user failed");
                (
                    Notification::error("Something went wrong. Please try again."),
                    false,
                )
            }
        }
    }

    /// Clear values, errors and image.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clear values, errors and image but keep a pending submission pending,
    /// so the same entry cannot be sent twice.
    pub fn discard(&mut self) {
        let pending = self.in_flight;
        self.reset();
        self.in_flight = pending;
        self.discarded = pending;
    }
}

/// A validated update request.
#[derive(Clone, Debug)]
pub struct UserUpdate {
    pub user: UserRecord,
    pub image: Option<ImageFile>,
}

/// The edit form, seeded from a fetched [`UserRecord`].
#[derive(Clone, Debug)]
pub struct EditForm {
    pub user: UserRecord,
    pub image: Option<ImageFile>,
    pub image_error: Option<String>,
    pub in_flight: bool,
}

impl FormSnapshot<EditField> for UserRecord {
    fn value(&self, field: EditField) -> &str {
        match field {
            EditField::FirstName => &self.first_name,
            EditField::LastName => &self.last_name,
            EditField::Username => &self.username,
            EditField::Department => self.department.as_str(),
            EditField::UserRole => self.user_role.as_str(),
            EditField::Status => self.status.as_str(),
            EditField::Dob => &self.dob,
        }
    }
}

impl EditForm {
    pub fn new(user: UserRecord) -> Self {
        Self {
            user,
            image: None,
            image_error: None,
            in_flight: false,
        }
    }

    fn text_mut(&mut self, field: EditField) -> Option<&mut String> {
        match field {
            EditField::FirstName => Some(&mut self.user.first_name),
            EditField::LastName => Some(&mut self.user.last_name),
            EditField::Username => Some(&mut self.user.username),
            EditField::Dob => Some(&mut self.user.dob),
            EditField::Department | EditField::UserRole | EditField::Status => None,
        }
    }

    pub fn push_char(&mut self, field: EditField, c: char) {
        if let Some(slot) = self.text_mut(field) {
            slot.push(c);
        }
    }

    pub fn pop_char(&mut self, field: EditField) {
        if let Some(slot) = self.text_mut(field) {
            slot.pop();
        }
    }

    pub fn set_text(&mut self, field: EditField, value: impl Into<String>) {
        if let Some(slot) = self.text_mut(field) {
            *slot = value.into();
        }
    }

    pub fn set_department(&mut self, d: Department) {
        self.user.department = d;
    }

    pub fn set_user_role(&mut self, r: UserRole) {
        self.user.user_role = r;
    }

    pub fn set_status(&mut self, s: Status) {
        self.user.status = s;
    }

    pub fn attach_image(&mut self, image: ImageFile) {
        self.image = Some(image);
        self.image_error = None;
    }

    pub fn reject_image(&mut self, err: &ApiError) {
        self.image_error = Some(err.to_string());
    }

    /// Preview line: the newly picked file, else the stored one.
    pub fn image_preview(&self) -> String {
        match (&self.image, &self.user.profile_image) {
            (Some(img), _) => img.preview(),
            (None, Some(stored)) => format!("uploads/{stored}"),
            (None, None) => "No image uploaded".to_string(),
        }
    }

    /// The first required field that is empty, checked in declared order.
    pub fn first_missing(&self) -> Option<EditField> {
        validate::first_missing(&EditField::REQUIRED, &self.user)
    }

    pub fn prepare_submit(&mut self) -> Result<UserUpdate, Notification> {
        if self.in_flight {
            return Err(Notification::info(IN_FLIGHT));
        }
        if let Some(missing) = self.first_missing() {
            return Err(Notification::error(format!("{} is required!", missing.key())));
        }
        self.in_flight = true;
        Ok(UserUpdate {
            user: self.user.clone(),
            image: self.image.clone(),
        })
    }

    /// Fold the update call's result back in. Returns whether it succeeded.
    pub fn apply_result(&mut self, result: Result<(), ApiError>) -> (Notification, bool) {
        self.in_flight = false;
        match result {
            Ok(()) => (Notification::success("User updated successfully!"), true),
            Err(e) => (
                Notification::error(format!("An error occurred: {}", e.reason())),
                false,
            ),
        }
    }
}

/// The login form.
#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub errors: ValidationErrors<AuthField>,
    pub in_flight: bool,
}

impl FormSnapshot<AuthField> for LoginForm {
    fn value(&self, field: AuthField) -> &str {
        match field {
            AuthField::Email => &self.email,
            AuthField::Password => &self.password,
            AuthField::ConfirmPassword => "",
        }
    }
}

impl HasPassword for LoginForm {
    fn password(&self) -> &str {
        &self.password
    }
}

impl LoginForm {
    fn slot(&mut self, field: AuthField) -> Option<&mut String> {
        match field {
            AuthField::Email => Some(&mut self.email),
            AuthField::Password => Some(&mut self.password),
            AuthField::ConfirmPassword => None,
        }
    }

    fn revalidate(&mut self, field: AuthField) {
        let value = self.value(field).to_string();
        let msg = validate::validate_field(validate::LOGIN_RULES, field, &value, self);
        self.errors.set(field, msg);
    }

    pub fn set_text(&mut self, field: AuthField, value: impl Into<String>) {
        if let Some(slot) = self.slot(field) {
            *slot = value.into();
            self.revalidate(field);
        }
    }

    pub fn push_char(&mut self, field: AuthField, c: char) {
        if let Some(slot) = self.slot(field) {
            slot.push(c);
            self.revalidate(field);
        }
    }

    pub fn pop_char(&mut self, field: AuthField) {
        if let Some(slot) = self.slot(field) {
            slot.pop();
            self.revalidate(field);
        }
    }

    pub fn prepare_submit(&mut self) -> Result<Credentials, Notification> {
        if self.in_flight {
            return Err(Notification::info(IN_FLIGHT));
        }
        if self.email.is_empty() || self.password.is_empty() {
            return Err(Notification::error("Please fill in all fields"));
        }
        if !self.errors.is_empty() {
            return Err(Notification::error("Please fix validation errors"));
        }
        self.in_flight = true;
        Ok(Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }

    /// Fold the login result back in; a session is returned on success.
    pub fn apply_result(
        &mut self,
        result: Result<LoginResponse, ApiError>,
    ) -> (Notification, Option<Session>) {
        self.in_flight = false;
        match result {
            Ok(resp) => {
                *self = Self::default();
                (Notification::success("Login successful!"), Some(resp.into()))
            }
            Err(e) => (
                Notification::error(e.user_message("Login failed. Check your credentials.")),
                None,
            ),
        }
    }
}

/// The registration form.
#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub errors: ValidationErrors<AuthField>,
    pub in_flight: bool,
}

impl FormSnapshot<AuthField> for RegisterForm {
    fn value(&self, field: AuthField) -> &str {
        match field {
            AuthField::Email => &self.email,
            AuthField::Password => &self.password,
            AuthField::ConfirmPassword => &self.confirm_password,
        }
    }
}

impl HasPassword for RegisterForm {
    fn password(&self) -> &str {
        &self.password
    }
}

impl RegisterForm {
    fn slot(&mut self, field: AuthField) -> &mut String {
        match field {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::ConfirmPassword => &mut self.confirm_password,
        }
    }

    fn revalidate(&mut self, field: AuthField) {
        let value = self.value(field).to_string();
        let msg = validate::validate_field(validate::REGISTER_RULES, field, &value, self);
        self.errors.set(field, msg);
    }

    pub fn set_text(&mut self, field: AuthField, value: impl Into<String>) {
        *self.slot(field) = value.into();
        self.revalidate(field);
    }

    pub fn push_char(&mut self, field: AuthField, c: char) {
        self.slot(field).push(c);
        self.revalidate(field);
    }

    pub fn pop_char(&mut self, field: AuthField) {
        self.slot(field).pop();
        self.revalidate(field);
    }

    pub fn prepare_submit(&mut self) -> Result<Registration, Notification> {
        if self.in_flight {
            return Err(Notification::info(IN_FLIGHT));
        }
        if self.email.is_empty() || self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(Notification::error("Please fill out all fields"));
        }
        if !self.errors.is_empty() {
            return Err(Notification::error("Please correct the validation errors"));
        }
        self.in_flight = true;
        Ok(Registration {
            email: self.email.clone(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }

    pub fn apply_result(&mut self, result: Result<(), ApiError>) -> (Notification, bool) {
        self.in_flight = false;
        match result {
            Ok(()) => {
                *self = Self::default();
                (Notification::success("Registered successfully!"), true)
            }
            Err(e) => (
                Notification::error(e.user_message("Registration failed")),
                false,
            ),
        }
    }
}
