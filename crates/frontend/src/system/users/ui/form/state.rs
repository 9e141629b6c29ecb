use contracts::system::users::{non_empty, CreateUserDto, Role, UpdateUserDto, User};

use crate::shared::async_action::should_dispatch;

use super::validation::{
    check_email, check_password, check_phone, check_username, check_username_live, FieldErrors,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Username,
    Email,
    Password,
    FullName,
    PhoneNumber,
    Image,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormMode {
    #[default]
    Closed,
    Create,
    Edit(User),
}

/// Editable copy of the form fields. Empty strings mean "not provided".
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone_number: String,
    pub role_id: i32,
    pub is_active: bool,
    pub image: String,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            full_name: String::new(),
            phone_number: String::new(),
            role_id: Role::Admin.id(),
            is_active: true,
            image: String::new(),
        }
    }
}

impl UserDraft {
    /// Password is never pre-filled.
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            password: String::new(),
            full_name: user.full_name.clone().unwrap_or_default(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
            role_id: user.role_id,
            is_active: user.is_active,
            image: user.image.clone().unwrap_or_default(),
        }
    }

    fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Username => &mut self.username,
            TextField::Email => &mut self.email,
            TextField::Password => &mut self.password,
            TextField::FullName => &mut self.full_name,
            TextField::PhoneNumber => &mut self.phone_number,
            TextField::Image => &mut self.image,
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Username => &self.username,
            TextField::Email => &self.email,
            TextField::Password => &self.password,
            TextField::FullName => &self.full_name,
            TextField::PhoneNumber => &self.phone_number,
            TextField::Image => &self.image,
        }
    }
}

/// What the form hands to the page on a valid submit.
#[derive(Debug, Clone, PartialEq)]
pub enum UserPayload {
    Create(CreateUserDto),
    Update { id: i64, dto: UpdateUserDto },
}

/// State of the create/edit dialog, independent of the reactive runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFormState {
    pub mode: FormMode,
    pub draft: UserDraft,
    pub errors: FieldErrors<TextField>,
}

impl UserFormState {
    /// Opens in edit mode for `Some(user)`, create mode otherwise.
    ///
    /// Always replaces the whole draft and clears errors.
    pub fn open(&mut self, user: Option<&User>) {
        match user {
            Some(user) => {
                self.mode = FormMode::Edit(user.clone());
                self.draft = UserDraft::from_user(user);
            }
            None => {
                self.mode = FormMode::Create;
                self.draft = UserDraft::default();
            }
        }
        self.errors = FieldErrors::default();
    }

    /// Follows the dialog's `open` flag and edited user.
    pub fn sync(&mut self, open: bool, user: Option<&User>) {
        if open {
            self.open(user);
        } else {
            self.close();
        }
    }

    pub fn close(&mut self) {
        self.mode = FormMode::Closed;
        self.errors = FieldErrors::default();
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    pub fn is_edit_mode(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn set_field(&mut self, field: TextField, value: String) {
        self.errors.clear(field);
        if field == TextField::Username {
            if let Some(message) = check_username_live(&value) {
                self.errors.set(field, message);
            }
        }
        *self.draft.text_mut(field) = value;
    }

    pub fn set_role(&mut self, role_id: i32) {
        self.draft.role_id = role_id;
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.draft.is_active = is_active;
    }

    /// Runs every rule and replaces the error map. Returns `true` when valid.
    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::default();
        let creating = !self.is_edit_mode();

        if creating {
            if let Some(message) = check_username(&self.draft.username) {
                errors.set(TextField::Username, message);
            }
        }
        if let Some(message) = check_email(&self.draft.email) {
            errors.set(TextField::Email, message);
        }
        if creating {
            if let Some(message) = check_password(&self.draft.password) {
                errors.set(TextField::Password, message);
            }
        }
        if let Some(message) = check_phone(&self.draft.phone_number) {
            errors.set(TextField::PhoneNumber, message);
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validates and builds the payload. The dialog stays open either way.
    pub fn submit(&mut self) -> Option<UserPayload> {
        if !self.is_open() || !self.validate() {
            return None;
        }

        let d = &self.draft;
        let payload = match &self.mode {
            FormMode::Edit(user) => UserPayload::Update {
                id: user.id,
                dto: UpdateUserDto {
                    email: d.email.clone(),
                    full_name: non_empty(&d.full_name),
                    phone_number: non_empty(&d.phone_number),
                    role_id: d.role_id,
                    is_active: d.is_active,
                    image: non_empty(&d.image),
                },
            },
            _ => UserPayload::Create(CreateUserDto {
                username: d.username.clone(),
                email: d.email.clone(),
                password: d.password.clone(),
                full_name: non_empty(&d.full_name),
                phone_number: non_empty(&d.phone_number),
                role_id: Some(d.role_id),
                is_active: Some(d.is_active),
                image: non_empty(&d.image),
            }),
        };
        Some(payload)
    }

    /// Submit guarded by the save-in-flight flag; nothing is validated while saving.
    pub fn submit_unless_loading(&mut self, is_loading: bool) -> Option<UserPayload> {
        if !should_dispatch(is_loading) {
            return None;
        }
        self.submit()
    }
}
