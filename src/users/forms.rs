//! Account forms: user create/edit, login and register.

use schedule_types::{CreateUserInput, EditUserInput, LoginInput, RegisterInput, User, UserId};

use crate::forms::{non_blank, FieldErrors};

pub const CERT_LEVELS: [&str; 6] = [
    "Open Water",
    "Advanced Open Water",
    "Rescue Diver",
    "Divemaster",
    "Instructor",
    "Not certified",
];

fn check_email(errors: &mut FieldErrors, email: &str) {
    errors.require("email", "Email", email);
    if !email.trim().is_empty() && !email.contains('@') {
        errors.add("email", "Enter a valid email address");
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub cert_level: String,
    pub equipment: String,
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            full_name: user.profile.full_name.clone(),
            email: user.email.clone(),
            phone_number: user.profile.phone_number.clone().unwrap_or_default(),
            cert_level: user.profile.cert_level.clone(),
            equipment: user.profile.equipment.clone(),
        }
    }

    pub fn validate(&self) -> Result<CreateUserInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("fullName", "Full name", &self.full_name);
        check_email(&mut errors, &self.email);

        errors.into_result(|| CreateUserInput {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: non_blank(&self.phone_number),
            cert_level: non_blank(&self.cert_level),
            equipment: non_blank(&self.equipment),
        })
    }

    pub fn validate_edit(&self, id: UserId) -> Result<EditUserInput, FieldErrors> {
        self.validate().map(|fields| EditUserInput { id, fields })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, &self.email);
        errors.require("password", "Password", &self.password);

        errors.into_result(|| LoginInput {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// Registration creates a plain diver account.
    pub fn validate(&self) -> Result<RegisterInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("firstName", "First name", &self.first_name);
        errors.require("lastName", "Last name", &self.last_name);
        check_email(&mut errors, &self.email);
        errors.require("password", "Password", &self.password);

        errors.into_result(|| RegisterInput {
            full_name: format!("{} {}", self.first_name.trim(), self.last_name.trim()),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}
