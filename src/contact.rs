//! Contact form validation and the prefilled WhatsApp deep link.

use std::fmt::{self, Display, Write as _};

use chrono::NaiveDateTime;
use url::Url;

use crate::config::ContactSettings;

const NOT_SPECIFIED: &str = "Not specified";
const MIN_NAME_CHARS: usize = 2;
const MIN_MESSAGE_CHARS: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub project_type: String,
    pub budget: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    ProjectType,
    Message,
}

impl Field {
    pub const REQUIRED: [Self; 4] = [Self::Name, Self::Email, Self::ProjectType, Self::Message];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::ProjectType => "projectType",
            Self::Message => "message",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

/// Checks one field; values are trimmed first.
pub fn validate_field(form: &ContactForm, field: Field) -> Option<FieldError> {
    let (ok, message) = match field {
        Field::Name => (
            form.name.trim().chars().count() >= MIN_NAME_CHARS,
            "Name must be at least 2 characters",
        ),
        Field::Email => (
            looks_like_email(form.email.trim()),
            "Please enter a valid email address",
        ),
        Field::ProjectType => (
            !form.project_type.trim().is_empty(),
            "Please choose a project type",
        ),
        Field::Message => (
            form.message.trim().chars().count() >= MIN_MESSAGE_CHARS,
            "Message must be at least 10 characters",
        ),
    };
    (!ok).then_some(FieldError { field, message })
}

/// Every failing required field, in form order.
///
/// # Errors
///
/// Returns the list of field errors when any required field is invalid.
pub fn validate(form: &ContactForm) -> Result<(), Vec<FieldError>> {
    let errors: Vec<_> = Field::REQUIRED
        .into_iter()
        .filter_map(|field| validate_field(form, field))
        .collect();
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// local@domain.tld: no whitespace, a single '@', a dot inside the domain.
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(idx, ch)| ch == '.' && idx > 0 && idx + 1 < domain.len())
}

pub fn project_type_label(value: &str) -> &'static str {
    match value.trim() {
        "website" => "Website development",
        "mobile-app" => "Mobile app development",
        "security" => "Cybersecurity services",
        "ai" => "AI solutions",
        "consultation" => "Technical consultation",
        "other" => "Other",
        _ => NOT_SPECIFIED,
    }
}

pub fn budget_label(value: &str) -> &'static str {
    match value.trim() {
        "under-5k" => "Under 5,000 EGP",
        "5k-15k" => "5,000 - 15,000 EGP",
        "15k-30k" => "15,000 - 30,000 EGP",
        "30k-50k" => "30,000 - 50,000 EGP",
        "over-50k" => "Over 50,000 EGP",
        _ => NOT_SPECIFIED,
    }
}

fn or_unspecified(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() { NOT_SPECIFIED } else { value }
}

/// Message body sent through the deep link.
pub fn compose_message(form: &ContactForm, site_name: &str, sent_at: NaiveDateTime) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "*New message from {site_name}*");
    let _ = writeln!(out);
    let _ = writeln!(out, "*Name:* {}", or_unspecified(&form.name));
    let _ = writeln!(out, "*Email:* {}", or_unspecified(&form.email));
    let _ = writeln!(out, "*Phone:* {}", or_unspecified(&form.phone));
    let _ = writeln!(out, "*Project type:* {}", project_type_label(&form.project_type));
    let _ = writeln!(out, "*Budget:* {}", budget_label(&form.budget));
    let _ = writeln!(out);
    let _ = writeln!(out, "*Project details:*");
    let _ = writeln!(out, "{}", or_unspecified(&form.message));
    let _ = writeln!(out);
    let _ = write!(out, "*Sent:* {}", sent_at.format("%Y-%m-%d %H:%M:%S"));
    out
}

/// `{base_url}{number}?text=...`; the number loses its leading `+` and the
/// text is percent-encoded (`%20` for spaces, never `+`).
pub fn whatsapp_link(settings: &ContactSettings, text: &str) -> Url {
    let mut link = settings.base_url.clone();
    let number = settings.whatsapp_number.trim_start_matches('+');
    let path = format!("{}/{number}", link.path().trim_end_matches('/'));
    link.set_path(&path);
    link.set_query(Some(&format!("text={}", urlencoding::encode(text))));
    link
}
