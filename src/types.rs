use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Nom d'icône affiché à gauche du toast.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Error => "exclamation-circle",
            Self::Warning => "exclamation-triangle",
            Self::Info => "info-circle",
        }
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" | "information" => Ok(Self::Info),
            "success" | "ok" => Ok(Self::Success),
            "warn" | "warning" => Ok(Self::Warning),
            "error" | "err" => Ok(Self::Error),
            other => Err(format!("unknown notification kind: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Cyber,
    Dark,
    Light,
}

impl Theme {
    pub const ALL: [Self; 3] = [Self::Cyber, Self::Dark, Self::Light];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cyber => "cyber",
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Cyber => Self::Dark,
            Self::Dark => Self::Light,
            Self::Light => Self::Cyber,
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Cyber => "fa-rocket",
            Self::Dark => "fa-moon",
            Self::Light => "fa-sun",
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme: {s}"))
    }
}

/// Page anchors, in document order.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Home,
    Skills,
    Projects,
    Services,
    Testimonials,
    Contact,
}

impl Section {
    pub const ORDER: [Self; 6] = [
        Self::Home,
        Self::Skills,
        Self::Projects,
        Self::Services,
        Self::Testimonials,
        Self::Contact,
    ];

    pub const fn anchor(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::Services => "services",
            Self::Testimonials => "testimonials",
            Self::Contact => "contact",
        }
    }

    pub fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|section| *section == self)
            .unwrap_or_default()
    }

    /// Section voisine, avec rebouclage aux extrémités.
    #[must_use]
    pub fn step(self, direction: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let idx = (self.index() as isize + direction).rem_euclid(len);
        Self::ORDER[idx as usize]
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.anchor())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().trim_start_matches('#');
        Self::ORDER
            .into_iter()
            .find(|section| section.anchor().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown section: {s}"))
    }
}
