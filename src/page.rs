//! Page controller: turns user and browser events into state changes,
//! toasts, and effects for the host to render.

use std::time::Duration;

use tracing::{debug, error, info, warn};
use url::Url;

use crate::commands::{Command, KeyChord, KonamiDetector, Swipe, classify_swipe, parse_key, parse_voice};
use crate::config::{ContactSettings, Viewport};
use crate::contact::{self, ContactForm, FieldError};
use crate::notify::Notifier;
use crate::scroll::{Rect, Reveal, ScrollReveal, SectionLayout, navbar_scrolled};
use crate::theme::ThemeController;
use crate::types::{NotificationKind, Section, Theme};

const SHORTCUT_HINT_DURATION: Duration = Duration::from_secs(8);
const SHORTCUT_HINT: &str =
    "Keyboard shortcuts: Ctrl+1-4 to navigate, Ctrl+T for theme, Ctrl+F for focus mode";

#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Voice(String),
    Key(KeyChord),
    Swipe(Swipe),
    Scroll(f64),
    Resize(Viewport),
    Pointer(f64, f64),
    Visibility { visible: bool },
    Online,
    Offline,
    Submit(ContactForm),
    WhatsApp(ContactForm),
    /// Unexpected failure reported by the host while setting up the page.
    Fault(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    ApplyTheme(Theme),
    ScrollTo(f64),
    NavbarScrolled(bool),
    ActiveNav(Option<Section>),
    Reveal(Reveal),
    FocusMode(bool),
    RainbowMode(bool),
    ToggleMusic,
    PauseAnimations,
    ResumeAnimations,
    ResizeStage(Viewport),
    MovePointer(f64, f64),
    OpenUrl(Url),
    ResetForm,
    ShowFieldErrors(Vec<FieldError>),
}

pub struct Page {
    notifier: Notifier,
    themes: ThemeController,
    contact: ContactSettings,
    layout: SectionLayout,
    reveal: ScrollReveal,
    konami: KonamiDetector,
    viewport: Viewport,
    offset: f64,
    navbar_scrolled: bool,
    active_nav: Option<Section>,
    focus: bool,
    rainbow: bool,
}

impl Page {
    pub fn new(
        notifier: Notifier,
        themes: ThemeController,
        layout: SectionLayout,
        viewport: Viewport,
        contact: ContactSettings,
    ) -> Self {
        Self {
            notifier,
            themes,
            contact,
            layout,
            reveal: ScrollReveal::new(),
            konami: KonamiDetector::new(),
            viewport,
            offset: 0.0,
            navbar_scrolled: false,
            active_nav: None,
            focus: false,
            rainbow: false,
        }
    }

    /// Registers an element for reveal-on-scroll.
    pub fn observe(&mut self, id: impl Into<String>, rect: Rect) {
        self.reveal.observe(id, rect);
    }

    /// Initial render: restored theme, first scroll pass and greetings.
    pub fn start(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::ApplyTheme(self.themes.current())];
        self.scrolled(self.offset, &mut effects);
        let welcome = format!("Welcome to {}!", self.contact.site_name);
        self.toast(welcome, NotificationKind::Success);
        self.toast_for(SHORTCUT_HINT, NotificationKind::Info, SHORTCUT_HINT_DURATION);
        info!(theme = %self.themes.current(), "page started");
        effects
    }

    pub fn handle(&mut self, input: Input) -> Vec<Effect> {
        let mut effects = Vec::new();
        match input {
            Input::Voice(transcript) => match parse_voice(&transcript) {
                Some(command) => {
                    debug!(%transcript, ?command, "voice command");
                    self.execute(command, &mut effects);
                }
                None => {
                    debug!(%transcript, "voice command not recognised");
                    self.toast("Command not recognised", NotificationKind::Warning);
                }
            },
            Input::Key(chord) => {
                if self.konami.push(&chord.key) {
                    self.rainbow = !self.rainbow;
                    effects.push(Effect::RainbowMode(self.rainbow));
                    if self.rainbow {
                        self.toast("Rainbow mode activated!", NotificationKind::Success);
                    }
                }
                if let Some(command) = parse_key(&chord) {
                    debug!(%chord, ?command, "keyboard shortcut");
                    self.execute(command, &mut effects);
                }
            }
            Input::Swipe(swipe) => {
                if let Some(command) = classify_swipe(swipe) {
                    self.execute(command, &mut effects);
                }
            }
            Input::Scroll(offset) => self.scrolled(offset, &mut effects),
            Input::Resize(viewport) => {
                self.viewport = viewport;
                effects.push(Effect::ResizeStage(viewport));
                self.scrolled(self.offset, &mut effects);
            }
            Input::Pointer(x, y) => effects.push(Effect::MovePointer(x, y)),
            Input::Visibility { visible } => effects.push(if visible {
                Effect::ResumeAnimations
            } else {
                Effect::PauseAnimations
            }),
            Input::Online => self.toast("Connection restored", NotificationKind::Success),
            Input::Offline => self.toast(
                "You are offline, some features may be unavailable",
                NotificationKind::Warning,
            ),
            Input::Submit(form) => self.submit(&form, &mut effects),
            Input::WhatsApp(form) => {
                let text = contact::compose_message(
                    &form,
                    &self.contact.site_name,
                    chrono::Local::now().naive_local(),
                );
                let link = contact::whatsapp_link(&self.contact, &text);
                info!(host = link.host_str().unwrap_or_default(), "opening whatsapp link");
                effects.push(Effect::OpenUrl(link));
                self.toast(
                    "WhatsApp opened with your message ready to send",
                    NotificationKind::Success,
                );
            }
            Input::Fault(reason) => {
                error!(%reason, "page fault");
                self.toast(
                    "Something went wrong while loading, please reload the page",
                    NotificationKind::Error,
                );
            }
        }
        effects
    }

    fn execute(&mut self, command: Command, effects: &mut Vec<Effect>) {
        match command {
            Command::Goto(section) => {
                self.toast(format!("Going to {section}"), NotificationKind::Info);
                self.scroll_to(self.layout.top_of(section), effects);
            }
            Command::NextSection | Command::PreviousSection => {
                let (step, label) = if command == Command::NextSection {
                    (1, "Next section")
                } else {
                    (-1, "Previous section")
                };
                let target = self.layout.current(self.offset).step(step);
                self.toast(label, NotificationKind::Info);
                self.scroll_to(self.layout.top_of(target), effects);
            }
            Command::ScrollTop => {
                self.toast("Back to top", NotificationKind::Info);
                self.scroll_to(0.0, effects);
            }
            Command::ScrollBottom => {
                self.toast("Jumping to the bottom", NotificationKind::Info);
                self.scroll_to(self.max_offset(), effects);
            }
            Command::CycleTheme => {
                let theme = self.themes.current().next();
                if let Err(err) = self.themes.set(theme) {
                    warn!(error = %err, "theme applied but not saved");
                }
                effects.push(Effect::ApplyTheme(theme));
                self.toast(format!("Theme changed to {theme}"), NotificationKind::Success);
            }
            Command::ToggleFocus => self.set_focus(!self.focus, effects),
            Command::ExitFocus => {
                if self.focus {
                    self.set_focus(false, effects);
                }
            }
            Command::ToggleMusic => effects.push(Effect::ToggleMusic),
        }
    }

    fn submit(&self, form: &ContactForm, effects: &mut Vec<Effect>) {
        match contact::validate(form) {
            Ok(()) => {
                info!("contact form accepted");
                effects.push(Effect::ResetForm);
                self.toast("Message sent successfully!", NotificationKind::Success);
            }
            Err(errors) => {
                debug!(count = errors.len(), "contact form rejected");
                effects.push(Effect::ShowFieldErrors(errors));
                self.toast("Please fix the errors in the form", NotificationKind::Error);
            }
        }
    }

    fn set_focus(&mut self, focus: bool, effects: &mut Vec<Effect>) {
        self.focus = focus;
        effects.push(Effect::FocusMode(focus));
        let message = if focus { "Focus mode enabled" } else { "Focus mode disabled" };
        self.toast(message, NotificationKind::Info);
    }

    fn max_offset(&self) -> f64 {
        (self.layout.document_height() - self.viewport.height).max(0.0)
    }

    fn scroll_to(&mut self, target: f64, effects: &mut Vec<Effect>) {
        let target = target.clamp(0.0, self.max_offset());
        effects.push(Effect::ScrollTo(target));
        self.scrolled(target, effects);
    }

    fn scrolled(&mut self, offset: f64, effects: &mut Vec<Effect>) {
        self.offset = offset;
        let scrolled = navbar_scrolled(offset);
        if scrolled != self.navbar_scrolled {
            self.navbar_scrolled = scrolled;
            effects.push(Effect::NavbarScrolled(scrolled));
        }
        let active = self.layout.active_nav(offset);
        if active != self.active_nav {
            self.active_nav = active;
            effects.push(Effect::ActiveNav(active));
        }
        effects.extend(
            self.reveal
                .scan(offset, self.viewport.height)
                .into_iter()
                .map(Effect::Reveal),
        );
    }

    fn toast(&self, message: impl Into<String>, kind: NotificationKind) {
        self.toast_for(message, kind, Duration::ZERO);
    }

    // A failed toast never blocks the action that triggered it.
    fn toast_for(&self, message: impl Into<String>, kind: NotificationKind, duration: Duration) {
        if let Err(err) = self.notifier.notify_for(message, kind, duration) {
            warn!(error = %err, %kind, "toast dropped");
        }
    }

    pub const fn theme(&self) -> Theme {
        self.themes.current()
    }

    pub const fn focus(&self) -> bool {
        self.focus
    }

    pub const fn rainbow(&self) -> bool {
        self.rainbow
    }

    pub const fn offset(&self) -> f64 {
        self.offset
    }

    pub fn current_section(&self) -> Section {
        self.layout.current(self.offset)
    }
}
