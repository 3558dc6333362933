#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::time::Duration;

use common::{Event, RecordingSink, shown, snapshot};
use tokio::time::sleep;
use url::Url;
use vitrine::commands::{KeyChord, Swipe};
use vitrine::config::{ContactSettings, NotifySettings, Viewport};
use vitrine::contact::{ContactForm, Field};
use vitrine::notify::NotificationCenter;
use vitrine::page::{Effect, Input, Page};
use vitrine::scroll::{Rect, SectionLayout};
use vitrine::theme::{PrefsStore, ThemeController};
use vitrine::types::{NotificationKind, Section, Theme};

fn contact() -> ContactSettings {
    ContactSettings {
        whatsapp_number: "+201234567890".to_string(),
        base_url: Url::parse("https://wa.me/").expect("url"),
        site_name: "Vitrine".to_string(),
    }
}

fn page(center: &NotificationCenter) -> Page {
    Page::new(
        center.notifier(),
        ThemeController::load(PrefsStore::ephemeral(), Theme::Cyber),
        SectionLayout::uniform(900.0),
        Viewport::new(1280.0, 720.0),
        contact(),
    )
}

fn key(chord: &str) -> Input {
    Input::Key(chord.parse::<KeyChord>().expect("chord"))
}

#[tokio::test(start_paused = true)]
async fn start_applies_theme_and_greets() {
    let (sink, events) = RecordingSink::new();
    let center = NotificationCenter::spawn(&NotifySettings::default(), sink);
    let mut page = page(&center);
    page.observe("hero", Rect::new(120.0, 300.0));

    let effects = page.start();
    assert_eq!(effects[0], Effect::ApplyTheme(Theme::Cyber));
    assert!(effects.contains(&Effect::ActiveNav(Some(Section::Home))));
    assert!(effects.iter().any(|e| matches!(e, Effect::Reveal(r) if r.id == "hero")));

    sleep(Duration::from_secs(20)).await;
    let hint = snapshot(&events).into_iter().find_map(|event| match event {
        Event::Show { message, duration, .. } if message.starts_with("Keyboard shortcuts") => {
            Some(duration)
        }
        _ => None,
    });
    assert_eq!(hint, Some(Duration::from_secs(8)));
    assert_eq!(shown(&events)[0].0, "Welcome to Vitrine!");
    center.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shortcuts_navigate_and_cycle_theme() {
    let (sink, _events) = RecordingSink::new();
    let center = NotificationCenter::spawn(&NotifySettings::default(), sink);
    let mut page = page(&center);

    let effects = page.handle(key("ctrl+3"));
    assert_eq!(effects[0], Effect::ScrollTo(1800.0));
    assert!(effects.contains(&Effect::NavbarScrolled(true)));
    assert!(effects.contains(&Effect::ActiveNav(Some(Section::Projects))));
    assert_eq!(page.current_section(), Section::Projects);

    assert_eq!(page.handle(key("ctrl+t")), vec![Effect::ApplyTheme(Theme::Dark)]);
    assert_eq!(page.handle(key("cmd+t")), vec![Effect::ApplyTheme(Theme::Light)]);
    assert_eq!(page.theme(), Theme::Light);

    assert!(page.handle(key("escape")).is_empty());
    assert_eq!(page.handle(key("ctrl+f")), vec![Effect::FocusMode(true)]);
    assert_eq!(page.handle(key("escape")), vec![Effect::FocusMode(false)]);
    assert!(!page.focus());

    assert_eq!(page.handle(key("ctrl+m")), vec![Effect::ToggleMusic]);
    center.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn swipes_move_between_sections_with_wrap() {
    let (sink, _events) = RecordingSink::new();
    let center = NotificationCenter::spawn(&NotifySettings::default(), sink);
    let mut page = page(&center);
    let swipe = |dx: f64, dy: f64| {
        Input::Swipe(Swipe {
            start: (300.0, 300.0),
            end: (300.0 + dx, 300.0 + dy),
        })
    };

    let effects = page.handle(swipe(120.0, 0.0));
    assert_eq!(effects[0], Effect::ScrollTo(4500.0));
    assert_eq!(page.current_section(), Section::Contact);

    page.handle(swipe(-120.0, 0.0));
    assert_eq!(page.current_section(), Section::Home);

    let effects = page.handle(swipe(0.0, -120.0));
    assert_eq!(effects[0], Effect::ScrollTo(5400.0 - 720.0));
    let effects = page.handle(swipe(0.0, 120.0));
    assert_eq!(effects[0], Effect::ScrollTo(0.0));

    assert!(page.handle(swipe(30.0, 10.0)).is_empty());
    center.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn voice_commands_and_unknown_phrases() {
    let (sink, events) = RecordingSink::new();
    let center = NotificationCenter::spawn(&NotifySettings::default(), sink);
    let mut page = page(&center);

    assert!(page.handle(Input::Voice("sing a song".into())).is_empty());
    let effects = page.handle(Input::Voice("افتح تواصل".into()));
    assert_eq!(effects[0], Effect::ScrollTo(4500.0));

    sleep(Duration::from_millis(1)).await;
    let first = snapshot(&events).into_iter().next();
    assert!(matches!(
        first,
        Some(Event::Show { message, kind: NotificationKind::Warning, .. })
            if message == "Command not recognised"
    ));
    center.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn konami_sequence_toggles_rainbow() {
    let (sink, _events) = RecordingSink::new();
    let center = NotificationCenter::spawn(&NotifySettings::default(), sink);
    let mut page = page(&center);
    let sequence = [
        "ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown", "ArrowLeft", "ArrowRight", "ArrowLeft",
        "ArrowRight", "b", "a",
    ];

    let mut effects = Vec::new();
    for k in sequence {
        effects.extend(page.handle(key(k)));
    }
    assert_eq!(effects, vec![Effect::RainbowMode(true)]);
    assert!(page.rainbow());
    center.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn browser_events_map_to_effects() {
    let (sink, events) = RecordingSink::new();
    let center = NotificationCenter::spawn(&NotifySettings::default(), sink);
    let mut page = page(&center);

    assert_eq!(
        page.handle(Input::Visibility { visible: false }),
        vec![Effect::PauseAnimations]
    );
    assert_eq!(
        page.handle(Input::Visibility { visible: true }),
        vec![Effect::ResumeAnimations]
    );
    assert_eq!(
        page.handle(Input::Pointer(4.0, 2.0)),
        vec![Effect::MovePointer(4.0, 2.0)]
    );
    let resized = page.handle(Input::Resize(Viewport::new(390.0, 844.0)));
    assert_eq!(resized[0], Effect::ResizeStage(Viewport::new(390.0, 844.0)));

    assert!(page.handle(Input::Offline).is_empty());
    assert!(page.handle(Input::Online).is_empty());
    assert!(page.handle(Input::Fault("boom".into())).is_empty());

    sleep(Duration::from_secs(30)).await;
    let kinds: Vec<_> = snapshot(&events)
        .into_iter()
        .filter_map(|event| match event {
            Event::Show { kind, .. } => Some(kind),
            Event::Hide { .. } => None,
        })
        .collect();
    assert_eq!(
        kinds,
        [
            NotificationKind::Warning,
            NotificationKind::Success,
            NotificationKind::Error
        ]
    );
    center.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn contact_submission_and_whatsapp_link() {
    let (sink, _events) = RecordingSink::new();
    let center = NotificationCenter::spawn(&NotifySettings::default(), sink);
    let mut page = page(&center);

    let invalid = ContactForm {
        name: "Mona".into(),
        email: "mona-at-example".into(),
        project_type: "website".into(),
        message: "short".into(),
        ..ContactForm::default()
    };
    let effects = page.handle(Input::Submit(invalid.clone()));
    let [Effect::ShowFieldErrors(errors)] = effects.as_slice() else {
        panic!("unexpected effects: {effects:?}");
    };
    let fields: Vec<_> = errors.iter().map(|err| err.field).collect();
    assert_eq!(fields, [Field::Email, Field::Message]);

    let valid = ContactForm {
        email: "mona@example.com".into(),
        message: "A landing page for my bakery".into(),
        ..invalid
    };
    assert_eq!(page.handle(Input::Submit(valid.clone())), vec![Effect::ResetForm]);

    let effects = page.handle(Input::WhatsApp(valid));
    let [Effect::OpenUrl(link)] = effects.as_slice() else {
        panic!("unexpected effects: {effects:?}");
    };
    assert_eq!(link.host_str(), Some("wa.me"));
    assert_eq!(link.path(), "/201234567890");
    assert!(!link.query().expect("query").contains('+'));
    let text = link
        .query_pairs()
        .find(|(name, _)| name == "text")
        .map(|(_, value)| value.into_owned())
        .expect("text parameter");
    assert!(text.contains("*Project type:* Website development"));
    assert!(text.contains("*Budget:* Not specified"));
    center.shutdown().await;
}
