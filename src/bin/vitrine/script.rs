//! One event per stdin line, e.g. `key ctrl+t`, `scroll 1200`,
//! `submit name=Mona|email=mona@example.com|projectType=ai|message=...`.

use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use vitrine::commands::{KeyChord, Swipe};
use vitrine::config::Viewport;
use vitrine::contact::ContactForm;
use vitrine::page::Input;
use vitrine::scroll::Rect;

#[derive(Debug, PartialEq)]
pub enum Line {
    Input(Input),
    /// Registers a reveal target: `observe <id> <top> <height>`.
    Observe(String, Rect),
    Wait(Duration),
    Snapshot,
    Quit,
}

pub fn parse_line(line: &str) -> anyhow::Result<Option<Line>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let parsed = match verb.to_ascii_lowercase().as_str() {
        "voice" | "say" => Line::Input(Input::Voice(rest.to_string())),
        "key" => Line::Input(Input::Key(
            rest.parse::<KeyChord>().map_err(|err| anyhow!(err))?,
        )),
        "swipe" => {
            let [x1, y1, x2, y2] = numbers::<4>(rest)?;
            Line::Input(Input::Swipe(Swipe {
                start: (x1, y1),
                end: (x2, y2),
            }))
        }
        "scroll" => {
            let [offset] = numbers::<1>(rest)?;
            Line::Input(Input::Scroll(offset))
        }
        "resize" => {
            let [width, height] = numbers::<2>(rest)?;
            let viewport = Viewport::new(width, height);
            if !viewport.is_usable() {
                bail!("viewport must be positive and finite, got {width}x{height}");
            }
            Line::Input(Input::Resize(viewport))
        }
        "pointer" => {
            let [x, y] = numbers::<2>(rest)?;
            Line::Input(Input::Pointer(x, y))
        }
        "observe" => {
            let (id, dims) = rest
                .split_once(char::is_whitespace)
                .context("expected: observe <id> <top> <height>")?;
            let [top, height] = numbers::<2>(dims)?;
            if !(top.is_finite() && height.is_finite() && height >= 0.0) {
                bail!("invalid rect for {id}: top={top} height={height}");
            }
            Line::Observe(id.to_string(), Rect::new(top, height))
        }
        "hide" => Line::Input(Input::Visibility { visible: false }),
        "show" => Line::Input(Input::Visibility { visible: true }),
        "online" => Line::Input(Input::Online),
        "offline" => Line::Input(Input::Offline),
        "submit" => Line::Input(Input::Submit(form(rest)?)),
        "whatsapp" => Line::Input(Input::WhatsApp(form(rest)?)),
        "fault" => Line::Input(Input::Fault(rest.to_string())),
        "wait" => Line::Wait(
            humantime::parse_duration(rest).with_context(|| format!("invalid duration: {rest}"))?,
        ),
        "snapshot" => Line::Snapshot,
        "quit" | "exit" => Line::Quit,
        other => bail!("unknown script command: {other}"),
    };
    Ok(Some(parsed))
}

fn numbers<const N: usize>(rest: &str) -> anyhow::Result<[f64; N]> {
    let values = rest
        .split_whitespace()
        .map(|raw| {
            raw.parse::<f64>()
                .with_context(|| format!("not a number: {raw}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    <[f64; N]>::try_from(values)
        .map_err(|values| anyhow!("expected {N} numbers, got {}", values.len()))
}

fn form(rest: &str) -> anyhow::Result<ContactForm> {
    let mut form = ContactForm::default();
    for pair in rest.split('|').filter(|pair| !pair.trim().is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("expected key=value, got {pair}"))?;
        let value = value.trim().to_string();
        match key.trim() {
            "name" => form.name = value,
            "email" => form.email = value,
            "phone" => form.phone = value,
            "projectType" | "project_type" => form.project_type = value,
            "budget" => form.budget = value,
            "message" => form.message = value,
            other => bail!("unknown form field: {other}"),
        }
    }
    Ok(form)
}
