//! Theme flag, its publish/subscribe channel, and per-activity styling.
//!
//! Consumers hold a [`ThemeReceiver`] and react to changes instead of
//! re-reading the stored flag on a timer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

pub type ThemeReceiver = watch::Receiver<Theme>;

/// Single-writer, many-reader theme broadcast.
#[derive(Debug)]
pub struct ThemeChannel {
    tx: watch::Sender<Theme>,
}

impl ThemeChannel {
    pub fn new(initial: Theme) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Theme {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> ThemeReceiver {
        self.tx.subscribe()
    }

    /// Publish a theme. Subscribers are only woken when the value changes.
    /// Returns whether it changed.
    pub fn publish(&self, theme: Theme) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == theme {
                false
            } else {
                tracing::debug!(%theme, "theme changed");
                *current = theme;
                true
            }
        })
    }
}

impl Default for ThemeChannel {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

/// Icon and colour for an activity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityStyle {
    pub icon: &'static str,
    /// `#rrggbb`
    pub color: &'static str,
}

struct StyleRule {
    keywords: &'static [&'static str],
    icon: &'static str,
    light: &'static str,
    dark: &'static str,
}

const STYLE_RULES: &[StyleRule] = &[
    StyleRule {
        keywords: &["math", "calculus", "algebra"],
        icon: "📐",
        light: "#2563eb",
        dark: "#60a5fa",
    },
    StyleRule {
        keywords: &["physics"],
        icon: "⚛",
        light: "#7c3aed",
        dark: "#a78bfa",
    },
    StyleRule {
        keywords: &["chem"],
        icon: "🧪",
        light: "#059669",
        dark: "#34d399",
    },
    StyleRule {
        keywords: &["bio"],
        icon: "🧬",
        light: "#16a34a",
        dark: "#4ade80",
    },
    StyleRule {
        keywords: &["revision", "study", "read", "homework"],
        icon: "📚",
        light: "#0891b2",
        dark: "#22d3ee",
    },
    StyleRule {
        keywords: &["break", "rest", "mind"],
        icon: "☕",
        light: "#d97706",
        dark: "#fbbf24",
    },
    StyleRule {
        keywords: &["breakfast", "lunch", "dinner", "meal", "snack"],
        icon: "🍽",
        light: "#ea580c",
        dark: "#fb923c",
    },
    StyleRule {
        keywords: &["sleep", "nap", "bed"],
        icon: "🌙",
        light: "#4338ca",
        dark: "#818cf8",
    },
    StyleRule {
        keywords: &["exercise", "workout", "gym", "run", "yoga", "walk"],
        icon: "🏃",
        light: "#dc2626",
        dark: "#f87171",
    },
];

const FALLBACK_ICON: &str = "🗓";

/// Pick an icon and colour from keywords in `activity`.
///
/// The rule with the longest matching keyword wins, so "Breakfast" is a
/// meal and not a break.
pub fn activity_style(activity: &str, theme: Theme) -> ActivityStyle {
    let label = activity.to_lowercase();
    let best = STYLE_RULES
        .iter()
        .filter_map(|rule| {
            rule.keywords
                .iter()
                .filter(|kw| label.contains(*kw))
                .map(|kw| kw.len())
                .max()
                .map(|len| (len, rule))
        })
        .max_by_key(|(len, _)| *len);

    match best {
        Some((_, rule)) => ActivityStyle {
            icon: rule.icon,
            color: match theme {
                Theme::Light => rule.light,
                Theme::Dark => rule.dark,
            },
        },
        None => ActivityStyle {
            icon: FALLBACK_ICON,
            color: match theme {
                Theme::Light => "#475569",
                Theme::Dark => "#cbd5e1",
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_flag() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(" Dark ".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.to_string(), "light");
    }

    #[test]
    fn subscribers_see_published_theme() {
        let channel = ThemeChannel::new(Theme::Dark);
        let mut rx = channel.subscribe();
        assert!(!rx.has_changed().unwrap());

        assert!(channel.publish(Theme::Light));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Theme::Light);
        assert_eq!(channel.current(), Theme::Light);
    }

    #[test]
    fn republishing_same_theme_does_not_wake() {
        let channel = ThemeChannel::new(Theme::Dark);
        let rx = channel.subscribe();
        assert!(!channel.publish(Theme::Dark));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn styles_follow_keywords_and_theme() {
        let light = activity_style("Math revision", Theme::Light);
        let dark = activity_style("Math revision", Theme::Dark);
        assert_eq!(light.icon, dark.icon);
        assert_ne!(light.color, dark.color);
        assert_eq!(activity_style("Breakfast", Theme::Dark).icon, "🍽");
        assert_eq!(activity_style("Short break", Theme::Dark).icon, "☕");
        assert_eq!(activity_style("Guitar", Theme::Dark).icon, FALLBACK_ICON);
    }
}
