//! Category label to display tone lookup.

/// Display tone for a notification row. The TUI maps tones to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Blue,
    Grey,
    Purple,
    Orange,
    Red,
    /// Unstyled.
    Default,
}

/// Normalized category label -> tone.
const CATEGORY_TONES: &[(&str, Tone)] = &[
    ("new feature added", Tone::Green),
    ("session started", Tone::Blue),
    ("session ended", Tone::Grey),
    ("private message", Tone::Purple),
    ("announcements", Tone::Orange),
    ("subscription plan update", Tone::Red),
    ("maintenance alert", Tone::Orange),
];

/// Lowercase, trim, and fold `_`/`-` into spaces so `maintenance_alert`,
/// `Maintenance Alert` and `MAINTENANCE ALERT` compare equal.
pub fn normalize_category(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| match c {
            '_' | '-' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

pub fn tone_for_category(label: &str) -> Tone {
    let key = normalize_category(label);
    CATEGORY_TONES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, tone)| *tone)
        .unwrap_or(Tone::Default)
}
