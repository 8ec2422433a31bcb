//! Slug generation for articles, categories and tags.
//!
//! Article slugs are `base_slug(title)` followed by `-` and a tick value:
//! 100-nanosecond intervals since 0001-01-01T00:00:00Z. Ticks handed out by
//! [`next_tick`] are strictly increasing within the process, so two articles
//! created from the same title never share a slug here. Separate processes
//! only avoid collisions statistically; the unique index on `article.slug`
//! catches the rest.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::defaults::ARTICLE_SLUG_MAX_LEN;

/// Ticks between 0001-01-01T00:00:00Z and the Unix epoch.
pub const TICKS_AT_UNIX_EPOCH: u64 = 621_355_968_000_000_000;

const NANOS_PER_TICK: u128 = 100;

static LAST_TICK: AtomicU64 = AtomicU64::new(0);

/// Current wall-clock time in ticks.
pub fn now_ticks() -> u64 {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    TICKS_AT_UNIX_EPOCH + (since_epoch.as_nanos() / NANOS_PER_TICK) as u64
}

/// Next tick value for a slug suffix.
///
/// Returns the wall clock when it has moved past the previous value, and
/// `previous + 1` otherwise (same tick, or the clock stepped backwards).
pub fn next_tick() -> u64 {
    let now = now_ticks();
    let prev = LAST_TICK
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    if now <= prev {
        tracing::trace!(
            subsystem = "core",
            component = "slug",
            now,
            prev,
            "Clock did not advance past last slug tick"
        );
    }
    now.max(prev + 1)
}

/// Code points of `0` in every run of ten decimal digits (category Nd).
const DECIMAL_DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
    0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

fn is_decimal_digit(c: char) -> bool {
    let cp = c as u32;
    DECIMAL_DIGIT_ZEROS
        .iter()
        .any(|&zero| (zero..zero + 10).contains(&cp))
}

/// Letters and decimal digits.
///
/// Letter numbers (`Ⅻ`) and other numbers (`²`) are dropped. Marks and
/// symbols carrying the Unicode Alphabetic property (Indic vowel signs,
/// circled letters) are kept, since the standard library exposes no
/// general category.
fn is_letter_or_digit(c: char) -> bool {
    if c.is_numeric() {
        is_decimal_digit(c)
    } else {
        c.is_alphabetic()
    }
}

/// Slug body without the uniqueness suffix.
///
/// Lower-cases one character at a time (no final-sigma rule), turns spaces
/// into hyphens, removes apostrophes and double quotes, then drops anything
/// that is not a letter, a decimal digit or a hyphen.
pub fn base_slug(title: &str) -> String {
    title
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| !matches!(c, '\'' | '"'))
        .filter(|c| is_letter_or_digit(*c) || *c == '-')
        .collect()
}

/// Unique article slug for `title`.
pub fn generate_slug(title: &str) -> String {
    let suffix = next_tick().to_string();
    let budget = ARTICLE_SLUG_MAX_LEN.saturating_sub(suffix.len() + 1);
    let base: String = base_slug(title).chars().take(budget).collect();
    format!("{}-{}", base, suffix)
}
